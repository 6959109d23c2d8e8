use std::path::PathBuf;

use clap::Parser;
use log::error;

use hostwatch::config::{Config, ThresholdOverrides};
use hostwatch::{logging, Monitor, Reporter};

#[derive(Parser, Debug)]
#[command(name = "hostwatch", about = "Host resource monitor", version)]
struct Args {
    /// Run a single check pass and exit
    #[arg(long)]
    once: bool,

    /// Path to a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// CPU threshold percentage
    #[arg(long)]
    cpu_threshold: Option<f64>,

    /// Memory threshold percentage
    #[arg(long)]
    memory_threshold: Option<f64>,

    /// Disk threshold percentage
    #[arg(long)]
    disk_threshold: Option<f64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let overrides = ThresholdOverrides {
        cpu: args.cpu_threshold,
        memory: args.memory_threshold,
        disk: args.disk_threshold,
    };
    let (config, config_warning) = Config::resolve(args.config.as_deref(), overrides);

    logging::init(&config.log_file);
    if let Some(warning) = config_warning {
        error!("{warning}");
    }

    let reporter = Reporter::new(config.alerts_file.clone());
    let mut monitor = Monitor::new(config);

    if args.once {
        monitor.run_once().await;
    } else {
        monitor.run_continuous(&reporter).await;
    }
}
