use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Resolved monitor configuration. Built once at startup from defaults, the
/// optional JSON config file, and CLI overrides (in that precedence order),
/// then passed around immutably.
#[derive(Debug, Clone)]
pub struct Config {
    /// CPU usage percentage above which an alert is raised.
    pub cpu_threshold: f64,
    /// Memory usage percentage above which an alert is raised.
    pub memory_threshold: f64,
    /// Disk usage percentage above which an alert is raised.
    pub disk_threshold: f64,
    /// Seconds between monitoring cycles in continuous mode.
    pub check_interval: u64,
    pub log_file: PathBuf,
    pub alerts_file: PathBuf,
    pub network_monitor: bool,
    pub process_monitor: bool,
}

impl Default for Config {
    fn default() -> Self {
        let log_dir = home_dir().join("logs");
        Self {
            cpu_threshold: 80.0,
            memory_threshold: 85.0,
            disk_threshold: 90.0,
            check_interval: 30,
            log_file: log_dir.join("hostwatch.log"),
            alerts_file: log_dir.join("hostwatch-alerts.json"),
            network_monitor: true,
            process_monitor: true,
        }
    }
}

/// CLI threshold overrides; applied last, on top of any config-file values.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThresholdOverrides {
    pub cpu: Option<f64>,
    pub memory: Option<f64>,
    pub disk: Option<f64>,
}

/// Partial view of the JSON config file. Every key is optional and unknown
/// keys are ignored; present keys overwrite the corresponding default.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    cpu_threshold: Option<f64>,
    memory_threshold: Option<f64>,
    disk_threshold: Option<f64>,
    check_interval: Option<u64>,
    log_file: Option<PathBuf>,
    alerts_file: Option<PathBuf>,
    network_monitor: Option<bool>,
    process_monitor: Option<bool>,
}

impl Config {
    /// Resolve the effective configuration. A config file that cannot be read
    /// or parsed leaves the defaults in place; the problem is returned as a
    /// message so the caller can log it once the logger is up.
    pub fn resolve(
        config_path: Option<&Path>,
        overrides: ThresholdOverrides,
    ) -> (Self, Option<String>) {
        let mut config = Config::default();
        let mut warning = None;

        if let Some(path) = config_path {
            match load_file(path) {
                Ok(file_config) => config.apply_file(file_config, &mut warning),
                Err(err) => {
                    warning = Some(format!(
                        "Failed to load config file {}: {err:#}",
                        path.display()
                    ));
                }
            }
        }

        if let Some(cpu) = overrides.cpu {
            config.cpu_threshold = cpu;
        }
        if let Some(memory) = overrides.memory {
            config.memory_threshold = memory;
        }
        if let Some(disk) = overrides.disk {
            config.disk_threshold = disk;
        }

        (config, warning)
    }

    fn apply_file(&mut self, file: FileConfig, warning: &mut Option<String>) {
        if let Some(v) = file.cpu_threshold {
            self.cpu_threshold = v;
        }
        if let Some(v) = file.memory_threshold {
            self.memory_threshold = v;
        }
        if let Some(v) = file.disk_threshold {
            self.disk_threshold = v;
        }
        match file.check_interval {
            Some(0) => {
                *warning = Some("Ignoring check_interval = 0; keeping default".to_string());
            }
            Some(v) => self.check_interval = v,
            None => {}
        }
        if let Some(v) = file.log_file {
            self.log_file = v;
        }
        if let Some(v) = file.alerts_file {
            self.alerts_file = v;
        }
        if let Some(v) = file.network_monitor {
            self.network_monitor = v;
        }
        if let Some(v) = file.process_monitor {
            self.process_monitor = v;
        }
    }
}

fn load_file(path: &Path) -> anyhow::Result<FileConfig> {
    let content = std::fs::read_to_string(path)?;
    let config = serde_json::from_str(&content)?;
    Ok(config)
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}
