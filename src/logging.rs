use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Writer that duplicates every log line to stdout and, when available, the
/// log file.
struct Tee {
    file: Option<File>,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        if let Some(file) = self.file.as_mut() {
            // Console output already succeeded; a full disk must not take
            // down the monitor.
            let _ = file.write_all(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        if let Some(file) = self.file.as_mut() {
            let _ = file.flush();
        }
        Ok(())
    }
}

/// Initialize the process-wide logger: info level by default (`RUST_LOG`
/// overrides), timestamped lines written to both stdout and `log_file`.
///
/// If the log file or its directory cannot be created the logger falls back
/// to console-only and reports what went wrong after initialization.
pub fn init(log_file: &Path) {
    // Open failure is held until the logger is up so it still hits stdout
    // with the usual formatting.
    let (file, open_err) = match open_log_file(log_file) {
        Ok(file) => (Some(file), None),
        Err(err) => (None, Some(err)),
    };

    let _ = Builder::from_env(Env::default())
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_millis()
        .target(Target::Pipe(Box::new(Tee { file })))
        .try_init();

    if let Some(err) = open_err {
        log::error!(
            "Failed to open log file {}: {err}; logging to console only",
            log_file.display()
        );
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}
