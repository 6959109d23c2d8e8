use std::path::Path;
use std::time::Duration;

use chrono::Local;
use log::{debug, error, info, warn};
use sysinfo::{Disks, ProcessesToUpdate, System};
use tokio::time::sleep;

use crate::alerts::Alert;
use crate::config::Config;
use crate::reporter::Reporter;
use crate::SystemSnapshot;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// CPU utilization is measured over this window; the measurement itself is
/// the suspension point of a check pass.
const CPU_SAMPLE_WINDOW: Duration = Duration::from_secs(1);

/// How many processes the per-process ranking keeps.
const TOP_PROCESSES: usize = 5;

/// Per-process CPU percentage above which a warning is logged.
const PROCESS_CPU_WARN_PCT: f32 = 50.0;

/// Runs the monitoring checks and owns the alert buffer between flushes.
///
/// One instance, one thread: checks alternate with sleeps, nothing is shared.
pub struct Monitor {
    config: Config,
    sys: System,
    alerts: Vec<Alert>,
}

impl Monitor {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            sys: System::new(),
            alerts: Vec::new(),
        }
    }

    /// Alerts accumulated since the last successful flush, in detection order.
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Sample CPU utilization over a fixed window and evaluate it.
    pub async fn check_cpu(&mut self) -> bool {
        self.sys.refresh_cpu_usage();
        sleep(CPU_SAMPLE_WINDOW).await;
        self.sys.refresh_cpu_usage();
        self.observe_cpu(self.sys.global_cpu_usage() as f64)
    }

    /// Evaluate a CPU utilization percentage against the threshold. Breaches
    /// are strict `>`: a value equal to the threshold is fine.
    pub fn observe_cpu(&mut self, value: f64) -> bool {
        if value > self.config.cpu_threshold {
            let alert = Alert::cpu(value, self.config.cpu_threshold);
            warn!("{}", alert.message);
            self.alerts.push(alert);
            return false;
        }
        true
    }

    pub fn check_memory(&mut self) -> bool {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        if total == 0 {
            error!("Memory check failed: system reports no memory");
            return false;
        }
        let used = self.sys.used_memory();
        self.observe_memory(used as f64 / total as f64 * 100.0, used)
    }

    pub fn observe_memory(&mut self, value: f64, used_bytes: u64) -> bool {
        if value > self.config.memory_threshold {
            let alert = Alert::memory(value, self.config.memory_threshold, used_bytes);
            warn!("{}", alert.message);
            self.alerts.push(alert);
            return false;
        }
        true
    }

    pub fn check_disk(&mut self) -> bool {
        let disks = Disks::new_with_refreshed_list();
        match disks
            .list()
            .iter()
            .find(|disk| disk.mount_point() == Path::new("/"))
        {
            Some(disk) => {
                let total = disk.total_space();
                let used = total.saturating_sub(disk.available_space());
                self.observe_disk(used, total)
            }
            None => {
                error!("Disk check failed: no filesystem mounted at /");
                false
            }
        }
    }

    /// Evaluate disk usage from raw byte counts. The percentage is always
    /// `used / total * 100`, not the filesystem-reported figure, so reserved
    /// blocks cannot skew the comparison.
    pub fn observe_disk(&mut self, used: u64, total: u64) -> bool {
        if total == 0 {
            error!("Disk check failed: filesystem reports zero size");
            return false;
        }
        let value = used as f64 / total as f64 * 100.0;
        if value > self.config.disk_threshold {
            let alert = Alert::disk(value, self.config.disk_threshold, used);
            warn!("{}", alert.message);
            self.alerts.push(alert);
            return false;
        }
        true
    }

    /// Log cumulative traffic per non-loopback interface. Purely
    /// informational: this check never raises an alert.
    pub fn check_network(&self) -> bool {
        if !self.config.network_monitor {
            return true;
        }
        match procfs::net::dev_status() {
            Ok(interfaces) => {
                for stat in interfaces.values() {
                    if stat.name.starts_with("lo") {
                        continue;
                    }
                    debug!(
                        "Network {}: {}MB sent, {}MB received",
                        stat.name,
                        stat.sent_bytes / BYTES_PER_MB,
                        stat.recv_bytes / BYTES_PER_MB
                    );
                }
                true
            }
            Err(err) => {
                error!("Network check failed: {err}");
                false
            }
        }
    }

    /// Rank processes by CPU and by memory, log the heavy hitters. Like the
    /// network check, this never raises an alert.
    pub fn check_processes(&mut self) -> bool {
        if !self.config.process_monitor {
            return true;
        }
        self.sys.refresh_processes(ProcessesToUpdate::All, true);
        if self.sys.total_memory() == 0 {
            self.sys.refresh_memory();
        }
        let total_memory = self.sys.total_memory().max(1) as f64;

        let mut by_cpu: Vec<(u32, String, f32)> = self
            .sys
            .processes()
            .values()
            .map(|p| {
                (
                    p.pid().as_u32(),
                    p.name().to_string_lossy().into_owned(),
                    p.cpu_usage(),
                )
            })
            .collect();
        by_cpu.sort_by(|a, b| b.2.total_cmp(&a.2));
        by_cpu.truncate(TOP_PROCESSES);

        let mut by_memory: Vec<(u32, String, f64)> = self
            .sys
            .processes()
            .values()
            .map(|p| {
                (
                    p.pid().as_u32(),
                    p.name().to_string_lossy().into_owned(),
                    p.memory() as f64 / total_memory * 100.0,
                )
            })
            .collect();
        by_memory.sort_by(|a, b| b.2.total_cmp(&a.2));
        by_memory.truncate(TOP_PROCESSES);

        for (pid, name, mem_pct) in &by_memory {
            debug!("Top memory process: {name} (PID {pid}) using {mem_pct:.1}% memory");
        }

        for (pid, name, cpu_pct) in &by_cpu {
            if *cpu_pct > PROCESS_CPU_WARN_PCT {
                warn!("High CPU process: {name} (PID {pid}) using {cpu_pct:.1}% CPU");
            }
        }
        true
    }

    /// Assemble a snapshot for the summary line. Infallible: fields that
    /// cannot be read come back zeroed or absent. The CPU figure is the most
    /// recent sample taken by `check_cpu`.
    pub fn system_info(&mut self) -> SystemSnapshot {
        self.sys.refresh_memory();
        let mem_total = self.sys.total_memory();
        let mem_used = self.sys.used_memory();
        let mem_percent = if mem_total == 0 {
            0.0
        } else {
            mem_used as f64 / mem_total as f64 * 100.0
        };

        let disks = Disks::new_with_refreshed_list();
        let (disk_total, disk_used) = disks
            .list()
            .iter()
            .find(|disk| disk.mount_point() == Path::new("/"))
            .map(|disk| {
                let total = disk.total_space();
                (total, total.saturating_sub(disk.available_space()))
            })
            .unwrap_or((0, 0));
        let disk_percent = if disk_total == 0 {
            0.0
        } else {
            disk_used as f64 / disk_total as f64 * 100.0
        };

        SystemSnapshot {
            timestamp: Local::now().to_rfc3339(),
            cpu_percent: self.sys.global_cpu_usage() as f64,
            cpu_count: self.sys.cpus().len(),
            mem_total,
            mem_used,
            mem_available: self.sys.available_memory(),
            mem_percent,
            disk_total,
            disk_used,
            disk_free: disk_total.saturating_sub(disk_used),
            disk_percent,
            load_avg: load_average(),
            uptime_secs: System::uptime(),
        }
    }

    /// One full monitoring pass. Every check runs regardless of earlier
    /// failures; the results are AND-ed, never short-circuited.
    pub async fn run_once(&mut self) -> bool {
        info!("Running system check...");

        let mut all_good = true;
        all_good &= self.check_cpu().await;
        all_good &= self.check_memory();
        all_good &= self.check_disk();
        all_good &= self.check_network();
        all_good &= self.check_processes();

        if all_good {
            let snapshot = self.system_info();
            info!(
                "System OK - CPU: {:.1}%, Memory: {:.1}%, Disk: {:.1}%",
                snapshot.cpu_percent, snapshot.mem_percent, snapshot.disk_percent
            );
        }
        all_good
    }

    /// Check, flush, sleep, repeat. Ctrl-C interrupts the cycle and triggers
    /// one final best-effort flush before returning.
    pub async fn run_continuous(&mut self, reporter: &Reporter) {
        info!(
            "Starting system monitor (checking every {} seconds)",
            self.config.check_interval
        );
        info!(
            "Thresholds - CPU: {}%, Memory: {}%, Disk: {}%",
            self.config.cpu_threshold, self.config.memory_threshold, self.config.disk_threshold
        );

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            self.run_once().await;
            self.flush_alerts(reporter);

            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("Monitor stopped by user");
                    self.flush_alerts(reporter);
                    return;
                }
                _ = sleep(Duration::from_secs(self.config.check_interval)) => {}
            }
        }
    }

    fn flush_alerts(&mut self, reporter: &Reporter) {
        if self.alerts.is_empty() {
            return;
        }
        if let Err(err) = reporter.flush(&mut self.alerts) {
            error!("Failed to save alerts: {err:#}");
        }
    }
}

#[cfg(unix)]
fn load_average() -> Option<[f64; 3]> {
    let load = System::load_average();
    Some([load.one, load.five, load.fifteen])
}

#[cfg(not(unix))]
fn load_average() -> Option<[f64; 3]> {
    None
}
