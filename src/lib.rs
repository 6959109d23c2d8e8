pub mod alerts;
pub mod config;
pub mod logging;
pub mod monitor;
pub mod reporter;

pub use alerts::{Alert, AlertKind};
pub use config::Config;
pub use monitor::Monitor;
pub use reporter::Reporter;

use serde::Serialize;

/// Point-in-time view of the host, assembled for the "System OK" summary.
/// Never stored; only logged.
#[derive(Debug, Clone, Serialize)]
pub struct SystemSnapshot {
    pub timestamp: String,
    pub cpu_percent: f64,
    pub cpu_count: usize,
    pub mem_total: u64,
    pub mem_used: u64,
    pub mem_available: u64,
    pub mem_percent: f64,
    pub disk_total: u64,
    pub disk_used: u64,
    pub disk_free: u64,
    pub disk_percent: f64,
    /// 1/5/15-minute load averages; absent on platforms without getloadavg.
    pub load_avg: Option<[f64; 3]>,
    pub uptime_secs: u64,
}
