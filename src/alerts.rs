use chrono::Local;
use serde::{Deserialize, Serialize};

const BYTES_PER_MB: u64 = 1024 * 1024;
const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;

/// Which metric breached its threshold. Network and process checks log but
/// never raise alerts, so they have no kind here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Cpu,
    Memory,
    Disk,
}

/// A recorded threshold breach. Immutable once created; serialized as one
/// element of the alerts-file JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub value: f64,
    pub threshold: f64,
    pub message: String,
}

impl Alert {
    fn new(kind: AlertKind, value: f64, threshold: f64, message: String) -> Self {
        Self {
            timestamp: Local::now().to_rfc3339(),
            kind,
            value,
            threshold,
            message,
        }
    }

    pub fn cpu(value: f64, threshold: f64) -> Self {
        let message = format!("High CPU usage: {value:.1}%");
        Self::new(AlertKind::Cpu, value, threshold, message)
    }

    pub fn memory(value: f64, threshold: f64, used_bytes: u64) -> Self {
        let message = format!(
            "High memory usage: {value:.1}% ({}MB used)",
            used_bytes / BYTES_PER_MB
        );
        Self::new(AlertKind::Memory, value, threshold, message)
    }

    pub fn disk(value: f64, threshold: f64, used_bytes: u64) -> Self {
        let message = format!(
            "High disk usage: {value:.1}% ({}GB used)",
            used_bytes / BYTES_PER_GB
        );
        Self::new(AlertKind::Disk, value, threshold, message)
    }
}
