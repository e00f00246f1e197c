// Metric translation: cumulative counters -> percentages and MB

use crate::models::{CpuUsage, MemoryUsage, StatsSnapshot};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Instantaneous CPU usage in percent of one core, scaled by online CPUs.
///
/// Zero when the host counter did not advance or the online CPU count is unknown.
pub fn cpu_percent(s: &StatsSnapshot) -> f64 {
    let cpu_delta = s.cpu.total_usage as f64 - s.precpu.total_usage as f64;
    let system_delta = s.cpu.system_usage as f64 - s.precpu.system_usage as f64;
    match s.online_cpus {
        Some(online) if system_delta > 0.0 && online > 0 => {
            (cpu_delta / system_delta) * online as f64 * 100.0
        }
        _ => 0.0,
    }
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Two-decimal rendering used by every metric endpoint.
pub fn two_decimals(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn cpu_usage(container_id: &str, s: &StatsSnapshot) -> CpuUsage {
    CpuUsage {
        container_id: container_id.to_string(),
        cpu_usage: two_decimals(cpu_percent(s)),
    }
}

/// Usage is reported as-is even when above the limit.
pub fn memory_usage(container_id: &str, s: &StatsSnapshot) -> MemoryUsage {
    MemoryUsage {
        container_id: container_id.to_string(),
        memory_usage: two_decimals(bytes_to_mb(s.memory_usage_bytes)),
        memory_limit: two_decimals(bytes_to_mb(s.memory_limit_bytes)),
    }
}
