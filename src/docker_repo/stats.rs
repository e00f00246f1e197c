// Convert a raw Docker stats API response into a StatsSnapshot.

use crate::models::{CpuSample, StatsSnapshot};
use bollard::models::{ContainerCpuStats, ContainerStatsResponse};

fn cpu_sample(stats: Option<&ContainerCpuStats>) -> CpuSample {
    let Some(stats) = stats else {
        return CpuSample::default();
    };
    CpuSample {
        total_usage: stats
            .cpu_usage
            .as_ref()
            .and_then(|u| u.total_usage)
            .unwrap_or(0),
        system_usage: stats.system_cpu_usage.unwrap_or(0),
    }
}

/// Missing sections (e.g. a stopped container) read as zero.
pub(crate) fn snapshot_from_response(s: &ContainerStatsResponse) -> StatsSnapshot {
    StatsSnapshot {
        cpu: cpu_sample(s.cpu_stats.as_ref()),
        precpu: cpu_sample(s.precpu_stats.as_ref()),
        online_cpus: s.cpu_stats.as_ref().and_then(|c| c.online_cpus),
        memory_usage_bytes: s.memory_stats.as_ref().and_then(|m| m.usage).unwrap_or(0),
        memory_limit_bytes: s.memory_stats.as_ref().and_then(|m| m.limit).unwrap_or(0),
    }
}
