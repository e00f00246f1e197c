// Point-in-time container stats and the JSON bodies derived from them

use bollard::models::EndpointSettings;
use serde::Serialize;
use std::collections::HashMap;

/// Cumulative CPU counters from one sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuSample {
    /// Total CPU time consumed by the container (ns).
    pub total_usage: u64,
    /// Host CPU time elapsed (ns).
    pub system_usage: u64,
}

/// One stats fetch: the engine samples twice and reports both, so no history is kept here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub cpu: CpuSample,
    pub precpu: CpuSample,
    pub online_cpus: Option<u32>,
    pub memory_usage_bytes: u64,
    pub memory_limit_bytes: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuUsage {
    pub container_id: String,
    pub cpu_usage: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    pub container_id: String,
    pub memory_usage: String,
    pub memory_limit: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub container_id: String,
    pub network_info: HashMap<String, EndpointSettings>,
}
