// Domain models

mod container;
mod group;
mod stats;

pub use container::{ContainerState, ContainerSummary};
pub use group::{Group, GroupStatus};
pub use stats::{CpuSample, CpuUsage, MemoryUsage, NetworkInfo, StatsSnapshot};
