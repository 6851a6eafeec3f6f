use thiserror::Error;

use crate::core::ProcessId;

/// Rejections raised before a simulation starts.
///
/// Structural violations found while a simulation is running (negative
/// remaining time, double admission) are defects and panic instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("workload is empty; at least one process is required")]
    EmptyWorkload,

    #[error("process {0} has a burst time of zero")]
    NonPositiveBurst(ProcessId),

    #[error("process id {0} appears more than once in the workload")]
    DuplicateId(ProcessId),

    #[error("total burst time plus the latest arrival overflows the simulation clock")]
    WorkloadOverflow,

    #[error("round-robin base quantum must be positive")]
    ZeroQuantum,

    #[error("aging interval must be positive")]
    ZeroAgingInterval,

    #[error("unknown scheduling policy `{0}`")]
    UnknownPolicy(String),

    #[error("invalid workload generator parameter: {0}")]
    InvalidGenerator(&'static str),
}
