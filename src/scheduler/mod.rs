pub mod priority;
pub mod round_robin;
pub mod sjf_aging;
pub mod sjn;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{ArrivalGating, SimConfig};
use crate::core::{
    Ticks,
    state::{Pid, SimCtx},
    waitset::WaitingSet,
};
use crate::error::SimError;
pub use priority::PreemptivePriority;
pub use round_robin::AdaptiveRoundRobin;
pub use sjf_aging::SjfAging;
pub use sjn::ShortestJobNext;

pub const DEFAULT_BASE_QUANTUM: Ticks = 5;
pub const DEFAULT_AGING_INTERVAL: Ticks = 10;

/// A dispatch decision: run `pid` for `ticks` starting now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub pid: Pid,
    pub ticks: Ticks,
    /// Quantum in effect, for policies that grant one
    pub quantum: Option<Ticks>,
}

pub trait Policy {
    fn init(config: &SimConfig) -> Self
    where
        Self: Sized;

    fn kind(&self) -> PolicyKind;

    /// Whether processes are admitted only once they have arrived.
    fn gating(&self) -> ArrivalGating {
        ArrivalGating::Gated
    }

    /// Called exactly once per process when it is admitted.
    fn enqueue(&mut self, ctx: &mut SimCtx, pid: Pid);

    /// Chooses the next slice, or `None` if nothing is ready.
    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Slice>;

    /// Called after a slice has run and any arrivals during it were admitted.
    fn stopping(&mut self, _ctx: &mut SimCtx, _pid: Pid, _runnable: bool) {}

    fn waiting(&self) -> &dyn WaitingSet;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    SjfAging,
    RoundRobin,
    Priority,
    Sjn,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 4] = [
        PolicyKind::SjfAging,
        PolicyKind::RoundRobin,
        PolicyKind::Priority,
        PolicyKind::Sjn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::SjfAging => "sjf-aging",
            PolicyKind::RoundRobin => "round-robin",
            PolicyKind::Priority => "priority",
            PolicyKind::Sjn => "sjn",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PolicyKind::SjfAging => "Shortest Job First with Aging",
            PolicyKind::RoundRobin => "Round Robin (adaptive quantum)",
            PolicyKind::Priority => "Preemptive Priority",
            PolicyKind::Sjn => "Shortest Job Next",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sjf-aging" | "sjf" => Ok(PolicyKind::SjfAging),
            "round-robin" | "rr" => Ok(PolicyKind::RoundRobin),
            "priority" | "prio" => Ok(PolicyKind::Priority),
            "sjn" => Ok(PolicyKind::Sjn),
            other => Err(SimError::UnknownPolicy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_names_round_trip_through_from_str() {
        for kind in PolicyKind::ALL {
            assert_eq!(kind.as_str().parse::<PolicyKind>(), Ok(kind));
        }
        assert_eq!(" RR ".parse::<PolicyKind>(), Ok(PolicyKind::RoundRobin));
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert_eq!(
            "lottery".parse::<PolicyKind>(),
            Err(SimError::UnknownPolicy("lottery".into()))
        );
    }
}
