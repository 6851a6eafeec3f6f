use rand::prelude::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::state::{Priority, ProcessId, Ticks};
use crate::error::SimError;

/// Immutable facts about one process. Each run builds fresh run-time state
/// from these, so a workload can be replayed under every policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub id: ProcessId,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    #[serde(default)]
    pub priority: Priority,
}

impl ProcessSpec {
    pub const fn new(id: u32, arrival_time: Ticks, burst_time: Ticks, priority: Priority) -> Self {
        Self {
            id: ProcessId(id),
            arrival_time,
            burst_time,
            priority,
        }
    }
}

/// A validated, non-empty set of process specs in workload order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    specs: Vec<ProcessSpec>,
}

impl Workload {
    pub fn new(specs: Vec<ProcessSpec>) -> Result<Self, SimError> {
        if specs.is_empty() {
            return Err(SimError::EmptyWorkload);
        }

        let mut seen = FxHashSet::default();
        for spec in &specs {
            if spec.burst_time == 0 {
                return Err(SimError::NonPositiveBurst(spec.id));
            }
            if !seen.insert(spec.id) {
                return Err(SimError::DuplicateId(spec.id));
            }
        }

        // The clock never passes the latest arrival plus all the work
        let latest_arrival = specs.iter().map(|s| s.arrival_time).max().unwrap_or(0);
        specs
            .iter()
            .try_fold(latest_arrival, |end, s| end.checked_add(s.burst_time))
            .ok_or(SimError::WorkloadOverflow)?;

        Ok(Self { specs })
    }

    /// Four long jobs arriving two ticks apart.
    pub fn demo() -> Self {
        Self {
            specs: vec![
                ProcessSpec::new(1, 0, 20, 2),
                ProcessSpec::new(2, 2, 10, 1),
                ProcessSpec::new(3, 4, 30, 3),
                ProcessSpec::new(4, 6, 40, 2),
            ],
        }
    }

    /// Draws a Bernoulli arrival per tick from a seeded generator; a new
    /// process is short with probability `p_short`, long otherwise.
    pub fn bernoulli(params: &BernoulliParams) -> Result<Self, SimError> {
        params.validate()?;
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut specs = Vec::new();

        for t in 0..params.ticks {
            if rng.random::<f64>() < params.p_arrival {
                let burst_time = if rng.random::<f64>() < params.p_short {
                    params.short_burst
                } else {
                    params.long_burst
                };
                let priority = rng.random_range(0..=params.max_priority);

                specs.push(ProcessSpec::new(
                    specs.len() as u32 + 1,
                    t,
                    burst_time,
                    priority,
                ));
            }
        }

        Self::new(specs)
    }

    pub fn specs(&self) -> &[ProcessSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn total_burst(&self) -> Ticks {
        self.specs.iter().map(|s| s.burst_time).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BernoulliParams {
    pub ticks: Ticks,
    pub p_arrival: f64,
    pub p_short: f64,
    pub short_burst: Ticks,
    pub long_burst: Ticks,
    pub max_priority: Priority,
    pub seed: u64,
}

impl Default for BernoulliParams {
    fn default() -> Self {
        Self {
            ticks: 100,
            p_arrival: 0.3,
            p_short: 0.3,
            short_burst: 2,
            long_burst: 6,
            max_priority: 4,
            seed: 0,
        }
    }
}

impl BernoulliParams {
    fn validate(&self) -> Result<(), SimError> {
        if !(0.0..=1.0).contains(&self.p_arrival) {
            return Err(SimError::InvalidGenerator("p_arrival must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.p_short) {
            return Err(SimError::InvalidGenerator("p_short must be within [0, 1]"));
        }
        if self.short_burst == 0 || self.long_burst == 0 {
            return Err(SimError::InvalidGenerator("burst lengths must be positive"));
        }
        if self.max_priority < 0 {
            return Err(SimError::InvalidGenerator("max_priority must not be negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_workload() {
        assert_eq!(Workload::new(vec![]), Err(SimError::EmptyWorkload));
    }

    #[test]
    fn rejects_zero_burst() {
        let specs = vec![ProcessSpec::new(1, 0, 4, 0), ProcessSpec::new(2, 1, 0, 0)];
        assert_eq!(
            Workload::new(specs),
            Err(SimError::NonPositiveBurst(ProcessId(2)))
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let specs = vec![ProcessSpec::new(3, 0, 4, 0), ProcessSpec::new(3, 1, 2, 0)];
        assert_eq!(Workload::new(specs), Err(SimError::DuplicateId(ProcessId(3))));
    }

    #[test]
    fn rejects_work_beyond_the_clock() {
        let half = u64::MAX / 2 + 1;
        let specs = vec![ProcessSpec::new(1, 0, half, 0), ProcessSpec::new(2, 0, half, 0)];
        assert_eq!(Workload::new(specs), Err(SimError::WorkloadOverflow));

        let specs = vec![ProcessSpec::new(1, u64::MAX - 1, 2, 0)];
        assert_eq!(Workload::new(specs), Err(SimError::WorkloadOverflow));
    }

    #[test]
    fn accepts_work_ending_exactly_at_the_clock_limit() {
        let specs = vec![
            ProcessSpec::new(1, u64::MAX - 10, 4, 0),
            ProcessSpec::new(2, 0, 6, 0),
        ];
        let workload = Workload::new(specs).unwrap();
        assert_eq!(workload.total_burst(), 10);
    }

    #[test]
    fn bernoulli_is_reproducible_for_a_seed() {
        let params = BernoulliParams {
            seed: 42,
            ..BernoulliParams::default()
        };
        let a = Workload::bernoulli(&params).unwrap();
        let b = Workload::bernoulli(&params).unwrap();
        assert_eq!(a, b);

        let mut last_arrival = 0;
        for (i, spec) in a.specs().iter().enumerate() {
            assert_eq!(spec.id, ProcessId(i as u32 + 1));
            assert!(spec.arrival_time >= last_arrival);
            assert!(spec.burst_time == 2 || spec.burst_time == 6);
            assert!((0..=4).contains(&spec.priority));
            last_arrival = spec.arrival_time;
        }
    }

    #[test]
    fn bernoulli_without_arrivals_is_empty() {
        let params = BernoulliParams {
            p_arrival: 0.0,
            ..BernoulliParams::default()
        };
        assert_eq!(Workload::bernoulli(&params), Err(SimError::EmptyWorkload));
    }

    #[test]
    fn bernoulli_rejects_bad_probability() {
        let params = BernoulliParams {
            p_short: 1.5,
            ..BernoulliParams::default()
        };
        assert!(matches!(
            Workload::bernoulli(&params),
            Err(SimError::InvalidGenerator(_))
        ));
    }
}
