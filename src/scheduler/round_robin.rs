use std::cmp;

use average::Mean;
use tracing::trace;

use super::{Policy, PolicyKind, Slice};
use crate::config::SimConfig;
use crate::core::{
    Ticks,
    state::{Pid, SimCtx},
    waitset::{RequeueRing, WaitingSet},
};

/// Round robin whose quantum is recomputed after every slice as
/// `max(base, round(mean remaining time of the queued processes))`.
pub struct AdaptiveRoundRobin {
    queue: RequeueRing,
    base_quantum: Ticks,
    quantum: Ticks,
}

impl AdaptiveRoundRobin {
    pub fn quantum(&self) -> Ticks {
        self.quantum
    }

    fn recompute_quantum(&mut self, ctx: &SimCtx) {
        self.quantum = if self.queue.is_empty() {
            self.base_quantum
        } else {
            let mean: Mean = self
                .queue
                .iter()
                .map(|pid| ctx.process(pid).remaining_time as f64)
                .collect();
            cmp::max(self.base_quantum, mean.mean().round() as Ticks)
        };
        trace!(quantum = self.quantum, queued = self.queue.len(), "quantum recomputed");
    }
}

impl Policy for AdaptiveRoundRobin {
    fn init(config: &SimConfig) -> Self {
        Self {
            queue: RequeueRing::new(),
            base_quantum: config.base_quantum,
            quantum: config.base_quantum,
        }
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::RoundRobin
    }

    fn enqueue(&mut self, _ctx: &mut SimCtx, pid: Pid) {
        self.queue.push_back(pid);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Slice> {
        let pid = self.queue.pop_next()?;
        let remaining = ctx.process(pid).remaining_time;
        Some(Slice {
            pid,
            ticks: cmp::min(self.quantum, remaining),
            quantum: Some(self.quantum),
        })
    }

    // The new quantum only applies from the next dispatch on
    fn stopping(&mut self, ctx: &mut SimCtx, pid: Pid, runnable: bool) {
        self.recompute_quantum(ctx);
        if runnable {
            self.queue.push_back(pid);
        }
    }

    fn waiting(&self) -> &dyn WaitingSet {
        &self.queue
    }
}
