use super::{Policy, PolicyKind, Slice};
use crate::config::SimConfig;
use crate::core::{
    Ticks,
    state::{Pid, SimCtx},
    waitset::{KeyedHeap, WaitingSet},
};

/// Non-preemptive shortest-job-next among processes that have arrived.
/// Ties go to the process listed first in the workload.
pub struct ShortestJobNext {
    // (burst, workload position)
    ready: KeyedHeap<(Ticks, Pid)>,
}

impl Policy for ShortestJobNext {
    fn init(_config: &SimConfig) -> Self {
        Self {
            ready: KeyedHeap::new(),
        }
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Sjn
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, pid: Pid) {
        self.ready.push(pid, (ctx.process(pid).burst_time, pid));
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Slice> {
        let pid = self.ready.pop_next()?;
        Some(Slice {
            pid,
            ticks: ctx.process(pid).remaining_time,
            quantum: None,
        })
    }

    fn waiting(&self) -> &dyn WaitingSet {
        &self.ready
    }
}
