use rustc_hash::FxHashMap;
use tracing::trace;

use super::{Policy, PolicyKind, Slice};
use crate::config::{ArrivalGating, SimConfig};
use crate::core::{
    Ticks,
    state::{Pid, Priority, SimCtx},
    waitset::{ResortableList, WaitingSet},
};

/// Non-preemptive shortest-job-first. After every dispatch each waiting
/// process has its priority aged by `floor(waited / interval)`.
///
/// Ordering is burst time, then (optionally) aged priority, then insertion
/// order. With `ArrivalGating::Ungated` every process is admitted up front,
/// so a short job can be dispatched before it has arrived.
pub struct SjfAging {
    waiting: ResortableList,
    effective: FxHashMap<Pid, Priority>,
    interval: Ticks,
    gating: ArrivalGating,
    priority_tiebreak: bool,
}

impl SjfAging {
    /// Aged priority of a waiting process.
    pub fn effective_priority(&self, pid: Pid) -> Option<Priority> {
        self.effective.get(&pid).copied()
    }

    fn age(&mut self, ctx: &SimCtx) {
        for pid in self.waiting.iter() {
            let process = ctx.process(pid);
            let waited = ctx.now.saturating_sub(process.arrival_time);
            let boost = Priority::try_from(waited / self.interval).unwrap_or(Priority::MAX);
            let aged = process.priority.saturating_sub(boost);
            trace!(process = %process.id, waited, aged, "aging");
            self.effective.insert(pid, aged);
        }
        self.resort(ctx);
    }

    fn resort(&mut self, ctx: &SimCtx) {
        let effective = &self.effective;
        let priority_tiebreak = self.priority_tiebreak;
        self.waiting.resort_by_key(|pid| {
            let tiebreak = if priority_tiebreak {
                effective.get(&pid).copied().unwrap_or_default()
            } else {
                0
            };
            (ctx.process(pid).burst_time, tiebreak)
        });
    }
}

impl Policy for SjfAging {
    fn init(config: &SimConfig) -> Self {
        Self {
            waiting: ResortableList::new(),
            effective: FxHashMap::default(),
            interval: config.aging.interval,
            gating: config.aging.gating,
            priority_tiebreak: config.aging.priority_tiebreak,
        }
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::SjfAging
    }

    fn gating(&self) -> ArrivalGating {
        self.gating
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, pid: Pid) {
        self.waiting.push(pid);
        self.effective.insert(pid, ctx.process(pid).priority);
        self.resort(ctx);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Slice> {
        let pid = self.waiting.pop_next()?;
        self.effective.remove(&pid);
        Some(Slice {
            pid,
            ticks: ctx.process(pid).remaining_time,
            quantum: None,
        })
    }

    fn stopping(&mut self, ctx: &mut SimCtx, pid: Pid, runnable: bool) {
        debug_assert!(!runnable, "SJF runs {pid} to completion");
        self.age(ctx);
    }

    fn waiting(&self) -> &dyn WaitingSet {
        &self.waiting
    }
}
