use rustc_hash::FxHashMap;

use super::{Policy, PolicyKind, Slice};
use crate::config::SimConfig;
use crate::core::state::{Pid, Priority, SimCtx};
use crate::core::waitset::{KeyedHeap, WaitingSet};

// (priority, admission sequence)
type PrioKey = (Priority, u64);

/// Preemptive strict priority with unit-tick slices. Lower value wins;
/// equal priorities go by admission order.
pub struct PreemptivePriority {
    ready: KeyedHeap<PrioKey>,
    keys: FxHashMap<Pid, PrioKey>,
    admitted: u64,
}

impl Policy for PreemptivePriority {
    fn init(_config: &SimConfig) -> Self {
        Self {
            ready: KeyedHeap::new(),
            keys: FxHashMap::default(),
            admitted: 0,
        }
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Priority
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, pid: Pid) {
        let key = (ctx.process(pid).priority, self.admitted);
        self.admitted += 1;
        self.keys.insert(pid, key);
        self.ready.push(pid, key);
    }

    fn dispatch(&mut self, _ctx: &mut SimCtx) -> Option<Slice> {
        let pid = self.ready.pop_next()?;
        Some(Slice {
            pid,
            ticks: 1,
            quantum: None,
        })
    }

    fn stopping(&mut self, _ctx: &mut SimCtx, pid: Pid, runnable: bool) {
        if runnable {
            let key = self.keys[&pid];
            self.ready.push(pid, key);
        } else {
            self.keys.remove(&pid);
        }
    }

    fn waiting(&self) -> &dyn WaitingSet {
        &self.ready
    }
}
