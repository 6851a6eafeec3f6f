use tracing::{debug, trace};

use super::{
    event::SimEvent,
    observer::Observer,
    state::{Pid, ProcessState, SimCtx, Ticks},
};
use crate::config::{ArrivalGating, SimConfig};
use crate::scheduler::Policy;

pub struct SchedCore<P: Policy> {
    pub ctx: SimCtx,
    pub policy: P,
    observer: Observer,
    // Pids ordered by arrival (stable on workload order)
    arrivals: Vec<Pid>,
    arrival_cursor: usize,
}

impl<P: Policy> SchedCore<P> {
    pub fn new(ctx: SimCtx, config: &SimConfig) -> Self {
        let policy = P::init(config);
        let gated = policy.gating() == ArrivalGating::Gated;

        let mut arrivals: Vec<Pid> = (0..ctx.processes.len()).collect();
        if gated {
            arrivals.sort_by_key(|&pid| ctx.process(pid).arrival_time);
        }

        Self {
            ctx,
            policy,
            observer: Observer::new(gated),
            arrivals,
            arrival_cursor: 0,
        }
    }

    /// Makes one dispatch decision: either runs a slice or idles until the
    /// next arrival.
    pub fn tick(&mut self) -> SimEvent {
        self.handle_arrivals();
        if self.ctx.all_completed() {
            return SimEvent::Finished { at: self.ctx.now };
        }

        let event = match self.policy.dispatch(&mut self.ctx) {
            Some(slice) => {
                let start = self.ctx.now;
                let completed = self.ctx.run(slice.pid, slice.ticks, slice.quantum);
                let process = self.ctx.process(slice.pid).id;
                debug!(
                    %process,
                    start,
                    ticks = slice.ticks,
                    quantum = ?slice.quantum,
                    completed,
                    "dispatched"
                );

                // Arrivals during the slice queue ahead of a preempted process
                self.handle_arrivals();
                self.policy
                    .stopping(&mut self.ctx, slice.pid, !completed);

                SimEvent::Ran {
                    process,
                    start,
                    ticks: slice.ticks,
                    completed,
                }
            }
            None => {
                // Work remains but nothing is admitted: a future arrival must exist.
                // Nothing can change before it, so the idle ticks are taken at once.
                let at = self.ctx.now;
                let next = match self.ctx.next_arrival() {
                    Some(next) if next > at => next,
                    _ => panic!("Idle at t={at} with no pending arrival"),
                };
                let ticks = next - at;
                trace!(at, ticks, "idle until next arrival");
                self.ctx.idle(ticks);
                SimEvent::Idle { at, ticks }
            }
        };

        self.observer.observe(&self.ctx, self.policy.waiting());
        event
    }

    fn handle_arrivals(&mut self) {
        let gated = self.policy.gating() == ArrivalGating::Gated;
        while let Some(&pid) = self.arrivals.get(self.arrival_cursor) {
            let process = self.ctx.process(pid);
            if gated && process.arrival_time > self.ctx.now {
                // Sorted by arrival, so nothing further has arrived either
                break;
            }
            debug_assert_eq!(process.state, ProcessState::Pending);

            self.ctx.mark_ready(pid);
            self.policy.enqueue(&mut self.ctx, pid);
            self.arrival_cursor += 1;
        }
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}
