use super::state::{ProcessState, SimCtx};
use super::waitset::WaitingSet;

/// Checks table/waiting-set consistency after every step.
#[derive(Debug)]
pub struct Observer {
    step: u64,
    gated: bool,
}

impl Observer {
    pub fn new(gated: bool) -> Self {
        Self { step: 0, gated }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &SimCtx, waiting: &dyn WaitingSet) {
        self.step += 1;

        let mut ready = 0;
        for (pid, process) in ctx.processes.iter().enumerate() {
            let id = process.id;
            debug_assert!(
                process.remaining_time <= process.burst_time,
                "Process {id} remaining time exceeds its burst"
            );

            match process.state {
                ProcessState::Pending => {
                    debug_assert!(
                        !waiting.contains(pid),
                        "Pending process {id} present in waiting set"
                    );
                }
                ProcessState::Ready => {
                    ready += 1;
                    debug_assert!(
                        waiting.contains(pid),
                        "Ready process {id} missing from waiting set"
                    );
                    debug_assert!(process.remaining_time > 0);
                    if self.gated {
                        debug_assert!(
                            process.arrival_time <= ctx.now,
                            "Process {id} admitted before its arrival"
                        );
                    }
                }
                ProcessState::Running => {
                    debug_assert!(false, "Process {id} still running between steps");
                }
                ProcessState::Completed => {
                    debug_assert!(
                        !waiting.contains(pid),
                        "Completed process {id} still present in waiting set"
                    );
                    debug_assert_eq!(process.remaining_time, 0);
                    debug_assert_eq!(
                        process.turnaround_time,
                        Some(process.waiting_time + process.burst_time),
                        "Process {id} turnaround must equal waiting + burst"
                    );
                    if self.gated {
                        debug_assert_eq!(
                            process.turnaround_time,
                            process.completion_time.map(|c| c - process.arrival_time),
                            "Process {id} turnaround must span arrival to completion"
                        );
                    }
                }
            }
        }

        debug_assert_eq!(
            ready,
            waiting.len(),
            "Waiting set size disagrees with ready processes at step {}",
            self.step
        );
    }
}
