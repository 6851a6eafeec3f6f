use std::fmt;

use serde::{Deserialize, Serialize};

use super::event::{Trace, TraceEntry};

// Index into the process Vec
pub type Pid = usize;
pub type Ticks = u64;
// Lower value = more urgent
pub type Priority = i64;

/// User-facing process identity, stable for a run.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Copy, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub u32);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Not yet admitted to the waiting set
    Pending,
    Ready,
    Running,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub id: ProcessId,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    pub priority: Priority,

    pub state: ProcessState,
    pub remaining_time: Ticks,
    pub waiting_time: Ticks,
    pub turnaround_time: Option<Ticks>,
    pub completion_time: Option<Ticks>,
    pub first_run: Option<Ticks>,

    // Arrival before the first run, end of the last segment afterwards
    ready_since: Ticks,
}

impl Process {
    pub fn is_completed(&self) -> bool {
        self.state == ProcessState::Completed
    }

    /// Time from arrival to first dispatch; `None` until the process has run.
    pub fn response_time(&self) -> Option<Ticks> {
        self.first_run
            .map(|start| start.saturating_sub(self.arrival_time))
    }
}

/// Clock, process table and trace of one simulation run.
#[derive(Debug)]
pub struct SimCtx {
    pub now: Ticks,
    pub processes: Vec<Process>,
    pub idle_ticks: Ticks,
    pub trace: Trace,

    completed: usize,
}

impl SimCtx {
    pub fn new() -> Self {
        Self {
            now: 0,
            processes: Vec::new(),
            idle_ticks: 0,
            trace: Trace::default(),
            completed: 0,
        }
    }

    pub fn create_process(
        &mut self,
        id: ProcessId,
        arrival_time: Ticks,
        burst_time: Ticks,
        priority: Priority,
    ) -> Pid {
        assert!(burst_time > 0, "Process {id} must have a positive burst");
        let pid = self.processes.len();
        self.processes.push(Process {
            id,
            arrival_time,
            burst_time,
            priority,
            state: ProcessState::Pending,
            remaining_time: burst_time,
            waiting_time: 0,
            turnaround_time: None,
            completion_time: None,
            first_run: None,
            ready_since: arrival_time,
        });
        pid
    }

    pub fn process(&self, pid: Pid) -> &Process {
        &self.processes[pid]
    }

    pub fn process_mut(&mut self, pid: Pid) -> &mut Process {
        &mut self.processes[pid]
    }

    pub fn mark_ready(&mut self, pid: Pid) {
        let process = self.process_mut(pid);
        debug_assert_eq!(
            process.state,
            ProcessState::Pending,
            "Process {} admitted twice",
            process.id
        );
        process.state = ProcessState::Ready;
    }

    /// Runs `pid` for `ticks` starting at the current clock and returns
    /// whether it finished. `slice` is the quantum granted, if any.
    pub fn run(&mut self, pid: Pid, ticks: Ticks, slice: Option<Ticks>) -> bool {
        let start = self.now;
        let process = &mut self.processes[pid];
        debug_assert_eq!(
            process.state,
            ProcessState::Ready,
            "Process {} must be ready when dispatched",
            process.id
        );
        assert!(
            ticks > 0 && ticks <= process.remaining_time,
            "Process {} dispatched for {ticks} ticks with {} remaining",
            process.id,
            process.remaining_time
        );

        process.state = ProcessState::Running;
        process.waiting_time += start.saturating_sub(process.ready_since);
        process.first_run.get_or_insert(start);
        process.remaining_time -= ticks;

        let end = start + ticks;
        process.ready_since = end;
        let id = process.id;
        let finished = process.remaining_time == 0;

        self.now = end;
        self.trace.push(TraceEntry {
            process: id,
            start,
            duration: ticks,
            end,
            slice,
        });

        if finished {
            self.mark_completed(pid);
        } else {
            self.processes[pid].state = ProcessState::Ready;
        }
        finished
    }

    fn mark_completed(&mut self, pid: Pid) {
        let now = self.now;
        let process = &mut self.processes[pid];
        debug_assert!(
            process.state == ProcessState::Running,
            "Process {} must have been running before marked complete",
            process.id
        );

        process.state = ProcessState::Completed;
        process.completion_time = Some(now);
        process.turnaround_time = Some(process.waiting_time + process.burst_time);
        self.completed += 1;
    }

    pub fn idle(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
        self.idle_ticks += delta;
    }

    pub fn all_completed(&self) -> bool {
        self.completed == self.processes.len()
    }

    pub fn completed_count(&self) -> usize {
        self.completed
    }

    /// Earliest arrival among processes not yet admitted.
    pub fn next_arrival(&self) -> Option<Ticks> {
        self.processes
            .iter()
            .filter(|p| p.state == ProcessState::Pending)
            .map(|p| p.arrival_time)
            .min()
    }
}

impl Default for SimCtx {
    fn default() -> Self {
        Self::new()
    }
}
