use tracing::info;

use super::job::Workload;
use crate::{
    config::SimConfig,
    core::{
        Trace,
        driver::SchedCore,
        event::SimEvent,
        state::{Process, SimCtx, Ticks},
    },
    error::SimError,
    scheduler::{
        AdaptiveRoundRobin, Policy, PolicyKind, PreemptivePriority, ShortestJobNext, SjfAging,
    },
};

/// Final state of one policy run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub policy: PolicyKind,
    /// In workload order
    pub processes: Vec<Process>,
    pub trace: Trace,
    pub idle_ticks: Ticks,
    pub makespan: Ticks,
}

pub struct Sim<P: Policy> {
    pub core: SchedCore<P>,
}

impl<P: Policy> Sim<P> {
    pub fn new(workload: &Workload, config: &SimConfig) -> Result<Self, SimError> {
        config.validate()?;

        let mut ctx = SimCtx::new();
        for spec in workload.specs() {
            ctx.create_process(spec.id, spec.arrival_time, spec.burst_time, spec.priority);
        }

        Ok(Self {
            core: SchedCore::<P>::new(ctx, config),
        })
    }

    pub fn step(&mut self) -> SimEvent {
        self.core.tick()
    }

    pub fn all_processes_completed(&self) -> bool {
        self.core.ctx.all_completed()
    }

    /// Runs to completion. Every step either consumes remaining work or
    /// moves the idle clock toward a pending arrival, so this terminates.
    pub fn run(mut self) -> Schedule {
        while !matches!(self.step(), SimEvent::Finished { .. }) {}

        let kind = self.core.policy.kind();
        let ctx = self.core.ctx;
        info!(
            policy = %kind,
            processes = ctx.processes.len(),
            makespan = ctx.now,
            idle = ctx.idle_ticks,
            segments = ctx.trace.len(),
            "simulation finished"
        );

        Schedule {
            policy: kind,
            makespan: ctx.now,
            idle_ticks: ctx.idle_ticks,
            processes: ctx.processes,
            trace: ctx.trace,
        }
    }
}

/// Simulates `workload` under one policy from fresh process state.
pub fn run(kind: PolicyKind, workload: &Workload, config: &SimConfig) -> Result<Schedule, SimError> {
    let schedule = match kind {
        PolicyKind::SjfAging => Sim::<SjfAging>::new(workload, config)?.run(),
        PolicyKind::RoundRobin => Sim::<AdaptiveRoundRobin>::new(workload, config)?.run(),
        PolicyKind::Priority => Sim::<PreemptivePriority>::new(workload, config)?.run(),
        PolicyKind::Sjn => Sim::<ShortestJobNext>::new(workload, config)?.run(),
    };
    Ok(schedule)
}
