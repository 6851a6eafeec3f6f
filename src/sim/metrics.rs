use std::fmt::Write;

use average::Mean;

use crate::core::{Process, Ticks, Trace};

/// One bar of the Gantt chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GanttBar {
    pub label: String,
    pub duration: Ticks,
}

/// Summary of a finished run.
///
/// CPU utilization is idle-tick based for every policy:
/// `100 * (makespan - idle) / makespan`, where idle ticks are the gaps in
/// the trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub processes: usize,
    pub total_waiting: Ticks,
    pub total_turnaround: Ticks,
    pub avg_waiting: f64,
    pub avg_turnaround: f64,
    pub avg_response: f64,
    pub max_starvation: Ticks,
    pub makespan: Ticks,
    pub busy_ticks: Ticks,
    pub idle_ticks: Ticks,
    /// Percentage in [0, 100]
    pub cpu_utilization: f64,
    /// Completed processes per tick
    pub throughput: f64,
    pub gantt: Vec<GanttBar>,
}

pub fn summarize(processes: &[Process], trace: &Trace) -> Metrics {
    let finished = || processes.iter().filter(|p| p.is_completed());

    let total_waiting = processes.iter().map(|p| p.waiting_time).sum();
    let total_turnaround = finished().filter_map(|p| p.turnaround_time).sum();
    let max_starvation = processes.iter().map(|p| p.waiting_time).max().unwrap_or(0);

    let makespan = trace.end();
    let busy_ticks: Ticks = trace.iter().map(|e| e.duration).sum();
    let idle_ticks = makespan - busy_ticks;
    let completed = finished().count();

    Metrics {
        processes: processes.len(),
        total_waiting,
        total_turnaround,
        avg_waiting: mean(processes.iter().map(|p| p.waiting_time)),
        avg_turnaround: mean(finished().filter_map(|p| p.turnaround_time)),
        avg_response: mean(processes.iter().filter_map(Process::response_time)),
        max_starvation,
        makespan,
        busy_ticks,
        idle_ticks,
        cpu_utilization: percent(busy_ticks as f64, makespan),
        throughput: ratio(completed as f64, makespan),
        gantt: gantt(trace),
    }
}

impl Metrics {
    /// `100 * (makespan - total_waiting) / makespan`, clamped to [0, 100].
    ///
    /// Alternative utilization figure derived from waiting time rather than
    /// idle ticks; it drops to zero once processes wait longer than the run.
    pub fn waiting_derived_utilization(&self) -> f64 {
        let busy = self.makespan as f64 - self.total_waiting as f64;
        percent(busy, self.makespan).clamp(0.0, 100.0)
    }
}

/// Trace as `(label, duration)` bars with `Idle` for any gap.
pub fn gantt(trace: &Trace) -> Vec<GanttBar> {
    let mut bars = Vec::with_capacity(trace.len());
    let mut clock = 0;
    for entry in trace {
        if entry.start > clock {
            bars.push(GanttBar {
                label: "Idle".to_string(),
                duration: entry.start - clock,
            });
        }
        bars.push(GanttBar {
            label: entry.process.to_string(),
            duration: entry.duration,
        });
        clock = entry.end;
    }
    bars
}

/// `P1 (5 ms) -> P2 (3 ms)`
pub fn render_gantt(bars: &[GanttBar]) -> String {
    let mut out = String::new();
    for (i, bar) in bars.iter().enumerate() {
        if i > 0 {
            out.push_str(" -> ");
        }
        let _ = write!(out, "{} ({} ms)", bar.label, bar.duration);
    }
    out
}

fn mean(values: impl Iterator<Item = Ticks>) -> f64 {
    let mean: Mean = values.map(|v| v as f64).collect();
    if mean.is_empty() { 0.0 } else { mean.mean() }
}

fn ratio(numerator: f64, denominator: Ticks) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

fn percent(numerator: f64, denominator: Ticks) -> f64 {
    ratio(numerator, denominator) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ProcessId, SimCtx, TraceEntry};

    #[test]
    fn empty_run_yields_zero_metrics() {
        let metrics = summarize(&[], &Trace::default());
        assert_eq!(metrics.processes, 0);
        assert_eq!(metrics.avg_waiting, 0.0);
        assert_eq!(metrics.avg_turnaround, 0.0);
        assert_eq!(metrics.avg_response, 0.0);
        assert_eq!(metrics.max_starvation, 0);
        assert_eq!(metrics.cpu_utilization, 0.0);
        assert_eq!(metrics.throughput, 0.0);
        assert_eq!(metrics.waiting_derived_utilization(), 0.0);
        assert!(metrics.gantt.is_empty());
    }

    #[test]
    fn averages_and_utilization() {
        let mut ctx = SimCtx::new();
        let a = ctx.create_process(ProcessId(1), 0, 2, 0);
        let b = ctx.create_process(ProcessId(2), 0, 4, 0);
        ctx.mark_ready(a);
        ctx.mark_ready(b);
        ctx.idle(2);
        ctx.run(a, 2, None);
        ctx.run(b, 4, None);

        let metrics = summarize(&ctx.processes, &ctx.trace);
        // a waited 2 idle ticks, b waited 4
        assert_eq!(metrics.total_waiting, 6);
        assert_eq!(metrics.total_turnaround, 12);
        assert_eq!(metrics.avg_waiting, 3.0);
        assert_eq!(metrics.avg_turnaround, 6.0);
        assert_eq!(metrics.max_starvation, 4);
        assert_eq!(metrics.makespan, 8);
        assert_eq!(metrics.idle_ticks, 2);
        assert_eq!(metrics.busy_ticks, 6);
        assert_eq!(metrics.cpu_utilization, 75.0);
        assert_eq!(metrics.throughput, 0.25);
        assert_eq!(metrics.waiting_derived_utilization(), 25.0);
    }

    #[test]
    fn gantt_fills_gaps_with_idle() {
        let mut trace = Trace::default();
        trace.push(TraceEntry {
            process: ProcessId(1),
            start: 1,
            duration: 5,
            end: 6,
            slice: None,
        });
        trace.push(TraceEntry {
            process: ProcessId(2),
            start: 6,
            duration: 3,
            end: 9,
            slice: None,
        });

        let bars = gantt(&trace);
        assert_eq!(
            render_gantt(&bars),
            "Idle (1 ms) -> P1 (5 ms) -> P2 (3 ms)"
        );
    }
}
