//! Properties every policy must uphold on arbitrary workloads.

use proptest::prelude::*;

use schedsim::config::{ArrivalGating, SimConfig};
use schedsim::core::{ProcessId, Ticks};
use schedsim::sim::{Schedule, run, summarize};
use schedsim::{PolicyKind, ProcessSpec, Workload};

fn workload_strategy() -> impl Strategy<Value = Workload> {
    prop::collection::vec((0u64..30, 1u64..15, 0i64..5), 1..12).prop_map(|rows| {
        let specs = rows
            .into_iter()
            .enumerate()
            .map(|(i, (arrival, burst, priority))| {
                ProcessSpec::new(i as u32 + 1, arrival, burst, priority)
            })
            .collect();
        Workload::new(specs).unwrap()
    })
}

fn config_strategy() -> impl Strategy<Value = SimConfig> {
    (1u64..8, 1u64..20, any::<bool>(), any::<bool>()).prop_map(
        |(base_quantum, interval, gated, priority_tiebreak)| {
            let mut config = SimConfig {
                base_quantum,
                ..SimConfig::default()
            };
            config.aging.interval = interval;
            config.aging.priority_tiebreak = priority_tiebreak;
            config.aging.gating = if gated {
                ArrivalGating::Gated
            } else {
                ArrivalGating::Ungated
            };
            config
        },
    )
}

fn is_gated(kind: PolicyKind, config: &SimConfig) -> bool {
    kind != PolicyKind::SjfAging || config.aging.gating == ArrivalGating::Gated
}

fn check_common(schedule: &Schedule, workload: &Workload, gated: bool) {
    for p in &schedule.processes {
        assert!(p.is_completed(), "{} never completed", p.id);
        assert_eq!(p.remaining_time, 0);
        assert_eq!(p.turnaround_time, Some(p.waiting_time + p.burst_time));
        assert_eq!(schedule.trace.time_for(p.id), p.burst_time);

        if gated {
            let first_start = schedule
                .trace
                .iter()
                .find(|e| e.process == p.id)
                .map(|e| e.start)
                .unwrap();
            assert!(first_start >= p.arrival_time, "{} ran before arrival", p.id);
            assert_eq!(
                p.turnaround_time,
                p.completion_time.map(|c| c - p.arrival_time)
            );
        }
    }

    let busy: Ticks = schedule.trace.iter().map(|e| e.duration).sum();
    assert_eq!(busy, workload.total_burst());
    assert_eq!(schedule.makespan, busy + schedule.idle_ticks);

    let metrics = summarize(&schedule.processes, &schedule.trace);
    assert_eq!(metrics.idle_ticks, schedule.idle_ticks);
    assert!((0.0..=100.0).contains(&metrics.cpu_utilization));
    assert!((0.0..=100.0).contains(&metrics.waiting_derived_utilization()));
    assert_eq!(
        metrics.max_starvation,
        schedule.processes.iter().map(|p| p.waiting_time).max().unwrap()
    );
}

proptest! {
    #[test]
    fn every_policy_conserves_work(workload in workload_strategy(), config in config_strategy()) {
        for kind in PolicyKind::ALL {
            let schedule = run(kind, &workload, &config).unwrap();
            check_common(&schedule, &workload, is_gated(kind, &config));
        }
    }

    #[test]
    fn round_robin_slices_respect_quantum(workload in workload_strategy(), config in config_strategy()) {
        let schedule = run(PolicyKind::RoundRobin, &workload, &config).unwrap();

        let mut remaining: Vec<(ProcessId, Ticks)> = workload
            .specs()
            .iter()
            .map(|s| (s.id, s.burst_time))
            .collect();
        for entry in &schedule.trace {
            let quantum = entry.slice.unwrap();
            prop_assert!(quantum >= config.base_quantum);
            prop_assert!(entry.duration <= quantum);

            let (_, left) = remaining.iter_mut().find(|(id, _)| *id == entry.process).unwrap();
            prop_assert!(entry.duration <= *left);
            *left -= entry.duration;
        }
    }

    #[test]
    fn priority_always_runs_most_urgent(workload in workload_strategy()) {
        let schedule = run(PolicyKind::Priority, &workload, &SimConfig::default()).unwrap();

        for entry in &schedule.trace {
            let running = schedule.processes.iter().find(|p| p.id == entry.process).unwrap();
            for t in entry.start..entry.end {
                for other in &schedule.processes {
                    let ready = other.id != running.id
                        && other.arrival_time <= t
                        && other.completion_time.unwrap() > t;
                    if ready {
                        prop_assert!(
                            other.priority >= running.priority,
                            "{} (prio {}) ran at t={} while {} (prio {}) was ready",
                            running.id, running.priority, t, other.id, other.priority
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn sjn_picks_shortest_arrived(workload in workload_strategy()) {
        let schedule = run(PolicyKind::Sjn, &workload, &SimConfig::default()).unwrap();

        // Non-preemptive: one segment per process
        prop_assert_eq!(schedule.trace.len(), workload.len());
        for entry in &schedule.trace {
            let chosen = schedule.processes.iter().find(|p| p.id == entry.process).unwrap();
            for other in &schedule.processes {
                let eligible = other.arrival_time <= entry.start
                    && other.completion_time.unwrap() > entry.start
                    && other.id != chosen.id;
                if eligible {
                    prop_assert!(other.burst_time >= chosen.burst_time);
                }
            }
        }
    }

    #[test]
    fn reruns_are_identical(workload in workload_strategy(), config in config_strategy()) {
        for kind in PolicyKind::ALL {
            let a = run(kind, &workload, &config).unwrap();
            let b = run(kind, &workload, &config).unwrap();
            prop_assert_eq!(&a, &b);
        }
    }
}
