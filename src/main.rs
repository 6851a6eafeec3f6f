use std::path::PathBuf;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use schedsim::config::FileConfig;
use schedsim::sim::{render_gantt, run, summarize};

fn main() -> Result<()> {
    let _ = dotenv();
    init_tracing();

    let cfg_path = std::env::args().nth(1).map(PathBuf::from);
    let cfg = FileConfig::load(cfg_path)?;
    let workload = cfg.workload().context("building workload")?;
    info!(
        processes = workload.len(),
        total_burst = workload.total_burst(),
        "loaded workload"
    );

    for kind in cfg.effective_policies() {
        let schedule =
            run(kind, &workload, &cfg.sim).with_context(|| format!("running {kind}"))?;
        let metrics = summarize(&schedule.processes, &schedule.trace);

        println!("=== {} ===", kind.title());
        println!("Execution order: {}", render_gantt(&metrics.gantt));
        for p in &schedule.processes {
            println!(
                "  {}: arrival={} burst={} priority={} waiting={} turnaround={} completion={}",
                p.id,
                p.arrival_time,
                p.burst_time,
                p.priority,
                p.waiting_time,
                p.turnaround_time.unwrap_or_default(),
                p.completion_time.unwrap_or_default(),
            );
        }
        println!("Total waiting time: {} ms", metrics.total_waiting);
        println!("Total turnaround time: {} ms", metrics.total_turnaround);
        println!("Average waiting time: {:.2} ms", metrics.avg_waiting);
        println!("Average turnaround time: {:.2} ms", metrics.avg_turnaround);
        println!("Average response time: {:.2} ms", metrics.avg_response);
        println!("Max starvation: {} ms", metrics.max_starvation);
        println!("CPU utilization: {:.2}%", metrics.cpu_utilization);
        println!("Throughput: {:.3} processes/ms", metrics.throughput);
        println!();
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
