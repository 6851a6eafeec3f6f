pub mod driver;
pub mod job;
pub mod metrics;

pub use driver::{Schedule, Sim, run};
pub use job::{BernoulliParams, ProcessSpec, Workload};
pub use metrics::{GanttBar, Metrics, gantt, render_gantt, summarize};
