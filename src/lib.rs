pub mod config;
pub mod core;
pub mod error;
pub mod scheduler;
pub mod sim;

pub use config::SimConfig;
pub use error::SimError;
pub use scheduler::{Policy, PolicyKind};
pub use sim::{Metrics, ProcessSpec, Schedule, Sim, Workload, run, summarize};
