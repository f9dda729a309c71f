pub mod config;
pub mod core;
pub mod error;
pub mod report;
pub mod sim;
pub mod stats;

pub use config::SchedulerConfig;
pub use crate::core::{AgingQueue, Pid, Process, ProcessKey, ProcessState, SimEvent, Ticks};
pub use error::{ProcessError, SchedulerError};
pub use sim::{ProcessSpec, RandomWorkload, Scheduler, SimulationReport};
pub use stats::{Statistics, StatsSnapshot};
