use thiserror::Error;

use crate::core::{Pid, Ticks};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("process {pid}: burst time must be greater than zero")]
    ZeroBurst { pid: Pid },

    #[error("process {pid} completed before it was ever dispatched")]
    NotStarted { pid: Pid },

    #[error("process {pid} completed with {remaining} ticks still remaining")]
    Unfinished { pid: Pid, remaining: Ticks },

    #[error("process {pid} already completed")]
    AlreadyCompleted { pid: Pid },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("aging coefficient must be finite and non-negative, got {0}")]
    InvalidAgingCoefficient(f64),

    #[error("process id {0} already registered")]
    DuplicatePid(Pid),

    #[error("processes cannot be added once the simulation has started")]
    AlreadyStarted,

    #[error(transparent)]
    Process(#[from] ProcessError),
}
