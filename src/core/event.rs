use std::fmt;

use crate::core::{Pid, Ticks};

#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    Arrived {
        pid: Pid,
        base_priority: u32,
        burst_time: Ticks,
    },
    Dispatched {
        pid: Pid,
        effective_priority: f64,
        queued: usize,
    },
    // Material priority changes in one aging pass
    Aged {
        adjusted: u64,
    },
    Completed {
        pid: Pid,
        waiting_time: Ticks,
        turnaround_time: Ticks,
    },
    // Nothing runnable this tick
    CpuIdle,
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arrived {
                pid,
                base_priority,
                burst_time,
            } => write!(
                f,
                "process {pid} arrived (priority: {base_priority}, burst: {burst_time})"
            ),
            Self::Dispatched {
                pid,
                effective_priority,
                queued,
            } => write!(
                f,
                "executing process {pid} (effective priority: {effective_priority:.2}, {queued} waiting)"
            ),
            Self::Aged { adjusted } => write!(f, "aging adjusted {adjusted} priorities"),
            Self::Completed {
                pid,
                waiting_time,
                turnaround_time,
            } => write!(
                f,
                "process {pid} completed (waiting: {waiting_time}, turnaround: {turnaround_time})"
            ),
            Self::CpuIdle => write!(f, "CPU idle"),
        }
    }
}
