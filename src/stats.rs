use average::{Estimate, Mean};
use rustc_hash::FxHashMap;

use crate::core::{Pid, Process, Ticks};

/// Accumulates per-process results as the simulation completes them.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    total_processes: usize,
    completed: usize,
    waiting: Mean,
    turnaround: Mean,
    response: Mean,
    max_waiting: Ticks,
    total_burst: Ticks,
    elapsed: Ticks,
    aging_events: u64,
    priority_changes: FxHashMap<Pid, u32>,
}

/// Point-in-time copy of the aggregate figures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    pub total_processes: usize,
    pub completed_processes: usize,
    pub elapsed: Ticks,
    pub total_burst: Ticks,
    pub avg_waiting: f64,
    pub avg_turnaround: f64,
    pub avg_response: f64,
    pub max_waiting: Ticks,
    pub cpu_utilization: f64,
    pub aging_events: u64,
    pub processes_with_priority_changes: usize,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    // Unfinished processes are skipped
    pub fn record_process(&mut self, process: &Process) {
        let (Some(turnaround), Some(response)) =
            (process.turnaround_time(), process.response_time())
        else {
            return;
        };

        self.completed += 1;
        self.waiting.add(process.waiting_time() as f64);
        self.turnaround.add(turnaround as f64);
        self.response.add(response as f64);
        self.max_waiting = self.max_waiting.max(process.waiting_time());
        self.total_burst += process.burst_time();
    }

    // Bulk form used at the end of a run with the queue's tallies
    pub fn record_aging_events(&mut self, total: u64, per_process: &FxHashMap<Pid, u32>) {
        self.aging_events += total;
        for (&pid, &count) in per_process {
            *self.priority_changes.entry(pid).or_insert(0) += count;
        }
    }

    pub fn set_total_processes(&mut self, count: usize) {
        self.total_processes = count;
    }

    pub fn set_elapsed(&mut self, elapsed: Ticks) {
        self.elapsed = elapsed;
    }

    pub fn average_waiting_time(&self) -> f64 {
        self.average(&self.waiting)
    }

    pub fn average_turnaround_time(&self) -> f64 {
        self.average(&self.turnaround)
    }

    pub fn average_response_time(&self) -> f64 {
        self.average(&self.response)
    }

    fn average(&self, mean: &Mean) -> f64 {
        if self.completed == 0 {
            0.0
        } else {
            mean.mean()
        }
    }

    // Busy ticks over elapsed ticks, as a percentage
    pub fn cpu_utilization(&self) -> f64 {
        if self.elapsed == 0 {
            return 0.0;
        }
        self.total_burst as f64 / self.elapsed as f64 * 100.0
    }

    pub fn completed_processes(&self) -> usize {
        self.completed
    }

    pub fn total_aging_events(&self) -> u64 {
        self.aging_events
    }

    pub fn max_waiting_time(&self) -> Ticks {
        self.max_waiting
    }

    pub fn priority_changes(&self) -> &FxHashMap<Pid, u32> {
        &self.priority_changes
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_processes: self.total_processes,
            completed_processes: self.completed,
            elapsed: self.elapsed,
            total_burst: self.total_burst,
            avg_waiting: self.average_waiting_time(),
            avg_turnaround: self.average_turnaround_time(),
            avg_response: self.average_response_time(),
            max_waiting: self.max_waiting,
            cpu_utilization: self.cpu_utilization(),
            aging_events: self.aging_events,
            processes_with_priority_changes: self.priority_changes.len(),
        }
    }
}
