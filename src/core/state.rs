use slotmap::{SlotMap, new_key_type};

use crate::error::ProcessError;

pub type Pid = u64;
pub type Ticks = u64;

new_key_type! {
    // Handle into the scheduler's roster; the queue only ever holds these
    pub struct ProcessKey;
}

pub type Roster = SlotMap<ProcessKey, Process>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Pending,
    Queued,
    Running,
    Completed,
}

#[derive(Debug, Clone)]
pub struct Process {
    id: Pid,
    base_priority: u32,
    arrival_time: Ticks,
    burst_time: Ticks,
    remaining_time: Ticks,
    waiting_time: Ticks,
    start_time: Option<Ticks>,
    completion_time: Option<Ticks>,
    effective_priority: f64,
    state: ProcessState,
}

impl Process {
    pub fn new(
        id: Pid,
        base_priority: u32,
        arrival_time: Ticks,
        burst_time: Ticks,
    ) -> Result<Self, ProcessError> {
        if burst_time == 0 {
            return Err(ProcessError::ZeroBurst { pid: id });
        }

        Ok(Self {
            id,
            base_priority,
            arrival_time,
            burst_time,
            remaining_time: burst_time,
            waiting_time: 0,
            start_time: None,
            completion_time: None,
            effective_priority: f64::from(base_priority),
            state: ProcessState::Pending,
        })
    }

    /// Re-derive the waiting time and aged priority as of `now`.
    ///
    /// Time spent executing does not count as waiting, and the result is
    /// floored at zero so a long wait can never invert the ordering.
    pub fn recompute_effective_priority(&mut self, now: Ticks, aging_coefficient: f64) {
        if self.is_completed() {
            return;
        }

        let mut waited = now.saturating_sub(self.arrival_time);
        if let Some(start) = self.start_time {
            waited = waited.saturating_sub(now.saturating_sub(start));
        }
        self.waiting_time = waited;

        let aged = f64::from(self.base_priority) - waited as f64 * aging_coefficient;
        self.effective_priority = aged.max(0.0);
    }

    // A second call is a caller bug and is ignored
    pub fn mark_started(&mut self, time: Ticks) {
        if self.start_time.is_some() {
            return;
        }
        self.start_time = Some(time);
        self.state = ProcessState::Running;
    }

    pub(crate) fn mark_queued(&mut self) {
        debug_assert_eq!(
            self.state,
            ProcessState::Pending,
            "Process {} admitted twice",
            self.id
        );
        self.state = ProcessState::Queued;
    }

    // One unit of CPU service
    pub fn run_tick(&mut self) {
        self.remaining_time = self.remaining_time.saturating_sub(1);
    }

    /// Stamp the completion time and fold the whole lifetime into the
    /// waiting time (`completion - arrival - burst`).
    pub fn mark_completed(&mut self, time: Ticks) -> Result<(), ProcessError> {
        if self.is_completed() {
            return Err(ProcessError::AlreadyCompleted { pid: self.id });
        }
        if self.start_time.is_none() {
            return Err(ProcessError::NotStarted { pid: self.id });
        }
        if self.remaining_time != 0 {
            return Err(ProcessError::Unfinished {
                pid: self.id,
                remaining: self.remaining_time,
            });
        }

        self.completion_time = Some(time);
        self.waiting_time = time
            .saturating_sub(self.arrival_time)
            .saturating_sub(self.burst_time);
        self.state = ProcessState::Completed;
        Ok(())
    }

    pub fn turnaround_time(&self) -> Option<Ticks> {
        self.completion_time
            .map(|completion| completion.saturating_sub(self.arrival_time))
    }

    pub fn response_time(&self) -> Option<Ticks> {
        self.start_time
            .map(|start| start.saturating_sub(self.arrival_time))
    }

    pub fn id(&self) -> Pid {
        self.id
    }

    pub fn base_priority(&self) -> u32 {
        self.base_priority
    }

    pub fn effective_priority(&self) -> f64 {
        self.effective_priority
    }

    pub fn arrival_time(&self) -> Ticks {
        self.arrival_time
    }

    pub fn burst_time(&self) -> Ticks {
        self.burst_time
    }

    pub fn remaining_time(&self) -> Ticks {
        self.remaining_time
    }

    pub fn waiting_time(&self) -> Ticks {
        self.waiting_time
    }

    pub fn start_time(&self) -> Option<Ticks> {
        self.start_time
    }

    pub fn completion_time(&self) -> Option<Ticks> {
        self.completion_time
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn has_started(&self) -> bool {
        self.start_time.is_some()
    }

    /// True once `mark_completed` has stamped a completion time
    pub fn is_completed(&self) -> bool {
        self.completion_time.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_process_defaults() {
        let p = Process::new(7, 4, 3, 5).unwrap();
        assert_eq!(p.remaining_time(), 5);
        assert_eq!(p.effective_priority(), 4.0);
        assert_eq!(p.start_time(), None);
        assert_eq!(p.completion_time(), None);
        assert_eq!(p.state(), ProcessState::Pending);
    }

    #[test]
    fn test_zero_burst_rejected() {
        let err = Process::new(1, 1, 0, 0).unwrap_err();
        assert_eq!(err, ProcessError::ZeroBurst { pid: 1 });
    }

    #[test]
    fn test_aging_lowers_priority_value() {
        let mut p = Process::new(1, 5, 2, 3).unwrap();
        p.recompute_effective_priority(12, 0.1);
        assert_eq!(p.waiting_time(), 10);
        assert!((p.effective_priority() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_aging_floors_at_zero() {
        let mut p = Process::new(1, 2, 0, 3).unwrap();
        p.recompute_effective_priority(100, 0.5);
        assert_eq!(p.effective_priority(), 0.0);
    }

    #[test]
    fn test_wait_before_arrival_is_zero() {
        let mut p = Process::new(1, 3, 10, 3).unwrap();
        p.recompute_effective_priority(4, 1.0);
        assert_eq!(p.waiting_time(), 0);
        assert_eq!(p.effective_priority(), 3.0);
    }

    #[test]
    fn test_execution_time_not_counted_as_wait() {
        let mut p = Process::new(1, 5, 0, 10).unwrap();
        p.mark_started(4);
        p.recompute_effective_priority(9, 1.0);
        assert_eq!(p.waiting_time(), 4);
        assert_eq!(p.effective_priority(), 1.0);
    }

    #[test]
    fn test_start_time_set_once() {
        let mut p = Process::new(1, 1, 0, 2).unwrap();
        p.mark_started(3);
        p.mark_started(8);
        assert_eq!(p.start_time(), Some(3));
        assert_eq!(p.response_time(), Some(3));
    }

    #[test]
    fn test_completion_requires_start_and_no_remaining() {
        let mut p = Process::new(1, 1, 0, 2).unwrap();
        assert_eq!(
            p.mark_completed(2),
            Err(ProcessError::NotStarted { pid: 1 })
        );

        p.mark_started(0);
        p.run_tick();
        assert_eq!(
            p.mark_completed(1),
            Err(ProcessError::Unfinished {
                pid: 1,
                remaining: 1
            })
        );

        p.run_tick();
        p.mark_completed(2).unwrap();
        assert_eq!(p.turnaround_time(), Some(2));
        assert_eq!(p.waiting_time(), 0);
        assert_eq!(
            p.mark_completed(3),
            Err(ProcessError::AlreadyCompleted { pid: 1 })
        );
    }

    #[test]
    fn test_completed_process_ignores_aging() {
        let mut p = Process::new(1, 6, 0, 1).unwrap();
        p.mark_started(2);
        p.run_tick();
        assert_eq!(p.remaining_time(), 0);
        assert!(!p.is_completed());
        p.mark_completed(3).unwrap();
        assert!(p.is_completed());
        assert_eq!(p.state(), ProcessState::Completed);
        let before = p.effective_priority();
        p.recompute_effective_priority(50, 1.0);
        assert_eq!(p.effective_priority(), before);
        assert_eq!(p.waiting_time(), 2);
    }

    #[test]
    fn test_derived_times_unavailable_before_events() {
        let p = Process::new(1, 1, 0, 2).unwrap();
        assert_eq!(p.turnaround_time(), None);
        assert_eq!(p.response_time(), None);
    }
}
