use super::{
    queue::AgingQueue,
    state::{ProcessKey, ProcessState, Roster},
};

#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, roster: &Roster, queue: &AgingQueue, running: Option<ProcessKey>) {
        self.step += 1;

        debug_assert!(
            queue.is_heap_ordered(roster),
            "queue lost heap order at step {}",
            self.step
        );

        if let Some(key) = running {
            let process = &roster[key];
            debug_assert_eq!(
                process.state(),
                ProcessState::Running,
                "running process {} must be Running",
                process.id()
            );
            debug_assert!(
                !queue.contains(key),
                "running process {} must not appear in the queue",
                process.id()
            );
        }

        for &key in queue.keys() {
            let process = &roster[key];
            debug_assert_eq!(
                process.state(),
                ProcessState::Queued,
                "queued process {} has state {:?}",
                process.id(),
                process.state()
            );
            debug_assert!(
                !process.has_started(),
                "queued process {} was already dispatched",
                process.id()
            );
        }

        for process in roster.values() {
            debug_assert!(
                process.remaining_time() <= process.burst_time(),
                "process {} remaining time exceeds its burst",
                process.id()
            );
            debug_assert!(
                process.effective_priority() >= 0.0,
                "process {} has negative effective priority",
                process.id()
            );
            if let Some(completion) = process.completion_time() {
                debug_assert!(
                    process.start_time().is_some_and(|start| start <= completion),
                    "process {} completed before it started",
                    process.id()
                );
                debug_assert_eq!(process.remaining_time(), 0);
            }
        }
    }
}
