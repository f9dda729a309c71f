pub mod event;
pub mod observer;
pub mod queue;
pub mod state;

pub use event::SimEvent;
pub use observer::Observer;
pub use queue::{AGING_EPSILON, AgingQueue};
pub use state::{Pid, Process, ProcessKey, ProcessState, Roster, Ticks};
