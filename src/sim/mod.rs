pub mod driver;
pub mod workload;

pub use driver::{Scheduler, SimulationReport};
pub use workload::{ProcessSpec, RandomWorkload, demo_scenario, interactive_scenario};
