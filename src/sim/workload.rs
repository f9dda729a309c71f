use rand::prelude::*;

use crate::core::{Pid, Ticks};

/// Intake record for one process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessSpec {
    pub id: Pid,
    pub base_priority: u32,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
}

impl ProcessSpec {
    pub const fn new(id: Pid, base_priority: u32, arrival_time: Ticks, burst_time: Ticks) -> Self {
        Self {
            id,
            base_priority,
            arrival_time,
            burst_time,
        }
    }
}

/// Uniformly random processes, reproducible from `seed`.
///
/// Priorities fall in `1..=max_priority`, arrivals in `0..=max_arrival` and
/// bursts in `1..=max_burst`. Ids run from 1 to `count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomWorkload {
    pub count: usize,
    pub max_priority: u32,
    pub max_arrival: Ticks,
    pub max_burst: Ticks,
    pub seed: u64,
}

impl Default for RandomWorkload {
    fn default() -> Self {
        Self {
            count: 15,
            max_priority: 10,
            max_arrival: 20,
            max_burst: 10,
            seed: 0,
        }
    }
}

impl RandomWorkload {
    pub fn generate(&self) -> Vec<ProcessSpec> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let max_priority = self.max_priority.max(1);
        let max_burst = self.max_burst.max(1);

        let mut specs: Vec<ProcessSpec> = (1..=self.count as Pid)
            .map(|id| ProcessSpec {
                id,
                base_priority: rng.random_range(1..=max_priority),
                arrival_time: rng.random_range(0..=self.max_arrival),
                burst_time: rng.random_range(1..=max_burst),
            })
            .collect();

        specs.sort_by_key(|spec| spec.arrival_time);
        specs
    }
}

// Two urgent processes bracket two poor-priority ones
pub fn demo_scenario() -> Vec<ProcessSpec> {
    vec![
        ProcessSpec::new(1, 1, 0, 5),
        ProcessSpec::new(2, 8, 1, 3),
        ProcessSpec::new(3, 1, 2, 4),
        ProcessSpec::new(4, 9, 3, 2),
        ProcessSpec::new(5, 1, 4, 3),
    ]
}

pub fn interactive_scenario() -> Vec<ProcessSpec> {
    vec![
        ProcessSpec::new(1, 2, 0, 4),
        ProcessSpec::new(2, 7, 1, 3),
        ProcessSpec::new(3, 3, 2, 5),
        ProcessSpec::new(4, 8, 3, 2),
        ProcessSpec::new(5, 1, 4, 4),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_workload_bounds() {
        let workload = RandomWorkload {
            count: 200,
            max_priority: 10,
            max_arrival: 15,
            max_burst: 8,
            seed: 42,
        };
        let specs = workload.generate();

        assert_eq!(specs.len(), 200);
        for spec in &specs {
            assert!((1..=10).contains(&spec.base_priority));
            assert!(spec.arrival_time <= 15);
            assert!((1..=8).contains(&spec.burst_time));
        }
        assert!(specs.windows(2).all(|w| w[0].arrival_time <= w[1].arrival_time));

        let mut ids: Vec<Pid> = specs.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=200).collect::<Vec<_>>());
    }

    #[test]
    fn test_random_workload_is_reproducible() {
        let workload = RandomWorkload {
            seed: 7,
            ..RandomWorkload::default()
        };
        assert_eq!(workload.generate(), workload.generate());
    }

    #[test]
    fn test_degenerate_bounds_still_valid() {
        let workload = RandomWorkload {
            count: 5,
            max_priority: 0,
            max_arrival: 0,
            max_burst: 0,
            seed: 1,
        };
        for spec in workload.generate() {
            assert_eq!(spec.base_priority, 1);
            assert_eq!(spec.arrival_time, 0);
            assert_eq!(spec.burst_time, 1);
        }
    }
}
