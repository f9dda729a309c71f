use log::{Level, info, log};
use rustc_hash::FxHashMap;
use std::{thread, time::Duration};

use super::workload::ProcessSpec;
use crate::{
    config::{SchedulerConfig, validate_aging_coefficient},
    core::{AgingQueue, Observer, Pid, Process, ProcessKey, Roster, SimEvent, Ticks},
    error::SchedulerError,
    stats::{Statistics, StatsSnapshot},
};

/// Outcome of a full run
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub final_time: Ticks,
    // Completion order
    pub completed: Vec<Process>,
    pub stats: StatsSnapshot,
}

/// Non-preemptive priority scheduler with aging.
///
/// Owns every process for its whole life. The queue only holds roster keys.
/// Each `step` is one tick: admit arrivals, dispatch if the CPU is free, then
/// run the current process for one unit of time.
pub struct Scheduler {
    config: SchedulerConfig,
    // Insertion order
    roster: Roster,
    pids: FxHashMap<Pid, ProcessKey>,
    // Roster keys ordered by arrival, filled on the first step
    arrivals: Vec<ProcessKey>,
    arrival_cursor: usize,
    queue: AgingQueue,
    running: Option<ProcessKey>,
    completed: Vec<ProcessKey>,
    now: Ticks,
    started: bool,
    stats: Statistics,
    observer: Observer,
}

impl Scheduler {
    pub fn new(aging_coefficient: f64, verbose: bool) -> Result<Self, SchedulerError> {
        Self::with_config(SchedulerConfig::new(aging_coefficient).verbose(verbose))
    }

    pub fn with_config(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        config.validate()?;
        Ok(Self {
            queue: AgingQueue::new(config.aging_coefficient),
            config,
            roster: Roster::with_key(),
            pids: FxHashMap::default(),
            arrivals: Vec::new(),
            arrival_cursor: 0,
            running: None,
            completed: Vec::new(),
            now: 0,
            started: false,
            stats: Statistics::new(),
            observer: Observer::new(),
        })
    }

    pub fn add_process(
        &mut self,
        id: Pid,
        base_priority: u32,
        arrival_time: Ticks,
        burst_time: Ticks,
    ) -> Result<ProcessKey, SchedulerError> {
        if self.started {
            return Err(SchedulerError::AlreadyStarted);
        }
        if self.pids.contains_key(&id) {
            return Err(SchedulerError::DuplicatePid(id));
        }

        let process = Process::new(id, base_priority, arrival_time, burst_time)?;
        let key = self.roster.insert(process);
        self.pids.insert(id, key);
        Ok(key)
    }

    pub fn add_spec(&mut self, spec: &ProcessSpec) -> Result<ProcessKey, SchedulerError> {
        self.add_process(
            spec.id,
            spec.base_priority,
            spec.arrival_time,
            spec.burst_time,
        )
    }

    pub fn add_specs<'a>(
        &mut self,
        specs: impl IntoIterator<Item = &'a ProcessSpec>,
    ) -> Result<(), SchedulerError> {
        for spec in specs {
            self.add_spec(spec)?;
        }
        Ok(())
    }

    pub fn set_aging_coefficient(&mut self, aging_coefficient: f64) -> Result<(), SchedulerError> {
        if self.started {
            return Err(SchedulerError::AlreadyStarted);
        }
        validate_aging_coefficient(aging_coefficient)?;
        self.config.aging_coefficient = aging_coefficient;
        self.queue.set_aging_coefficient(aging_coefficient);
        Ok(())
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.config.verbose = verbose;
    }

    pub fn set_pacing(&mut self, pacing: Option<Duration>) {
        self.config.pacing = pacing;
    }

    /// Run every process to completion.
    ///
    /// An empty roster returns straight away with an all-zero report.
    pub fn run(&mut self) -> Result<SimulationReport, SchedulerError> {
        if self.roster.is_empty() {
            info!("No processes to schedule");
            return Ok(self.report());
        }

        self.begin();
        while !self.is_finished() {
            self.step()?;
        }

        let stats = self.statistics();
        info!(
            "Simulation completed at time {}: {}/{} processes, {} aging events",
            self.now,
            stats.completed_processes(),
            self.roster.len(),
            stats.total_aging_events()
        );
        Ok(self.report())
    }

    pub fn run_with_visualization(
        &mut self,
        pacing: Duration,
    ) -> Result<SimulationReport, SchedulerError> {
        self.set_pacing(Some(pacing));
        self.set_verbose(true);
        self.run()
    }

    /// Advance the simulation by one tick and return what happened.
    pub fn step(&mut self) -> Result<Vec<SimEvent>, SchedulerError> {
        self.begin();

        let mut events = Vec::new();
        if self.is_finished() {
            return Ok(events);
        }

        if self.running.is_none() {
            self.admit_arrivals(&mut events);

            if self.queue.is_empty() {
                self.emit(&mut events, SimEvent::CpuIdle);
                self.now += 1;
                self.observer.observe(&self.roster, &self.queue, self.running);
                return Ok(events);
            }

            // Dispatch on up-to-date priorities
            self.age(&mut events);
            self.dispatch(&mut events);
        }

        self.execute_tick(&mut events)?;
        self.observer.observe(&self.roster, &self.queue, self.running);
        Ok(events)
    }

    fn begin(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        // Stable sort keeps input order among equal arrivals
        self.arrivals = self.roster.keys().collect();
        let roster = &self.roster;
        self.arrivals.sort_by_key(|&key| roster[key].arrival_time());

        info!(
            "Simulation start: aging coefficient {:.2}, {} processes",
            self.config.aging_coefficient,
            self.roster.len()
        );
    }

    // Each process is admitted exactly once, on its arrival tick
    fn admit_arrivals(&mut self, events: &mut Vec<SimEvent>) {
        self.queue.set_now(self.now);

        while let Some(&key) = self.arrivals.get(self.arrival_cursor) {
            let process = &mut self.roster[key];
            if process.arrival_time() > self.now {
                break;
            }
            self.arrival_cursor += 1;

            process.mark_queued();
            let event = SimEvent::Arrived {
                pid: process.id(),
                base_priority: process.base_priority(),
                burst_time: process.burst_time(),
            };
            self.queue.insert(key, &mut self.roster);
            self.emit(events, event);
        }
    }

    fn age(&mut self, events: &mut Vec<SimEvent>) {
        let adjusted = self.queue.apply_aging(self.now, &mut self.roster);
        if adjusted > 0 {
            self.emit(events, SimEvent::Aged { adjusted });
        }
    }

    fn dispatch(&mut self, events: &mut Vec<SimEvent>) {
        let Some(key) = self.queue.extract_min(&self.roster) else {
            return;
        };

        let process = &mut self.roster[key];
        process.mark_started(self.now);
        let event = SimEvent::Dispatched {
            pid: process.id(),
            effective_priority: process.effective_priority(),
            queued: self.queue.len(),
        };
        self.running = Some(key);
        self.emit(events, event);
    }

    // Arrivals and aging keep going while the CPU is held; nothing preempts
    fn execute_tick(&mut self, events: &mut Vec<SimEvent>) -> Result<(), SchedulerError> {
        let Some(key) = self.running else {
            return Ok(());
        };

        self.roster[key].run_tick();
        self.now += 1;
        self.admit_arrivals(events);
        self.age(events);
        self.pace();

        if self.roster[key].remaining_time() == 0 {
            self.complete(key, events)?;
        }
        Ok(())
    }

    fn complete(
        &mut self,
        key: ProcessKey,
        events: &mut Vec<SimEvent>,
    ) -> Result<(), SchedulerError> {
        let process = &mut self.roster[key];
        process.mark_completed(self.now)?;

        let event = SimEvent::Completed {
            pid: process.id(),
            waiting_time: process.waiting_time(),
            turnaround_time: process.turnaround_time().unwrap_or_default(),
        };
        self.stats.record_process(process);
        self.completed.push(key);
        self.running = None;
        self.emit(events, event);
        Ok(())
    }

    fn pace(&self) {
        if !self.config.verbose {
            return;
        }
        if let Some(delay) = self.config.pacing.filter(|d| !d.is_zero()) {
            thread::sleep(delay);
        }
    }

    fn emit(&self, events: &mut Vec<SimEvent>, event: SimEvent) {
        let level = if self.config.verbose {
            Level::Info
        } else {
            Level::Debug
        };
        log!(level, "[time {:>3}] {}", self.now, event);
        events.push(event);
    }

    pub fn is_finished(&self) -> bool {
        self.running.is_none()
            && self.queue.is_empty()
            && self.roster.values().all(Process::has_started)
    }

    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            final_time: self.now,
            completed: self.completed().cloned().collect(),
            stats: self.statistics().snapshot(),
        }
    }

    /// Statistics as of the current clock, including the queue's aging tally.
    pub fn statistics(&self) -> Statistics {
        let mut stats = self.stats.clone();
        stats.set_total_processes(self.roster.len());
        stats.set_elapsed(self.now);
        stats.record_aging_events(self.queue.aging_events(), self.queue.adjustments());
        stats
    }

    pub fn now(&self) -> Ticks {
        self.now
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn process(&self, pid: Pid) -> Option<&Process> {
        self.pids.get(&pid).map(|&key| &self.roster[key])
    }

    // Insertion order
    pub fn processes(&self) -> impl Iterator<Item = &Process> {
        self.roster.values()
    }

    pub fn running(&self) -> Option<&Process> {
        self.running.map(|key| &self.roster[key])
    }

    pub fn completed(&self) -> impl Iterator<Item = &Process> {
        self.completed.iter().map(|&key| &self.roster[key])
    }

    // Heap array order
    pub fn queue_snapshot(&self) -> Vec<&Process> {
        self.queue.snapshot(&self.roster)
    }

    pub fn aging_events(&self) -> u64 {
        self.queue.aging_events()
    }

    pub fn observed_steps(&self) -> u64 {
        self.observer.steps()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::workload::demo_scenario;

    fn demo(aging_coefficient: f64) -> Scheduler {
        let mut scheduler = Scheduler::new(aging_coefficient, false).unwrap();
        scheduler.add_specs(&demo_scenario()).unwrap();
        scheduler
    }

    #[test]
    fn test_empty_roster_is_noop() {
        let mut scheduler = Scheduler::new(0.1, false).unwrap();
        let report = scheduler.run().unwrap();
        assert_eq!(report.final_time, 0);
        assert!(report.completed.is_empty());
        assert_eq!(report.stats.completed_processes, 0);
        assert!(scheduler.step().unwrap().is_empty());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            Scheduler::new(-1.0, false),
            Err(SchedulerError::InvalidAgingCoefficient(_))
        ));

        let mut scheduler = Scheduler::new(0.1, false).unwrap();
        assert!(matches!(
            scheduler.add_process(1, 1, 0, 0),
            Err(SchedulerError::Process(_))
        ));
        scheduler.add_process(1, 1, 0, 2).unwrap();
        assert_eq!(
            scheduler.add_process(1, 3, 0, 2),
            Err(SchedulerError::DuplicatePid(1))
        );
    }

    #[test]
    fn test_intake_closed_after_start() {
        let mut scheduler = demo(0.1);
        scheduler.step().unwrap();
        assert_eq!(
            scheduler.add_process(9, 1, 50, 1),
            Err(SchedulerError::AlreadyStarted)
        );
        assert_eq!(
            scheduler.set_aging_coefficient(0.3),
            Err(SchedulerError::AlreadyStarted)
        );
    }

    #[test]
    fn test_first_step_dispatches_and_runs_one_tick() {
        let mut scheduler = demo(0.0);
        let events = scheduler.step().unwrap();

        assert_eq!(
            events[0],
            SimEvent::Arrived {
                pid: 1,
                base_priority: 1,
                burst_time: 5
            }
        );
        assert!(matches!(events[1], SimEvent::Dispatched { pid: 1, .. }));
        assert!(matches!(events[2], SimEvent::Arrived { pid: 2, .. }));
        assert_eq!(scheduler.now(), 1);
        assert_eq!(scheduler.running().map(Process::id), Some(1));
        assert_eq!(scheduler.queue_snapshot().len(), 1);
    }

    #[test]
    fn test_idle_ticks_until_first_arrival() {
        let mut scheduler = Scheduler::new(0.1, false).unwrap();
        scheduler.add_process(1, 3, 3, 2).unwrap();

        for tick in 0..3 {
            assert_eq!(scheduler.step().unwrap(), vec![SimEvent::CpuIdle]);
            assert_eq!(scheduler.now(), tick + 1);
        }

        let report = scheduler.run().unwrap();
        assert_eq!(report.final_time, 5);
        assert_eq!(report.completed[0].start_time(), Some(3));
        assert_eq!(report.completed[0].waiting_time(), 0);
        assert_eq!(report.stats.cpu_utilization, 40.0);
    }

    #[test]
    fn test_arrival_on_completion_tick_queued_once() {
        let mut scheduler = Scheduler::new(0.1, false).unwrap();
        scheduler.add_process(1, 1, 0, 3).unwrap();
        scheduler.add_process(2, 5, 3, 2).unwrap();

        let report = scheduler.run().unwrap();
        assert_eq!(report.completed.len(), 2);
        assert_eq!(report.final_time, 5);
        assert_eq!(report.completed[1].id(), 2);
        assert_eq!(report.completed[1].start_time(), Some(3));
    }

    #[test]
    fn test_demo_without_aging() {
        let mut scheduler = demo(0.0);
        let report = scheduler.run().unwrap();

        let order: Vec<Pid> = report.completed.iter().map(Process::id).collect();
        assert_eq!(order, vec![1, 3, 5, 2, 4]);
        assert_eq!(report.final_time, 17);

        let p1 = scheduler.process(1).unwrap();
        assert_eq!(p1.start_time(), Some(0));
        assert_eq!(p1.completion_time(), Some(5));

        assert_eq!(report.stats.aging_events, 0);
        assert_eq!(report.stats.cpu_utilization, 100.0);
        assert!((report.stats.avg_waiting - 6.2).abs() < 1e-9);
        assert!((report.stats.avg_turnaround - 9.6).abs() < 1e-9);
        assert!(scheduler.observed_steps() > 0);
    }

    #[test]
    fn test_processes_keep_insertion_order() {
        let mut scheduler = Scheduler::new(0.1, false).unwrap();
        scheduler.add_process(4, 1, 9, 1).unwrap();
        scheduler.add_process(2, 1, 0, 1).unwrap();
        scheduler.run().unwrap();

        let ids: Vec<Pid> = scheduler.processes().map(Process::id).collect();
        assert_eq!(ids, vec![4, 2]);
    }
}
