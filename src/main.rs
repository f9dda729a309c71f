use std::{str::FromStr, time::Duration};

use agesched::{
    ProcessSpec, RandomWorkload, Scheduler, SchedulerConfig, SchedulerError, SimEvent,
    SimulationReport,
    report::{self, ComparisonTable, GanttChart, ProcessList, QueueDetail, StatisticsReport},
    sim::{demo_scenario, interactive_scenario},
};

const DEMOS: &str = "starvation, aging, aggressive, random, interactive, compare, all";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Demo {
    Starvation,
    Aging,
    Aggressive,
    Random,
    Interactive,
    Compare,
    All,
}

impl FromStr for Demo {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "starvation" => Ok(Self::Starvation),
            "aging" => Ok(Self::Aging),
            "aggressive" => Ok(Self::Aggressive),
            "random" => Ok(Self::Random),
            "interactive" => Ok(Self::Interactive),
            "compare" => Ok(Self::Compare),
            "all" => Ok(Self::All),
            other => Err(format!("unknown scenario {other:?}; expected one of: {DEMOS}")),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let which = std::env::args().nth(1).unwrap_or_else(|| "all".to_string());
    let demo = match which.parse::<Demo>() {
        Ok(demo) => demo,
        Err(message) => {
            eprintln!("error: {message}");
            std::process::exit(2);
        }
    };
    if let Err(err) = run(demo) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(demo: Demo) -> Result<(), SchedulerError> {
    match demo {
        Demo::Starvation => starvation_demo(),
        Demo::Aging => aging_demo(),
        Demo::Aggressive => aggressive_demo(),
        Demo::Random => random_scenario(),
        Demo::Interactive => interactive(),
        Demo::Compare => compare_aging_coefficients(),
        Demo::All => {
            starvation_demo()?;
            aging_demo()?;
            aggressive_demo()?;
            random_scenario()?;
            compare_aging_coefficients()
        }
    }
}

fn starvation_demo() -> Result<(), SchedulerError> {
    let title = "WITHOUT AGING (Starvation Demo)";
    scenario(title, SchedulerConfig::no_aging(), &demo_scenario())
}

fn aging_demo() -> Result<(), SchedulerError> {
    let title = "WITH AGING (Starvation Prevention)";
    scenario(title, SchedulerConfig::default(), &demo_scenario())
}

fn aggressive_demo() -> Result<(), SchedulerError> {
    scenario("AGGRESSIVE AGING", SchedulerConfig::aggressive(), &demo_scenario())
}

fn scenario(
    title: &str,
    config: SchedulerConfig,
    specs: &[ProcessSpec],
) -> Result<(), SchedulerError> {
    let title = format!("{title} - aging coefficient {}", config.aging_coefficient);
    println!("{}", report::header(&title));

    let mut scheduler = Scheduler::with_config(config)?;
    scheduler.add_specs(specs)?;
    print!("{}", ProcessList::new("Process List", scheduler.processes()));

    let result = scheduler.run()?;
    print_results(&result);
    Ok(())
}

fn random_scenario() -> Result<(), SchedulerError> {
    let workload = RandomWorkload {
        count: 15,
        max_priority: 10,
        max_arrival: 15,
        max_burst: 8,
        seed: rand::random(),
    };
    let config = SchedulerConfig::new(0.15);
    scenario("RANDOM PROCESSES (Large Scale)", config, &workload.generate())
}

fn interactive() -> Result<(), SchedulerError> {
    println!("{}", report::header("INTERACTIVE DEMO: Real-time Visualization"));

    let config = SchedulerConfig::new(0.2)
        .verbose(true)
        .with_pacing(Duration::from_millis(100));
    let mut scheduler = Scheduler::with_config(config)?;
    scheduler.add_specs(&interactive_scenario())?;
    print!("{}", ProcessList::new("Process List", scheduler.processes()));

    while !scheduler.is_finished() {
        let events = scheduler.step()?;
        if events.iter().any(|e| matches!(e, SimEvent::Dispatched { .. })) {
            print!("{}", QueueDetail(&scheduler.queue_snapshot()));
        } else if !events.is_empty() {
            println!("{}", report::queue_line(&scheduler.queue_snapshot()));
        }
    }

    print_results(&scheduler.report());
    Ok(())
}

fn compare_aging_coefficients() -> Result<(), SchedulerError> {
    println!("{}", report::header("COMPARISON: Different Aging Factors"));

    let settings = [
        ("No Aging", 0.0),
        ("Conservative", 0.05),
        ("Moderate", 0.1),
        ("Aggressive", 0.2),
        ("Very Aggressive", 0.5),
    ];

    let mut rows = Vec::with_capacity(settings.len());
    for (label, coefficient) in settings {
        let mut scheduler = Scheduler::new(coefficient, false)?;
        scheduler.add_specs(&demo_scenario())?;
        rows.push((label, scheduler.run()?.stats));
    }

    print!("{}", ComparisonTable(&rows));
    Ok(())
}

fn print_results(result: &SimulationReport) {
    print!("{}", GanttChart(&result.completed));
    print!("{}", StatisticsReport(&result.stats));
    println!("{}\n", report::summary_line(&result.stats));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_names_parse() {
        assert_eq!("starvation".parse::<Demo>(), Ok(Demo::Starvation));
        assert_eq!("compare".parse::<Demo>(), Ok(Demo::Compare));
        assert_eq!("all".parse::<Demo>(), Ok(Demo::All));
    }

    #[test]
    fn test_unknown_demo_is_rejected() {
        let err = "fifo".parse::<Demo>().unwrap_err();
        assert!(err.contains("\"fifo\""));
        assert!(err.contains(DEMOS));
    }
}
