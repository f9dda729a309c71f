//! Text rendering for processes, queue snapshots and run results.

use std::fmt;

use crate::{core::Process, stats::StatsSnapshot};

const WIDTH: usize = 60;

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P{:02} [Pri:{:>4.1}/{}]",
            self.id(),
            self.effective_priority(),
            self.base_priority()
        )
    }
}

/// Every field of a process on one line
pub struct Detailed<'a>(pub &'a Process);

impl fmt::Display for Detailed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.0;
        write!(
            f,
            "Process {:02}: Base Priority={}, Effective Priority={:.2}, Arrival={}, Burst={}, Remaining={}, Waiting={}",
            p.id(),
            p.base_priority(),
            p.effective_priority(),
            p.arrival_time(),
            p.burst_time(),
            p.remaining_time(),
            p.waiting_time()
        )?;
        if let Some(start) = p.start_time() {
            write!(f, ", Start={start}")?;
        }
        if let (Some(completion), Some(turnaround)) = (p.completion_time(), p.turnaround_time()) {
            write!(f, ", Completion={completion}, Turnaround={turnaround}")?;
        }
        Ok(())
    }
}

pub fn separator(c: char, width: usize) -> String {
    c.to_string().repeat(width)
}

pub fn header(title: &str) -> String {
    let rule = separator('=', WIDTH);
    format!("{rule}\n  {title}\n{rule}")
}

/// Titled listing of processes, one `Detailed` line each
pub struct ProcessList<'a> {
    pub title: &'a str,
    pub processes: Vec<&'a Process>,
}

impl<'a> ProcessList<'a> {
    pub fn new(title: &'a str, processes: impl IntoIterator<Item = &'a Process>) -> Self {
        Self {
            title,
            processes: processes.into_iter().collect(),
        }
    }
}

impl fmt::Display for ProcessList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = separator('-', WIDTH);
        writeln!(f, "{} ({} processes):", self.title, self.processes.len())?;
        writeln!(f, "{rule}")?;
        if self.processes.is_empty() {
            return writeln!(f, "  [No processes]");
        }
        for process in self.processes.iter().copied() {
            writeln!(f, "  {}", Detailed(process))?;
        }
        writeln!(f, "{rule}")
    }
}

// Heap array order, as handed over by the queue
pub fn queue_line(queue: &[&Process]) -> String {
    if queue.is_empty() {
        return "  [Queue is empty]".to_string();
    }
    let entries: Vec<String> = queue.iter().map(|p| p.to_string()).collect();
    format!("  Queue ({} processes): {}", queue.len(), entries.join(", "))
}

/// Indexed queue listing in heap array order
pub struct QueueDetail<'a>(pub &'a [&'a Process]);

impl fmt::Display for QueueDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "  [Queue is empty]");
        }
        writeln!(f, "  Queue ({} processes):", self.0.len())?;
        for (i, process) in self.0.iter().copied().enumerate() {
            writeln!(f, "    [{i}] {}", Detailed(process))?;
        }
        Ok(())
    }
}

/// One row per completed process, `=` for every tick it held the CPU.
///
/// Renders nothing when no process has both started and completed.
pub struct GanttChart<'a>(pub &'a [Process]);

impl fmt::Display for GanttChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spans: Vec<(&Process, u64, u64)> = self
            .0
            .iter()
            .filter_map(|p| Some((p, p.start_time()?, p.completion_time()?)))
            .collect();
        let Some(max_time) = spans.iter().map(|&(_, _, end)| end).max() else {
            return Ok(());
        };
        let rule = separator('-', WIDTH);

        writeln!(f, "Gantt Chart:")?;
        writeln!(f, "{rule}")?;
        for (process, start, end) in spans {
            let bar: String = (0..max_time)
                .map(|t| if (start..end).contains(&t) { '=' } else { ' ' })
                .collect();
            writeln!(f, "  P{:02} |{bar}| ({start}-{end})", process.id())?;
        }

        write!(f, "     0")?;
        for t in (5..=max_time).step_by(5) {
            write!(f, "{t:>5}")?;
        }
        writeln!(f)?;
        writeln!(f, "{rule}")
    }
}

pub struct StatisticsReport<'a>(pub &'a StatsSnapshot);

impl fmt::Display for StatisticsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.0;
        let heavy = separator('=', WIDTH);
        let light = separator('-', WIDTH);

        writeln!(f, "{heavy}")?;
        writeln!(f, "                    STATISTICS REPORT")?;
        writeln!(f, "{heavy}")?;
        writeln!(f, "  Total Processes:          {}", stats.total_processes)?;
        writeln!(f, "  Completed Processes:      {}", stats.completed_processes)?;
        writeln!(f, "  Total Execution Time:     {} time units", stats.elapsed)?;
        writeln!(f, "{light}")?;
        writeln!(f, "  Average Waiting Time:     {:.2} time units", stats.avg_waiting)?;
        writeln!(f, "  Average Turnaround Time:  {:.2} time units", stats.avg_turnaround)?;
        writeln!(f, "  Average Response Time:    {:.2} time units", stats.avg_response)?;
        writeln!(f, "  Maximum Waiting Time:     {} time units", stats.max_waiting)?;
        writeln!(f, "{light}")?;
        writeln!(f, "  CPU Utilization:          {:.2}%", stats.cpu_utilization)?;
        writeln!(f, "  Total Aging Events:       {}", stats.aging_events)?;
        if stats.processes_with_priority_changes > 0 {
            writeln!(
                f,
                "  Processes with Priority Changes: {}",
                stats.processes_with_priority_changes
            )?;
        }
        writeln!(f, "{heavy}")
    }
}

pub fn summary_line(stats: &StatsSnapshot) -> String {
    format!(
        "Statistics: Avg Wait={:.2}, Avg Turnaround={:.2}, CPU={:.2}%, Aging Events={}",
        stats.avg_waiting, stats.avg_turnaround, stats.cpu_utilization, stats.aging_events
    )
}

/// Labelled rows of run results side by side
pub struct ComparisonTable<'a>(pub &'a [(&'a str, StatsSnapshot)]);

impl fmt::Display for ComparisonTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = separator('=', 80);
        writeln!(
            f,
            "{:<20}{:<15}{:<15}{:<15}Aging Events",
            "Aging Factor", "Avg Wait", "Avg Turnaround", "CPU Util"
        )?;
        writeln!(f, "{rule}")?;
        for (label, stats) in self.0 {
            writeln!(
                f,
                "{:<20}{:<15.2}{:<15.2}{:<15.2}{}",
                label,
                stats.avg_waiting,
                stats.avg_turnaround,
                stats.cpu_utilization,
                stats.aging_events
            )?;
        }
        writeln!(f, "{rule}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(id: u64, arrival: u64, burst: u64, start: u64) -> Process {
        let mut p = Process::new(id, 3, arrival, burst).unwrap();
        p.mark_started(start);
        for _ in 0..burst {
            p.run_tick();
        }
        p.mark_completed(start + burst).unwrap();
        p
    }

    #[test]
    fn test_summary_string() {
        let p = Process::new(3, 8, 0, 2).unwrap();
        assert_eq!(p.to_string(), "P03 [Pri: 8.0/8]");
    }

    #[test]
    fn test_detailed_string() {
        let p = finished(1, 0, 2, 1);
        assert_eq!(
            Detailed(&p).to_string(),
            "Process 01: Base Priority=3, Effective Priority=3.00, Arrival=0, Burst=2, \
             Remaining=0, Waiting=1, Start=1, Completion=3, Turnaround=3"
        );
    }

    #[test]
    fn test_gantt_chart_rows() {
        let processes = [finished(1, 0, 2, 0), finished(2, 0, 3, 2)];
        let chart = GanttChart(&processes).to_string();
        assert!(chart.contains("  P01 |==   | (0-2)"));
        assert!(chart.contains("  P02 |  ===| (2-5)"));
        assert!(chart.contains("     0    5"));
        assert!(GanttChart(&[]).to_string().is_empty());
    }

    #[test]
    fn test_empty_queue_line() {
        assert_eq!(queue_line(&[]), "  [Queue is empty]");
    }

    #[test]
    fn test_summary_line() {
        let stats = StatsSnapshot {
            total_processes: 1,
            completed_processes: 1,
            elapsed: 4,
            total_burst: 4,
            avg_waiting: 1.0,
            avg_turnaround: 5.0,
            avg_response: 1.0,
            max_waiting: 1,
            cpu_utilization: 100.0,
            aging_events: 3,
            processes_with_priority_changes: 1,
        };
        assert_eq!(
            summary_line(&stats),
            "Statistics: Avg Wait=1.00, Avg Turnaround=5.00, CPU=100.00%, Aging Events=3"
        );
        let report = StatisticsReport(&stats).to_string();
        assert!(report.contains("Processes with Priority Changes: 1"));
        assert!(report.ends_with(&format!("{}\n", separator('=', WIDTH))));

        let table = ComparisonTable(&[("No Aging", stats)]).to_string();
        assert_eq!(table.lines().count(), 4);
        assert!(table.lines().nth(2).unwrap().starts_with("No Aging"));
    }

    #[test]
    fn test_process_list_and_queue_detail() {
        let processes = [finished(1, 0, 2, 1), finished(2, 0, 1, 3)];
        let list = ProcessList::new("Process List", &processes).to_string();
        assert!(list.starts_with("Process List (2 processes):\n"));
        assert_eq!(list.lines().filter(|l| l.starts_with("  Process")).count(), 2);

        let empty = ProcessList::new("Process List", std::iter::empty()).to_string();
        assert!(empty.contains("  [No processes]"));

        let queued: Vec<&Process> = processes.iter().collect();
        let detail = QueueDetail(&queued).to_string();
        assert!(detail.starts_with("  Queue (2 processes):\n    [0] Process 01"));
        assert_eq!(QueueDetail(&[]).to_string(), "  [Queue is empty]\n");
    }
}
