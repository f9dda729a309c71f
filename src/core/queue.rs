use rustc_hash::FxHashMap;
use std::cmp::Ordering;

use super::state::{Pid, Process, ProcessKey, Roster, Ticks};

// Priority moves smaller than this are float noise, not aging
pub const AGING_EPSILON: f64 = 0.01;

/// Binary min-heap of roster keys ordered by effective priority.
///
/// Keys are mutated from outside the heap by aging, so the ordering is only
/// guaranteed right after `insert`, `extract_min` or `apply_aging`. Ties on
/// effective priority go to the lower pid. Keys whose process is gone from
/// the roster sink below every live key and are dropped on extraction.
#[derive(Debug)]
pub struct AgingQueue {
    heap: Vec<ProcessKey>,
    aging_coefficient: f64,
    now: Ticks,
    aging_events: u64,
    // Pid --> number of material priority changes
    adjustments: FxHashMap<Pid, u32>,
}

fn parent(i: usize) -> usize {
    (i - 1) / 2
}

fn left_child(i: usize) -> usize {
    2 * i + 1
}

fn right_child(i: usize) -> usize {
    2 * i + 2
}

fn precedes(roster: &Roster, a: ProcessKey, b: ProcessKey) -> bool {
    match (roster.get(a), roster.get(b)) {
        (Some(a), Some(b)) => {
            a.effective_priority()
                .total_cmp(&b.effective_priority())
                .then_with(|| a.id().cmp(&b.id()))
                == Ordering::Less
        }
        (Some(_), None) => true,
        (None, _) => false,
    }
}

impl AgingQueue {
    pub fn new(aging_coefficient: f64) -> Self {
        Self {
            heap: Vec::new(),
            aging_coefficient,
            now: 0,
            aging_events: 0,
            adjustments: FxHashMap::default(),
        }
    }

    /// Queue `key` with its priority evaluated at the current time cursor.
    ///
    /// A key that does not resolve in `roster` is ignored.
    pub fn insert(&mut self, key: ProcessKey, roster: &mut Roster) {
        let Some(process) = roster.get_mut(key) else {
            return;
        };
        process.recompute_effective_priority(self.now, self.aging_coefficient);

        self.heap.push(key);
        self.sift_up(self.heap.len() - 1, roster);
    }

    pub fn extract_min(&mut self, roster: &Roster) -> Option<ProcessKey> {
        while !self.heap.is_empty() {
            let min = self.heap.swap_remove(0);
            if !self.heap.is_empty() {
                self.sift_down(0, roster);
            }
            if roster.contains_key(min) {
                return Some(min);
            }
        }
        None
    }

    pub fn peek<'r>(&self, roster: &'r Roster) -> Option<&'r Process> {
        self.heap.first().and_then(|&key| roster.get(key))
    }

    /// Age every queued process to `now`, then restore heap order.
    ///
    /// Returns the number of aging events counted in this pass.
    pub fn apply_aging(&mut self, now: Ticks, roster: &mut Roster) -> u64 {
        let adjusted = self.update_all_priorities(now, roster);
        self.rebuild(roster);
        adjusted
    }

    fn update_all_priorities(&mut self, now: Ticks, roster: &mut Roster) -> u64 {
        self.now = now;

        let mut adjusted = 0;
        for &key in &self.heap {
            let Some(process) = roster.get_mut(key) else {
                continue;
            };
            let before = process.effective_priority();
            process.recompute_effective_priority(now, self.aging_coefficient);

            if (process.effective_priority() - before).abs() > AGING_EPSILON {
                adjusted += 1;
                *self.adjustments.entry(process.id()).or_insert(0) += 1;
            }
        }

        self.aging_events += adjusted;
        adjusted
    }

    // Any node may be out of place after aging, so heapify bottom-up
    fn rebuild(&mut self, roster: &Roster) {
        for i in (0..self.heap.len() / 2).rev() {
            self.sift_down(i, roster);
        }
    }

    fn sift_up(&mut self, mut index: usize, roster: &Roster) {
        while index > 0 {
            let up = parent(index);
            if !precedes(roster, self.heap[index], self.heap[up]) {
                break;
            }
            self.heap.swap(index, up);
            index = up;
        }
    }

    fn sift_down(&mut self, mut index: usize, roster: &Roster) {
        let len = self.heap.len();
        loop {
            let mut smallest = index;
            let left = left_child(index);
            let right = right_child(index);

            if left < len && precedes(roster, self.heap[left], self.heap[smallest]) {
                smallest = left;
            }
            if right < len && precedes(roster, self.heap[right], self.heap[smallest]) {
                smallest = right;
            }
            if smallest == index {
                return;
            }

            self.heap.swap(index, smallest);
            index = smallest;
        }
    }

    pub fn is_heap_ordered(&self, roster: &Roster) -> bool {
        (1..self.heap.len())
            .all(|i| !precedes(roster, self.heap[i], self.heap[parent(i)]))
    }

    pub fn contains(&self, key: ProcessKey) -> bool {
        self.heap.contains(&key)
    }

    // Heap array order, not sorted
    pub fn keys(&self) -> &[ProcessKey] {
        &self.heap
    }

    pub fn snapshot<'r>(&self, roster: &'r Roster) -> Vec<&'r Process> {
        self.heap.iter().filter_map(|&key| roster.get(key)).collect()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn now(&self) -> Ticks {
        self.now
    }

    pub fn set_now(&mut self, now: Ticks) {
        self.now = now;
    }

    pub fn aging_coefficient(&self) -> f64 {
        self.aging_coefficient
    }

    pub fn set_aging_coefficient(&mut self, aging_coefficient: f64) {
        self.aging_coefficient = aging_coefficient;
    }

    pub fn aging_events(&self) -> u64 {
        self.aging_events
    }

    pub fn adjustments(&self) -> &FxHashMap<Pid, u32> {
        &self.adjustments
    }

}
