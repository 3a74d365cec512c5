//! Field memory: recently remembered seeds, recalled within a time window.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub seed: String,
    pub remembered_at: DateTime<Utc>,
}

pub struct FieldMemory {
    entries: Mutex<VecDeque<Memory>>,
    capacity: usize,
    window: Duration,
}

impl FieldMemory {
    pub fn new(capacity: usize, window: Duration) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
            window,
        }
    }

    pub fn remember(&self, seed: &str) -> Memory {
        self.remember_at(seed, Utc::now())
    }

    pub fn remember_at(&self, seed: &str, at: DateTime<Utc>) -> Memory {
        let memory = Memory {
            seed: seed.to_owned(),
            remembered_at: at,
        };
        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            let _ = entries.pop_front();
        }
        entries.push_back(memory.clone());
        memory
    }

    /// Seeds remembered within the window ending now, oldest first.
    pub fn recall(&self) -> Vec<String> {
        self.recall_at(Utc::now())
    }

    pub fn recall_at(&self, now: DateTime<Utc>) -> Vec<String> {
        let window = chrono::Duration::from_std(self.window).unwrap_or(chrono::Duration::MAX);
        let cutoff = now.checked_sub_signed(window);
        self.entries
            .lock()
            .iter()
            .filter(|m| cutoff.map_or(true, |c| m.remembered_at > c))
            .map(|m| m.seed.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory() -> FieldMemory {
        FieldMemory::new(3, Duration::from_secs(2 * 60 * 60))
    }

    #[test]
    fn recall_returns_recent_seeds() {
        let mem = memory();
        let _ = mem.remember("abundance");
        let _ = mem.remember("clarity");
        assert_eq!(mem.recall(), vec!["abundance", "clarity"]);
    }

    #[test]
    fn recall_skips_entries_outside_window() {
        let mem = memory();
        let now = Utc::now();
        let _ = mem.remember_at("old", now - chrono::Duration::hours(3));
        let _ = mem.remember_at("fresh", now - chrono::Duration::minutes(5));
        assert_eq!(mem.recall_at(now), vec!["fresh"]);
        assert_eq!(mem.len(), 2);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mem = memory();
        for seed in ["a", "b", "c", "d"] {
            let _ = mem.remember(seed);
        }
        assert_eq!(mem.recall(), vec!["b", "c", "d"]);
    }
}
