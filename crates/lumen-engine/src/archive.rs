//! Soul archive: a bounded log of broadcast seeds and its pattern analysis.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use lumen_geometry::constants::SCHUMANN_HZ;
use lumen_geometry::digest::{char_code_sum, nonzero_mod9};
use lumen_geometry::{dual_rotation_field, interlocking_triangles_field, Element, Solid};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::Level;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEntry {
    pub timestamp: DateTime<Utc>,
    pub seed: String,
}

/// Result of [`SoulArchive::analyze`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSummary {
    /// Occurrences of each distinct seed.
    pub patterns: BTreeMap<String, usize>,
    pub dominant_element: Option<Element>,
    /// Character-code harmonic of all seeds joined by spaces, in `1..=9`.
    pub soul_harmonic: Option<u8>,
    pub total: usize,
}

pub struct SoulArchive {
    entries: Mutex<VecDeque<ArchiveEntry>>,
    capacity: usize,
}

impl SoulArchive {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity: capacity.max(1),
        }
    }

    /// Append a seed, evicting the oldest entry when full.
    pub fn record(&self, seed: &str) -> ArchiveEntry {
        let entry = ArchiveEntry {
            timestamp: Utc::now(),
            seed: seed.to_owned(),
        };
        {
            let mut entries = self.entries.lock();
            if entries.len() == self.capacity {
                let _ = entries.pop_front();
            }
            entries.push_back(entry.clone());
        }

        if tracing::enabled!(Level::DEBUG) {
            let triangles = interlocking_triangles_field(seed);
            let rotation = dual_rotation_field(seed, SCHUMANN_HZ);
            tracing::debug!(
                triangle_code = %triangles.code,
                rotation_code = %rotation.activation_code,
                "seed archived"
            );
        }
        entry
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<ArchiveEntry> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn analyze(&self) -> PatternSummary {
        let seeds: Vec<String> = self.entries.lock().iter().map(|e| e.seed.clone()).collect();
        if seeds.is_empty() {
            return PatternSummary::default();
        }

        let mut patterns = BTreeMap::new();
        for seed in &seeds {
            *patterns.entry(seed.clone()).or_insert(0) += 1;
        }

        // first-seen order breaks ties
        let mut counts: Vec<(Element, usize)> = Vec::new();
        for seed in &seeds {
            let element = Solid::for_seed(seed).properties().element;
            match counts.iter_mut().find(|(e, _)| *e == element) {
                Some((_, n)) => *n += 1,
                None => counts.push((element, 1)),
            }
        }
        let dominant_element = counts
            .iter()
            .fold(None, |best: Option<(Element, usize)>, &(e, n)| match best {
                Some((_, m)) if m >= n => best,
                _ => Some((e, n)),
            })
            .map(|(e, _)| e);

        let joined = seeds.join(" ");
        PatternSummary {
            patterns,
            dominant_element,
            soul_harmonic: Some(nonzero_mod9(char_code_sum(&joined))),
            total: seeds.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_capacity_evicts_oldest() {
        let archive = SoulArchive::new(2);
        let _ = archive.record("one");
        let _ = archive.record("two");
        let _ = archive.record("three");
        let seeds: Vec<String> = archive.snapshot().into_iter().map(|e| e.seed).collect();
        assert_eq!(seeds, vec!["two", "three"]);
    }

    #[test]
    fn empty_archive_analysis() {
        let summary = SoulArchive::new(4).analyze();
        assert_eq!(summary.total, 0);
        assert!(summary.patterns.is_empty());
        assert!(summary.dominant_element.is_none());
        assert!(summary.soul_harmonic.is_none());
    }

    #[test]
    fn analysis_counts_whole_seeds() {
        let archive = SoulArchive::new(8);
        let _ = archive.record("I am calm");
        let _ = archive.record("I am calm");
        let _ = archive.record("calm and clear");
        let summary = archive.analyze();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.patterns.get("I am calm"), Some(&2));
        assert_eq!(summary.patterns.get("calm and clear"), Some(&1));
        assert_eq!(summary.patterns.get("calm"), None);
        let harmonic = summary.soul_harmonic.unwrap();
        assert!((1..=9).contains(&harmonic));
    }

    #[test]
    fn dominant_element_for_single_seed() {
        let archive = SoulArchive::new(8);
        let _ = archive.record("peace");
        let expected = Solid::for_seed("peace").properties().element;
        assert_eq!(archive.analyze().dominant_element, Some(expected));
    }
}
