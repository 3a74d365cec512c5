use chrono::{Local, NaiveTime, Timelike};
use serde::Serialize;

use crate::constants::{ANGULAR_CATEGORIES, PHI};
use crate::digest::{head, sha256_hex};

pub const RING_COUNT: usize = 7;

/// Seven angularly spaced rings and the duration they suggest.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RingPattern {
    pub seed: String,
    pub rings: Vec<String>,
    pub pattern: String,
    pub angle: f64,
    pub alignment: String,
    pub optimal_duration: u64,
    pub junction_code: String,
}

/// Derive the ring pattern for `seed` at time of day `at`.
///
/// The angle maps 24 hours onto 360 degrees and picks the nearest angular
/// category. `optimal_duration` stretches the request by φ and never
/// shortens it.
pub fn ring_pattern(seed: &str, requested_duration: u64, at: NaiveTime) -> RingPattern {
    let rings: Vec<String> = (0..RING_COUNT)
        .map(|i| {
            let angle = i as f64 * (360.0 / RING_COUNT as f64);
            let radius = (i + 1) as f64 * PHI;
            head(&sha256_hex(&format!("{seed}:{angle:.6}:{radius:.6}")), 8)
        })
        .collect();

    let angle = f64::from(at.hour()) * 15.0 + f64::from(at.minute()) / 4.0;
    let alignment = ANGULAR_CATEGORIES
        .iter()
        .min_by(|a, b| (a.1 - angle).abs().total_cmp(&(b.1 - angle).abs()))
        .map_or(ANGULAR_CATEGORIES[0].0, |(name, _)| *name);

    RingPattern {
        seed: seed.to_owned(),
        pattern: rings.concat(),
        junction_code: format!("{} {} {}", rings[0], rings[3], rings[6]),
        rings,
        angle,
        alignment: alignment.to_owned(),
        optimal_duration: optimal_duration(requested_duration),
    }
}

/// Ring pattern at the current local time of day.
pub fn ring_pattern_now(seed: &str, requested_duration: u64) -> RingPattern {
    ring_pattern(seed, requested_duration, Local::now().time())
}

pub fn optimal_duration(requested: u64) -> u64 {
    requested.max((requested as f64 * PHI) as u64)
}
