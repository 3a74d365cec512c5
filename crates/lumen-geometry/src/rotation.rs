use serde::Serialize;

use crate::constants::{PHI, SCHUMANN_HZ, SOLFEGGIO, SQRT3};
use crate::digest::{finite_or, floor_mod, head, sha256_hex};

/// Two counter-rotating hash halves and the intensity of their field.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DualRotationField {
    pub seed: String,
    pub ascending: String,
    pub descending: String,
    pub frequency: f64,
    pub aligned_frequency: u32,
    pub intensity: f64,
    pub activation_code: String,
}

pub fn dual_rotation_field(seed: &str, frequency: f64) -> DualRotationField {
    let frequency = finite_or(frequency, SCHUMANN_HZ);

    let ascending = head(&sha256_hex(&format!("{seed}ascend")), 12);
    let descending = head(&sha256_hex(&format!("{seed}descend")), 12);

    let target = frequency * 100.0;
    let aligned_frequency = SOLFEGGIO
        .iter()
        .copied()
        .min_by(|a, b| {
            (f64::from(*a) - target)
                .abs()
                .total_cmp(&(f64::from(*b) - target).abs())
        })
        .unwrap_or(SOLFEGGIO[0]);

    let cycle = match floor_mod(frequency, 9.0) {
        m if m == 0.0 => 9.0,
        m => m,
    };
    let intensity = ((frequency * SQRT3) / PHI) * cycle;

    let activation_code = format!(
        "{} {} {}",
        intensity.trunc() as i64,
        (frequency * PHI).trunc() as i64,
        (f64::from(aligned_frequency) / PHI).trunc() as i64
    );

    DualRotationField {
        seed: seed.to_owned(),
        ascending,
        descending,
        frequency,
        aligned_frequency,
        intensity,
        activation_code,
    }
}
