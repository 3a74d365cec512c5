use serde::Serialize;

use crate::constants::{PHI_CONJUGATE, POWER_NODES, SCHUMANN_HZ};
use crate::digest::{finite_or, floor_mod, head, round_to, sha512_hex};

/// Inner/outer circulation artifacts of a torus tuned to one frequency.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToroidalField {
    pub seed: String,
    pub frequency: f64,
    pub base_ratio: f64,
    pub inner_flow: String,
    pub outer_flow: String,
    pub phase_angle: f64,
    pub coherence: f64,
    pub power_node: u8,
    pub activation_sequence: String,
}

/// Build a torus around `seed` at `frequency` Hz.
///
/// `phase_angle` is always in `[0, 360)`. `power_node` is whichever of
/// 3, 6 and 9 lies closest to `frequency mod 10`.
pub fn toroidal_field(seed: &str, frequency: f64) -> ToroidalField {
    let frequency = finite_or(frequency, SCHUMANN_HZ);
    let ratio = frequency / SCHUMANN_HZ;

    let inner = sha512_hex(&format!("{seed}inner"));
    let outer = sha512_hex(&format!("{seed}outer"));

    let phase_angle = phase_angle(frequency);

    let residue = floor_mod(frequency, 10.0);
    let power_node = POWER_NODES
        .iter()
        .copied()
        .min_by(|a, b| {
            (f64::from(*a) - residue)
                .abs()
                .total_cmp(&(f64::from(*b) - residue).abs())
        })
        .unwrap_or(POWER_NODES[0]);

    let activation_sequence = format!(
        "{power_node}{power_node}{}",
        head(&inner, usize::from(power_node))
    );

    ToroidalField {
        seed: seed.to_owned(),
        frequency,
        base_ratio: round_to(ratio, 3),
        inner_flow: head(&inner, 12),
        outer_flow: head(&outer, 12),
        phase_angle,
        coherence: round_to(PHI_CONJUGATE * ratio, 3),
        power_node,
        activation_sequence,
    }
}

/// `(frequency * 360) mod 360`, kept inside `[0, 360)`.
pub fn phase_angle(frequency: f64) -> f64 {
    let turns = frequency * 360.0;
    if !turns.is_finite() {
        return 0.0;
    }
    floor_mod(turns, 360.0)
}
