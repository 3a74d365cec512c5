use serde::Serialize;

use crate::constants::TRIAD_TABLE;
use crate::digest::{char_code_sum, head, nonzero_mod9, sha512_hex};

pub const NODE_COUNT: usize = 13;
const PARTIAL_NODES: usize = 5;

/// Thirteen-node lattice derived from the 3-6-9 table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LatticeField {
    pub seed: String,
    pub nodes: Vec<String>,
    pub code: String,
    pub full_grid: bool,
    pub harmonic: u8,
    pub activation_key: String,
}

/// Derive the lattice for `seed`.
///
/// With `full_grid` the code concatenates all 13 nodes, otherwise only the
/// first five. `harmonic` is the seed's character-code sum reduced mod 9,
/// with 0 mapped to 9, so it is always in `1..=9`.
pub fn lattice_field(seed: &str, full_grid: bool) -> LatticeField {
    let nodes: Vec<String> = (0..NODE_COUNT)
        .map(|i| {
            let step = TRIAD_TABLE[i % TRIAD_TABLE.len()];
            head(&sha512_hex(&format!("{seed}{step}")), 6)
        })
        .collect();

    let emitted = if full_grid { NODE_COUNT } else { PARTIAL_NODES };
    let code = nodes[..emitted].concat();

    let harmonic = nonzero_mod9(char_code_sum(seed));
    let h = u32::from(harmonic);

    LatticeField {
        seed: seed.to_owned(),
        nodes,
        code,
        full_grid,
        harmonic,
        activation_key: format!("{}-{}-{}", h * 3, h * 6, h * 9),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(lattice_field("heal", true), lattice_field("heal", true));
    }

    #[test]
    fn full_grid_emits_every_node() {
        let full = lattice_field("heal", true);
        let partial = lattice_field("heal", false);
        assert_eq!(full.code.len(), 13 * 6);
        assert_eq!(partial.code.len(), 5 * 6);
        assert!(full.code.starts_with(&partial.code));
        assert_eq!(full.nodes, partial.nodes);
    }

    #[test]
    fn harmonic_example() {
        // 'a' = 97, 97 mod 9 = 7
        let field = lattice_field("a", false);
        assert_eq!(field.harmonic, 7);
        assert_eq!(field.activation_key, "21-42-63");
    }

    #[test]
    fn harmonic_maps_zero_to_nine() {
        // '-' = 45, 45 mod 9 = 0
        assert_eq!(lattice_field("-", false).harmonic, 9);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn harmonic_never_zero(seed in "\\PC{1,64}", full in any::<bool>()) {
                let field = lattice_field(&seed, full);
                prop_assert!((1..=9).contains(&field.harmonic));
            }
        }
    }
}
