use serde::Serialize;

use crate::constants::{FIBONACCI, PHI};
use crate::digest::{char_code_sum, finite_or, nonzero_mod9, sha256_hex, sha512_hex};

/// Layered hash-chain encoding of a seed plus its snapped multiplier.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Amplification {
    pub seed: String,
    pub chain_digest: String,
    pub multiplier: u32,
    pub alignment: u8,
}

/// Amplify a seed through a φ-weighted hash chain.
///
/// Each character of the seed's SHA-512 digest is scaled by a power of φ
/// (cycling through exponents 1..=7) and reduced to two decimal digits; the
/// digit string is hashed again together with the seed. `multiplier` snaps up
/// to the next Fibonacci value and is capped at the table maximum.
pub fn amplify(seed: &str, multiplier: f64) -> Amplification {
    let encoded = sha512_hex(seed);

    let mut digits = String::with_capacity(encoded.len() * 2);
    for (i, c) in encoded.chars().enumerate() {
        let weight = PHI.powi((i % 7 + 1) as i32);
        let value = (f64::from(u32::from(c)) * weight).floor() as u64 % 100;
        digits.push_str(&format!("{value:02}"));
    }
    digits.push_str(seed);

    Amplification {
        seed: seed.to_owned(),
        chain_digest: sha256_hex(&digits),
        multiplier: snap_multiplier(multiplier),
        alignment: nonzero_mod9(char_code_sum(seed)),
    }
}

/// First Fibonacci value at or above `requested`, never exceeding the table.
pub fn snap_multiplier(requested: f64) -> u32 {
    let requested = finite_or(requested, 1.0);
    FIBONACCI
        .iter()
        .copied()
        .find(|&f| f64::from(f) >= requested)
        .unwrap_or(FIBONACCI[FIBONACCI.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(amplify("heal", 3.0), amplify("heal", 3.0));
    }

    #[test]
    fn digest_depends_on_seed() {
        assert_ne!(amplify("heal", 1.0).chain_digest, amplify("heat", 1.0).chain_digest);
        assert_eq!(amplify("heal", 1.0).chain_digest.len(), 64);
    }

    #[test]
    fn multiplier_snaps_up_to_fibonacci() {
        assert_eq!(snap_multiplier(1.0), 1);
        assert_eq!(snap_multiplier(4.0), 5);
        assert_eq!(snap_multiplier(13.0), 13);
        assert_eq!(snap_multiplier(14.0), 21);
        assert_eq!(snap_multiplier(0.0), 1);
        assert_eq!(snap_multiplier(-5.0), 1);
    }

    #[test]
    fn multiplier_never_exceeds_table_max() {
        assert_eq!(snap_multiplier(10_000.0), 987);
        assert_eq!(snap_multiplier(f64::INFINITY), 1);
        assert_eq!(snap_multiplier(f64::NAN), 1);
    }

    #[test]
    fn alignment_is_in_range() {
        let a = amplify("I am calm", 1.0);
        assert!((1..=9).contains(&a.alignment));
    }
}
