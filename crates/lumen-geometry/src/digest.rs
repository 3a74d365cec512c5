//! Hash and arithmetic helpers shared by the stages.

use sha2::{Digest, Sha256, Sha512};

pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn sha512_hex(input: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// First `n` characters of a hex digest.
pub(crate) fn head(hex: &str, n: usize) -> String {
    hex[..n.min(hex.len())].to_owned()
}

/// Sum of the seed's Unicode scalar values.
pub fn char_code_sum(seed: &str) -> u64 {
    seed.chars().map(|c| u64::from(u32::from(c))).sum()
}

/// Reduce a sum into `1..=9`, mapping a zero remainder to 9.
pub fn nonzero_mod9(sum: u64) -> u8 {
    match (sum % 9) as u8 {
        0 => 9,
        r => r,
    }
}

/// Replace a non-finite parameter with the stage default.
pub(crate) fn finite_or(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        default
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Floored modulo: the result carries the sign of the divisor.
pub(crate) fn floor_mod(value: f64, modulus: f64) -> f64 {
    let r = value.rem_euclid(modulus);
    // rem_euclid can round up to the modulus itself for tiny negatives
    if r >= modulus || r.is_nan() {
        0.0
    } else {
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digests_are_lowercase_hex() {
        assert_eq!(sha256_hex("").len(), 64);
        assert_eq!(sha512_hex("").len(), 128);
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn nonzero_mod9_never_zero() {
        assert_eq!(nonzero_mod9(0), 9);
        assert_eq!(nonzero_mod9(18), 9);
        assert_eq!(nonzero_mod9(10), 1);
    }

    #[test]
    fn floor_mod_matches_python_semantics() {
        assert_eq!(floor_mod(-1.0, 9.0), 8.0);
        assert_eq!(floor_mod(10.5, 10.0), 0.5);
        assert_eq!(floor_mod(-1e-20, 360.0), 0.0);
    }

    #[test]
    fn char_code_sum_counts_unicode_scalars() {
        assert_eq!(char_code_sum("ab"), 97 + 98);
        assert_eq!(char_code_sum("–"), 0x2013);
    }
}
