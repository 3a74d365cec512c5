use sha2::{Digest, Sha256};

const RITUALS: [&str; 5] = [
    "Place a crystal near your space as you hold this intention.",
    "Light a candle and speak the intention aloud three times.",
    "Whisper the intention into a glass of water, then drink it mindfully.",
    "Write the intention on paper and keep it near you while sleeping.",
    "Speak the intention into the wind or while touching a plant.",
];

/// Pick an anchoring ritual for a seed. The same seed always gets the same
/// suggestion.
pub fn suggest_ritual(seed: &str) -> &'static str {
    let digest = Sha256::digest(seed.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    RITUALS[(u64::from_be_bytes(prefix) % RITUALS.len() as u64) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_per_seed() {
        assert_eq!(suggest_ritual("I am calm"), suggest_ritual("I am calm"));
        assert!(RITUALS.contains(&suggest_ritual("anything")));
    }

    #[test]
    fn covers_more_than_one_ritual() {
        let picked: std::collections::HashSet<&str> =
            (0..50).map(|i| suggest_ritual(&format!("seed {i}"))).collect();
        assert!(picked.len() > 1);
    }
}
