//! Named constants shared by the generator stages.

/// Golden ratio.
pub const PHI: f64 = 1.618_033_988_749_895;

pub const SQRT3: f64 = 1.732_050_807_568_877_2;

/// Inverse golden ratio, truncated the way the coherence formula uses it.
pub const PHI_CONJUGATE: f64 = 0.618;

/// Reference frequency in Hz; also the default when a caller gives none.
pub const SCHUMANN_HZ: f64 = 7.83;

pub const FIBONACCI: [u32; 16] = [
    1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144, 233, 377, 610, 987,
];

/// The 3-6-9 table indexed cyclically by the lattice stage.
pub const TRIAD_TABLE: [u32; 16] = [3, 6, 9, 12, 15, 18, 21, 24, 27, 30, 33, 36, 39, 42, 45, 48];

pub const SOLFEGGIO: [u32; 7] = [396, 417, 528, 639, 741, 852, 963];

/// Power nodes a torus snaps to.
pub const POWER_NODES: [u8; 3] = [3, 6, 9];

/// Angular categories (degrees) used by the ring stage.
pub const ANGULAR_CATEGORIES: [(&str, f64); 10] = [
    ("sun", 0.0),
    ("moon", 30.0),
    ("mercury", 60.0),
    ("venus", 90.0),
    ("mars", 120.0),
    ("jupiter", 150.0),
    ("saturn", 180.0),
    ("uranus", 210.0),
    ("neptune", 240.0),
    ("pluto", 270.0),
];
