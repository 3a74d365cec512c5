//! Deterministic artifact generator.
//!
//! Every stage is a pure function of its seed and parameters: the same inputs
//! always produce byte-identical output, and there is no entropy source
//! anywhere in the crate. Malformed numeric parameters (NaN, infinities) are
//! normalized to the stage default instead of being rejected, so no stage can
//! fail.

pub mod amplify;
pub mod constants;
pub mod digest;
pub mod lattice;
pub mod polyhedron;
pub mod ring;
pub mod ritual;
pub mod rotation;
pub mod toroidal;
pub mod triangles;

pub use amplify::{amplify, Amplification};
pub use lattice::{lattice_field, LatticeField};
pub use polyhedron::{polyhedron_resonance, Element, PolyhedronResonance, Solid};
pub use ring::{ring_pattern, ring_pattern_now, RingPattern};
pub use ritual::suggest_ritual;
pub use rotation::{dual_rotation_field, DualRotationField};
pub use toroidal::{toroidal_field, ToroidalField};
pub use triangles::{interlocking_triangles_field, TriangleField};
