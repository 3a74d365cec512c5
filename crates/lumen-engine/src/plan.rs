//! Per-kind broadcast plans.
//!
//! A plan is built once when a worker starts. It runs the generator stages
//! its kind needs, fixes the duration and cadence, and afterwards only
//! combines those precomputed artifacts with the tick counter.

use chrono::NaiveTime;
use lumen_geometry::constants::SCHUMANN_HZ;
use lumen_geometry::digest::{sha256_hex, sha512_hex};
use lumen_geometry::{
    amplify, dual_rotation_field, interlocking_triangles_field, lattice_field,
    polyhedron_resonance, ring_pattern, suggest_ritual, toroidal_field, Amplification,
    DualRotationField, LatticeField, PolyhedronResonance, RingPattern, Solid, ToroidalField,
    TriangleField,
};
use serde_json::{json, Value};

use crate::session::{Fields, Schedule, SessionKind, SessionRequest};

const DEFAULT_DURATION_SECS: u64 = 60;
const BLESSING_FREQUENCY: f64 = 5.55;
const BLESSING_BASE_DURATION: u64 = 120;
const AUTO_RESONANCE_DURATION: u64 = 150;
const HARMONIZATION_DURATION: u64 = 180;
const PAST_LIFE_FREQUENCY: f64 = 3.0;
const PAST_LIFE_DURATION: u64 = 120;

/// Characters of a pulse digest kept as `last_pulse`.
const PULSE_LEN: usize = 16;

/// Output of one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Pulse {
    pub digest: String,
    pub fields: Fields,
}

pub trait BroadcastPlan: Send + Sync {
    /// Total run time of the session.
    fn duration_secs(&self) -> u64;

    /// Tick cadence in Hz. Zero means "as fast as the minimum interval".
    fn frequency(&self) -> f64;

    fn iterations_per_tick(&self) -> u64 {
        1
    }

    /// Fields the record carries from the moment it is created.
    fn initial_fields(&self) -> Fields;

    fn pulse(&self, tick: u64) -> Pulse;

    fn schedule(&self) -> Schedule {
        Schedule {
            duration_secs: self.duration_secs(),
            frequency: self.frequency(),
            fields: self.initial_fields(),
        }
    }
}

/// Build the plan for `request` as of local time of day `at`.
pub fn plan_for(request: &SessionRequest, at: NaiveTime) -> Box<dyn BroadcastPlan> {
    match request.kind {
        SessionKind::Generic => Box::new(GenericPlan::new(request, at)),
        SessionKind::Scalar => Box::new(ScalarPlan::new(request)),
        SessionKind::Blessing => Box::new(BlessingPlan::new(&request.seed, at)),
        SessionKind::AutoResonance => Box::new(AutoResonancePlan::new(&request.seed)),
        SessionKind::Harmonization => Box::new(HarmonizationPlan::new(&request.seed, at)),
        SessionKind::PastLife => Box::new(PastLifePlan::new(&request.seed)),
    }
}

fn to_fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}

fn head(hex: &str, n: usize) -> &str {
    &hex[..n.min(hex.len())]
}

fn positive_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => default,
    }
}

fn sha256_pulse(input: &str) -> String {
    head(&sha256_hex(input), PULSE_LEN).to_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Generic
// ─────────────────────────────────────────────────────────────────────────────

pub struct GenericPlan {
    seed: String,
    boost: bool,
    cadence: f64,
    duration: u64,
    lattice: LatticeField,
    amplification: Amplification,
    rotation: DualRotationField,
    torus: ToroidalField,
    ring: RingPattern,
    triad_sequence: String,
}

impl GenericPlan {
    pub fn new(request: &SessionRequest, at: NaiveTime) -> Self {
        let seed = request.seed.as_str();
        let cadence = positive_or(request.frequency, 0.0);
        let stage_frequency = if cadence > 0.0 { cadence } else { SCHUMANN_HZ };
        let requested = request.duration_secs.unwrap_or(DEFAULT_DURATION_SECS);

        let lattice = lattice_field(seed, request.boost);
        let h = u32::from(lattice.harmonic);
        Self {
            seed: seed.to_owned(),
            boost: request.boost,
            cadence,
            duration: requested,
            amplification: amplify(seed, request.multiplier.unwrap_or(1.0)),
            rotation: dual_rotation_field(seed, stage_frequency),
            torus: toroidal_field(seed, stage_frequency),
            ring: ring_pattern(seed, requested, at),
            triad_sequence: format!("{}-{}-{}", h * 3, h * 6, h * 9),
            lattice,
        }
    }
}

impl BroadcastPlan for GenericPlan {
    // Runs for exactly the requested time; the ring's stretched duration is
    // only reported.
    fn duration_secs(&self) -> u64 {
        self.duration
    }

    fn frequency(&self) -> f64 {
        self.cadence
    }

    fn iterations_per_tick(&self) -> u64 {
        u64::from(self.amplification.multiplier)
    }

    fn initial_fields(&self) -> Fields {
        to_fields(json!({
            "alignment": self.lattice.harmonic,
            "activationKey": self.lattice.activation_key,
            "cosmicAlignment": self.ring.alignment,
            "torusFrequency": self.torus.frequency,
            "baseRatio": self.torus.base_ratio,
            "rotationCode": self.rotation.activation_code,
            "optimalDuration": self.ring.optimal_duration,
            "suggestedRitual": suggest_ritual(&self.seed),
        }))
    }

    fn pulse(&self, tick: u64) -> Pulse {
        let base = if self.boost {
            &self.lattice.code
        } else {
            &self.amplification.chain_digest
        };
        let input = format!(
            "{base}{seed}{asc}{desc}{inner}{outer}{triad}:{tick}",
            seed = self.seed,
            asc = self.rotation.ascending,
            desc = self.rotation.descending,
            inner = self.torus.inner_flow,
            outer = self.torus.outer_flow,
            triad = self.triad_sequence,
        );
        let digest = sha512_hex(&input).to_uppercase();
        Pulse {
            digest: head(&digest, PULSE_LEN).to_owned(),
            fields: to_fields(json!({ "triadPulse": self.triad_sequence })),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scalar
// ─────────────────────────────────────────────────────────────────────────────

pub struct ScalarPlan {
    seed: String,
    frequency: f64,
    duration: u64,
    torus: ToroidalField,
    triangles: TriangleField,
    resonance: PolyhedronResonance,
}

impl ScalarPlan {
    pub fn new(request: &SessionRequest) -> Self {
        let seed = request.seed.as_str();
        let frequency = positive_or(request.frequency, SCHUMANN_HZ);
        Self {
            seed: seed.to_owned(),
            frequency,
            duration: request.duration_secs.unwrap_or(DEFAULT_DURATION_SECS),
            torus: toroidal_field(seed, frequency),
            triangles: interlocking_triangles_field(seed),
            resonance: polyhedron_resonance(seed, Solid::Dodecahedron),
        }
    }
}

impl BroadcastPlan for ScalarPlan {
    fn duration_secs(&self) -> u64 {
        self.duration
    }

    fn frequency(&self) -> f64 {
        self.frequency
    }

    fn initial_fields(&self) -> Fields {
        to_fields(json!({
            "triangleCode": self.triangles.code,
            "element": self.resonance.element.as_str(),
            "elementFrequency": self.resonance.element_frequency,
            "activationCode": self.resonance.activation_code,
            "coherence": self.torus.coherence,
            "powerNode": self.torus.power_node,
        }))
    }

    fn pulse(&self, tick: u64) -> Pulse {
        let flow = head(&self.torus.inner_flow, (tick % 12) as usize + 1);
        let triangle = &self.triangles.triangles[(tick as usize) % self.triangles.triangles.len()];
        let center_pulse = format!("{}{}", head(&self.triangles.center, 3), head(triangle, 3));
        let node = u32::from(self.torus.power_node);
        let input = format!(
            "{flow}{center_pulse}{resonance}{seed}:{tick}",
            resonance = self.resonance.resonance_pattern,
            seed = self.seed,
        );
        Pulse {
            digest: sha256_pulse(&input),
            fields: to_fields(json!({
                "centerPulse": center_pulse,
                "triadSequence": format!("{}-{}-{}", node, node * 2, node * 3),
            })),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Blessing
// ─────────────────────────────────────────────────────────────────────────────

pub struct BlessingPlan {
    seed: String,
    ring: RingPattern,
    resonance: PolyhedronResonance,
    amplification: Amplification,
}

impl BlessingPlan {
    pub fn new(seed: &str, at: NaiveTime) -> Self {
        Self {
            seed: seed.to_owned(),
            ring: ring_pattern(seed, BLESSING_BASE_DURATION, at),
            resonance: polyhedron_resonance(seed, Solid::Icosahedron),
            amplification: amplify(seed, 1.0),
        }
    }
}

impl BroadcastPlan for BlessingPlan {
    fn duration_secs(&self) -> u64 {
        self.ring.optimal_duration
    }

    fn frequency(&self) -> f64 {
        BLESSING_FREQUENCY
    }

    fn initial_fields(&self) -> Fields {
        to_fields(json!({
            "cosmicAlignment": self.ring.alignment,
            "ringPattern": head(&self.ring.pattern, 20),
            "element": self.resonance.element.as_str(),
            "elementFrequency": self.resonance.element_frequency,
            "chainAmplification": true,
        }))
    }

    fn pulse(&self, tick: u64) -> Pulse {
        let input = format!(
            "{junction}{resonance}{chain}{seed}:{tick}",
            junction = self.ring.junction_code,
            resonance = self.resonance.resonance_pattern,
            chain = head(&self.amplification.chain_digest, 12),
            seed = self.seed,
        );
        Pulse {
            digest: sha256_pulse(&input),
            fields: to_fields(json!({ "blessingPattern": self.ring.junction_code })),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Auto-resonance
// ─────────────────────────────────────────────────────────────────────────────

pub struct AutoResonancePlan {
    seed: String,
    triangles: TriangleField,
    resonance: PolyhedronResonance,
    lattice: LatticeField,
}

impl AutoResonancePlan {
    pub fn new(seed: &str) -> Self {
        Self {
            seed: seed.to_owned(),
            triangles: interlocking_triangles_field(seed),
            resonance: polyhedron_resonance(seed, Solid::Octahedron),
            lattice: lattice_field(seed, false),
        }
    }
}

impl BroadcastPlan for AutoResonancePlan {
    fn duration_secs(&self) -> u64 {
        AUTO_RESONANCE_DURATION
    }

    fn frequency(&self) -> f64 {
        SCHUMANN_HZ
    }

    fn initial_fields(&self) -> Fields {
        to_fields(json!({
            "centerPoint": self.triangles.center,
            "element": self.resonance.element.as_str(),
            "elementFrequency": self.resonance.element_frequency,
            "harmonic": self.lattice.harmonic,
        }))
    }

    fn pulse(&self, tick: u64) -> Pulse {
        let center = head(&self.triangles.center, 6);
        let input = format!(
            "{center}{resonance}{key}{seed}:{tick}",
            resonance = self.resonance.resonance_pattern,
            key = self.lattice.activation_key,
            seed = self.seed,
        );
        Pulse {
            digest: sha256_pulse(&input),
            fields: to_fields(json!({
                "centerActivation": center,
                "latticeKey": self.lattice.activation_key,
            })),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Harmonization
// ─────────────────────────────────────────────────────────────────────────────

pub struct HarmonizationPlan {
    torus: ToroidalField,
    ring: RingPattern,
    resonance: PolyhedronResonance,
    lattice: LatticeField,
}

impl HarmonizationPlan {
    pub fn new(seed: &str, at: NaiveTime) -> Self {
        Self {
            torus: toroidal_field(seed, SCHUMANN_HZ),
            ring: ring_pattern(seed, HARMONIZATION_DURATION, at),
            resonance: polyhedron_resonance(seed, Solid::Hexahedron),
            lattice: lattice_field(seed, false),
        }
    }
}

impl BroadcastPlan for HarmonizationPlan {
    // Fixed run time; the ring's optimal duration is reported but not applied.
    fn duration_secs(&self) -> u64 {
        HARMONIZATION_DURATION
    }

    fn frequency(&self) -> f64 {
        SCHUMANN_HZ
    }

    fn initial_fields(&self) -> Fields {
        to_fields(json!({
            "junctionCode": self.ring.junction_code,
            "cosmicAlignment": self.ring.alignment,
            "element": self.resonance.element.as_str(),
            "elementFrequency": self.resonance.element_frequency,
            "latticeKey": self.lattice.activation_key,
        }))
    }

    fn pulse(&self, tick: u64) -> Pulse {
        let input = format!(
            "{flow}{ring}{resonance}{key}:{tick}",
            flow = head(&self.torus.inner_flow, 6),
            ring = head(&self.ring.pattern, 6),
            resonance = self.resonance.resonance_pattern,
            key = self.lattice.activation_key,
        );
        Pulse {
            digest: sha256_pulse(&input),
            fields: Fields::new(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Past life
// ─────────────────────────────────────────────────────────────────────────────

pub struct PastLifePlan {
    seed: String,
    amplification: Amplification,
}

impl PastLifePlan {
    pub fn new(seed: &str) -> Self {
        Self {
            seed: seed.to_owned(),
            amplification: amplify(seed, 1.0),
        }
    }
}

impl BroadcastPlan for PastLifePlan {
    fn duration_secs(&self) -> u64 {
        PAST_LIFE_DURATION
    }

    fn frequency(&self) -> f64 {
        PAST_LIFE_FREQUENCY
    }

    fn initial_fields(&self) -> Fields {
        to_fields(json!({ "alignment": self.amplification.alignment }))
    }

    fn pulse(&self, tick: u64) -> Pulse {
        let digest = sha512_hex(&format!("{}:{tick}", self.seed));
        Pulse {
            digest: head(&digest, 12).to_owned(),
            fields: Fields::new(),
        }
    }
}
