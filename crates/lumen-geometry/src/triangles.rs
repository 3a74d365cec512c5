use serde::Serialize;

use crate::digest::{head, sha256_hex};

pub const TRIANGLE_COUNT: usize = 9;

/// Nine interlocking triangles around a central point.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TriangleField {
    pub seed: String,
    pub triangles: Vec<String>,
    pub center: String,
    pub circuits: Vec<String>,
    pub code: String,
}

impl TriangleField {
    pub fn innermost(&self) -> &str {
        &self.triangles[0]
    }

    pub fn outermost(&self) -> &str {
        &self.triangles[TRIANGLE_COUNT - 1]
    }
}

/// Even-indexed triangles take the descending role, odd ones the ascending
/// role. Each circuit binds one triangle to the centre.
pub fn interlocking_triangles_field(seed: &str) -> TriangleField {
    let triangles: Vec<String> = (0..TRIANGLE_COUNT)
        .map(|i| {
            let role = if i % 2 == 0 { "down" } else { "up" };
            head(&sha256_hex(&format!("{seed}{role}{i}")), 8)
        })
        .collect();

    let center = head(&sha256_hex(&format!("{seed}center")), 9);

    let circuits = triangles
        .iter()
        .map(|t| head(&sha256_hex(&format!("{t}{center}")), 6))
        .collect();

    let code = format!(
        "{}-{}-{}",
        &center[..3],
        &triangles[0][..3],
        &triangles[TRIANGLE_COUNT - 1][..3]
    );

    TriangleField {
        seed: seed.to_owned(),
        triangles,
        center,
        circuits,
        code,
    }
}
