use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::digest::{char_code_sum, head, sha256_hex};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
    Ether,
}

impl Element {
    pub fn frequency(self) -> u32 {
        match self {
            Self::Fire => 396,
            Self::Earth => 417,
            Self::Air => 528,
            Self::Water => 639,
            Self::Ether => 741,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Earth => "earth",
            Self::Air => "air",
            Self::Water => "water",
            Self::Ether => "ether",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Solid {
    Tetrahedron,
    Hexahedron,
    Octahedron,
    #[default]
    Dodecahedron,
    Icosahedron,
}

/// Vertex, edge and face counts of a solid plus its element tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolidProperties {
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
    pub element: Element,
}

impl Solid {
    pub const ALL: [Solid; 5] = [
        Self::Tetrahedron,
        Self::Hexahedron,
        Self::Octahedron,
        Self::Dodecahedron,
        Self::Icosahedron,
    ];

    pub fn properties(self) -> SolidProperties {
        let (vertices, edges, faces, element) = match self {
            Self::Tetrahedron => (4, 6, 4, Element::Fire),
            Self::Hexahedron => (8, 12, 6, Element::Earth),
            Self::Octahedron => (6, 12, 8, Element::Air),
            Self::Dodecahedron => (20, 30, 12, Element::Ether),
            Self::Icosahedron => (12, 30, 20, Element::Water),
        };
        SolidProperties {
            vertices,
            edges,
            faces,
            element,
        }
    }

    /// Parse a solid name, falling back to the default for anything unknown.
    pub fn parse_or_default(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Stable solid choice for a seed, used to bucket seeds by element.
    pub fn for_seed(seed: &str) -> Self {
        Self::ALL[(char_code_sum(seed) % Self::ALL.len() as u64) as usize]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tetrahedron => "tetrahedron",
            Self::Hexahedron => "hexahedron",
            Self::Octahedron => "octahedron",
            Self::Dodecahedron => "dodecahedron",
            Self::Icosahedron => "icosahedron",
        }
    }
}

impl FromStr for Solid {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tetrahedron" => Ok(Self::Tetrahedron),
            "hexahedron" | "cube" => Ok(Self::Hexahedron),
            "octahedron" => Ok(Self::Octahedron),
            "dodecahedron" => Ok(Self::Dodecahedron),
            "icosahedron" => Ok(Self::Icosahedron),
            other => Err(format!("unknown solid: {other}")),
        }
    }
}

impl fmt::Display for Solid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const EXPOSED: usize = 5;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PolyhedronResonance {
    pub seed: String,
    pub solid: Solid,
    pub element: Element,
    pub vertices: Vec<String>,
    /// First five edge artifacts.
    pub edges: Vec<String>,
    /// First five face artifacts.
    pub faces: Vec<String>,
    pub element_frequency: u32,
    pub activation_code: String,
    pub resonance_pattern: String,
}

/// Resonate `seed` through a solid: one artifact per vertex, then per edge
/// (joining adjacent vertices), then per face (joining an edge with the seed).
pub fn polyhedron_resonance(seed: &str, solid: Solid) -> PolyhedronResonance {
    let props = solid.properties();

    let vertices: Vec<String> = (0..props.vertices)
        .map(|i| head(&sha256_hex(&format!("{seed}v{i}")), 6))
        .collect();

    let edges: Vec<String> = (0..props.edges)
        .map(|i| {
            let a = &vertices[i % vertices.len()];
            let b = &vertices[(i + 1) % vertices.len()];
            head(&sha256_hex(&format!("{a}{b}")), 4)
        })
        .collect();

    let faces: Vec<String> = (0..props.faces)
        .map(|i| head(&sha256_hex(&format!("{}{seed}", edges[i % edges.len()])), 6))
        .collect();

    let element_frequency = props.element.frequency();
    let activation_code = format!("{element_frequency}-{}{}", props.vertices, props.faces);
    let resonance_pattern = format!("{}-{}-{}", vertices[0], edges[0], faces[0]);

    PolyhedronResonance {
        seed: seed.to_owned(),
        solid,
        element: props.element,
        vertices,
        edges: edges.into_iter().take(EXPOSED).collect(),
        faces: faces.into_iter().take(EXPOSED).collect(),
        element_frequency,
        activation_code,
        resonance_pattern,
    }
}
