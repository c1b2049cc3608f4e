use chrono::{DateTime, Utc};

/// A (lon, lat) vertex of a footprint ring.
pub type Vertex = (f64, f64);

/// A closed or open linear ring of vertices.
pub type Ring = Vec<Vertex>;

/// Ground-projected outline of a scene.
#[derive(Clone, Debug, PartialEq)]
pub enum Footprint {
    /// GeoJSON Polygon: first ring is the exterior, the rest are holes.
    Polygon(Vec<Ring>),
    /// Any other geometry type, kept by name so matching can reject it.
    Unsupported(String),
}

impl Footprint {
    /// The exterior ring, if this is a polygon with at least one ring.
    pub fn exterior(&self) -> Option<&Ring> {
        match self {
            Self::Polygon(rings) => rings.first(),
            Self::Unsupported(_) => None,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            Self::Polygon(_) => "Polygon",
            Self::Unsupported(name) => name,
        }
    }
}

/// One observed scene, as supplied by the catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneMetadata {
    pub id: String,
    pub satellite_id: String,
    pub strip_id: String,
    pub provider: String,
    pub acquired_at: DateTime<Utc>,
    pub footprint: Footprint,
}

impl SceneMetadata {
    /// Absolute acquisition time difference to another scene, in seconds.
    pub fn time_gap_secs(&self, other: &SceneMetadata) -> f64 {
        let delta = self.acquired_at - other.acquired_at;
        let micros = delta
            .num_microseconds()
            .unwrap_or_else(|| delta.num_milliseconds().saturating_mul(1_000));
        (micros as f64 / 1e6).abs()
    }
}

/// Two scenes of the same footprint captured moments apart.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenePair {
    pub first: SceneMetadata,
    pub second: SceneMetadata,
}

impl ScenePair {
    pub fn ids(&self) -> (&str, &str) {
        (&self.first.id, &self.second.id)
    }
}
