//! Scene metadata ingestion from GeoJSON search results.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::error::{Result, ScenePairError};
use crate::scene::{Footprint, Ring, SceneMetadata};

/// Source of scene metadata records.
pub trait Catalog {
    fn scenes(&self) -> Result<Vec<SceneMetadata>>;
}

/// Scenes from a saved search result on disk.
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Catalog for FileCatalog {
    fn scenes(&self) -> Result<Vec<SceneMetadata>> {
        let contents = std::fs::read_to_string(&self.path)?;
        let value: Value = serde_json::from_str(&contents)?;
        parse_feature_collection(&value)
    }
}

/// Scenes already held in memory.
#[derive(Default)]
pub struct MemoryCatalog {
    scenes: Vec<SceneMetadata>,
}

impl MemoryCatalog {
    pub fn new(scenes: Vec<SceneMetadata>) -> Self {
        Self { scenes }
    }
}

impl Catalog for MemoryCatalog {
    fn scenes(&self) -> Result<Vec<SceneMetadata>> {
        Ok(self.scenes.clone())
    }
}

/// Parse a FeatureCollection, a `{"features": [...]}` page, or a bare array
/// of features.
pub fn parse_feature_collection(value: &Value) -> Result<Vec<SceneMetadata>> {
    let features = match value {
        Value::Array(items) => items,
        Value::Object(obj) => obj
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| invalid("expected a \"features\" array"))?,
        _ => return Err(invalid("expected a feature collection or array")),
    };

    features.iter().map(parse_feature).collect()
}

/// Parse a single GeoJSON feature into a scene record.
pub fn parse_feature(value: &Value) -> Result<SceneMetadata> {
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("feature has no string \"id\""))?
        .to_string();

    let props = value
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| invalid(format!("{id}: missing \"properties\"")))?;

    let text = |key: &str| -> Result<String> {
        match props.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            _ => Err(invalid(format!("{id}: missing properties.{key}"))),
        }
    };

    let satellite_id = text("satellite_id")?;
    let strip_id = text("strip_id")?;
    let provider = text("provider")?;
    let acquired = text("acquired")?;
    let acquired_at = parse_timestamp(&acquired)
        .ok_or_else(|| invalid(format!("{id}: unparseable acquired time {acquired:?}")))?;

    let geometry = value
        .get("geometry")
        .ok_or_else(|| invalid(format!("{id}: missing \"geometry\"")))?;
    let footprint = parse_geometry(geometry).map_err(|msg| invalid(format!("{id}: {msg}")))?;

    Ok(SceneMetadata {
        id,
        satellite_id,
        strip_id,
        provider,
        acquired_at,
        footprint,
    })
}

/// RFC 3339 with offset, or a naive ISO-8601 date-time taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(t.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn parse_geometry(geometry: &Value) -> std::result::Result<Footprint, String> {
    let kind = geometry
        .get("type")
        .and_then(Value::as_str)
        .ok_or("geometry has no \"type\"")?;

    if kind != "Polygon" {
        return Ok(Footprint::Unsupported(kind.to_string()));
    }

    let rings = geometry
        .get("coordinates")
        .and_then(Value::as_array)
        .ok_or("polygon has no coordinates")?
        .iter()
        .map(parse_ring)
        .collect::<std::result::Result<Vec<Ring>, String>>()?;

    Ok(Footprint::Polygon(rings))
}

fn parse_ring(ring: &Value) -> std::result::Result<Ring, String> {
    ring.as_array()
        .ok_or("polygon ring is not an array")?
        .iter()
        .map(|pos| -> std::result::Result<(f64, f64), String> {
            let coords = pos.as_array().ok_or("position is not an array")?;
            match (
                coords.first().and_then(Value::as_f64),
                coords.get(1).and_then(Value::as_f64),
            ) {
                (Some(lon), Some(lat)) => Ok((lon, lat)),
                _ => Err("position needs numeric lon, lat".to_string()),
            }
        })
        .collect()
}

fn invalid(msg: impl Into<String>) -> ScenePairError {
    ScenePairError::InvalidMetadata(msg.into())
}
