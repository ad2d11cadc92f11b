//! Catalog entries

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Built-in shapes generated without any model file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProceduralShape {
    /// Unit cube
    Box,
    /// UV sphere
    Sphere,
    /// (2,3) torus knot
    TorusKnot,
    /// Regular icosahedron
    Icosahedron,
}

/// Reference to an external model file, resolved by a model loader
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelRef(pub String);

impl ModelRef {
    /// Create a reference from a path-like string
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The referenced path
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// What the viewer shows for an asset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeDescriptor {
    /// Generated geometry
    Procedural(ProceduralShape),
    /// Geometry loaded from a file
    Model(ModelRef),
}

/// One entry of the asset catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Stable unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Triangle count
    pub poly_count: u64,
    /// Texture and geometry footprint in megabytes
    pub size_mb: f64,
    /// Free-form labels, in catalog order
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation timestamp as supplied by the catalog
    pub created_at: String,
    /// Geometry source
    pub shape: ShapeDescriptor,
    /// Display tint, e.g. `"#4f8cff"`
    #[serde(default)]
    pub color: Option<String>,
    /// Catalog section
    #[serde(default)]
    pub category: Option<String>,
}

impl Asset {
    /// Parsed creation instant, `None` when the timestamp is unreadable
    pub fn created_instant(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (UTC midnight)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let parsed = parse_timestamp("2024-03-12T10:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 12, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_bare_date() {
        let parsed = parse_timestamp("2023-11-20").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 11, 20, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_timestamp("last tuesday"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2024-13-45"), None);
    }
}
