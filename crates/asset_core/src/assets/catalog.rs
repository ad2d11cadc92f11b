//! Catalog sources
//!
//! The browser is seeded once from a [`CatalogLoader`]. The seed is treated as
//! read-only; only the compression transition rewrites entries afterwards.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::asset::{Asset, ModelRef, ProceduralShape, ShapeDescriptor};

/// Catalog loading errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Two entries share an id
    #[error("Duplicate asset id: {0}")]
    DuplicateId(String),

    /// An entry breaks the asset invariants
    #[error("Invalid asset {id}: {reason}")]
    InvalidAsset {
        /// Offending asset
        id: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Supplies the initial ordered asset sequence
pub trait CatalogLoader {
    /// Produce the seed catalog
    fn load(&self) -> Result<Vec<Asset>, CatalogError>;
}

/// The four-asset demo catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleCatalog;

impl SampleCatalog {
    /// Build the sample entries
    pub fn assets() -> Vec<Asset> {
        vec![
            Asset {
                id: "crate-01".to_string(),
                name: "Sci-Fi Cargo Crate".to_string(),
                poly_count: 120_000,
                size_mb: 85.0,
                tags: vec!["prop".to_string(), "sci-fi".to_string()],
                created_at: "2024-03-12T09:30:00Z".to_string(),
                shape: ShapeDescriptor::Procedural(ProceduralShape::Box),
                color: Some("#4f8cff".to_string()),
                category: Some("Props".to_string()),
            },
            Asset {
                id: "knight-01".to_string(),
                name: "Armored Knight".to_string(),
                poly_count: 850_000,
                size_mb: 420.0,
                tags: vec!["character".to_string(), "hero".to_string()],
                created_at: "2024-05-02T14:00:00Z".to_string(),
                shape: ShapeDescriptor::Model(ModelRef::new("knight.obj")),
                color: None,
                category: Some("Characters".to_string()),
            },
            Asset {
                id: "rock-01".to_string(),
                name: "Mossy Boulder".to_string(),
                poly_count: 45_000,
                size_mb: 32.5,
                tags: vec!["environment".to_string(), "nature".to_string()],
                created_at: "2023-11-20".to_string(),
                shape: ShapeDescriptor::Procedural(ProceduralShape::Icosahedron),
                color: Some("#7a8b5c".to_string()),
                category: Some("Environment".to_string()),
            },
            Asset {
                id: "knot-01".to_string(),
                name: "Torus Knot Sculpture".to_string(),
                poly_count: 300_000,
                size_mb: 150.0,
                tags: vec!["abstract".to_string(), "art".to_string()],
                created_at: "2024-01-08T18:45:00Z".to_string(),
                shape: ShapeDescriptor::Procedural(ProceduralShape::TorusKnot),
                color: Some("#e0a030".to_string()),
                category: Some("Art".to_string()),
            },
        ]
    }
}

impl CatalogLoader for SampleCatalog {
    fn load(&self) -> Result<Vec<Asset>, CatalogError> {
        Ok(Self::assets())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    assets: Vec<Asset>,
}

/// Catalog stored on disk as RON or TOML, picked by extension
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    /// Catalog backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogLoader for FileCatalog {
    fn load(&self) -> Result<Vec<Asset>, CatalogError> {
        let contents = std::fs::read_to_string(&self.path)?;
        let file: CatalogFile = match extension(&self.path) {
            Some("toml") => {
                toml::from_str(&contents).map_err(|e| CatalogError::Parse(e.to_string()))?
            }
            Some("ron") => {
                ron::from_str(&contents).map_err(|e| CatalogError::Parse(e.to_string()))?
            }
            _ => return Err(CatalogError::UnsupportedFormat(self.path.display().to_string())),
        };
        validate(&file.assets)?;
        log::info!("Loaded {} asset(s) from {}", file.assets.len(), self.path.display());
        Ok(file.assets)
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Check id uniqueness and the non-negative size invariant
pub fn validate(assets: &[Asset]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for asset in assets {
        if !seen.insert(asset.id.as_str()) {
            return Err(CatalogError::DuplicateId(asset.id.clone()));
        }
        if !asset.size_mb.is_finite() || asset.size_mb < 0.0 {
            return Err(CatalogError::InvalidAsset {
                id: asset.id.clone(),
                reason: format!("size_mb must be a non-negative number, got {}", asset.size_mb),
            });
        }
    }
    Ok(())
}
