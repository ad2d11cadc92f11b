//! Quality tiers for simulated compression

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse level-of-detail tier
///
/// Ordered by compression strength: `High < Med < Low`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum QualityLevel {
    /// Lightest compression
    #[default]
    High,
    /// Balanced compression
    Med,
    /// Strongest compression
    Low,
}

impl QualityLevel {
    /// Every tier, weakest compression first
    pub const ALL: [Self; 3] = [Self::High, Self::Med, Self::Low];

    /// Multiplier applied to polygon counts
    pub const fn geometry_factor(self) -> f64 {
        match self {
            Self::High => 0.7,
            Self::Med => 0.4,
            Self::Low => 0.2,
        }
    }

    /// Multiplier applied to texture memory
    pub const fn texture_factor(self) -> f64 {
        match self {
            Self::High => 0.8,
            Self::Med => 0.5,
            Self::Low => 0.25,
        }
    }

    /// Canonical upper-case label
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Med => "MED",
            Self::Low => "LOW",
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text did not name a quality tier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown quality level: {0:?}")]
pub struct ParseQualityError(pub String);

impl FromStr for QualityLevel {
    type Err = ParseQualityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HIGH" => Ok(Self::High),
            "MED" | "MEDIUM" => Ok(Self::Med),
            "LOW" => Ok(Self::Low),
            _ => Err(ParseQualityError(s.to_string())),
        }
    }
}
