//! Simulated compression heuristic

use crate::assets::{Asset, QualityLevel};

/// Polygon count never drops below this after compression
pub const MIN_POLY_COUNT: u64 = 10_000;

/// Size never drops below this after compression
pub const MIN_SIZE_MB: f64 = 20.0;

/// Shrink an asset's polygon count and size for `level`
///
/// Multiplies the asset's *current* values, so compressing an already
/// compressed asset shrinks it again until the floors are reached. Values
/// below a floor are raised to it.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn compress_asset(asset: &Asset, level: QualityLevel) -> Asset {
    let poly_count = (asset.poly_count as f64 * level.geometry_factor()).round() as u64;
    let size_mb = (asset.size_mb * level.texture_factor()).round();

    Asset {
        poly_count: poly_count.max(MIN_POLY_COUNT),
        size_mb: size_mb.max(MIN_SIZE_MB),
        ..asset.clone()
    }
}
