//! Fit arbitrary models into the canonical viewing box

use super::scene_graph::SceneGraph;
use crate::foundation::math::{Transform, Vec3};

/// Side length of the canonical box
pub const DEFAULT_TARGET_SIZE: f32 = 1.5;

/// Centering translation and uniform scale for one source model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedModel {
    /// Negated center of the measured bounds
    pub translation: Vec3,
    /// Uniform scale mapping the largest extent onto the target size
    pub scale: f32,
    /// False when the graph had no measurable geometry
    pub bounds_valid: bool,
}

impl NormalizedModel {
    /// Root transform applying the translation first, then the scale
    ///
    /// A vertex `v` lands at `scale * (v + translation)`.
    pub fn root_transform(&self) -> Transform {
        Transform::from_position_uniform_scale(self.translation * self.scale, self.scale)
    }

    /// Measure a graph whose root transform is already identity
    fn measure(graph: &SceneGraph, target_size: f32) -> Self {
        match graph.bounds().filter(|b| b.is_finite()) {
            Some(bounds) => {
                let largest = bounds.max_size();
                let extent = if largest > 0.0 { largest } else { 1.0 };
                Self {
                    translation: -bounds.center(),
                    scale: target_size / extent,
                    bounds_valid: true,
                }
            }
            None => {
                log::warn!("Model '{}' has no measurable bounds, using unit extent", graph.root.name);
                Self {
                    translation: Vec3::zeros(),
                    scale: target_size,
                    bounds_valid: false,
                }
            }
        }
    }
}

/// Normalize `source` into a box of side `target_size` centered on the origin
///
/// The source is never touched: the work happens on a deep copy whose root
/// transform is reset to identity before measuring. Returns the transformed
/// copy together with the translation and scale that were applied.
pub fn normalize(source: &SceneGraph, target_size: f32) -> (SceneGraph, NormalizedModel) {
    let mut graph = source.clone();
    graph.root.transform = Transform::identity();

    let model = NormalizedModel::measure(&graph, target_size);
    graph.root.transform = model.root_transform();
    log::debug!(
        "Normalized '{}': translation {:?}, scale {}",
        graph.root.name,
        model.translation,
        model.scale
    );

    (graph, model)
}
