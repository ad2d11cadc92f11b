//! Scene graphs and model normalization
//!
//! Models arrive from a [`ModelLoader`](crate::assets::ModelLoader) as a tree
//! of [`SceneNode`]s. Before display every model is fitted into a canonical
//! box centered on the origin:
//!
//! ```text
//! shared source graph (Arc, never mutated)
//!      ↓ deep copy, root reset to identity
//! world-space AABB over every vertex
//!      ↓
//! translation = -center, scale = target / largest extent
//! ```

mod scene_graph;
mod normalize;

pub use scene_graph::{Mesh, SceneGraph, SceneNode, AABB};
pub use normalize::{normalize, NormalizedModel, DEFAULT_TARGET_SIZE};
