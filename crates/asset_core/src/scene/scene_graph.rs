//! Scene graph and bounding volumes

use crate::foundation::math::{Mat4, Point3, Transform, Vec3};

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Degenerate box around a single point
    pub fn from_point(point: Vec3) -> Self {
        Self { min: point, max: point }
    }

    /// Smallest box enclosing every point, `None` for an empty iterator
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut aabb = Self::from_point(first);
        for point in points {
            aabb.expand_to_include(point);
        }
        Some(aabb)
    }

    /// Grow the box so it contains `point`
    pub fn expand_to_include(&mut self, point: Vec3) {
        self.min = self.min.inf(&point);
        self.max = self.max.sup(&point);
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full edge length along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Longest edge
    pub fn max_size(&self) -> f32 {
        self.size().max()
    }

    /// True when no corner contains NaN or infinity
    pub fn is_finite(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|v| v.is_finite())
    }
}

/// Raw geometry attached to a node
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    /// Vertex positions in node-local space
    pub positions: Vec<Point3>,
    /// Triangle list into `positions`
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a mesh from positions and triangle indices
    pub fn new(positions: Vec<Point3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// One node of a scene graph: a local transform, optional geometry, children
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneNode {
    /// Debug name (OBJ object/group name, shape name)
    pub name: String,
    /// Transform relative to the parent
    pub transform: Transform,
    /// Geometry owned by this node
    pub mesh: Option<Mesh>,
    /// Child nodes
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Empty node with an identity transform
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Node holding `mesh`
    pub fn with_mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            mesh: Some(mesh),
            ..Default::default()
        }
    }

    /// Builder-style child append
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    fn visit<F: FnMut(&SceneNode, &Mat4)>(&self, parent: &Mat4, f: &mut F) {
        let world = parent * self.transform.to_matrix();
        f(self, &world);
        for child in &self.children {
            child.visit(&world, f);
        }
    }
}

/// A model as a tree of nodes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneGraph {
    /// Root node; its transform places the whole model
    pub root: SceneNode,
}

impl SceneGraph {
    /// Graph with the given root
    pub fn new(root: SceneNode) -> Self {
        Self { root }
    }

    /// World-space bounds of every vertex, `None` when the graph has no geometry
    pub fn bounds(&self) -> Option<AABB> {
        let mut bounds: Option<AABB> = None;
        self.root.visit(&Mat4::identity(), &mut |node, world| {
            let Some(mesh) = &node.mesh else {
                return;
            };
            let node_bounds =
                AABB::from_points(mesh.positions.iter().map(|p| world.transform_point(p).coords));
            bounds = match (bounds, node_bounds) {
                (Some(acc), Some(node)) => Some(acc.union(&node)),
                (acc, node) => acc.or(node),
            };
        });
        bounds
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.root.visit(&Mat4::identity(), &mut |_, _| count += 1);
        count
    }

    /// Total number of vertices across all meshes
    pub fn vertex_count(&self) -> usize {
        let mut count = 0;
        self.root.visit(&Mat4::identity(), &mut |node, _| {
            count += node.mesh.as_ref().map_or(0, |m| m.positions.len());
        });
        count
    }

    /// Total number of triangles across all meshes
    pub fn triangle_count(&self) -> usize {
        let mut count = 0;
        self.root.visit(&Mat4::identity(), &mut |node, _| {
            count += node.mesh.as_ref().map_or(0, Mesh::triangle_count);
        });
        count
    }
}
