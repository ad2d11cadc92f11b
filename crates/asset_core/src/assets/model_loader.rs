//! Resolving shape descriptors into scene graphs
//!
//! Loaders hand out `Arc<SceneGraph>` so several consumers can share one
//! source graph; consumers that need to change it (normalization) work on a
//! copy. Resolving the same descriptor twice must yield an equivalent graph.

use std::cell::RefCell;
use std::collections::HashMap;
use std::f32::consts::{PI, TAU};
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use super::asset::{ModelRef, ProceduralShape, ShapeDescriptor};
use super::obj_loader::{ObjError, ObjLoader};
use crate::foundation::math::{Point3, Vec3};
use crate::scene::{Mesh, SceneGraph, SceneNode};

/// Model loading errors
#[derive(Error, Debug)]
pub enum LoadError {
    /// No search path contains the referenced file
    #[error("Model not found: {0}")]
    NotFound(String),

    /// The file extension has no reader
    #[error("Unsupported model format: {0}")]
    UnsupportedFormat(String),

    /// The loader only handles another kind of descriptor
    #[error("Loader cannot resolve {0:?}")]
    Unsupported(ShapeDescriptor),

    /// OBJ reader failure
    #[error("OBJ error: {0}")]
    Obj(#[from] ObjError),
}

/// Resolves shape descriptors into scene graphs
pub trait ModelLoader {
    /// Build or fetch the graph for `shape`
    fn load(&self, shape: &ShapeDescriptor) -> Result<Arc<SceneGraph>, LoadError>;
}

/// Generates built-in shapes; rejects external references
#[derive(Debug, Clone, Copy, Default)]
pub struct ProceduralLoader;

impl ProceduralLoader {
    /// Build the graph for one built-in shape
    pub fn build(shape: ProceduralShape) -> SceneGraph {
        let (name, mesh) = match shape {
            ProceduralShape::Box => ("box", box_mesh()),
            ProceduralShape::Sphere => ("sphere", sphere_mesh(16, 12)),
            ProceduralShape::TorusKnot => ("torus_knot", torus_knot_mesh(64, 8, 2, 3)),
            ProceduralShape::Icosahedron => ("icosahedron", icosahedron_mesh()),
        };
        SceneGraph::new(SceneNode::new(name).with_child(SceneNode::with_mesh("mesh", mesh)))
    }
}

impl ModelLoader for ProceduralLoader {
    fn load(&self, shape: &ShapeDescriptor) -> Result<Arc<SceneGraph>, LoadError> {
        match shape {
            ShapeDescriptor::Procedural(kind) => Ok(Arc::new(Self::build(*kind))),
            ShapeDescriptor::Model(_) => Err(LoadError::Unsupported(shape.clone())),
        }
    }
}

/// Loads external OBJ models from a list of search paths
///
/// Procedural descriptors are delegated to [`ProceduralLoader`].
#[derive(Debug, Clone)]
pub struct FileModelLoader {
    search_paths: Vec<PathBuf>,
}

impl FileModelLoader {
    /// Loader searching `search_paths` in order
    pub fn new<I, P>(search_paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            search_paths: search_paths.into_iter().map(Into::into).collect(),
        }
    }

    fn resolve(&self, reference: &ModelRef) -> Result<PathBuf, LoadError> {
        let direct = PathBuf::from(reference.as_str());
        self.search_paths
            .iter()
            .map(|dir| dir.join(reference.as_str()))
            .chain(std::iter::once(direct))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| LoadError::NotFound(reference.as_str().to_string()))
    }
}

impl ModelLoader for FileModelLoader {
    fn load(&self, shape: &ShapeDescriptor) -> Result<Arc<SceneGraph>, LoadError> {
        let reference = match shape {
            ShapeDescriptor::Procedural(_) => return ProceduralLoader.load(shape),
            ShapeDescriptor::Model(reference) => reference,
        };

        let path = self.resolve(reference)?;
        let is_obj = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"));
        if !is_obj {
            return Err(LoadError::UnsupportedFormat(path.display().to_string()));
        }

        let graph = ObjLoader::load_obj(&path)?;
        log::info!(
            "Loaded model {} ({} nodes, {} vertices, {} triangles)",
            path.display(),
            graph.node_count(),
            graph.vertex_count(),
            graph.triangle_count()
        );
        Ok(Arc::new(graph))
    }
}

/// Memoizes successful loads of an inner loader
///
/// Failures are not cached, so a later attempt can succeed once the file
/// appears.
pub struct CachedLoader<L> {
    inner: L,
    cache: RefCell<HashMap<ShapeDescriptor, Arc<SceneGraph>>>,
}

impl<L: ModelLoader> CachedLoader<L> {
    /// Wrap `inner`
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }
}

impl<L: ModelLoader> ModelLoader for CachedLoader<L> {
    fn load(&self, shape: &ShapeDescriptor) -> Result<Arc<SceneGraph>, LoadError> {
        if let Some(graph) = self.cache.borrow().get(shape) {
            return Ok(Arc::clone(graph));
        }
        let graph = self.inner.load(shape)?;
        self.cache.borrow_mut().insert(shape.clone(), Arc::clone(&graph));
        Ok(graph)
    }
}

fn box_mesh() -> Mesh {
    let mut positions = Vec::with_capacity(8);
    for i in 0..8u8 {
        let pick = |bit: u8| if i & bit == 0 { -0.5 } else { 0.5 };
        positions.push(Point3::new(pick(1), pick(2), pick(4)));
    }
    let indices = vec![
        0, 2, 1, 1, 2, 3, // -z
        4, 5, 6, 5, 7, 6, // +z
        0, 1, 4, 1, 5, 4, // -y
        2, 6, 3, 3, 6, 7, // +y
        0, 4, 2, 2, 4, 6, // -x
        1, 3, 5, 3, 7, 5, // +x
    ];
    Mesh::new(positions, indices)
}

fn sphere_mesh(segments: u32, rings: u32) -> Mesh {
    let mut positions = Vec::new();
    for ring in 0..=rings {
        let phi = PI * ring as f32 / rings as f32;
        for segment in 0..=segments {
            let theta = TAU * segment as f32 / segments as f32;
            positions.push(Point3::new(
                phi.sin() * theta.cos(),
                phi.cos(),
                phi.sin() * theta.sin(),
            ));
        }
    }
    let stride = segments + 1;
    let mut indices = Vec::new();
    for ring in 0..rings {
        for segment in 0..segments {
            let a = ring * stride + segment;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    Mesh::new(positions, indices)
}

fn torus_knot_mesh(tubular: u32, radial: u32, p: u32, q: u32) -> Mesh {
    const RADIUS: f32 = 1.0;
    const TUBE: f32 = 0.3;

    let curve = |t: f32| {
        let (p, q) = (p as f32, q as f32);
        let r = RADIUS * (2.0 + (q * t).cos()) * 0.5;
        Vec3::new(r * (p * t).cos(), r * (p * t).sin(), RADIUS * (q * t).sin() * 0.5)
    };

    let mut positions = Vec::new();
    for i in 0..=tubular {
        let t = TAU * i as f32 / tubular as f32;
        let here = curve(t);
        let ahead = curve(t + 0.01);
        let tangent = ahead - here;
        // The xy part of the tangent never vanishes, so it is never parallel to z
        let normal = tangent.cross(&Vec3::z()).normalize();
        let binormal = tangent.cross(&normal).normalize();
        for j in 0..=radial {
            let angle = TAU * j as f32 / radial as f32;
            let offset = normal * (TUBE * angle.cos()) + binormal * (TUBE * angle.sin());
            positions.push(Point3::from(here + offset));
        }
    }
    let stride = radial + 1;
    let mut indices = Vec::new();
    for i in 0..tubular {
        for j in 0..radial {
            let a = i * stride + j;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    Mesh::new(positions, indices)
}

fn icosahedron_mesh() -> Mesh {
    let t = (1.0 + 5.0f32.sqrt()) / 2.0;
    let positions = [
        [-1.0, t, 0.0], [1.0, t, 0.0], [-1.0, -t, 0.0], [1.0, -t, 0.0],
        [0.0, -1.0, t], [0.0, 1.0, t], [0.0, -1.0, -t], [0.0, 1.0, -t],
        [t, 0.0, -1.0], [t, 0.0, 1.0], [-t, 0.0, -1.0], [-t, 0.0, 1.0],
    ]
    .iter()
    .map(|c| Point3::new(c[0], c[1], c[2]))
    .collect();
    let indices = vec![
        0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11,
        1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7, 1, 8,
        3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9,
        4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9, 8, 1,
    ];
    Mesh::new(positions, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_procedural_shapes_have_geometry() {
        for shape in [
            ProceduralShape::Box,
            ProceduralShape::Sphere,
            ProceduralShape::TorusKnot,
            ProceduralShape::Icosahedron,
        ] {
            let graph = ProceduralLoader.load(&ShapeDescriptor::Procedural(shape)).unwrap();
            let bounds = graph.bounds().unwrap();
            assert!(bounds.is_finite(), "{shape:?}");
            assert!(bounds.max_size() > 0.0, "{shape:?}");
            assert!(graph.triangle_count() > 0, "{shape:?}");
            for index in graph.root.children[0].mesh.as_ref().unwrap().indices.iter() {
                assert!((*index as usize) < graph.vertex_count(), "{shape:?}");
            }
        }
    }

    #[test]
    fn test_box_is_unit_cube() {
        let graph = ProceduralLoader::build(ProceduralShape::Box);
        let bounds = graph.bounds().unwrap();

        assert_relative_eq!(bounds.size(), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(graph.triangle_count(), 12);
    }

    #[test]
    fn test_repeated_resolution_is_equivalent() {
        let shape = ShapeDescriptor::Procedural(ProceduralShape::TorusKnot);
        let first = ProceduralLoader.load(&shape).unwrap();
        let second = ProceduralLoader.load(&shape).unwrap();
        assert_eq!(*first, *second);
    }

    #[test]
    fn test_procedural_loader_rejects_files() {
        let shape = ShapeDescriptor::Model(ModelRef::new("knight.obj"));
        assert!(matches!(
            ProceduralLoader.load(&shape),
            Err(LoadError::Unsupported(_))
        ));
    }

    #[test]
    fn test_file_loader_uses_search_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tri.obj"), "v 0 0 0\nv 2 0 0\nv 0 2 0\nf 1 2 3\n").unwrap();

        let loader = FileModelLoader::new([PathBuf::from("does/not/exist"), dir.path().to_path_buf()]);
        let graph = loader
            .load(&ShapeDescriptor::Model(ModelRef::new("tri.obj")))
            .unwrap();
        assert_eq!(graph.triangle_count(), 1);

        let procedural = loader
            .load(&ShapeDescriptor::Procedural(ProceduralShape::Box))
            .unwrap();
        assert_eq!(procedural.triangle_count(), 12);
    }

    #[test]
    fn test_file_loader_missing_and_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("model.fbx"), "binary").unwrap();
        let loader = FileModelLoader::new([dir.path()]);

        assert!(matches!(
            loader.load(&ShapeDescriptor::Model(ModelRef::new("missing.obj"))),
            Err(LoadError::NotFound(_))
        ));
        assert!(matches!(
            loader.load(&ShapeDescriptor::Model(ModelRef::new("model.fbx"))),
            Err(LoadError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_cached_loader_shares_graphs() {
        let loader = CachedLoader::new(ProceduralLoader);
        let shape = ShapeDescriptor::Procedural(ProceduralShape::Sphere);

        let first = loader.load(&shape).unwrap();
        let second = loader.load(&shape).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let failed = loader.load(&ShapeDescriptor::Model(ModelRef::new("x.obj")));
        assert!(failed.is_err());
        assert!(loader.cache.borrow().contains_key(&shape));
        assert_eq!(loader.cache.borrow().len(), 1);
    }
}
