//! OBJ file loader for 3D models
//!
//! Every `o`/`g` statement opens a new child node; geometry before the first
//! statement lands in a node named `default`. Only positions and faces matter
//! for browsing, normals and texture coordinates are skipped.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::foundation::math::Point3;
use crate::scene::{Mesh, SceneGraph, SceneNode};

/// OBJ parsing errors
#[derive(Error, Debug)]
pub enum ObjError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed number or index
    #[error("Parse error on line {line}: {message}")]
    ParseError {
        /// 1-based line number
        line: usize,
        /// What failed to parse
        message: String,
    },
    /// Structurally unusable file
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

#[derive(Default)]
struct Group {
    name: String,
    positions: Vec<Point3>,
    indices: Vec<u32>,
    remap: HashMap<usize, u32>,
}

impl Group {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn local_index(&mut self, global: usize, positions: &[Point3]) -> Result<u32, ObjError> {
        if let Some(&local) = self.remap.get(&global) {
            return Ok(local);
        }
        let local = mesh_index(self.positions.len())?;
        self.positions.push(positions[global]);
        self.remap.insert(global, local);
        Ok(local)
    }

    fn into_node(self) -> SceneNode {
        SceneNode::with_mesh(self.name, Mesh::new(self.positions, self.indices))
    }
}

/// Wavefront OBJ reader producing scene graphs
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file; the root node is named after the file stem
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<SceneGraph, ObjError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("model");
        let file = File::open(path)?;
        Self::parse(name, BufReader::new(file))
    }

    /// Parse OBJ text from any buffered reader
    pub fn parse<R: BufRead>(name: &str, reader: R) -> Result<SceneGraph, ObjError> {
        let mut positions: Vec<Point3> = Vec::new();
        let mut groups: Vec<Group> = Vec::new();
        let mut current = Group::named("default");

        for (line_index, line) in reader.lines().enumerate() {
            let line_number = line_index + 1;
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts[0] {
                "v" => {
                    if parts.len() < 4 {
                        return Err(ObjError::ParseError {
                            line: line_number,
                            message: "vertex needs three coordinates".to_string(),
                        });
                    }
                    let mut coords = [0.0f32; 3];
                    for (slot, raw) in coords.iter_mut().zip(&parts[1..4]) {
                        *slot = raw.parse().map_err(|_| ObjError::ParseError {
                            line: line_number,
                            message: format!("invalid coordinate {raw:?}"),
                        })?;
                    }
                    positions.push(Point3::new(coords[0], coords[1], coords[2]));
                }
                "o" | "g" => {
                    let next = Group::named(parts.get(1).copied().unwrap_or("unnamed"));
                    let finished = std::mem::replace(&mut current, next);
                    if !finished.indices.is_empty() {
                        groups.push(finished);
                    }
                }
                "f" => {
                    if parts.len() < 4 {
                        return Err(ObjError::ParseError {
                            line: line_number,
                            message: "face needs at least three vertices".to_string(),
                        });
                    }
                    let mut face = Vec::with_capacity(parts.len() - 1);
                    for vertex_data in &parts[1..] {
                        let global = resolve_index(vertex_data, positions.len(), line_number)?;
                        face.push(current.local_index(global, &positions)?);
                    }

                    // Fan triangulation
                    for i in 1..(face.len() - 1) {
                        current.indices.extend_from_slice(&[face[0], face[i], face[i + 1]]);
                    }
                }
                _ => {
                    // vn, vt, usemtl, mtllib, s ...
                }
            }
        }

        if positions.is_empty() {
            return Err(ObjError::InvalidFormat("No vertices found in OBJ file".to_string()));
        }
        if !current.indices.is_empty() {
            groups.push(current);
        }

        let mut root = SceneNode::new(name);
        if groups.is_empty() {
            // Point cloud: keep the raw positions so the model can still be measured
            root.children.push(SceneNode::with_mesh("points", Mesh::new(positions, Vec::new())));
        } else {
            root.children.extend(groups.into_iter().map(Group::into_node));
        }
        Ok(SceneGraph::new(root))
    }
}

/// Index buffers are `u32`; a group with more vertices cannot be addressed
fn mesh_index(count: usize) -> Result<u32, ObjError> {
    u32::try_from(count).map_err(|_| {
        ObjError::InvalidFormat(format!("group exceeds {} vertices", u32::MAX))
    })
}

/// Resolve the position part of `v`, `v/vt`, `v//vn` or `v/vt/vn`, 1-based or negative
fn resolve_index(vertex_data: &str, count: usize, line: usize) -> Result<usize, ObjError> {
    let raw = vertex_data.split('/').next().unwrap_or_default();
    let index: i64 = raw.parse().map_err(|_| ObjError::ParseError {
        line,
        message: format!("invalid position index {raw:?}"),
    })?;

    let resolved = match index {
        i if i > 0 => usize::try_from(i - 1).ok(),
        i if i < 0 => usize::try_from(i.unsigned_abs())
            .ok()
            .and_then(|back| count.checked_sub(back)),
        _ => None,
    };

    resolved
        .filter(|&i| i < count)
        .ok_or_else(|| ObjError::ParseError {
            line,
            message: format!("position index {index} out of bounds ({count} vertices)"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TWO_OBJECTS: &str = "\
# two objects sharing a vertex list
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 4
o quad
f 1/1/1 2/2/1 3/3/1 4/4/1
o tri
vn 0 0 1
f -5//1 -4//1 -1//1
";

    #[test]
    fn test_groups_become_children() {
        let graph = ObjLoader::parse("pair", Cursor::new(TWO_OBJECTS)).unwrap();

        assert_eq!(graph.root.name, "pair");
        assert_eq!(graph.root.children.len(), 2);

        let quad = &graph.root.children[0];
        assert_eq!(quad.name, "quad");
        let quad_mesh = quad.mesh.as_ref().unwrap();
        assert_eq!(quad_mesh.positions.len(), 4);
        assert_eq!(quad_mesh.triangle_count(), 2);

        let tri = &graph.root.children[1];
        assert_eq!(tri.name, "tri");
        assert_eq!(tri.mesh.as_ref().unwrap().positions[2], Point3::new(0.0, 0.0, 4.0));
    }

    #[test]
    fn test_bounds_cover_all_groups() {
        let graph = ObjLoader::parse("pair", Cursor::new(TWO_OBJECTS)).unwrap();
        let bounds = graph.bounds().unwrap();

        assert_eq!(bounds.size().z, 4.0);
        assert_eq!(bounds.size().x, 1.0);
    }

    #[test]
    fn test_point_cloud_kept() {
        let graph = ObjLoader::parse("cloud", Cursor::new("v 1 2 3\nv -1 -2 -3\n")).unwrap();
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.triangle_count(), 0);
    }

    #[test]
    fn test_out_of_bounds_index() {
        let result = ObjLoader::parse("bad", Cursor::new("v 0 0 0\nv 1 0 0\nf 1 2 3\n"));
        assert!(matches!(result, Err(ObjError::ParseError { line: 3, .. })));
    }

    #[test]
    fn test_zero_index_rejected() {
        let result = ObjLoader::parse("bad", Cursor::new("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n"));
        assert!(matches!(result, Err(ObjError::ParseError { .. })));
    }

    #[test]
    fn test_mesh_index_limit() {
        assert_eq!(mesh_index(0).unwrap(), 0);
        assert_eq!(mesh_index(u32::MAX as usize).unwrap(), u32::MAX);

        if let Ok(too_many) = usize::try_from(u64::from(u32::MAX) + 1) {
            assert!(matches!(mesh_index(too_many), Err(ObjError::InvalidFormat(_))));
        }
    }

    #[test]
    fn test_empty_file() {
        let result = ObjLoader::parse("empty", Cursor::new("# nothing here\n"));
        assert!(matches!(result, Err(ObjError::InvalidFormat(_))));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pair.obj");
        std::fs::write(&path, TWO_OBJECTS).unwrap();

        let graph = ObjLoader::load_obj(&path).unwrap();
        assert_eq!(graph.root.name, "pair");
        assert_eq!(graph.node_count(), 3);
    }
}
