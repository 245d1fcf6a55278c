use std::{
    collections::HashMap,
    io::{BufReader, Read, Seek},
    sync::Arc,
};

use crate::{
    error::{Error, Result},
    Pos,
};

/// A mesh made of vertices and triangular faces. Faces don't need to be
/// consistently wound or form a closed surface. Cloning is cheap, the
/// geometry is shared.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    inner: Arc<MeshInner>,
}

#[derive(Debug, Default)]
struct MeshInner {
    vertices: Box<[Pos]>,
    faces: Box<[[u32; 3]]>,
}

impl Mesh {
    /// Creates a new mesh from the given vertices and faces. Every face must
    /// index into `vertices`.
    pub fn new(vertices: Vec<Pos>, faces: Vec<[u32; 3]>) -> Self {
        debug_assert!(faces.iter().flatten().all(|&x| (x as usize) < vertices.len()));

        Self {
            inner: Arc::new(MeshInner {
                vertices: vertices.into_boxed_slice(),
                faces: faces.into_boxed_slice(),
            }),
        }
    }

    pub fn vertices(&self) -> &[Pos] {
        self.inner.vertices.as_ref()
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        self.inner.faces.as_ref()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    pub fn face_count(&self) -> usize {
        self.faces().len()
    }

    /// Positions of the three corners of a face.
    pub fn face_vertices(&self, index: usize) -> [Pos; 3] {
        let vertices = self.vertices();
        self.faces()[index].map(|x| vertices[x as usize])
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Pos; 3]> + '_ {
        (0..self.face_count()).map(|face| self.face_vertices(face))
    }

    /// Get the minimum and maximum of each component of every vertex in the
    /// model, or None if the mesh has no vertices.
    pub fn bounds(&self) -> Option<(Pos, Pos)> {
        let first = *self.vertices().first()?;
        Some(
            (self.vertices().iter())
                .fold((first, first), |(min, max), v| (min.inf(v), max.sup(v))),
        )
    }

    /// A mesh is manifold if every edge is shared by exactly two faces. Only
    /// manifold meshes are guaranteed to slice into closed paths.
    pub fn is_manifold(&self) -> bool {
        let mut edges = HashMap::<_, u8>::new();

        for &[a, b, c] in self.faces() {
            for (a, b) in [(a, b), (b, c), (c, a)] {
                let count = edges.entry((a.min(b), a.max(b))).or_default();
                *count = count.saturating_add(1);
            }
        }

        edges.values().all(|&count| count == 2)
    }
}

/// Loads a mesh from a reader in a blocking manner. Supported formats are
/// `stl` (binary or ascii) and `obj`.
pub fn load_mesh<T: Read + Seek>(reader: T, format: &str) -> Result<Mesh> {
    let mut reader = BufReader::new(reader);

    match format.to_ascii_lowercase().as_str() {
        "stl" => {
            let stl = stl_io::read_stl(&mut reader)?;
            let vertices = (stl.vertices.iter())
                .map(|v| Pos::new(v[0] as f64, v[1] as f64, v[2] as f64))
                .collect();
            let faces = (stl.faces.iter())
                .map(|face| face.vertices.map(|x| x as u32))
                .collect();
            Ok(Mesh::new(vertices, faces))
        }
        "obj" => {
            let obj = obj::load_obj::<obj::Position, _, u32>(reader)?;
            let vertices = (obj.vertices.iter())
                .map(|v| v.position.map(f64::from))
                .map(|[x, y, z]| Pos::new(x, y, z))
                .collect();
            let faces = (obj.indices.chunks_exact(3))
                .map(|face| [face[0], face[1], face[2]])
                .collect();
            Ok(Mesh::new(vertices, faces))
        }
        _ => Err(Error::UnsupportedFormat(format.to_owned())),
    }
}
