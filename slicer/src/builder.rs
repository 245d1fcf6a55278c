use std::f64::consts::TAU;

use crate::{mesh::Mesh, Pos};

/// Builds meshes out of simple solids. Every solid is closed and wound with
/// its face normals pointing outwards.
pub struct MeshBuilder {
    vertices: Vec<Pos>,
    faces: Vec<[u32; 3]>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    pub fn add_vertex(&mut self, vertex: Pos) -> u32 {
        self.vertices.push(vertex);
        (self.vertices.len() - 1) as u32
    }

    pub fn add_face(&mut self, face: [u32; 3]) {
        self.faces.push(face);
    }

    /// Adds a quad as two faces. The corners go counter-clockwise when looking
    /// at the front of the quad.
    pub fn add_quad(&mut self, [a, b, c, d]: [u32; 4]) {
        self.add_face([a, b, c]);
        self.add_face([a, c, d]);
    }

    pub fn build(self) -> Mesh {
        Mesh::new(self.vertices, self.faces)
    }
}

impl MeshBuilder {
    /// Adds an axis aligned box spanning from `min` to `max`.
    pub fn add_cuboid(&mut self, min: Pos, max: Pos) {
        let corners = [
            Pos::new(min.x, min.y, min.z),
            Pos::new(max.x, min.y, min.z),
            Pos::new(max.x, max.y, min.z),
            Pos::new(min.x, max.y, min.z),
            Pos::new(min.x, min.y, max.z),
            Pos::new(max.x, min.y, max.z),
            Pos::new(max.x, max.y, max.z),
            Pos::new(min.x, max.y, max.z),
        ];
        let [v0, v1, v2, v3, v4, v5, v6, v7] = corners.map(|x| self.add_vertex(x));

        self.add_quad([v0, v3, v2, v1]); // bottom
        self.add_quad([v4, v5, v6, v7]); // top
        self.add_quad([v0, v1, v5, v4]); // front
        self.add_quad([v1, v2, v6, v5]); // right
        self.add_quad([v2, v3, v7, v6]); // back
        self.add_quad([v3, v0, v4, v7]); // left
    }

    /// Adds a (possibly tapered) cylinder standing on `bottom`, approximated
    /// with `precision` sides.
    pub fn add_vertical_cylinder(
        &mut self,
        bottom: Pos,
        height: f64,
        (bottom_radius, top_radius): (f64, f64),
        precision: u32,
    ) {
        let top = bottom + Pos::new(0.0, 0.0, height);
        let bottom_center = self.add_vertex(bottom);
        let top_center = self.add_vertex(top);

        let ring = (0..precision)
            .map(|i| {
                let angle = TAU * (i as f64) / (precision as f64);
                let normal = Pos::new(angle.cos(), angle.sin(), 0.0);
                let top = self.add_vertex(top + normal * top_radius);
                let bottom = self.add_vertex(bottom + normal * bottom_radius);
                (top, bottom)
            })
            .collect::<Vec<_>>();

        for (i, &(top, bottom)) in ring.iter().enumerate() {
            let (next_top, next_bottom) = ring[(i + 1) % ring.len()];
            self.add_quad([bottom, next_bottom, next_top, top]);
            self.add_face([top, next_top, top_center]);
            self.add_face([bottom_center, next_bottom, bottom]);
        }
    }
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sum of each face's signed volume with the origin, positive when the
    /// faces point outwards.
    fn volume(mesh: &Mesh) -> f64 {
        mesh.triangles()
            .map(|[a, b, c]| a.dot(&b.cross(&c)) / 6.0)
            .sum()
    }

    #[test]
    fn cuboid() {
        let mut builder = MeshBuilder::new();
        builder.add_cuboid(Pos::new(1.0, 2.0, 3.0), Pos::new(2.0, 4.0, 6.0));
        let mesh = builder.build();

        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 12);
        assert!(mesh.is_manifold());
        assert!((volume(&mesh) - 6.0).abs() < 1e-9);
        assert_eq!(
            mesh.bounds(),
            Some((Pos::new(1.0, 2.0, 3.0), Pos::new(2.0, 4.0, 6.0)))
        );
    }

    #[test]
    fn cylinder() {
        let mut builder = MeshBuilder::new();
        builder.add_vertical_cylinder(Pos::zeros(), 2.0, (1.0, 1.0), 64);
        let mesh = builder.build();

        assert!(mesh.is_manifold());
        assert_eq!(mesh.face_count(), 64 * 4);

        // Inscribed polygon, a little less than pi r^2 h.
        let volume = volume(&mesh);
        assert!(volume > 6.0 && volume < std::f64::consts::TAU);
    }
}
