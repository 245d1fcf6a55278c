use crate::{
    geometry::{round_vector, Segment, INTERSECTION_PLACES, VERTEX_PLACES, Z_NUDGE},
    Pos,
};

/// A mesh face prepared for slicing.
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [Pos; 3],
    pub normal: Pos,
    pub min_z: f64,
    pub max_z: f64,
}

impl Triangle {
    /// Rounds the vertices to remove floating point noise and nudges them
    /// down by [`Z_NUDGE`]. Sample heights are rounded to fewer places than
    /// vertices, so after this no vertex can lie exactly on a plane.
    /// Degenerate faces are kept, they just never produce a segment.
    pub fn new(vertices: [Pos; 3]) -> Self {
        let vertices = vertices.map(|vertex| {
            let mut vertex = round_vector(&vertex, VERTEX_PLACES);
            vertex.z -= Z_NUDGE;
            vertex
        });

        let [v1, v2, v3] = vertices;
        let normal = (v2 - v1)
            .cross(&(v3 - v1))
            .try_normalize(0.0)
            .unwrap_or_else(Pos::zeros);

        Self {
            vertices,
            normal,
            min_z: v1.z.min(v2.z).min(v3.z),
            max_z: v1.z.max(v2.z).max(v3.z),
        }
    }

    /// Intersects the triangle with the horizontal plane at `height`.
    ///
    /// The segment is oriented from the face normal so that the segments of a
    /// consistently wound, closed mesh join into counter-clockwise outer
    /// contours and clockwise holes.
    pub fn intersect_plane(&self, height: f64) -> Option<Segment> {
        let [v1, v2, v3] = self.vertices;

        let mut out = [Pos::zeros(); 2];
        let mut n = 0;

        // Only the first two crossing edges are used. With the vertex nudge a
        // third crossing edge can only show up on a degenerate face.
        for (a, b) in [(v1, v2), (v2, v3), (v3, v1)] {
            if n == 2 {
                break;
            }

            if let Some(point) = edge_intersection(a, b, height) {
                out[n] = round_vector(&point, INTERSECTION_PLACES);
                n += 1;
            }
        }

        let [p1, p2] = out;
        if n < 2 || p1 == p2 {
            return None;
        }

        // Left hand perpendicular of p1 -> p2. If the face points the other
        // way, the inside is on the left already.
        let perpendicular = Pos::new(p1.y - p2.y, p2.x - p1.x, 0.0);
        let segment = Segment::new(p1, p2);
        Some(if perpendicular.dot(&self.normal) < 0.0 {
            segment
        } else {
            segment.reversed()
        })
    }
}

/// Point where the edge from `a` to `b` crosses `height`, if it does.
fn edge_intersection(a: Pos, b: Pos, height: f64) -> Option<Pos> {
    if a.z == b.z {
        return None;
    }

    let t = (height - a.z) / (b.z - a.z);
    (0.0..=1.0).contains(&t).then(|| {
        let point = a + (b - a) * t;
        Pos::new(point.x, point.y, height)
    })
}
