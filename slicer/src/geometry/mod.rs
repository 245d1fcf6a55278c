use crate::Pos;

pub mod triangle;
pub use triangle::Triangle;

/// Decimal places mesh vertices are rounded to before slicing.
pub const VERTEX_PLACES: i32 = 9;
/// Decimal places plane intersections are rounded to. Two triangles sharing
/// an edge must produce bit-identical points at this precision.
pub const INTERSECTION_PLACES: i32 = 8;
/// Every vertex is lowered by this much so no vertex ever sits exactly on a
/// sampled height. It is below the intersection precision, so it never shows
/// up in the output.
pub const Z_NUDGE: f64 = 5e-10;

/// Where a single triangle crosses a single plane. Walking from `start` to
/// `end`, the inside of the mesh is on the left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Pos,
    pub end: Pos,
}

impl Segment {
    pub fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub fn reversed(self) -> Self {
        Self::new(self.end, self.start)
    }
}

/// Rounds half away from zero. The result is never negative zero, so rounded
/// values can be compared and hashed by their bits.
pub fn round_places(value: f64, places: i32) -> f64 {
    let shift = 10_f64.powi(places);
    (value * shift).round() / shift + 0.0
}

pub fn round_vector(vector: &Pos, places: i32) -> Pos {
    vector.map(|x| round_places(x, places))
}

/// Z component of the cross product of two vectors in the XY plane.
pub fn cross_2d(a: &Pos, b: &Pos) -> f64 {
    a.x * b.y - a.y * b.x
}
