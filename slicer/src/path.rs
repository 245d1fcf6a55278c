use std::collections::BTreeMap;

use common::config::JoinStrategy;
use ordered_float::OrderedFloat;

use crate::{
    geometry::{cross_2d, Segment},
    Pos,
};

/// Turns whose sine is closer to zero than this are treated as collinear.
const COLLINEAR_EPSILON: f64 = 1e-12;

/// An ordered run of points in a layer. A closed path does not repeat its
/// first point, the last point connects back to the first.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    pub points: Vec<Pos>,
    pub closed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winding {
    /// Hole candidate.
    Clockwise,
    /// Outer boundary candidate.
    CounterClockwise,
}

/// Joining key of a point. All points of a layer share the same height so
/// only the rounded x and y matter.
type Key = (OrderedFloat<f64>, OrderedFloat<f64>);

fn key(point: &Pos) -> Key {
    (OrderedFloat(point.x), OrderedFloat(point.y))
}

impl Path {
    pub fn new(points: Vec<Pos>, closed: bool) -> Self {
        Self { points, closed }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over the edges of the path, including the closing edge of a
    /// closed path.
    pub fn edges(&self) -> impl Iterator<Item = (Pos, Pos)> + '_ {
        let closing = (self.closed && self.points.len() > 1)
            .then(|| (self.points[self.points.len() - 1], self.points[0]));
        self.points
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .chain(closing)
    }

    /// Shoelace area, positive for counter-clockwise paths. Open paths are
    /// measured as if they were closed.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        (0..n)
            .map(|i| cross_2d(&self.points[i], &self.points[(i + 1) % n]))
            .sum::<f64>()
            / 2.0
    }

    /// Classifies the rotational sense of the path by looking at the turn it
    /// makes at its top-most (then right-most) point, which is always convex.
    pub fn winding(&self) -> Winding {
        let points = &self.points;
        let n = points.len();
        if n < 3 {
            return Winding::CounterClockwise;
        }

        let top = (0..n)
            .max_by(|&a, &b| {
                let (a, b) = (points[a], points[b]);
                a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x))
            })
            .unwrap_or_default();

        let prev = points[(top + n - 1) % n];
        let current = points[top];
        let next = points[(top + 1) % n];

        let (incoming, outgoing) = (current - prev, next - current);
        let turn = cross_2d(&incoming, &outgoing);
        let lengths = incoming.xy().norm() * outgoing.xy().norm();
        if turn.abs() <= COLLINEAR_EPSILON * lengths {
            // Passing over the top from right to left is counter-clockwise.
            return if next.x < prev.x {
                Winding::CounterClockwise
            } else {
                Winding::Clockwise
            };
        }

        if turn < 0.0 {
            Winding::Clockwise
        } else {
            Winding::CounterClockwise
        }
    }

    pub fn is_hole(&self) -> bool {
        self.winding() == Winding::Clockwise
    }

    /// Axis aligned bounds of the path in the XY plane.
    pub fn bounds(&self) -> Option<(Pos, Pos)> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        }))
    }

    /// Builds a path from a walk over joined segments. A walk that ended
    /// where it started is closed.
    fn from_walk(mut points: Vec<Pos>) -> Self {
        let closed = points.len() > 2 && key(&points[0]) == key(&points[points.len() - 1]);
        if closed {
            points.pop();
        }

        Self { points, closed }
    }
}

/// Stitches the unordered segments of one layer into paths. Chains that
/// don't close on themselves (non-manifold input) are returned open.
pub fn join_segments(segments: &[Segment], strategy: JoinStrategy) -> Vec<Path> {
    match strategy {
        JoinStrategy::LastWriter => join_last_writer(segments),
        JoinStrategy::Branching => join_branching(segments),
    }
}

fn join_last_writer(segments: &[Segment]) -> Vec<Path> {
    let mut lookup = BTreeMap::new();
    for segment in segments {
        lookup.insert(key(&segment.start), (segment.start, segment.end));
    }

    let mut paths = Vec::new();
    while let Some(mut point) = lookup.values().next().map(|(start, _)| *start) {
        let mut points = Vec::new();
        loop {
            points.push(point);
            match lookup.remove(&key(&point)) {
                Some((_, end)) => point = end,
                None => break,
            }
        }

        paths.push(Path::from_walk(points));
    }

    paths
}

fn join_branching(segments: &[Segment]) -> Vec<Path> {
    let mut lookup = BTreeMap::<Key, (Pos, Vec<Pos>)>::new();
    for segment in segments {
        let entry = lookup
            .entry(key(&segment.start))
            .or_insert_with(|| (segment.start, Vec::new()));
        entry.1.push(segment.end);
    }

    let mut paths = Vec::new();
    while let Some(start) = lookup.values().next().map(|(start, _)| *start) {
        let mut points = Vec::<Pos>::new();
        let mut point = start;
        let mut closed = false;

        loop {
            points.push(point);

            let Some((_, ends)) = lookup.get_mut(&key(&point)) else {
                break;
            };

            let incoming = (points.len() > 1).then(|| point - points[points.len() - 2]);
            let index = pick_continuation(incoming, point, ends);
            let end = ends.swap_remove(index);
            if ends.is_empty() {
                lookup.remove(&key(&point));
            }

            if key(&end) == key(&start) {
                closed = true;
                break;
            }

            point = end;
        }

        paths.push(Path::new(points, closed));
    }

    paths
}

/// Index of the candidate that turns furthest counter-clockwise from the
/// incoming direction, which keeps regions touching at a single point apart.
/// Without an incoming direction the smallest point is used.
fn pick_continuation(incoming: Option<Pos>, point: Pos, ends: &[Pos]) -> usize {
    let turn = |end: &Pos| {
        incoming.map_or(0.0, |incoming| {
            let outgoing = end - point;
            cross_2d(&incoming, &outgoing).atan2(incoming.xy().dot(&outgoing.xy()))
        })
    };

    (0..ends.len())
        .max_by(|&a, &b| {
            let (a, b) = (&ends[a], &ends[b]);
            OrderedFloat(turn(a))
                .cmp(&OrderedFloat(turn(b)))
                .then_with(|| key(b).cmp(&key(a)))
        })
        .unwrap_or_default()
}
