//! Nesting of a layer's contours into polygons with holes.
//!
//! The slicer itself only produces loose paths. Outer boundaries wind
//! counter-clockwise and holes clockwise, but which hole belongs to which
//! boundary takes real polygon operations, so that part is left to a
//! [`PolygonBackend`].

use tracing::debug;

use crate::{layer::Layer, path::Path, Pos};

#[cfg(feature = "geo")]
mod geo_backend;
#[cfg(feature = "geo")]
pub use geo_backend::GeoBackend;

/// A point in the plane of a layer.
pub type Point = [f64; 2];

/// The polygon operations needed to nest holes in their outer boundaries.
pub trait PolygonBackend {
    type Polygon;

    /// Builds a polygon from rings that don't repeat their first point.
    fn polygon(&self, exterior: &[Point], holes: &[&[Point]]) -> Self::Polygon;
    /// Unsigned area of the polygon, holes excluded.
    fn area(&self, polygon: &Self::Polygon) -> f64;
    /// If `inner` lies completely inside of `outer`.
    fn contains(&self, outer: &Self::Polygon, inner: &Self::Polygon) -> bool;
    /// The exterior ring and each hole ring, not repeating their first point.
    fn rings(&self, polygon: &Self::Polygon) -> (Vec<Point>, Vec<Vec<Point>>);
}

/// An outer boundary and the holes inside of it.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonWithHoles {
    pub exterior: Path,
    pub holes: Vec<Path>,
}

/// Groups the closed paths of a layer into polygons. Every hole goes to the
/// smallest outer boundary that contains it. Holes inside no boundary can't
/// be placed and are dropped, as are open paths.
pub fn reconcile<B: PolygonBackend>(layer: &Layer, backend: &B) -> Vec<PolygonWithHoles> {
    let (holes, outers): (Vec<_>, Vec<_>) = layer
        .closed_paths()
        .map(|path| (path.is_hole(), to_ring(path)))
        .partition(|(hole, _)| *hole);

    let shapes = (outers.iter())
        .map(|(_, ring)| backend.polygon(ring, &[]))
        .collect::<Vec<_>>();
    let areas = shapes.iter().map(|x| backend.area(x)).collect::<Vec<_>>();

    let mut assigned = vec![Vec::new(); outers.len()];
    for (_, hole) in &holes {
        let shape = backend.polygon(hole, &[]);
        let container = (0..shapes.len())
            .filter(|&i| backend.contains(&shapes[i], &shape))
            .min_by(|&a, &b| areas[a].total_cmp(&areas[b]));

        match container {
            Some(index) => assigned[index].push(hole.as_slice()),
            None => debug!(
                z = layer.z,
                points = hole.len(),
                "Dropping hole outside of every boundary"
            ),
        }
    }

    (outers.iter().zip(assigned))
        .map(|((_, exterior), holes)| {
            let polygon = backend.polygon(exterior, &holes);
            let (exterior, holes) = backend.rings(&polygon);
            PolygonWithHoles {
                exterior: from_ring(exterior, layer.z),
                holes: (holes.into_iter())
                    .map(|ring| from_ring(ring, layer.z))
                    .collect(),
            }
        })
        .collect()
}

/// Treats every closed path of the layer as its own solid region, for when
/// no backend is available.
pub fn flatten(layer: &Layer) -> Vec<PolygonWithHoles> {
    layer
        .closed_paths()
        .map(|path| PolygonWithHoles {
            exterior: path.clone(),
            holes: Vec::new(),
        })
        .collect()
}

fn to_ring(path: &Path) -> Vec<Point> {
    path.points.iter().map(|point| [point.x, point.y]).collect()
}

fn from_ring(ring: Vec<Point>, z: f64) -> Path {
    let points = (ring.into_iter())
        .map(|[x, y]| Pos::new(x, y, z))
        .collect();
    Path::new(points, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Treats polygons as their bounding boxes.
    struct BoxBackend;

    #[derive(Debug)]
    struct BoxPolygon {
        rings: (Vec<Point>, Vec<Vec<Point>>),
        min: Point,
        max: Point,
    }

    impl PolygonBackend for BoxBackend {
        type Polygon = BoxPolygon;

        fn polygon(&self, exterior: &[Point], holes: &[&[Point]]) -> BoxPolygon {
            let fold = |(min, max): (Point, Point), p: &Point| {
                (
                    [min[0].min(p[0]), min[1].min(p[1])],
                    [max[0].max(p[0]), max[1].max(p[1])],
                )
            };
            let (min, max) = exterior.iter().fold(
                ([f64::INFINITY; 2], [f64::NEG_INFINITY; 2]),
                fold,
            );

            BoxPolygon {
                rings: (exterior.to_vec(), holes.iter().map(|x| x.to_vec()).collect()),
                min,
                max,
            }
        }

        fn area(&self, polygon: &BoxPolygon) -> f64 {
            (polygon.max[0] - polygon.min[0]) * (polygon.max[1] - polygon.min[1])
        }

        fn contains(&self, outer: &BoxPolygon, inner: &BoxPolygon) -> bool {
            (0..2).all(|i| outer.min[i] <= inner.min[i] && inner.max[i] <= outer.max[i])
        }

        fn rings(&self, polygon: &BoxPolygon) -> (Vec<Point>, Vec<Vec<Point>>) {
            polygon.rings.clone()
        }
    }

    fn square(x: f64, y: f64, size: f64, hole: bool) -> Path {
        let mut points = vec![
            Pos::new(x, y, 2.0),
            Pos::new(x + size, y, 2.0),
            Pos::new(x + size, y + size, 2.0),
            Pos::new(x, y + size, 2.0),
        ];
        if hole {
            points.reverse();
        }
        Path::new(points, true)
    }

    #[test]
    fn nests_holes() {
        // A ring inside of a ring, with an island in the middle.
        let layer = Layer::new(
            2.0,
            vec![
                square(3.0, 3.0, 4.0, true),
                square(0.0, 0.0, 10.0, false),
                square(4.0, 4.0, 2.0, false),
                square(4.5, 4.5, 1.0, true),
                square(20.0, 0.0, 1.0, false),
            ],
        );

        let mut polygons = reconcile(&layer, &BoxBackend);
        polygons.sort_by(|a, b| a.exterior.signed_area().total_cmp(&b.exterior.signed_area()));
        assert_eq!(polygons.len(), 3);

        // The small hole goes to the island, the smallest box around it.
        assert_eq!(polygons[0].exterior, square(20.0, 0.0, 1.0, false));
        assert!(polygons[0].holes.is_empty());
        assert_eq!(polygons[1].exterior, square(4.0, 4.0, 2.0, false));
        assert_eq!(polygons[1].holes, vec![square(4.5, 4.5, 1.0, true)]);
        assert_eq!(polygons[2].exterior, square(0.0, 0.0, 10.0, false));
        assert_eq!(polygons[2].holes, vec![square(3.0, 3.0, 4.0, true)]);

        // Windings are untouched.
        assert!(polygons.iter().all(|p| !p.exterior.is_hole()));
        assert!(polygons.iter().flat_map(|p| &p.holes).all(Path::is_hole));
    }

    #[test]
    fn drops_orphaned_holes() {
        let layer = Layer::new(
            2.0,
            vec![square(0.0, 0.0, 1.0, false), square(5.0, 5.0, 1.0, true)],
        );

        let polygons = reconcile(&layer, &BoxBackend);
        assert_eq!(polygons.len(), 1);
        assert!(polygons[0].holes.is_empty());
    }

    #[test]
    fn ignores_open_paths() {
        let mut open = square(0.0, 0.0, 1.0, false);
        open.closed = false;
        let layer = Layer::new(2.0, vec![open, square(5.0, 5.0, 1.0, false)]);

        assert_eq!(reconcile(&layer, &BoxBackend).len(), 1);
        assert_eq!(flatten(&layer).len(), 1);
    }

    #[test]
    fn flatten_keeps_every_closed_path() {
        let layer = Layer::new(
            2.0,
            vec![square(0.0, 0.0, 10.0, false), square(3.0, 3.0, 4.0, true)],
        );

        let polygons = flatten(&layer);
        assert_eq!(polygons.len(), 2);
        assert!(polygons.iter().all(|p| p.holes.is_empty()));

        let rebuilt = Layer::from_polygons(layer.z, polygons);
        assert_eq!(rebuilt, layer);
    }
}
