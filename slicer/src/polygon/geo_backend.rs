use geo::{Area, Contains, Coord, LineString, Polygon};

use super::{Point, PolygonBackend};

/// Polygon operations from the `geo` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeoBackend;

impl PolygonBackend for GeoBackend {
    type Polygon = Polygon<f64>;

    fn polygon(&self, exterior: &[Point], holes: &[&[Point]]) -> Polygon<f64> {
        Polygon::new(
            line_string(exterior),
            holes.iter().map(|ring| line_string(ring)).collect(),
        )
    }

    fn area(&self, polygon: &Polygon<f64>) -> f64 {
        polygon.unsigned_area()
    }

    fn contains(&self, outer: &Polygon<f64>, inner: &Polygon<f64>) -> bool {
        outer.contains(inner)
    }

    fn rings(&self, polygon: &Polygon<f64>) -> (Vec<Point>, Vec<Vec<Point>>) {
        let exterior = ring(polygon.exterior());
        let holes = polygon.interiors().iter().map(ring).collect();
        (exterior, holes)
    }
}

fn line_string(ring: &[Point]) -> LineString<f64> {
    LineString::new(ring.iter().map(|&[x, y]| Coord { x, y }).collect())
}

/// Geo closes every ring by repeating the first coordinate at the end.
fn ring(line: &LineString<f64>) -> Vec<Point> {
    let mut points = line.coords().map(|c| [c.x, c.y]).collect::<Vec<_>>();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{layer::Layer, path::Path, polygon::reconcile, Pos};

    fn ring_path(points: &[(f64, f64)], z: f64) -> Path {
        Path::new(points.iter().map(|&(x, y)| Pos::new(x, y, z)).collect(), true)
    }

    #[test]
    fn operations() {
        let outer = GeoBackend.polygon(&[[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]], &[]);
        let inner = GeoBackend.polygon(&[[1.0, 1.0], [1.0, 2.0], [2.0, 2.0], [2.0, 1.0]], &[]);
        let apart = GeoBackend.polygon(&[[5.0, 0.0], [6.0, 0.0], [6.0, 1.0]], &[]);

        assert_eq!(GeoBackend.area(&outer), 16.0);
        assert_eq!(GeoBackend.area(&inner), 1.0);
        assert!(GeoBackend.contains(&outer, &inner));
        assert!(!GeoBackend.contains(&inner, &outer));
        assert!(!GeoBackend.contains(&outer, &apart));

        let (exterior, holes) = GeoBackend.rings(&outer);
        assert_eq!(exterior.len(), 4);
        assert!(holes.is_empty());
    }

    #[test]
    fn l_shape_does_not_contain_its_notch() {
        // The bounding box of the L covers the hole, the L itself doesn't.
        let l = ring_path(
            &[(0.0, 0.0), (4.0, 0.0), (4.0, 1.0), (1.0, 1.0), (1.0, 4.0), (0.0, 4.0)],
            0.5,
        );
        let square = ring_path(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)], 0.5);
        let hole = ring_path(&[(2.0, 2.0), (2.0, 3.0), (3.0, 3.0), (3.0, 2.0)], 0.5);
        assert!(hole.is_hole());

        let layer = Layer::new(0.5, vec![square.clone(), l.clone(), hole.clone()]);
        let polygons = reconcile(&layer, &GeoBackend);
        assert_eq!(polygons.len(), 2);

        let l = polygons.iter().find(|p| p.exterior == l).unwrap();
        assert!(l.holes.is_empty());
        let square = polygons.iter().find(|p| p.exterior == square).unwrap();
        assert_eq!(square.holes, vec![hole]);
    }
}
