use crate::{path::Path, polygon::PolygonWithHoles};

/// The contours where a mesh crosses one horizontal plane.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub z: f64,
    pub paths: Vec<Path>,
}

impl Layer {
    pub fn new(z: f64, paths: Vec<Path>) -> Self {
        Self { z, paths }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn closed_paths(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().filter(|path| path.closed)
    }

    /// Count of paths that didn't close, a sign of a leaky or non-manifold
    /// mesh.
    pub fn open_paths(&self) -> usize {
        self.paths.iter().filter(|path| !path.closed).count()
    }

    /// Rebuilds a layer from nested polygons, each outer boundary directly
    /// followed by its holes.
    pub fn from_polygons(z: f64, polygons: Vec<PolygonWithHoles>) -> Self {
        let paths = polygons
            .into_iter()
            .flat_map(|polygon| [polygon.exterior].into_iter().chain(polygon.holes))
            .collect();
        Self { z, paths }
    }
}
