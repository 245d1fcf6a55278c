use crate::geometry::{round_places, Triangle, INTERSECTION_PLACES};

/// The work for one layer: its height and every triangle straddling it.
#[derive(Debug)]
pub struct Job<'a> {
    pub z: f64,
    pub triangles: Vec<&'a Triangle>,
}

/// Sweeps a plane up through a set of triangles, yielding a [`Job`] per
/// layer in order of increasing height.
///
/// Triangles are sorted by their lowest point, so rather than testing every
/// triangle against every height the sweep keeps an active set. Each step
/// drops triangles that ended below the plane and pulls in the ones that
/// start at or below it.
pub struct Sweep<'a> {
    triangles: &'a [Triangle],
    active: Vec<&'a Triangle>,
    cursor: usize,

    start: f64,
    step: f64,
    layer: usize,
    layers: usize,
}

impl<'a> Sweep<'a> {
    /// `triangles` must be sorted by [`Triangle::min_z`].
    pub fn new(triangles: &'a [Triangle], start: f64, step: f64, layers: usize) -> Self {
        debug_assert!(triangles.windows(2).all(|x| x[0].min_z <= x[1].min_z));

        Self {
            triangles,
            active: Vec::new(),
            cursor: 0,

            start,
            step,
            layer: 0,
            layers,
        }
    }

    pub fn layer_height(&self, layer: usize) -> f64 {
        round_places(self.start + self.step * layer as f64, INTERSECTION_PLACES)
    }
}

impl<'a> Iterator for Sweep<'a> {
    type Item = Job<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.layer >= self.layers {
            return None;
        }

        let z = self.layer_height(self.layer);
        self.layer += 1;

        self.active.retain(|triangle| triangle.max_z >= z);

        let triangles = self.triangles;
        while let Some(triangle) = triangles.get(self.cursor).filter(|t| t.min_z <= z) {
            self.cursor += 1;

            // Thin triangles can fit entirely between two layers.
            if triangle.max_z >= z {
                self.active.push(triangle);
            }
        }

        // The job gets its own copy, the active set keeps changing.
        Some(Job {
            z,
            triangles: self.active.clone(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.layers - self.layer;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Sweep<'_> {}
