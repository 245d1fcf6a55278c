use std::time::Instant;

use common::{
    config::{JoinStrategy, SliceConfig},
    progress::Progress,
};
use ordered_float::OrderedFloat;
use rayon::{
    iter::{IntoParallelIterator, ParallelBridge, ParallelIterator},
    slice::ParallelSliceMut,
    ThreadPoolBuilder,
};
use tracing::{debug, info, warn};

use crate::{
    error::{Error, Result},
    geometry::Triangle,
    layer::Layer,
    mesh::Mesh,
    path::join_segments,
};

mod sweep;
pub use sweep::{Job, Sweep};

/// Upper bound on the layers of one run. A step small enough to pass it is
/// almost certainly a unit mistake.
pub const MAX_LAYERS: usize = 1 << 24;

/// Used to slice a mesh.
pub struct Slicer {
    slice_config: SliceConfig,
    mesh: Mesh,
    progress: Progress,
}

impl Slicer {
    pub fn new(slice_config: SliceConfig, mesh: Mesh) -> Self {
        Self {
            slice_config,
            mesh,
            progress: Progress::new(),
        }
    }

    /// Gets a handle to the progress of this slicer, counted in layers.
    pub fn progress(&self) -> Progress {
        self.progress.clone()
    }

    pub fn config(&self) -> &SliceConfig {
        &self.slice_config
    }

    /// Number of layers the mesh will be cut into.
    pub fn layer_count(&self) -> Result<usize> {
        let step = self.slice_config.step;
        if !(step.is_finite() && step > 0.0) {
            return Err(Error::InvalidStep(step));
        }

        let (min, max) = self.mesh.bounds().ok_or(Error::EmptyMesh)?;
        let count = ((max.z - min.z) / step).ceil();
        if !(count <= MAX_LAYERS as f64) {
            return Err(Error::TooManyLayers {
                count,
                max: MAX_LAYERS,
            });
        }

        Ok(count as usize)
    }

    /// Slices the mesh into layers starting at its lowest point and going up
    /// by the configured step. Layers are returned in order of increasing
    /// height no matter how many workers were used.
    pub fn slice(&self) -> Result<Vec<Layer>> {
        let result = self.slice_inner();
        self.progress.set_finished();
        result
    }

    fn slice_inner(&self) -> Result<Vec<Layer>> {
        let layers = self.layer_count()?;
        let (min, _) = self.mesh.bounds().ok_or(Error::EmptyMesh)?;
        let (step, join) = (self.slice_config.step, self.slice_config.join);
        self.progress.set_total(layers as u64);

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.slice_config.workers)
            .build()?;
        debug!(
            layers,
            step,
            workers = pool.current_num_threads(),
            "Starting slicing operation"
        );

        let now = Instant::now();
        let mut out = pool.install(|| {
            let mut triangles = (0..self.mesh.face_count())
                .into_par_iter()
                .map(|face| Triangle::new(self.mesh.face_vertices(face)))
                .collect::<Vec<_>>();
            triangles.par_sort_by_key(|triangle| OrderedFloat(triangle.min_z));

            // The sweep has to run in order, so it hands its jobs to the
            // workers one at a time. They finish in any order.
            Sweep::new(&triangles, min.z, step, layers)
                .par_bridge()
                .map(|job| slice_layer(job, join))
                .inspect(|_| self.progress.add_complete(1))
                .collect::<Vec<_>>()
        });
        out.sort_by_key(|layer| OrderedFloat(layer.z));

        let leaky = out.iter().filter(|layer| layer.open_paths() > 0).count();
        if leaky > 0 {
            warn!("{leaky} of {layers} layers have open paths, the mesh is probably not manifold");
        }

        info!(
            "Sliced {} faces into {} layers in {:?}",
            self.mesh.face_count(),
            layers,
            now.elapsed()
        );

        Ok(out)
    }
}

/// Slices `mesh` every `step` units with `workers` threads (zero for one
/// per core).
pub fn slice_mesh(mesh: &Mesh, step: f64, workers: usize) -> Result<Vec<Layer>> {
    let slice_config = SliceConfig {
        step,
        workers,
        ..Default::default()
    };
    Slicer::new(slice_config, mesh.clone()).slice()
}

/// Intersects every triangle of a job with its plane and joins the pieces.
fn slice_layer(job: Job, join: JoinStrategy) -> Layer {
    let segments = (job.triangles.iter())
        .filter_map(|triangle| triangle.intersect_plane(job.z))
        .collect::<Vec<_>>();

    Layer::new(job.z, join_segments(&segments, join))
}
