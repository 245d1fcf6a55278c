//! Slices triangle meshes into stacks of horizontal layers, each made of the
//! polygon contours where the mesh crosses that height.

use nalgebra::Vector3;

pub mod builder;
pub mod error;
pub mod format;
pub mod geometry;
pub mod layer;
pub mod mesh;
pub mod path;
pub mod polygon;
pub mod slicer;

pub use error::{Error, Result};
pub use layer::Layer;
pub use path::{Path, Winding};
pub use slicer::{slice_mesh, Slicer, MAX_LAYERS};

pub type Pos = Vector3<f64>;
