use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("slice step must be a positive finite number, got {0}")]
    InvalidStep(f64),
    #[error("mesh has no vertices so its height range can't be established")]
    EmptyMesh,
    #[error("slicing would produce {count} layers, at most {max} are allowed")]
    TooManyLayers { count: f64, max: usize },
    #[error("unsupported mesh format `{0}`")]
    UnsupportedFormat(String),
    #[error("failed to read mesh: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse obj: {0}")]
    Obj(#[from] obj::ObjError),
    #[error("failed to start slicing workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
