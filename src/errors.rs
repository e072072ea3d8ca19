use thiserror::Error;


/// Failure to read a graph document
/// Individual malformed records are not errors, they are skipped and counted in the LoadReport
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document has no \"vertices\" array")]
    MissingVertices,
}

/// Failure to mutate the graph model
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("unknown vertex: {0}")]
    UnknownVertex(String),
    #[error("unknown edge: {0}")]
    UnknownEdge(usize),
    #[error("invalid weight {0}: weights must be finite and non-negative")]
    InvalidWeight(f64),
}

/// Failure to read or validate a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failure inside the spatial index
#[derive(Debug, Error, PartialEq)]
pub enum SpatialError {
    #[error("kd-tree error: {0}")]
    KdTree(String),
}


impl From<kdtree::ErrorKind> for SpatialError {
    fn from(error: kdtree::ErrorKind) -> Self {
        SpatialError::KdTree(error.to_string())
    }
}
