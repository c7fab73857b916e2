//! Error handling for nasgraft
//!
//! Every graph-editing operation stages its work before committing, so any
//! error returned here means the caller's input was left untouched.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for nasgraft operations
pub type Result<T> = std::result::Result<T, EvolveError>;

/// Main error type for graph evolution operations
#[derive(Error, Debug)]
pub enum EvolveError {
    // Graph Structure Errors
    #[error("Cycle detected through vertex '{vertex}'")]
    Cycle { vertex: String },

    #[error("Vertex '{vertex}' references missing input '{input}'")]
    DanglingInput { vertex: String, input: String },

    #[error("Vertex not found: {vertex}")]
    VertexNotFound { vertex: String },

    #[error("Vertex already exists: {vertex}")]
    DuplicateVertex { vertex: String },

    #[error("No edge from '{from}' to '{to}'")]
    EdgeNotFound { from: String, to: String },

    #[error("Graph has no vertices")]
    EmptyGraph,

    // Mutation Errors
    #[error("Vertex '{vertex}' of kind '{kind}' has no width pass-through policy")]
    UnsupportedVertexKind { vertex: String, kind: String },

    #[error("Vertex '{vertex}' is not a layer")]
    NotALayer { vertex: String },

    #[error("Label '{name}' is targeted by more than one descriptor")]
    LabelCollision { name: String },

    #[error("Width of '{vertex}' would become {width}")]
    InvalidWidth { vertex: String, width: i64 },

    // Crossover Errors
    #[error("Both parents contribute a vertex named '{name}'")]
    NameCollision { name: String },

    #[error("Cut point {value} is outside [-1, 1]")]
    InvalidPointSelection { value: f64 },

    // Configuration Errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // Persistence Errors
    #[error("Failed to read file: {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory creation failed: {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Saved state not found: {name}")]
    StateNotFound { name: String },

    #[error("Failed to persist state '{name}': {reason}")]
    Persistence { name: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EvolveError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            EvolveError::Cycle { .. } => "CYCLE",
            EvolveError::DanglingInput { .. } => "DANGLING_INPUT",
            EvolveError::VertexNotFound { .. } => "VERTEX_NOT_FOUND",
            EvolveError::DuplicateVertex { .. } => "DUPLICATE_VERTEX",
            EvolveError::EdgeNotFound { .. } => "EDGE_NOT_FOUND",
            EvolveError::EmptyGraph => "EMPTY_GRAPH",
            EvolveError::UnsupportedVertexKind { .. } => "UNSUPPORTED_VERTEX_KIND",
            EvolveError::NotALayer { .. } => "NOT_A_LAYER",
            EvolveError::LabelCollision { .. } => "LABEL_COLLISION",
            EvolveError::InvalidWidth { .. } => "INVALID_WIDTH",
            EvolveError::NameCollision { .. } => "NAME_COLLISION",
            EvolveError::InvalidPointSelection { .. } => "INVALID_POINT_SELECTION",
            EvolveError::InvalidConfig { .. } => "INVALID_CONFIG",
            EvolveError::FileRead { .. } => "FILE_READ_ERROR",
            EvolveError::FileWrite { .. } => "FILE_WRITE_ERROR",
            EvolveError::DirectoryCreate { .. } => "DIRECTORY_CREATE_ERROR",
            EvolveError::StateNotFound { .. } => "STATE_NOT_FOUND",
            EvolveError::Persistence { .. } => "PERSISTENCE_ERROR",
            EvolveError::Io(_) => "IO_ERROR",
            EvolveError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if the evolutionary driver can simply skip this candidate and
    /// try another operator.
    ///
    /// Malformed graphs (cycles, dangling inputs) are fatal: the graph must
    /// not be used again.
    pub fn is_recoverable(&self) -> bool {
        match self {
            EvolveError::Cycle { .. } | EvolveError::DanglingInput { .. } => false,
            EvolveError::EmptyGraph => false,
            EvolveError::Io(_) | EvolveError::Serialization(_) => false,
            _ => true,
        }
    }

    /// Returns recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            EvolveError::Cycle { .. } => vec![
                "Discard the graph, it cannot be ordered",
                "Check the last rewiring edit for a back edge",
            ],
            EvolveError::DanglingInput { .. } => vec![
                "Add the missing input vertex",
                "Rewire the consumer before removing its input",
                "Declare the name as an input boundary marker",
            ],
            EvolveError::UnsupportedVertexKind { .. } => vec![
                "Resize a different layer",
                "Insert a layer in front of the vertex to absorb the change",
            ],
            EvolveError::LabelCollision { .. } => vec!["Give every descriptor or target a distinct name"],
            EvolveError::NameCollision { .. } => vec![
                "Namespace vertex names by lineage when authoring graphs",
                "Try different cut points",
            ],
            EvolveError::InvalidWidth { .. } => vec![
                "Use a resize function that keeps widths positive",
                "Set a minimum width in the mutation configuration",
            ],
            EvolveError::InvalidPointSelection { .. } => vec!["Pick cut points within [-1, 1]"],
            EvolveError::FileWrite { .. } | EvolveError::DirectoryCreate { .. } => vec![
                "Check that the state directory is writable",
                "Point the persistence configuration at another directory",
            ],
            _ => vec![],
        }
    }
}
