//! Vertices and their operation kinds
//!
//! The operation kind is a closed set: a vertex is either a layer with
//! declared widths or one of a fixed list of structural ops. How a width
//! change travels through a structural op is looked up in
//! [`StructuralKind::width_policy`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::layer::LayerConfig;

/// Element-wise combination used by [`StructuralKind::ElementWise`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementWiseOp {
    Add,
    Subtract,
    Product,
    Average,
    Max,
}

/// Structural (non-layer) operations
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum StructuralKind {
    /// Concatenation along the feature axis
    Merge,
    /// Element-wise combination of equally wide inputs
    ElementWise { combine: ElementWiseOp },
    /// Spatial zero padding
    ZeroPad,
    /// Global pooling over spatial axes
    GlobalPool,
    /// Multiplication by a constant
    Scale,
    /// Fixed slice of the feature axis
    Subset { from: usize, to: usize },
    /// Reshape to a fixed shape
    Reshape,
    /// Framework-specific op the engine knows nothing about
    Custom { name: String },
}

/// How a change of input width travels through a structural vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthPolicy {
    /// Output width equals the input width, which all inputs share
    PassThrough,
    /// Output width is the sum of input widths, one term per input slot
    Concatenate,
}

impl StructuralKind {
    pub fn custom(name: impl Into<String>) -> Self {
        StructuralKind::Custom { name: name.into() }
    }

    /// Pass-through policy for this kind, `None` if width changes cannot
    /// be propagated through it.
    pub fn width_policy(&self) -> Option<WidthPolicy> {
        match self {
            StructuralKind::Merge => Some(WidthPolicy::Concatenate),
            StructuralKind::ElementWise { .. }
            | StructuralKind::ZeroPad
            | StructuralKind::GlobalPool
            | StructuralKind::Scale => Some(WidthPolicy::PassThrough),
            StructuralKind::Subset { .. }
            | StructuralKind::Reshape
            | StructuralKind::Custom { .. } => None,
        }
    }

    /// Short name used in logs and errors
    pub fn name(&self) -> &str {
        match self {
            StructuralKind::Merge => "merge",
            StructuralKind::ElementWise { .. } => "elementwise",
            StructuralKind::ZeroPad => "zero_pad",
            StructuralKind::GlobalPool => "global_pool",
            StructuralKind::Scale => "scale",
            StructuralKind::Subset { .. } => "subset",
            StructuralKind::Reshape => "reshape",
            StructuralKind::Custom { name } => name,
        }
    }
}

impl fmt::Display for StructuralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Operation performed by a vertex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexOp {
    Layer(LayerConfig),
    Structural(StructuralKind),
}

impl VertexOp {
    pub fn layer(kind: impl Into<String>, n_in: usize, n_out: usize) -> Self {
        VertexOp::Layer(LayerConfig::new(kind, n_in, n_out))
    }

    pub fn as_layer(&self) -> Option<&LayerConfig> {
        match self {
            VertexOp::Layer(config) => Some(config),
            VertexOp::Structural(_) => None,
        }
    }

    pub fn is_layer(&self) -> bool {
        matches!(self, VertexOp::Layer(_))
    }

    /// Kind name (layer kind or structural op name)
    pub fn kind_name(&self) -> &str {
        match self {
            VertexOp::Layer(config) => &config.kind,
            VertexOp::Structural(kind) => kind.name(),
        }
    }
}

impl From<LayerConfig> for VertexOp {
    fn from(config: LayerConfig) -> Self {
        VertexOp::Layer(config)
    }
}

impl From<StructuralKind> for VertexOp {
    fn from(kind: StructuralKind) -> Self {
        VertexOp::Structural(kind)
    }
}

/// A named vertex with its ordered input list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub name: String,
    pub op: VertexOp,
    /// Input names in order; each is a vertex or an input boundary marker
    pub inputs: Vec<String>,
}

impl Vertex {
    pub fn new(name: impl Into<String>, op: impl Into<VertexOp>, inputs: Vec<String>) -> Self {
        Self {
            name: name.into(),
            op: op.into(),
            inputs,
        }
    }
}
