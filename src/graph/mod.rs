//! Graph Model Module
//!
//! Named-vertex DAGs describing network architectures:
//! - Layer and structural vertex kinds, with width pass-through policies
//! - Graph editing primitives (add, replace, remove keeping connections)
//! - Depth, normalized depth, sinks and cycle detection
//! - Provenance tracking across crossover

mod dag;
mod depth;
mod info;
mod layer;
mod vertex;

pub use dag::Graph;
pub use info::GraphInfo;
pub use layer::LayerConfig;
pub use vertex::{ElementWiseOp, StructuralKind, Vertex, VertexOp, WidthPolicy};

pub(crate) use dag::splice_inputs;
pub(crate) use layer::shifted_width;
