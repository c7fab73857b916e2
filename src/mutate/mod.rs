//! Mutation Module
//!
//! Graph edits that produce a new graph from an existing one:
//! - Replace or insert layers from descriptors, rewire consumers
//! - Resize layer output widths with downstream propagation
//!
//! Every operation works on a copy; the input graph is returned untouched
//! on error.

mod layers;
mod nout;

pub use layers::{
    insert_between, mutate_layers, remove_vertex, rewire_consumers, LayerDescriptor, LayerMutation, VertexFactory,
};
pub use nout::{mutate_nout, NoutMutation, ResizeFn};

use crate::error::Result;
use crate::graph::{Graph, GraphInfo};
use crate::state::Mutation;

/// Applies a graph mutation to a [`GraphInfo`], keeping provenance tags of
/// surviving vertices
#[derive(Debug, Clone)]
pub struct TrackedMutation<M> {
    inner: M,
}

impl<M> TrackedMutation<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }
}

impl<M> Mutation<GraphInfo> for TrackedMutation<M>
where
    M: Mutation<Graph> + Clone + 'static,
{
    fn mutate(&mut self, candidate: &GraphInfo) -> Result<GraphInfo> {
        let inner = &mut self.inner;
        candidate.map_graph(|graph| inner.mutate(graph))
    }

    fn box_clone(&self) -> Box<dyn Mutation<GraphInfo>> {
        Box::new(self.clone())
    }
}
