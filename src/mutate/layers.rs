//! Layer replacement and insertion
//!
//! A batch of descriptors is applied to a staged copy of the graph. Each
//! descriptor either replaces the vertex of the same name (keeping its
//! position, taking the descriptor's inputs) or adds a new one. Consumers
//! are not rewired here; that is a separate step
//! ([`rewire_consumers`], [`insert_between`]).

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{EvolveError, Result};
use crate::graph::{splice_inputs, Graph, VertexOp};
use crate::state::Mutation;

/// Builds the operation for a descriptor from the graph being edited and
/// the descriptor's inputs
pub type VertexFactory = Arc<dyn Fn(&Graph, &[String]) -> Result<VertexOp> + Send + Sync>;

/// One replace-or-insert edit
#[derive(Clone)]
pub struct LayerDescriptor {
    name: String,
    factory: VertexFactory,
    inputs: Vec<String>,
}

impl LayerDescriptor {
    pub fn new<F, I, S>(name: impl Into<String>, factory: F, inputs: I) -> Self
    where
        F: Fn(&Graph, &[String]) -> Result<VertexOp> + Send + Sync + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            factory: Arc::new(factory),
            inputs: inputs.into_iter().map(Into::into).collect(),
        }
    }

    /// Descriptor with a fixed operation
    pub fn with_op<I, S>(name: impl Into<String>, op: impl Into<VertexOp>, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let op = op.into();
        Self::new(name, move |_: &Graph, _: &[String]| Ok(op.clone()), inputs)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }
}

impl fmt::Debug for LayerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerDescriptor")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .finish_non_exhaustive()
    }
}

/// Apply a batch of replace-or-insert descriptors.
///
/// Names not listed are untouched and the vertex count grows by at most
/// the number of descriptors. The input graph is never modified.
pub fn mutate_layers(graph: &Graph, descriptors: &[LayerDescriptor]) -> Result<Graph> {
    let mut seen = HashSet::new();
    for descriptor in descriptors {
        if !seen.insert(descriptor.name.as_str()) {
            return Err(EvolveError::LabelCollision {
                name: descriptor.name.clone(),
            });
        }
    }

    let mut staged = graph.clone();
    for descriptor in descriptors {
        let op = (descriptor.factory)(&staged, &descriptor.inputs)?;
        if staged.contains(&descriptor.name) {
            trace!(vertex = %descriptor.name, "replacing vertex");
            staged.replace_vertex(&descriptor.name, op, descriptor.inputs.clone())?;
        } else {
            trace!(vertex = %descriptor.name, "adding vertex");
            staged.add_vertex(descriptor.name.clone(), op, descriptor.inputs.clone())?;
        }
    }
    staged.validate()?;

    debug!(
        descriptors = descriptors.len(),
        vertices = staged.len(),
        "layer mutation applied"
    );
    Ok(staged)
}

/// Point every consumer of `from` (other than `onto` itself) at `onto`
pub fn rewire_consumers(graph: &Graph, from: &str, onto: &str) -> Result<Graph> {
    if !graph.contains(onto) {
        return Err(EvolveError::VertexNotFound {
            vertex: onto.to_string(),
        });
    }
    let replacement = [onto.to_string()];
    let mut staged = graph.clone();
    for consumer in graph.consumers_of(from) {
        if consumer == onto {
            continue;
        }
        let inputs = splice_inputs(graph.inputs_of(consumer)?, |i| i == from, &replacement);
        staged.set_inputs(consumer, inputs)?;
    }
    staged.validate()?;
    Ok(staged)
}

/// Insert a vertex on the edge `from -> to`.
///
/// The new vertex reads `from`, and `to`'s `from` slot is retargeted onto it.
pub fn insert_between(graph: &Graph, name: &str, op: impl Into<VertexOp>, from: &str, to: &str) -> Result<Graph> {
    let to_inputs = graph.inputs_of(to)?;
    if !to_inputs.iter().any(|i| i == from) {
        return Err(EvolveError::EdgeNotFound {
            from: from.to_string(),
            to: to.to_string(),
        });
    }
    let rewired = splice_inputs(to_inputs, |i| i == from, &[name.to_string()]);

    let mut staged = mutate_layers(graph, &[LayerDescriptor::with_op(name, op, [from])])?;
    staged.set_inputs(to, rewired)?;
    staged.validate()?;
    Ok(staged)
}

/// Remove a vertex, handing its inputs to its consumers
pub fn remove_vertex(graph: &Graph, name: &str) -> Result<Graph> {
    let mut staged = graph.clone();
    staged.remove_vertex_keep_connections(name)?;
    staged.validate()?;
    Ok(staged)
}

/// [`mutate_layers`] as a clonable strategy
#[derive(Debug, Clone)]
pub struct LayerMutation {
    descriptors: Vec<LayerDescriptor>,
}

impl LayerMutation {
    pub fn new(descriptors: Vec<LayerDescriptor>) -> Self {
        Self { descriptors }
    }

    pub fn descriptors(&self) -> &[LayerDescriptor] {
        &self.descriptors
    }
}

impl Mutation<Graph> for LayerMutation {
    fn mutate(&mut self, candidate: &Graph) -> Result<Graph> {
        mutate_layers(candidate, &self.descriptors)
    }

    fn box_clone(&self) -> Box<dyn Mutation<Graph>> {
        Box::new(self.clone())
    }
}
