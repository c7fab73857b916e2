//! Output width resizing
//!
//! Changing a layer's output width changes the input width of everything
//! downstream of it until another layer absorbs the change. Once every
//! target is resized, the graph is walked in topological order and each
//! vertex collects the changes arriving on its input slots. Structural
//! vertices forward them according to their [`WidthPolicy`]:
//!
//! - `Concatenate` forwards the sum over its input slots
//! - `PassThrough` forwards the change of its shared input width
//! - no policy aborts the whole call
//!
//! Layers absorb the sum of their arriving changes into their input width.
//! All edits are staged on copies of the affected layer configs and
//! committed onto a copy of the graph only when propagation succeeded.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::config::MutationConfig;
use crate::error::{EvolveError, Result};
use crate::graph::{shifted_width, Graph, LayerConfig, VertexOp, WidthPolicy};
use crate::state::Mutation;

/// New output width from the current one
pub type ResizeFn = Arc<dyn Fn(usize) -> usize + Send + Sync>;

struct PendingEdits<'g> {
    graph: &'g Graph,
    staged: HashMap<&'g str, LayerConfig>,
    order: Vec<&'g str>,
    /// Output width change per vertex, old minus new
    deltas: HashMap<&'g str, i64>,
}

impl<'g> PendingEdits<'g> {
    fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            staged: HashMap::new(),
            order: Vec::new(),
            deltas: HashMap::new(),
        }
    }

    /// Staged config for `name`, copied from the graph on first touch
    fn staged_layer(&mut self, name: &'g str) -> Result<&mut LayerConfig> {
        if !self.staged.contains_key(name) {
            let graph = self.graph;
            let vertex = graph.vertex(name).ok_or_else(|| EvolveError::VertexNotFound {
                vertex: name.to_string(),
            })?;
            let config = vertex.op.as_layer().ok_or_else(|| EvolveError::NotALayer {
                vertex: name.to_string(),
            })?;
            self.staged.insert(name, config.clone());
            self.order.push(name);
        }
        self.staged.get_mut(name).ok_or_else(|| EvolveError::VertexNotFound {
            vertex: name.to_string(),
        })
    }

    fn resize(&mut self, target: &'g str, resize: &dyn Fn(usize) -> usize) -> Result<()> {
        let config = self.staged_layer(target)?;
        let old = config.n_out();
        let delta = old as i64 - resize(old) as i64;
        config.set_n_out(shifted_width(target, old, delta)?);

        debug!(vertex = target, old, new = config.n_out(), "resizing output");
        if delta != 0 {
            self.deltas.insert(target, delta);
        }
        Ok(())
    }

    /// Carry the staged output changes to every downstream input width
    fn propagate(&mut self) -> Result<()> {
        if self.deltas.is_empty() {
            return Ok(());
        }
        let graph = self.graph;
        for vertex in graph.topological_vertices()? {
            let name = vertex.name.as_str();
            let arriving: Vec<i64> = vertex
                .inputs
                .iter()
                .map(|input| self.deltas.get(input.as_str()).copied().unwrap_or(0))
                .collect();
            if arriving.iter().all(|delta| *delta == 0) {
                continue;
            }

            match &vertex.op {
                VertexOp::Layer(_) => {
                    let delta: i64 = arriving.iter().sum();
                    trace!(vertex = name, delta, "input width absorbed");
                    self.staged_layer(name)?.absorb_input_delta(name, delta)?;
                }
                VertexOp::Structural(kind) => {
                    let delta: i64 = match kind.width_policy() {
                        Some(WidthPolicy::Concatenate) => arriving.iter().sum(),
                        Some(WidthPolicy::PassThrough) => shared_delta(name, &arriving),
                        None => {
                            return Err(EvolveError::UnsupportedVertexKind {
                                vertex: name.to_string(),
                                kind: kind.name().to_string(),
                            });
                        }
                    };
                    trace!(vertex = name, kind = kind.name(), delta, "forwarding width change");
                    self.deltas.insert(name, delta);
                }
            }
        }
        Ok(())
    }

    fn commit(self) -> Result<Graph> {
        let mut graph = self.graph.clone();
        let mut staged = self.staged;
        for name in self.order {
            if let Some(config) = staged.remove(name) {
                graph.set_op(name, VertexOp::Layer(config))?;
            }
        }
        Ok(graph)
    }
}

/// Change of a vertex whose inputs all share one width.
///
/// Inputs that did not change are ignored.
fn shared_delta(name: &str, arriving: &[i64]) -> i64 {
    let mut changed = arriving.iter().copied().filter(|delta| *delta != 0);
    let delta = changed.next().unwrap_or(0);
    if changed.any(|other| other != delta) {
        warn!(vertex = name, ?arriving, "inputs of a shared-width vertex changed by different amounts");
    }
    delta
}

/// Resize the output width of each target layer and propagate the change
/// to every downstream input width.
///
/// Each target is resized exactly once. The input graph is never modified.
pub fn mutate_nout<I, S, F>(graph: &Graph, targets: I, resize: F) -> Result<Graph>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: Fn(usize) -> usize,
{
    let targets: Vec<S> = targets.into_iter().collect();
    let mut seen = HashSet::new();
    for target in &targets {
        if !seen.insert(target.as_ref()) {
            return Err(EvolveError::LabelCollision {
                name: target.as_ref().to_string(),
            });
        }
    }

    let mut edits = PendingEdits::new(graph);
    for target in &targets {
        let name = graph
            .vertex(target.as_ref())
            .map(|v| v.name.as_str())
            .ok_or_else(|| EvolveError::VertexNotFound {
                vertex: target.as_ref().to_string(),
            })?;
        edits.resize(name, &resize)?;
    }
    edits.propagate()?;

    let touched = edits.order.len();
    let mutated = edits.commit()?;
    debug!(targets = targets.len(), touched, "width mutation applied");
    Ok(mutated)
}

/// [`mutate_nout`] as a clonable strategy
#[derive(Clone)]
pub struct NoutMutation {
    targets: Vec<String>,
    resize: ResizeFn,
}

impl NoutMutation {
    pub fn new<I, S, F>(targets: I, resize: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(usize) -> usize + Send + Sync + 'static,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            resize: Arc::new(resize),
        }
    }

    /// Like [`NoutMutation::new`], never shrinking a layer below the
    /// configured minimum width
    pub fn from_config<I, S, F>(targets: I, config: &MutationConfig, resize: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(usize) -> usize + Send + Sync + 'static,
    {
        let min_width = config.min_width;
        Self::new(targets, move |n| resize(n).max(min_width))
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }
}

impl fmt::Debug for NoutMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoutMutation")
            .field("targets", &self.targets)
            .finish_non_exhaustive()
    }
}

impl Mutation<Graph> for NoutMutation {
    fn mutate(&mut self, candidate: &Graph) -> Result<Graph> {
        mutate_nout(candidate, &self.targets, |n| (self.resize)(n))
    }

    fn box_clone(&self) -> Box<dyn Mutation<Graph>> {
        Box::new(self.clone())
    }
}
