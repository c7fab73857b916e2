//! Single point crossover
//!
//! The offspring takes the input-side fragment of the first parent (every
//! vertex at or below the first cut) and the output-side fragment of the
//! second parent (every vertex above the second cut). Inputs of the second
//! fragment that pointed at discarded vertices are redirected to the sinks
//! of the first fragment, or to the first parent's input boundary when the
//! first fragment is empty.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace, warn};
use uuid::Uuid;

use super::point::{PointSelection, PointSelector, RandomPoints};
use crate::config::CrossoverConfig;
use crate::error::{EvolveError, Result};
use crate::graph::{splice_inputs, Graph, GraphInfo};
use crate::state::Crossover;

fn kept_vertices<F>(graph: &Graph, keep: F) -> Result<HashSet<String>>
where
    F: Fn(f64) -> bool,
{
    if graph.is_empty() {
        return Ok(HashSet::new());
    }
    Ok(graph
        .normalized_depths()?
        .into_iter()
        .filter(|(_, depth)| keep(*depth))
        .map(|(name, _)| name)
        .collect())
}

/// Splice `a` and `b` at the given cut points.
///
/// Neither parent is modified. Every vertex of the result is attributed
/// to exactly one parent.
pub fn crossover(a: &GraphInfo, b: &GraphInfo, points: PointSelection) -> Result<GraphInfo> {
    let graph_a = a.graph();
    let graph_b = b.graph();
    graph_a.validate()?;
    graph_b.validate()?;

    let kept_a = kept_vertices(graph_a, |depth| depth <= points.first())?;
    let kept_b = kept_vertices(graph_b, |depth| depth > points.second())?;
    if kept_a.is_empty() && kept_b.is_empty() {
        return Err(EvolveError::EmptyGraph);
    }

    for name in &kept_b {
        if kept_a.contains(name) || graph_a.is_input(name) {
            return Err(EvolveError::NameCollision { name: name.clone() });
        }
    }

    let mut offspring = graph_a.subgraph(&kept_a);
    let targets = if kept_a.is_empty() {
        warn!(
            cut = points.first(),
            "no vertex of the first parent is kept, rewiring to its input boundary"
        );
        graph_a.input_names().to_vec()
    } else {
        offspring.sinks()
    };

    let mut provenance: HashMap<String, Uuid> = kept_a.iter().map(|name| (name.clone(), a.id())).collect();

    for vertex in graph_b.vertices().filter(|v| kept_b.contains(&v.name)) {
        let redirected = splice_inputs(
            &vertex.inputs,
            |input| !kept_b.contains(input) && !graph_b.is_input(input),
            &targets,
        );
        let inputs = splice_inputs(
            &redirected,
            |input| graph_b.is_input(input) && !kept_a.contains(input) && !kept_b.contains(input),
            graph_a.input_names(),
        );
        if inputs != vertex.inputs {
            trace!(vertex = %vertex.name, from = ?vertex.inputs, to = ?inputs, "rewired");
        }

        let mut spliced = vertex.clone();
        spliced.inputs = inputs;
        offspring.push_vertex(spliced)?;
        provenance.insert(vertex.name.clone(), b.id());
    }
    offspring.validate()?;

    debug!(
        first_cut = points.first(),
        second_cut = points.second(),
        kept_first = kept_a.len(),
        kept_second = kept_b.len(),
        "crossover applied"
    );
    GraphInfo::bred(offspring, provenance, vec![a.id(), b.id()])
}

/// [`crossover`] with cut points drawn from a selector
#[derive(Debug, Clone)]
pub struct SinglePoint<S> {
    selector: S,
}

impl<S: PointSelector> SinglePoint<S> {
    pub fn new(selector: S) -> Self {
        Self { selector }
    }

    pub fn selector(&self) -> &S {
        &self.selector
    }
}

impl SinglePoint<RandomPoints> {
    pub fn from_config(config: &CrossoverConfig) -> Result<Self> {
        Ok(Self::new(RandomPoints::from_config(config)?))
    }
}

impl<S> Crossover<GraphInfo> for SinglePoint<S>
where
    S: PointSelector + Clone + 'static,
{
    fn cross(&mut self, a: &GraphInfo, b: &GraphInfo) -> Result<GraphInfo> {
        let points = self.selector.select();
        crossover(a, b, points)
    }

    fn box_clone(&self) -> Box<dyn Crossover<GraphInfo>> {
        Box::new(self.clone())
    }
}
