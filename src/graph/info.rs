//! Graph plus provenance
//!
//! Every vertex of a `GraphInfo` is tagged with the id of the info that
//! contributed it. Freshly authored graphs tag everything with their own
//! id; crossover children tag each vertex with the parent it came from.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dag::Graph;
use crate::error::{EvolveError, Result};

/// A graph together with per-vertex provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphInfo {
    id: Uuid,
    graph: Graph,
    /// Vertex name to id of the contributing info
    provenance: HashMap<String, Uuid>,
    /// Ids of the infos this one was bred from (empty for authored graphs)
    parents: Vec<Uuid>,
}

impl GraphInfo {
    /// Wrap a freshly authored graph; every vertex is attributed to it
    pub fn new(graph: Graph) -> Self {
        let id = Uuid::new_v4();
        let provenance = graph.vertices().map(|v| (v.name.clone(), id)).collect();
        Self {
            id,
            graph,
            provenance,
            parents: Vec::new(),
        }
    }

    /// Assemble a bred graph from explicit provenance.
    ///
    /// Every vertex must be attributed exactly once.
    pub(crate) fn bred(graph: Graph, provenance: HashMap<String, Uuid>, parents: Vec<Uuid>) -> Result<Self> {
        for vertex in graph.vertices() {
            if !provenance.contains_key(&vertex.name) {
                return Err(EvolveError::VertexNotFound {
                    vertex: vertex.name.clone(),
                });
            }
        }
        let provenance = provenance
            .into_iter()
            .filter(|(name, _)| graph.contains(name))
            .collect();
        Ok(Self {
            id: Uuid::new_v4(),
            graph,
            provenance,
            parents,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// Ids of the parents this graph was bred from
    pub fn lineage(&self) -> &[Uuid] {
        &self.parents
    }

    /// Id of the info that contributed `vertex`
    pub fn origin_of(&self, vertex: &str) -> Option<Uuid> {
        self.provenance.get(vertex).copied()
    }

    /// Names of the vertices contributed by `parent`
    pub fn vertices_from(&self, parent: &GraphInfo) -> HashSet<String> {
        self.vertices_from_id(parent.id)
    }

    /// Names of the vertices contributed by the info with id `origin`
    pub fn vertices_from_id(&self, origin: Uuid) -> HashSet<String> {
        self.provenance
            .iter()
            .filter(|(_, id)| **id == origin)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Replace the graph with an edited version of it.
    ///
    /// Surviving vertices keep their tags; vertices the edit introduced are
    /// attributed to this info. The id stays the same: an edit is not a
    /// new individual.
    pub fn map_graph<F>(&self, edit: F) -> Result<GraphInfo>
    where
        F: FnOnce(&Graph) -> Result<Graph>,
    {
        let graph = edit(&self.graph)?;
        let provenance = graph
            .vertices()
            .map(|v| {
                let origin = self.provenance.get(&v.name).copied().unwrap_or(self.id);
                (v.name.clone(), origin)
            })
            .collect();
        Ok(GraphInfo {
            id: self.id,
            graph,
            provenance,
            parents: self.parents.clone(),
        })
    }
}
