//! Named-vertex DAG
//!
//! Vertices are kept in insertion order so that every query returning a
//! list of names (sinks, consumers, topological order) is deterministic.
//! Edges live in each vertex's ordered input list; an input name refers
//! either to another vertex or to one of the graph's input boundary
//! markers.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::layer::LayerConfig;
use super::vertex::{StructuralKind, Vertex, VertexOp};
use crate::error::{EvolveError, Result};

/// A computation graph: input boundary markers plus named vertices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GraphRepr", into = "GraphRepr")]
pub struct Graph {
    inputs: Vec<String>,
    vertices: Vec<Vertex>,
    index: HashMap<String, usize>,
}

/// Serialized form (the name index is rebuilt on load)
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GraphRepr {
    inputs: Vec<String>,
    vertices: Vec<Vertex>,
}

impl From<GraphRepr> for Graph {
    fn from(repr: GraphRepr) -> Self {
        let mut graph = Graph {
            inputs: repr.inputs,
            vertices: repr.vertices,
            index: HashMap::new(),
        };
        graph.reindex();
        graph
    }
}

impl From<Graph> for GraphRepr {
    fn from(graph: Graph) -> Self {
        GraphRepr {
            inputs: graph.inputs,
            vertices: graph.vertices,
        }
    }
}

impl Graph {
    /// Create an empty graph with the given input boundary markers
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            vertices: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Input boundary markers, in declaration order
    pub fn input_names(&self) -> &[String] {
        &self.inputs
    }

    /// Check if `name` is an input boundary marker
    pub fn is_input(&self, name: &str) -> bool {
        self.inputs.iter().any(|i| i == name)
    }

    /// Add a vertex at the end of the graph.
    ///
    /// Inputs are not checked here; a graph may be assembled in any order
    /// and is checked as a whole by [`Graph::validate`].
    pub fn add_vertex<I, S>(&mut self, name: impl Into<String>, op: impl Into<VertexOp>, inputs: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        if self.contains(&name) || self.is_input(&name) {
            return Err(EvolveError::DuplicateVertex { vertex: name });
        }
        let inputs = inputs.into_iter().map(Into::into).collect();
        self.index.insert(name.clone(), self.vertices.len());
        self.vertices.push(Vertex::new(name, op, inputs));
        Ok(())
    }

    /// Add a layer vertex
    pub fn add_layer<I, S>(&mut self, name: impl Into<String>, config: LayerConfig, inputs: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_vertex(name, VertexOp::Layer(config), inputs)
    }

    /// Add a structural vertex
    pub fn add_structural<I, S>(&mut self, name: impl Into<String>, kind: StructuralKind, inputs: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_vertex(name, VertexOp::Structural(kind), inputs)
    }

    /// Remove a vertex and hand its inputs to its consumers.
    ///
    /// Each consumer's reference to the removed vertex is replaced, in
    /// place, by the removed vertex's own inputs.
    pub fn remove_vertex_keep_connections(&mut self, name: &str) -> Result<Vertex> {
        let position = self.position(name)?;
        let removed = self.vertices.remove(position);
        for vertex in &mut self.vertices {
            if vertex.inputs.iter().any(|i| i == name) {
                vertex.inputs = splice_inputs(&vertex.inputs, |i| i == name, &removed.inputs);
            }
        }
        self.reindex();
        Ok(removed)
    }

    /// Replace the operation and inputs of an existing vertex, keeping its position
    pub fn replace_vertex(&mut self, name: &str, op: VertexOp, inputs: Vec<String>) -> Result<()> {
        let position = self.position(name)?;
        let vertex = &mut self.vertices[position];
        vertex.op = op;
        vertex.inputs = inputs;
        Ok(())
    }

    /// Replace the operation of an existing vertex
    pub fn set_op(&mut self, name: &str, op: VertexOp) -> Result<()> {
        let position = self.position(name)?;
        self.vertices[position].op = op;
        Ok(())
    }

    /// Replace the input list of an existing vertex
    pub fn set_inputs(&mut self, name: &str, inputs: Vec<String>) -> Result<()> {
        let position = self.position(name)?;
        self.vertices[position].inputs = inputs;
        Ok(())
    }

    /// Get a vertex by name
    pub fn vertex(&self, name: &str) -> Option<&Vertex> {
        self.index.get(name).map(|&i| &self.vertices[i])
    }

    /// Get the layer config of a vertex, if it is a layer
    pub fn layer(&self, name: &str) -> Option<&LayerConfig> {
        self.vertex(name).and_then(|v| v.op.as_layer())
    }

    /// Ordered inputs of a vertex
    pub fn inputs_of(&self, name: &str) -> Result<&[String]> {
        self.vertex(name)
            .map(|v| v.inputs.as_slice())
            .ok_or_else(|| EvolveError::VertexNotFound {
                vertex: name.to_string(),
            })
    }

    /// Vertices that list `name` among their inputs, in graph order
    pub fn consumers_of(&self, name: &str) -> Vec<&str> {
        self.vertices
            .iter()
            .filter(|v| v.inputs.iter().any(|i| i == name))
            .map(|v| v.name.as_str())
            .collect()
    }

    /// Vertices with no consumer within the graph, in graph order
    pub fn sinks(&self) -> Vec<String> {
        let consumed: HashSet<&str> = self
            .vertices
            .iter()
            .flat_map(|v| v.inputs.iter().map(String::as_str))
            .collect();
        self.vertices
            .iter()
            .filter(|v| !consumed.contains(v.name.as_str()))
            .map(|v| v.name.clone())
            .collect()
    }

    /// Copy of the inputs of every vertex
    pub fn vertex_inputs(&self) -> HashMap<String, Vec<String>> {
        self.vertices
            .iter()
            .map(|v| (v.name.clone(), v.inputs.clone()))
            .collect()
    }

    /// Restrict the graph to the named vertices, keeping their inputs as-is.
    ///
    /// Inputs pointing outside the kept set are left dangling; callers are
    /// expected to rewire them.
    pub fn subgraph(&self, keep: &HashSet<String>) -> Graph {
        let mut graph = Graph::new(self.inputs.clone());
        graph.vertices = self
            .vertices
            .iter()
            .filter(|v| keep.contains(&v.name))
            .cloned()
            .collect();
        graph.reindex();
        graph
    }

    /// Check that every input reference resolves and that the graph is acyclic
    pub fn validate(&self) -> Result<()> {
        for vertex in &self.vertices {
            for input in &vertex.inputs {
                if !self.contains(input) && !self.is_input(input) {
                    return Err(EvolveError::DanglingInput {
                        vertex: vertex.name.clone(),
                        input: input.clone(),
                    });
                }
            }
        }
        self.topological_order().map(|_| ())
    }

    /// Hex SHA-256 over the graph's structure.
    ///
    /// Independent of vertex insertion order; two graphs with the same
    /// boundary, vertex set, operations and edges hash equally.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        let mut inputs: Vec<&String> = self.inputs.iter().collect();
        inputs.sort();
        for input in inputs {
            hasher.update(b"in:");
            hasher.update(input.as_bytes());
            hasher.update(b"\n");
        }
        let mut vertices: Vec<&Vertex> = self.vertices.iter().collect();
        vertices.sort_by(|a, b| a.name.cmp(&b.name));
        for vertex in vertices {
            hasher.update(b"v:");
            hasher.update(vertex.name.as_bytes());
            hasher.update(b"|");
            // Serializing a VertexOp cannot fail: all keys are strings.
            let op = serde_json::to_string(&vertex.op).unwrap_or_default();
            hasher.update(op.as_bytes());
            hasher.update(b"|");
            hasher.update(vertex.inputs.join(",").as_bytes());
            hasher.update(b"\n");
        }
        format!("{:x}", hasher.finalize())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate over vertices in graph order
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    /// Vertex names in graph order
    pub fn vertex_names(&self) -> Vec<&str> {
        self.vertices.iter().map(|v| v.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub(crate) fn vertex_at(&self, index: usize) -> &Vertex {
        &self.vertices[index]
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Append an already-built vertex, used when assembling graphs from parts
    pub(crate) fn push_vertex(&mut self, vertex: Vertex) -> Result<()> {
        if self.contains(&vertex.name) || self.is_input(&vertex.name) {
            return Err(EvolveError::DuplicateVertex { vertex: vertex.name });
        }
        self.index.insert(vertex.name.clone(), self.vertices.len());
        self.vertices.push(vertex);
        Ok(())
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.index_of(name).ok_or_else(|| EvolveError::VertexNotFound {
            vertex: name.to_string(),
        })
    }

    fn reindex(&mut self) {
        self.index = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (v.name.clone(), i))
            .collect();
    }
}

/// Replace every input matching `is_target` with `replacement`, in place.
///
/// Untouched slots are kept as they are, duplicates included. A replacement
/// name is left out when the list already feeds from it, so a substitution
/// never introduces a duplicate edge.
pub(crate) fn splice_inputs<F>(inputs: &[String], is_target: F, replacement: &[String]) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    let untouched: HashSet<&str> = inputs
        .iter()
        .filter(|i| !is_target(i.as_str()))
        .map(String::as_str)
        .collect();
    let mut added: HashSet<&str> = HashSet::new();

    let mut spliced: Vec<String> = Vec::with_capacity(inputs.len() + replacement.len());
    for input in inputs {
        if !is_target(input) {
            spliced.push(input.clone());
            continue;
        }
        for name in replacement {
            if !untouched.contains(name.as_str()) && added.insert(name.as_str()) {
                spliced.push(name.clone());
            }
        }
    }
    spliced
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chain() -> Graph {
        let mut graph = Graph::new(["input"]);
        graph.add_layer("a", LayerConfig::new("dense", 4, 8), ["input"]).unwrap();
        graph.add_layer("b", LayerConfig::new("dense", 8, 8), ["a"]).unwrap();
        graph.add_layer("c", LayerConfig::new("dense", 8, 2), ["b"]).unwrap();
        graph
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let mut graph = chain();
        let err = graph
            .add_layer("b", LayerConfig::new("dense", 1, 1), ["a"])
            .unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_VERTEX");
        let err = graph
            .add_layer("input", LayerConfig::new("dense", 1, 1), ["a"])
            .unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_VERTEX");
    }

    #[test]
    fn test_sinks_and_consumers() {
        let mut graph = chain();
        graph.add_layer("side", LayerConfig::new("dense", 8, 3), ["a"]).unwrap();
        assert_eq!(graph.sinks(), vec!["c".to_string(), "side".to_string()]);
        assert_eq!(graph.consumers_of("a"), vec!["b", "side"]);
        assert!(graph.consumers_of("c").is_empty());
    }

    #[test]
    fn test_remove_keep_connections() {
        let mut graph = chain();
        let removed = graph.remove_vertex_keep_connections("b").unwrap();
        assert_eq!(removed.name, "b");
        assert_eq!(graph.inputs_of("c").unwrap(), ["a".to_string()]);
        assert!(!graph.contains("b"));
        assert_eq!(graph.vertex_names(), vec!["a", "c"]);
        graph.validate().unwrap();
    }

    #[test]
    fn test_remove_keeps_slot_order() {
        let mut graph = Graph::new(["input"]);
        graph.add_layer("x", LayerConfig::new("dense", 1, 1), ["input"]).unwrap();
        graph.add_layer("y", LayerConfig::new("dense", 1, 1), ["input"]).unwrap();
        graph.add_structural("m", StructuralKind::Merge, ["x", "y"]).unwrap();
        graph.add_layer("z", LayerConfig::new("dense", 1, 1), ["input"]).unwrap();
        graph.add_structural("out", StructuralKind::Merge, ["z", "m", "x"]).unwrap();

        graph.remove_vertex_keep_connections("m").unwrap();
        assert_eq!(
            graph.inputs_of("out").unwrap(),
            ["z".to_string(), "y".to_string(), "x".to_string()]
        );
    }

    #[test]
    fn test_validate_dangling() {
        let mut graph = chain();
        graph.add_layer("d", LayerConfig::new("dense", 1, 1), ["ghost"]).unwrap();
        let err = graph.validate().unwrap_err();
        assert!(matches!(err, EvolveError::DanglingInput { ref input, .. } if input == "ghost"));
    }

    #[test]
    fn test_fingerprint_ignores_insertion_order() {
        let graph = chain();
        let mut reordered = Graph::new(["input"]);
        reordered.add_layer("c", LayerConfig::new("dense", 8, 2), ["b"]).unwrap();
        reordered.add_layer("a", LayerConfig::new("dense", 4, 8), ["input"]).unwrap();
        reordered.add_layer("b", LayerConfig::new("dense", 8, 8), ["a"]).unwrap();
        assert_eq!(graph.fingerprint(), reordered.fingerprint());

        reordered.set_op("b", VertexOp::layer("dense", 8, 9)).unwrap();
        assert_ne!(graph.fingerprint(), reordered.fingerprint());
    }

    #[test]
    fn test_serde_rebuilds_index() {
        let graph = chain();
        let json = serde_json::to_string(&graph).unwrap();
        let loaded: Graph = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, graph);
        assert!(loaded.contains("b"));
    }

    #[test]
    fn test_splice_inputs_dedupes() {
        let inputs = vec!["k".to_string(), "gone".to_string(), "other".to_string()];
        let spliced = splice_inputs(
            &inputs,
            |i| i == "gone" || i == "other",
            &["s1".to_string(), "k".to_string()],
        );
        assert_eq!(spliced, vec!["k".to_string(), "s1".to_string()]);
    }

    #[test]
    fn test_splice_keeps_untouched_duplicates() {
        let inputs: Vec<String> = ["a", "a", "gone"].iter().map(|s| s.to_string()).collect();
        let spliced = splice_inputs(&inputs, |i| i == "gone", &["a".to_string(), "b".to_string()]);
        assert_eq!(spliced, vec!["a".to_string(), "a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_remove_keeps_duplicate_edges() {
        let mut graph = Graph::new(["input"]);
        graph.add_layer("a", LayerConfig::new("dense", 1, 2), ["input"]).unwrap();
        graph.add_layer("m", LayerConfig::new("dense", 2, 2), ["a"]).unwrap();
        graph.add_structural("cat", StructuralKind::Merge, ["a", "a", "m"]).unwrap();

        graph.remove_vertex_keep_connections("m").unwrap();
        assert_eq!(graph.inputs_of("cat").unwrap(), ["a".to_string(), "a".to_string()]);
        graph.validate().unwrap();
    }
}
