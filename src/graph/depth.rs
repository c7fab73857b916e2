//! Depth and ordering queries
//!
//! Depth of a vertex is the number of vertices on the longest path from
//! the input boundary up to (not including) it, so vertices fed only by
//! boundary markers sit at depth 0. Normalized depth maps that onto
//! [-1, 1] per graph: -1 next to the input boundary, +1 at the deepest sink.

use std::collections::HashMap;

use super::dag::Graph;
use super::vertex::Vertex;
use crate::error::{EvolveError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// On the current DFS path
    Gray,
    /// Finished
    Black,
}

/// Result of one DFS over the whole graph
struct Walk {
    /// Vertex indices, every vertex after all of its inputs
    order: Vec<usize>,
    /// Depth per vertex index
    depths: Vec<usize>,
}

impl Graph {
    /// Depth-first walk with three-color cycle detection
    fn walk(&self) -> Result<Walk> {
        let mut marks: HashMap<usize, Mark> = HashMap::with_capacity(self.len());
        let mut depths = vec![0usize; self.len()];
        let mut order = Vec::with_capacity(self.len());

        for root in 0..self.len() {
            if marks.contains_key(&root) {
                continue;
            }
            let mut stack = vec![(root, false)];
            while let Some((current, expanded)) = stack.pop() {
                let vertex = self.vertex_at(current);
                if expanded {
                    depths[current] = vertex
                        .inputs
                        .iter()
                        .filter_map(|input| self.index_of(input))
                        .map(|i| depths[i] + 1)
                        .max()
                        .unwrap_or(0);
                    marks.insert(current, Mark::Black);
                    order.push(current);
                    continue;
                }
                match marks.get(&current) {
                    Some(Mark::Black) => continue,
                    // Only descendants of a gray vertex sit above it on the stack
                    Some(Mark::Gray) => {
                        return Err(EvolveError::Cycle {
                            vertex: vertex.name.clone(),
                        })
                    }
                    None => {}
                }
                marks.insert(current, Mark::Gray);
                stack.push((current, true));
                for input in vertex.inputs.iter().rev() {
                    match self.index_of(input) {
                        Some(i) => stack.push((i, false)),
                        None if self.is_input(input) => {}
                        None => {
                            return Err(EvolveError::DanglingInput {
                                vertex: vertex.name.clone(),
                                input: input.clone(),
                            })
                        }
                    }
                }
            }
        }

        Ok(Walk { order, depths })
    }

    /// Vertex names ordered so that every vertex follows all of its inputs
    pub fn topological_order(&self) -> Result<Vec<String>> {
        Ok(self
            .topological_vertices()?
            .into_iter()
            .map(|v| v.name.clone())
            .collect())
    }

    pub(crate) fn topological_vertices(&self) -> Result<Vec<&Vertex>> {
        let walk = self.walk()?;
        Ok(walk.order.into_iter().map(|i| self.vertex_at(i)).collect())
    }

    /// Depth of every vertex, in graph order
    pub fn depths(&self) -> Result<Vec<(String, usize)>> {
        let walk = self.walk()?;
        Ok(self
            .vertices()
            .zip(walk.depths)
            .map(|(v, d)| (v.name.clone(), d))
            .collect())
    }

    /// Longest-path depth of a single vertex
    pub fn depth_of(&self, name: &str) -> Result<usize> {
        let index = self.index_of(name).ok_or_else(|| EvolveError::VertexNotFound {
            vertex: name.to_string(),
        })?;
        let walk = self.walk()?;
        Ok(walk.depths[index])
    }

    /// Depth of the deepest vertex; graphs of depth 0 report 1
    pub fn max_depth(&self) -> Result<usize> {
        let walk = self.walk()?;
        Ok(normalizer(&walk.depths))
    }

    /// Normalized depth of every vertex, in graph order
    pub fn normalized_depths(&self) -> Result<Vec<(String, f64)>> {
        if self.is_empty() {
            return Err(EvolveError::EmptyGraph);
        }
        let walk = self.walk()?;
        let max = normalizer(&walk.depths) as f64;
        Ok(self
            .vertices()
            .zip(walk.depths)
            .map(|(v, d)| (v.name.clone(), 2.0 * d as f64 / max - 1.0))
            .collect())
    }

    /// `2 * depth / maxDepth - 1` for a single vertex
    pub fn normalized_depth(&self, name: &str) -> Result<f64> {
        let depth = self.depth_of(name)?;
        let max = self.max_depth()?;
        Ok(2.0 * depth as f64 / max as f64 - 1.0)
    }
}

fn normalizer(depths: &[usize]) -> usize {
    depths.iter().copied().max().unwrap_or(0).max(1)
}
