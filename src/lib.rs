//! nasgraft - Architecture Crossover and Mutation
//!
//! nasgraft produces new neural network architectures from existing ones.
//! An architecture is a DAG of named vertices (layers with declared
//! feature widths, and structural operations such as merges and
//! element-wise sums). Two kinds of operators are provided:
//! 1. Crossover - splice two parent graphs at a normalized depth cut
//! 2. Mutation - replace or insert layers, resize layer widths with
//!    downstream propagation
//!
//! # Architecture
//!
//! - `graph`: vertex/graph model, depth queries, provenance
//! - `state`: strategy traits and the state they clone, merge and persist
//! - `mutate` / `crossover`: the operators, as functions and as strategies
//!
//! Operators never modify their inputs. Training, tensors and building
//! executable models are left to the caller's ML framework.

pub mod config;
pub mod crossover;
pub mod error;
pub mod graph;
pub mod mutate;
pub mod state;

pub use config::EvolveConfig;
pub use error::{EvolveError, Result};
