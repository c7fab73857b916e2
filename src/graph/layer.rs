//! Layer configuration
//!
//! A layer is opaque to the engine apart from its declared feature widths.
//! Kind-specific settings (kernel size, activation, ...) ride along in
//! `params` and are carried unchanged through every edit.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EvolveError, Result};

/// Configuration of a single layer vertex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Type of layer (e.g., "dense", "conv2d", "batchnorm")
    pub kind: String,
    /// Declared input feature width
    n_in: usize,
    /// Declared output feature width
    n_out: usize,
    /// Layer-specific parameters as JSON
    #[serde(default = "empty_params")]
    pub params: Value,
}

fn empty_params() -> Value {
    Value::Object(serde_json::Map::new())
}

impl LayerConfig {
    /// Create a new layer config with no extra parameters
    pub fn new(kind: impl Into<String>, n_in: usize, n_out: usize) -> Self {
        Self {
            kind: kind.into(),
            n_in,
            n_out,
            params: empty_params(),
        }
    }

    /// Create a new layer config with specific parameters
    pub fn with_params(kind: impl Into<String>, n_in: usize, n_out: usize, params: Value) -> Self {
        Self {
            kind: kind.into(),
            n_in,
            n_out,
            params,
        }
    }

    /// Declared input feature width
    pub fn n_in(&self) -> usize {
        self.n_in
    }

    /// Declared output feature width
    pub fn n_out(&self) -> usize {
        self.n_out
    }

    pub fn set_n_in(&mut self, n_in: usize) {
        self.n_in = n_in;
    }

    pub fn set_n_out(&mut self, n_out: usize) {
        self.n_out = n_out;
    }

    /// Shrink the declared input width by `delta` (grow when negative).
    ///
    /// `vertex` is only used to label the error.
    pub fn absorb_input_delta(&mut self, vertex: &str, delta: i64) -> Result<()> {
        self.n_in = shifted_width(vertex, self.n_in, delta)?;
        Ok(())
    }

    /// Get a specific parameter value
    pub fn get_param(&self, key: &str) -> Option<&Value> {
        match self.params {
            Value::Object(ref map) => map.get(key),
            _ => None,
        }
    }

    /// Update a specific parameter
    pub fn set_param(&mut self, key: &str, value: Value) {
        if let Value::Object(ref mut map) = self.params {
            map.insert(key.to_string(), value);
        }
    }
}

/// `width - delta`, rejecting results that are not positive
pub(crate) fn shifted_width(vertex: &str, width: usize, delta: i64) -> Result<usize> {
    let shifted = width as i64 - delta;
    if shifted <= 0 {
        return Err(EvolveError::InvalidWidth {
            vertex: vertex.to_string(),
            width: shifted,
        });
    }
    Ok(shifted as usize)
}
