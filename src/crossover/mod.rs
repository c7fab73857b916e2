//! Crossover Module
//!
//! Depth-based splicing of two parent graphs into one offspring:
//! - `PointSelection` cut thresholds and selectors (fixed, seeded random)
//! - `crossover` and the `SinglePoint` strategy

mod point;
mod single_point;

pub use point::{FixedPoints, PointSelection, PointSelector, RandomPoints};
pub use single_point::{crossover, SinglePoint};
