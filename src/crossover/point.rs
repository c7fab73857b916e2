//! Cut point selection

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::CrossoverConfig;
use crate::error::{EvolveError, Result};

/// Pair of normalized-depth thresholds.
///
/// Vertices of the first parent at or below `first` and vertices of the
/// second parent strictly above `second` survive into the offspring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSelection {
    first: f64,
    second: f64,
}

impl PointSelection {
    pub fn new(first: f64, second: f64) -> Result<Self> {
        for value in [first, second] {
            if !(-1.0..=1.0).contains(&value) {
                return Err(EvolveError::InvalidPointSelection { value });
            }
        }
        Ok(Self { first, second })
    }

    /// Same threshold for both parents
    pub fn at(point: f64) -> Result<Self> {
        Self::new(point, point)
    }

    pub fn first(&self) -> f64 {
        self.first
    }

    pub fn second(&self) -> f64 {
        self.second
    }
}

/// Source of cut points for repeated crossovers
pub trait PointSelector: Send + Sync {
    fn select(&mut self) -> PointSelection;

    fn box_clone(&self) -> Box<dyn PointSelector>;
}

impl Clone for Box<dyn PointSelector> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Always returns the same selection
#[derive(Debug, Clone, Copy)]
pub struct FixedPoints(pub PointSelection);

impl PointSelector for FixedPoints {
    fn select(&mut self) -> PointSelection {
        self.0
    }

    fn box_clone(&self) -> Box<dyn PointSelector> {
        Box::new(*self)
    }
}

/// Draws both thresholds uniformly from `[min, max]`
#[derive(Debug, Clone)]
pub struct RandomPoints {
    min: f64,
    max: f64,
    rng: StdRng,
}

impl RandomPoints {
    pub fn new(min: f64, max: f64, seed: Option<u64>) -> Result<Self> {
        let bounds = PointSelection::new(min, max)?;
        if bounds.first > bounds.second {
            return Err(EvolveError::InvalidConfig {
                reason: format!("cut point range is empty: [{}, {}]", min, max),
            });
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { min, max, rng })
    }

    pub fn from_config(config: &CrossoverConfig) -> Result<Self> {
        Self::new(config.min_point, config.max_point, config.seed)
    }

    fn draw(&mut self) -> f64 {
        if self.min == self.max {
            self.min
        } else {
            self.rng.gen_range(self.min..=self.max)
        }
    }
}

impl PointSelector for RandomPoints {
    fn select(&mut self) -> PointSelection {
        let first = self.draw();
        let second = self.draw();
        PointSelection { first, second }
    }

    fn box_clone(&self) -> Box<dyn PointSelector> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(-1.0, 1.0, true ; "full range")]
    #[test_case(-1.5, 0.0, false ; "first below range")]
    #[test_case(0.0, 1.01, false ; "second above range")]
    #[test_case(f64::NAN, 0.0, false ; "not a number")]
    fn test_point_selection_bounds(first: f64, second: f64, ok: bool) {
        assert_eq!(PointSelection::new(first, second).is_ok(), ok);
    }

    #[test]
    fn test_seeded_points_repeat() {
        let mut a = RandomPoints::new(-0.5, 0.5, Some(7)).unwrap();
        let mut b = RandomPoints::new(-0.5, 0.5, Some(7)).unwrap();
        for _ in 0..10 {
            let selection = a.select();
            assert_eq!(selection, b.select());
            assert!((-0.5..=0.5).contains(&selection.first()));
            assert!((-0.5..=0.5).contains(&selection.second()));
        }
    }

    #[test]
    fn test_empty_range_rejected() {
        let err = RandomPoints::new(0.5, -0.5, None).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
