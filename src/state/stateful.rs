//! Strategies that carry state
//!
//! `MutationState` and `CrossoverState` pair an [`AccessibleState`] with a
//! strategy that reads and updates it on every call. Cloning deep-copies
//! the state, so a cloned strategy and its original evolve independently.
//! After a crossover the two parents' states can be folded into one for
//! the offspring with [`CrossoverState::merge`].

use std::sync::Arc;

use super::accessible::AccessibleState;
use super::strategy::Mutation;
use crate::error::Result;

/// Mutation that reads and updates a state value
pub trait StatefulMutation<T, V>: Send + Sync {
    fn mutate(&self, candidate: &T, state: &mut V) -> Result<T>;
}

impl<T, V, F> StatefulMutation<T, V> for F
where
    F: Fn(&T, &mut V) -> Result<T> + Send + Sync,
{
    fn mutate(&self, candidate: &T, state: &mut V) -> Result<T> {
        self(candidate, state)
    }
}

/// Crossover that reads and updates both parents' state values
pub trait StatefulCrossover<T, V>: Send + Sync {
    fn cross(&self, a: &T, b: &T, state_a: &mut V, state_b: &mut V) -> Result<T>;
}

impl<T, V, F> StatefulCrossover<T, V> for F
where
    F: Fn(&T, &T, &mut V, &mut V) -> Result<T> + Send + Sync,
{
    fn cross(&self, a: &T, b: &T, state_a: &mut V, state_b: &mut V) -> Result<T> {
        self(a, b, state_a, state_b)
    }
}

/// Combines two parents' states given the crossover's inputs and result
pub trait StateMerge<T, V>: Send + Sync {
    fn merge(&self, own: &V, other: &V, input_a: &T, input_b: &T, result: &T) -> V;
}

impl<T, V, F> StateMerge<T, V> for F
where
    F: Fn(&V, &V, &T, &T, &T) -> V + Send + Sync,
{
    fn merge(&self, own: &V, other: &V, input_a: &T, input_b: &T, result: &T) -> V {
        self(own, other, input_a, input_b, result)
    }
}

/// Mutation strategy with its own state
pub struct MutationState<T, V> {
    state: AccessibleState<V>,
    strategy: Arc<dyn StatefulMutation<T, V>>,
}

impl<T, V> MutationState<T, V> {
    pub fn new(state: AccessibleState<V>, strategy: impl StatefulMutation<T, V> + 'static) -> Self {
        Self {
            state,
            strategy: Arc::new(strategy),
        }
    }

    pub fn state(&self) -> &AccessibleState<V> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AccessibleState<V> {
        &mut self.state
    }

    /// Persist the current state under `base_name`
    pub fn save(&self, base_name: &str) -> Result<()> {
        self.state.save(base_name)
    }
}

impl<T, V> Clone for MutationState<T, V> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            strategy: Arc::clone(&self.strategy),
        }
    }
}

impl<T, V> Mutation<T> for MutationState<T, V>
where
    T: 'static,
    V: Send + Sync + 'static,
{
    fn mutate(&mut self, candidate: &T) -> Result<T> {
        self.strategy.mutate(candidate, self.state.value_mut())
    }

    fn box_clone(&self) -> Box<dyn Mutation<T>> {
        Box::new(self.clone())
    }
}

/// Crossover strategy with its own state and a merge rule
pub struct CrossoverState<T, V> {
    state: AccessibleState<V>,
    strategy: Arc<dyn StatefulCrossover<T, V>>,
    merger: Arc<dyn StateMerge<T, V>>,
}

impl<T, V> CrossoverState<T, V> {
    pub fn new(
        state: AccessibleState<V>,
        strategy: impl StatefulCrossover<T, V> + 'static,
        merger: impl StateMerge<T, V> + 'static,
    ) -> Self {
        Self {
            state,
            strategy: Arc::new(strategy),
            merger: Arc::new(merger),
        }
    }

    pub fn state(&self) -> &AccessibleState<V> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AccessibleState<V> {
        &mut self.state
    }

    /// Cross `a` (owned by this strategy) with `b` (owned by `other`).
    ///
    /// Both states may be updated by the strategy.
    pub fn cross(&mut self, other: &mut CrossoverState<T, V>, a: &T, b: &T) -> Result<T> {
        self.strategy
            .cross(a, b, self.state.value_mut(), other.state.value_mut())
    }

    /// New state value for the offspring of a crossover between this
    /// strategy's parent and `other`'s
    pub fn merge(&self, other: &CrossoverState<T, V>, input_a: &T, input_b: &T, result: &T) -> V {
        self.merger
            .merge(self.state.value(), other.state.value(), input_a, input_b, result)
    }

    /// Strategy for the offspring: same behavior, merged state
    pub fn merged(&self, other: &CrossoverState<T, V>, input_a: &T, input_b: &T, result: &T) -> Self {
        let value = self.merge(other, input_a, input_b, result);
        Self {
            state: self.state.with_value(value),
            strategy: Arc::clone(&self.strategy),
            merger: Arc::clone(&self.merger),
        }
    }

    /// Persist the current state under `base_name`
    pub fn save(&self, base_name: &str) -> Result<()> {
        self.state.save(base_name)
    }
}

impl<T, V> Clone for CrossoverState<T, V> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            strategy: Arc::clone(&self.strategy),
            merger: Arc::clone(&self.merger),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NoSave;

    fn counting() -> MutationState<i64, u32> {
        let state = AccessibleState::cloned(0u32, Arc::new(NoSave));
        MutationState::new(state, |x: &i64, calls: &mut u32| -> Result<i64> {
            *calls += 1;
            Ok(x + *calls as i64)
        })
    }

    #[test]
    fn test_state_updates_in_place() {
        let mut strategy = counting();
        assert_eq!(strategy.mutate(&10).unwrap(), 11);
        assert_eq!(strategy.mutate(&10).unwrap(), 12);
        assert_eq!(*strategy.state().value(), 2);
    }

    #[test]
    fn test_clone_does_not_alias() {
        let mut original = counting();
        original.mutate(&0).unwrap();

        let mut copy = original.clone();
        copy.mutate(&0).unwrap();
        copy.mutate(&0).unwrap();

        assert_eq!(*original.state().value(), 1);
        assert_eq!(*copy.state().value(), 3);
        assert_eq!(original.mutate(&0).unwrap(), 2);
    }

    #[test]
    fn test_crossover_merge() {
        let state = AccessibleState::cloned(vec![1u8], Arc::new(NoSave));
        let mut left = CrossoverState::new(
            state,
            |a: &i64, b: &i64, sa: &mut Vec<u8>, sb: &mut Vec<u8>| -> Result<i64> {
                sa.push(0);
                sb.push(0);
                Ok(a.max(b).to_owned())
            },
            |own: &Vec<u8>, other: &Vec<u8>, _: &i64, _: &i64, _: &i64| -> Vec<u8> {
                own.iter().chain(other.iter()).copied().collect()
            },
        );
        let mut right = left.clone();
        right.state_mut().set(vec![9]);

        let child = left.cross(&mut right, &3, &7).unwrap();
        assert_eq!(child, 7);
        assert_eq!(left.state().get(), vec![1, 0]);
        assert_eq!(right.state().get(), vec![9, 0]);

        let offspring = left.merged(&right, &3, &7, &child);
        assert_eq!(offspring.state().get(), vec![1, 0, 9, 0]);
        assert_eq!(left.state().get(), vec![1, 0]);
    }
}
