//! Mutation and crossover strategy traits
//!
//! Strategies are boxed and cloned freely by the evolutionary driver:
//! cloning a strategy is how an offspring gets its own independent copy
//! of whatever state the strategy carries.

use std::sync::Arc;

use crate::error::Result;

/// Produces a new candidate from one parent
pub trait Mutation<T>: Send + Sync {
    /// Mutate `candidate`, returning the offspring. The input is never modified.
    fn mutate(&mut self, candidate: &T) -> Result<T>;

    /// Clone the strategy into a boxed trait object
    fn box_clone(&self) -> Box<dyn Mutation<T>>;
}

impl<T> Clone for Box<dyn Mutation<T>> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Produces a new candidate from two parents
pub trait Crossover<T>: Send + Sync {
    /// Combine `a` and `b` into an offspring. Neither input is modified.
    fn cross(&mut self, a: &T, b: &T) -> Result<T>;

    /// Clone the strategy into a boxed trait object
    fn box_clone(&self) -> Box<dyn Crossover<T>>;
}

impl<T> Clone for Box<dyn Crossover<T>> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Strategy backed by a pure function.
///
/// There is no state to duplicate, so clones share the function.
pub struct Stateless<F> {
    function: Arc<F>,
}

impl<F> Stateless<F> {
    pub fn new(function: F) -> Self {
        Self {
            function: Arc::new(function),
        }
    }

    /// Check if both strategies wrap the very same function
    pub fn same_function(&self, other: &Stateless<F>) -> bool {
        Arc::ptr_eq(&self.function, &other.function)
    }
}

impl<F> Clone for Stateless<F> {
    fn clone(&self) -> Self {
        Self {
            function: Arc::clone(&self.function),
        }
    }
}

impl<T, F> Mutation<T> for Stateless<F>
where
    T: 'static,
    F: Fn(&T) -> Result<T> + Send + Sync + 'static,
{
    fn mutate(&mut self, candidate: &T) -> Result<T> {
        (self.function)(candidate)
    }

    fn box_clone(&self) -> Box<dyn Mutation<T>> {
        Box::new(self.clone())
    }
}

impl<T, F> Crossover<T> for Stateless<F>
where
    T: 'static,
    F: Fn(&T, &T) -> Result<T> + Send + Sync + 'static,
{
    fn cross(&mut self, a: &T, b: &T) -> Result<T> {
        (self.function)(a, b)
    }

    fn box_clone(&self) -> Box<dyn Crossover<T>> {
        Box::new(self.clone())
    }
}

/// Mutations applied one after another in declaration order.
///
/// Each step receives the previous step's output. Cloning the chain
/// clones every step, including any state they carry.
pub struct MutationChain<T> {
    steps: Vec<Box<dyn Mutation<T>>>,
}

impl<T: 'static> MutationChain<T> {
    pub fn builder() -> MutationChainBuilder<T> {
        MutationChainBuilder { steps: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<T> Clone for MutationChain<T> {
    fn clone(&self) -> Self {
        Self {
            steps: self.steps.clone(),
        }
    }
}

impl<T> Mutation<T> for MutationChain<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn mutate(&mut self, candidate: &T) -> Result<T> {
        let mut steps = self.steps.iter_mut();
        let Some(first) = steps.next() else {
            return Ok(candidate.clone());
        };
        let mut current = first.mutate(candidate)?;
        for step in steps {
            current = step.mutate(&current)?;
        }
        Ok(current)
    }

    fn box_clone(&self) -> Box<dyn Mutation<T>> {
        Box::new(self.clone())
    }
}

/// Builder for [`MutationChain`]
pub struct MutationChainBuilder<T> {
    steps: Vec<Box<dyn Mutation<T>>>,
}

impl<T: 'static> MutationChainBuilder<T> {
    /// Append a step
    pub fn then(mut self, step: impl Mutation<T> + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Append an already boxed step
    pub fn then_boxed(mut self, step: Box<dyn Mutation<T>>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn build(self) -> MutationChain<T> {
        MutationChain { steps: self.steps }
    }
}
