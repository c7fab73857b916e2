//! State Container Module
//!
//! Strategy traits and the state they carry:
//! - `Mutation` / `Crossover` strategy traits, `Stateless` and `MutationChain`
//! - `AccessibleState` with deep clone and save hooks
//! - `MutationState` / `CrossoverState` for strategies with state
//! - `StateView` for values observed by several owners

mod accessible;
mod persist;
mod stateful;
mod strategy;
mod view;

pub use accessible::{AccessibleState, NoSave, SaveHook};
pub use persist::{JsonFileHook, MemoryHook, SavedState};
pub use stateful::{CrossoverState, MutationState, StateMerge, StatefulCrossover, StatefulMutation};
pub use strategy::{Crossover, Mutation, MutationChain, MutationChainBuilder, Stateless};
pub use view::StateView;
