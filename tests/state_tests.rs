//! State Container Tests
//!
//! Clone independence, merge after crossover, persistence and shared views.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use nasgraft::crossover::{crossover, PointSelection};
use nasgraft::graph::{Graph, GraphInfo};
use nasgraft::mutate::mutate_nout;
use nasgraft::state::{
    AccessibleState, CrossoverState, JsonFileHook, MemoryHook, Mutation, MutationState, NoSave, SavedState, StateView,
};
use nasgraft::Result;
use tempfile::TempDir;

/// Widens `x` by the number of times the strategy has run so far
fn growing_strategy(hook: Arc<dyn nasgraft::state::SaveHook<u32>>) -> MutationState<Graph, u32> {
    let state = AccessibleState::cloned(0u32, hook);
    MutationState::new(state, |graph: &Graph, calls: &mut u32| -> Result<Graph> {
        *calls += 1;
        let step = *calls as usize;
        mutate_nout(graph, ["x"], move |n| n + step)
    })
}

// === Clone Independence ===

#[test]
fn test_clone_never_changes_original_results() {
    let graph = common::diamond();
    let mut original = growing_strategy(Arc::new(NoSave));
    let mut reference = growing_strategy(Arc::new(NoSave));

    let mut clone = original.clone();
    for _ in 0..3 {
        clone.mutate(&graph).unwrap();
    }

    let from_original = original.mutate(&graph).unwrap();
    let from_reference = reference.mutate(&graph).unwrap();
    assert_eq!(from_original.fingerprint(), from_reference.fingerprint());
    assert_eq!(*original.state().value(), 1);
    assert_eq!(*clone.state().value(), 3);
}

#[test]
fn test_boxed_clone_is_independent() {
    let graph = common::diamond();
    let strategy: Box<dyn Mutation<Graph>> = Box::new(growing_strategy(Arc::new(NoSave)));
    let mut first = strategy.clone();
    let mut second = strategy.clone();

    first.mutate(&graph).unwrap();
    let a = first.mutate(&graph).unwrap();
    let b = second.mutate(&graph).unwrap();

    assert_eq!(a.layer("x").unwrap().n_out(), 6);
    assert_eq!(b.layer("x").unwrap().n_out(), 5);
}

// === Persistence ===

#[test]
fn test_save_through_json_hook() {
    common::init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let hook = JsonFileHook::new(temp_dir.path());
    let mut strategy = growing_strategy(Arc::new(hook.clone()));

    strategy.mutate(&common::diamond()).unwrap();
    strategy.save("grow").unwrap();

    let saved: SavedState<u32> = hook.load("grow").unwrap();
    assert_eq!(saved.state, 1);
    assert_eq!(hook.saved_names().unwrap(), vec!["grow"]);
}

#[test]
fn test_save_through_memory_hook() {
    let hook = Arc::new(MemoryHook::<u32>::new());
    let mut strategy = growing_strategy(hook.clone());
    let mut clone = strategy.clone();

    strategy.mutate(&common::diamond()).unwrap();
    strategy.save("original").unwrap();
    clone.save("clone").unwrap();

    assert_eq!(hook.get("original"), Some(1));
    assert_eq!(hook.get("clone"), Some(0));
}

// === Merge After Crossover ===

/// Notes per vertex name; merging keeps notes of vertices the offspring retained
type Notes = HashMap<String, String>;

fn annotate(info: &GraphInfo, tag: &str) -> Notes {
    info.graph()
        .vertex_names()
        .into_iter()
        .map(|name| (name.to_string(), format!("{}:{}", tag, name)))
        .collect()
}

#[test]
fn test_merge_keeps_state_of_retained_vertices() {
    let a = common::chain("a");
    let b = common::chain("b");

    let strategy = |x: &GraphInfo, y: &GraphInfo, _: &mut Notes, _: &mut Notes| -> Result<GraphInfo> {
        crossover(x, y, PointSelection::new(-0.125, -0.5)?)
    };
    let merger = |own: &Notes, other: &Notes, _: &GraphInfo, _: &GraphInfo, result: &GraphInfo| -> Notes {
        own.iter()
            .chain(other.iter())
            .filter(|(name, _)| result.graph().contains(name))
            .map(|(name, note)| (name.clone(), note.clone()))
            .collect()
    };

    let mut left = CrossoverState::new(AccessibleState::cloned(annotate(&a, "A"), Arc::new(NoSave)), strategy, merger);
    let mut right = left.clone();
    right.state_mut().set(annotate(&b, "B"));

    let child = left.cross(&mut right, &a, &b).unwrap();
    let merged = left.merge(&right, &a, &b, &child);

    let mut kept: Vec<&String> = merged.keys().collect();
    kept.sort();
    assert_eq!(kept, vec!["a1", "b2", "b3"]);
    assert_eq!(merged["b2"], "B:b2");
    assert_eq!(left.state().value().len(), 3);
}

// === Shared Views ===

#[test]
fn test_copy_before_update_observes_old_value() {
    let mut v1 = StateView::new(String::from("before"));
    let c1 = v1.copy();
    v1.update(String::from("after"));
    let c2 = v1.copy();

    assert_eq!(c1.get(), "before");
    assert_eq!(c2.get(), "after");
    assert_eq!(v1.get(), "after");
}

#[test]
fn test_sibling_updates_do_not_leak() {
    let root = StateView::new(vec![1, 2, 3]);
    let mut left = root.copy();
    let mut right = root.copy();

    left.modify(|v| v.iter().map(|x| x * 10).collect());
    right.update(Vec::new());

    assert_eq!(root.get(), &vec![1, 2, 3]);
    assert_eq!(left.get(), &vec![10, 20, 30]);
    assert!(right.get().is_empty());
}
