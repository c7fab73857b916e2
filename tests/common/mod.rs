//! Shared fixtures for integration tests

#![allow(dead_code)]

use nasgraft::graph::{ElementWiseOp, Graph, GraphInfo, LayerConfig, StructuralKind};

/// Route library tracing to the test output. `RUST_LOG` controls the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub fn dense(n_in: usize, n_out: usize) -> LayerConfig {
    LayerConfig::new("dense", n_in, n_out)
}

/// `<prefix>1 -> <prefix>2 -> <prefix>3`, each reading the previous one
pub fn chain(prefix: &str) -> GraphInfo {
    let mut graph = Graph::new(["input"]);
    let mut previous = "input".to_string();
    for i in 1..=3 {
        let name = format!("{}{}", prefix, i);
        graph
            .add_layer(name.clone(), dense(8, 8), [previous.clone()])
            .expect("fresh name");
        previous = name;
    }
    GraphInfo::new(graph)
}

/// `firstBefore -> {first1, first2, first3} -> firstAfter`
pub fn fork() -> GraphInfo {
    let mut graph = Graph::new(["input"]);
    graph.add_layer("firstBefore", dense(3, 4), ["input"]).expect("fresh name");
    for i in 1..=3 {
        graph
            .add_layer(format!("first{}", i), dense(4, 4), ["firstBefore"])
            .expect("fresh name");
    }
    graph
        .add_structural("firstAfter", StructuralKind::Merge, ["first1", "first2", "first3"])
        .expect("fresh name");
    GraphInfo::new(graph)
}

/// Same shape as [`fork`] with a residual edge from `secondBefore` into the merge
pub fn residual_fork() -> GraphInfo {
    let mut graph = Graph::new(["input"]);
    graph.add_layer("secondBefore", dense(3, 4), ["input"]).expect("fresh name");
    for i in 1..=3 {
        graph
            .add_layer(format!("second{}", i), dense(4, 4), ["secondBefore"])
            .expect("fresh name");
    }
    graph
        .add_structural(
            "secondAfter",
            StructuralKind::ElementWise {
                combine: ElementWiseOp::Add,
            },
            ["second1", "second2", "second3", "secondBefore"],
        )
        .expect("fresh name");
    GraphInfo::new(graph)
}

/// `x -> {y, z}`, `y -> p -> w`, `z -> w` (concatenating merge), `w -> out`,
/// plus `side` reading the input directly
pub fn diamond() -> Graph {
    let mut graph = Graph::new(["input"]);
    graph.add_layer("x", dense(3, 4), ["input"]).expect("fresh name");
    graph.add_layer("y", dense(4, 6), ["x"]).expect("fresh name");
    graph.add_layer("z", dense(4, 6), ["x"]).expect("fresh name");
    graph.add_structural("p", StructuralKind::ZeroPad, ["y"]).expect("fresh name");
    graph.add_structural("w", StructuralKind::Merge, ["p", "z"]).expect("fresh name");
    graph.add_layer("out", dense(12, 1), ["w"]).expect("fresh name");
    graph.add_layer("side", dense(3, 2), ["input"]).expect("fresh name");
    graph
}
