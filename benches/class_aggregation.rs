//! Class aggregation benchmarks
//!
//! Measures:
//! - Weighted total of one student on a nested rubric
//! - Class summary as the roster grows

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gradetree::aggregate::{summarize_class, total_score, GradeScale, ScoreSheet};
use gradetree::tree::{GradingComponent, GradingTree};

/// Three top-level components, each with `width` sub-components of two leaves.
fn rubric(width: usize) -> GradingTree {
    ["psychomotor", "midterm", "final"]
        .iter()
        .fold(GradingTree::new(), |tree, key| {
            let component = (0..width).fold(GradingComponent::new(*key, 100.0 / 3.0), |c, i| {
                c.with_child(
                    format!("part{}", i),
                    GradingComponent::new(format!("Part {}", i), 10.0)
                        .with_child("a", GradingComponent::new("A", 6.0))
                        .with_child("b", GradingComponent::new("B", 4.0)),
                )
            });
            tree.with_component(*key, component)
        })
}

fn scores_for(tree: &GradingTree, seed: usize) -> ScoreSheet {
    tree.leaf_paths()
        .into_iter()
        .enumerate()
        .map(|(i, path)| (path.full_key(), ((seed + i) % 7) as f64))
        .collect()
}

fn bench_student_total(c: &mut Criterion) {
    let mut group = c.benchmark_group("student_total");
    for width in [2usize, 8, 32] {
        let tree = rubric(width);
        let scores = scores_for(&tree, 1);
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, _| {
            b.iter(|| total_score(black_box(&tree), black_box(&scores)))
        });
    }
    group.finish();
}

fn bench_class_summary(c: &mut Criterion) {
    let tree = rubric(8);
    let scale = GradeScale::default();
    let mut group = c.benchmark_group("class_summary");
    for students in [30usize, 300, 3000] {
        let roster: Vec<(String, ScoreSheet)> = (0..students)
            .map(|i| (format!("s{:05}", i), scores_for(&tree, i)))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(students), &roster, |b, roster| {
            b.iter(|| summarize_class(black_box(&tree), black_box(roster), &scale, 50.0))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_student_total, bench_class_summary);
criterion_main!(benches);
