use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::SmallRng;
use sylva::benchmarks::config;
use sylva::prelude::*;
use sylva_datasets::generate;
use sylva_trees::{DecisionTree, TreeEnsemble};

fn decision_tree_bench(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);

    // Controls how many samples for each class are generated
    let training_set_sizes = &[100, 1000, 10000];

    let n_classes = 4;
    let n_features = 4;

    // Use the default configuration
    let hyperparams = DecisionTree::params();

    // Benchmark training time for each training sample size
    let mut group = c.benchmark_group("decision_tree");
    config::set_default_benchmark_configs(&mut group);

    for n in training_set_sizes.iter() {
        let centroids =
            Array2::random_using((n_classes, n_features), Uniform::new(-30., 30.), &mut rng);
        let dataset = generate::blobs(*n, &centroids, &mut rng);

        group.bench_with_input(BenchmarkId::from_parameter(n), &dataset, |b, d| {
            b.iter(|| hyperparams.fit(d))
        });
    }

    group.finish();
}

fn random_forest_bench(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);

    let training_set_sizes = &[100, 1000];
    let hyperparams = TreeEnsemble::random_forest().ensemble_size(20);

    let mut group = c.benchmark_group("random_forest");
    config::set_default_benchmark_configs(&mut group);

    for n in training_set_sizes.iter() {
        let centroids = Array2::random_using((4, 9), Uniform::new(-30., 30.), &mut rng);
        let dataset = generate::blobs(*n, &centroids, &mut rng);

        group.bench_with_input(BenchmarkId::from_parameter(n), &dataset, |b, d| {
            b.iter(|| hyperparams.fit(d))
        });
    }

    group.finish();
}

#[cfg(not(target_os = "windows"))]
criterion_group! {
    name = benches;
    config = config::get_default_profiling_configs();
    targets = decision_tree_bench, random_forest_bench
}
#[cfg(target_os = "windows")]
criterion_group!(benches, decision_tree_bench, random_forest_bench);

criterion_main!(benches);
