#[cfg(feature = "benchmarks")]
pub mod config {
    use criterion::{measurement::WallTime, BenchmarkGroup, Criterion};
    #[cfg(not(target_os = "windows"))]
    use pprof::criterion::{Output, PProfProfiler};
    use std::time::Duration;

    /// Criterion instance sampling a flamegraph of every benchmarked training run
    #[cfg(not(target_os = "windows"))]
    pub fn get_default_profiling_configs() -> Criterion {
        Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
    }

    /// Few long samples per benchmark, training runs take up to seconds
    pub fn set_default_benchmark_configs(benchmark: &mut BenchmarkGroup<WallTime>) {
        benchmark
            .sample_size(20)
            .measurement_time(Duration::new(15, 0))
            .confidence_level(0.95)
            .warm_up_time(Duration::new(3, 0))
            .noise_threshold(0.05);
    }
}
