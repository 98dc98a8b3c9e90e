use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion,
    PlotConfiguration,
};
use lloyd::ParamGuard;
use lloyd_clustering::{InitStrategy, KMeans, RunController};
use lloyd_datasets::blobs;
use ndarray::Array2;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand_xoshiro::Xoshiro256Plus;

fn k_means_bench(c: &mut Criterion) {
    let mut rng = Xoshiro256Plus::seed_from_u64(40);
    let cluster_sizes = vec![(100, 4), (400, 10), (3000, 10)];

    let mut benchmark = c.benchmark_group("run_to_convergence");
    benchmark.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));
    for (cluster_size, n_clusters) in cluster_sizes {
        let rng = &mut rng;
        let centroids = Array2::random_using((n_clusters, 2), Uniform::new(-10., 10.), rng);
        let records = blobs(cluster_size, &centroids, rng);
        for init in InitStrategy::ALL.iter().filter(|s| **s != InitStrategy::Manual) {
            let id = BenchmarkId::new(init.name(), cluster_size);
            benchmark.bench_with_input(id, &records, |bencher, records| {
                bencher.iter(|| {
                    let params = KMeans::params_with_rng(black_box(n_clusters), rng.clone())
                        .init_method(*init)
                        .check_unwrap();
                    let mut run = RunController::new(params, records.clone()).unwrap();
                    run.initialize_clusters();
                    run.run_to_convergence()
                });
            });
        }
    }

    benchmark.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = k_means_bench
}
criterion_main!(benches);
