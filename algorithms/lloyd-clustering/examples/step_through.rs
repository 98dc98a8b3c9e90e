use env_logger::Env;
use lloyd::ParamGuard;
use lloyd_clustering::{InitStrategy, KMeans, RunController, RunStatus};
use lloyd_datasets::{generate_dataset, DEFAULT_DATASET_SIZE};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

// Walks through what the front-end does: generate a dataset, initialize the centroids with every
// strategy, then step until convergence and print the centroids after each step.
fn main() {
    env_logger::init_from_env(Env::default().filter_or("RUST_LOG", "info"));

    // Our random number generator, seeded for reproducibility
    let mut rng = Xoshiro256Plus::seed_from_u64(42);
    let records = generate_dataset(DEFAULT_DATASET_SIZE, &mut rng);

    for init in InitStrategy::ALL.iter() {
        let params = KMeans::params_with_rng(3, rng.clone())
            .init_method(*init)
            .check_unwrap();
        let mut run = RunController::new(params, records.clone()).expect("planar dataset");

        println!("== {}", init);
        if run.initialize_clusters() == RunStatus::Uninitialized {
            println!("no centroids, place them by hand");
            continue;
        }
        while run.step_once() == RunStatus::Running && run.iteration_count() < 25 {
            println!("step {}: {:?}", run.iteration_count(), run.centroid_points());
        }
        run.run_to_convergence();
        println!(
            "converged after {} steps, inertia {:?}",
            run.iteration_count(),
            run.inertia()
        );
        for (idx, cluster) in run.clusters().iter().enumerate() {
            println!("cluster {}: {} points", idx, cluster.nrows());
        }
    }
}
