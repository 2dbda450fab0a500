//! Throughput benchmark for the serial and parallel evolution paths

use std::time::Instant;

use life_engine::domain::{ConwayRule, Grid};
use rand::{SeedableRng, rngs::SmallRng};

fn seeded_grid(size: usize) -> Grid {
    let mut rng = SmallRng::seed_from_u64(42);
    let mut grid = Grid::new(size, size).expect("benchmark sizes are in range");
    grid.randomize(&mut rng, 0.5);
    grid
}

fn benchmark_serial(size: usize, iterations: u32) -> f64 {
    let rule = ConwayRule;
    let mut grid = seeded_grid(size);

    let start = Instant::now();
    for _ in 0..iterations {
        grid = grid.evolve(&rule);
    }
    start.elapsed().as_secs_f64() * 1000.0 / iterations as f64
}

fn benchmark_parallel(size: usize, iterations: u32) -> f64 {
    let rule = ConwayRule;
    let mut grid = seeded_grid(size);

    let start = Instant::now();
    for _ in 0..iterations {
        grid = grid.evolve_parallel(&rule);
    }
    start.elapsed().as_secs_f64() * 1000.0 / iterations as f64
}

fn main() {
    println!("=== life-engine evolution benchmark ===\n");

    let sizes = [100, 500, 1000, 2000];
    let iterations = 20;

    println!("{:>10} {:>12} {:>12} {:>10}", "Size", "Serial", "Parallel", "Speedup");
    println!("{:-<48}", "");

    for size in sizes {
        let serial_ms = benchmark_serial(size, iterations);
        let parallel_ms = benchmark_parallel(size, iterations);

        println!(
            "{:>10} {:>10.2}ms {:>10.2}ms {:>9.1}x",
            format!("{0}x{0}", size),
            serial_ms,
            parallel_ms,
            serial_ms / parallel_ms
        );
    }
}
