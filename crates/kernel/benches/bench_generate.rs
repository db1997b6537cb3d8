use std::hint::black_box;
use std::time::Instant;

use galaxy_kernel::{DisplayedGalaxy, GalaxyParameters, generate_with};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn bench_generate(count: u32, iterations: usize) {
    let params = GalaxyParameters {
        count,
        ..GalaxyParameters::default()
    };
    let mut rng = StdRng::seed_from_u64(42);

    let start = Instant::now();
    for _ in 0..iterations {
        let cloud = generate_with(black_box(&params), &mut rng).expect("valid parameters");
        black_box(cloud);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  generate ({count} points, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_regenerate(count: u32, iterations: usize) {
    let params = GalaxyParameters {
        count,
        ..GalaxyParameters::default()
    };
    let mut rng = StdRng::seed_from_u64(7);
    let mut displayed = DisplayedGalaxy::new();

    let start = Instant::now();
    for _ in 0..iterations {
        let replacement = displayed
            .regenerate(black_box(&params), &mut rng)
            .expect("valid parameters");
        black_box(replacement);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  regenerate ({count} points, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Galaxy generation benchmarks ===");
    println!();

    println!("generate:");
    bench_generate(1_000, 200);
    bench_generate(10_000, 50);
    bench_generate(100_000, 10);
    println!();

    println!("regenerate (with ownership bookkeeping):");
    bench_regenerate(1_000, 200);
    bench_regenerate(100_000, 10);
}
