use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use elastic_grid::{utils, Partition, Simulation, SimulationConfig};

const WORLD: (f32, f32) = (1600.0, 1000.0);
const DT: f32 = 1.0 / 120.0;

// Cells are 10x10, comfortably above the largest diameter.
fn gas_config(n: usize) -> SimulationConfig {
    let bodies = utils::random_gas(n, WORLD.0, WORLD.1, 1.0, 4.0, 200.0, 0);
    SimulationConfig::new(WORLD.0, WORLD.1, 160, 100).with_bodies(bodies)
}

fn bench_partitions(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_by_partition");
    group.sample_size(20);

    for n in [1_000usize, 10_000, 40_000] {
        group.throughput(Throughput::Elements(n as u64));
        for partition in [Partition::Sorted, Partition::Buckets] {
            let config = gas_config(n).with_partition(partition);
            let mut sim = Simulation::setup(&config).expect("valid bench config");
            // Warmup so the sorted index starts from a settled order.
            sim.step(DT);

            group.bench_with_input(
                BenchmarkId::new(format!("{partition:?}"), n),
                &n,
                |b, _| b.iter(|| sim.step(DT)),
            );
        }
    }

    group.finish();
}

fn bench_parallel_integration(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrate_and_refile");
    group.sample_size(20);

    let n = 100_000;
    group.throughput(Throughput::Elements(n as u64));
    for parallel in [false, true] {
        let mut sim = Simulation::setup(&gas_config(n)).expect("valid bench config");
        sim.set_parallel(parallel);
        let name = if parallel { "rayon" } else { "sequential" };
        group.bench_function(name, |b| b.iter(|| sim.integrate(DT)));
    }

    group.finish();
}

fn bench_lattice_demo(c: &mut Criterion) {
    let mut sim = Simulation::setup(&SimulationConfig::lattice_demo()).expect("valid demo");
    c.bench_function("lattice_demo_step", |b| b.iter(|| sim.step(DT)));
}

criterion_group!(benches, bench_partitions, bench_parallel_integration, bench_lattice_demo);
criterion_main!(benches);
