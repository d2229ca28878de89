use compute::{BufferView, ChunkEntry, CpuBackend};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use scene::{GridParams, SceneModel};
use spatial::{IndexBuilder, Sorter};
use std::sync::Arc;

fn random_entries(len: usize) -> Vec<ChunkEntry> {
    let rng = fastrand::Rng::with_seed(42);
    (0..len)
        .map(|i| ChunkEntry::new(rng.u32(0..4096), i as u32))
        .collect()
}

/// One full bitonic network per iteration.
fn bench_sort_network(c: &mut Criterion) {
    let sorter = Sorter::new(Arc::new(CpuBackend::new()));
    let mut group = c.benchmark_group("bitonic_sort");
    for len in [1usize << 10, 1 << 14, 1 << 17] {
        let entries = BufferView::from_slice(&random_entries(len));
        group.bench_with_input(BenchmarkId::from_parameter(len), &entries, |b, entries| {
            b.iter(|| sorter.sort(black_box(entries.clone())));
        });
    }
    group.finish();
}

/// Whole rebuild of a scene of scattered spheres.
fn bench_rebuild(c: &mut Criterion) {
    let grid = GridParams::new(Vec3::ZERO, Vec3::splat(64.0), 1.0, Vec3::ZERO, 8).unwrap();
    let rng = fastrand::Rng::with_seed(7);
    let mut scene = SceneModel::new();
    for _ in 0..4096 {
        let pos = Vec3::new(rng.f32(), rng.f32(), rng.f32()) * 64.0;
        scene.add_sphere(pos, 0.2 + rng.f32() * 0.6, 0);
    }
    let builder = IndexBuilder::new(Arc::new(CpuBackend::new()));

    c.bench_function("rebuild_4096_spheres", |b| {
        b.iter(|| builder.rebuild(black_box(&scene), &grid));
    });
}

criterion_group!(benches, bench_sort_network, bench_rebuild);
criterion_main!(benches);
