use criterion::{Criterion, black_box, criterion_group, criterion_main};

use visualize_core::math::{Vec3, pose_look_at};
use visualize_core::pool::Swappable;

// ---------------------------------------------------------------------------
// Pool recycling
// ---------------------------------------------------------------------------

fn bench_recycle_steady_state(c: &mut Criterion) {
    c.bench_function("swappable_reuse_1024_per_tick", |b| {
        let mut pool = Swappable::new();
        for v in 0..1024u32 {
            pool.mark_used(v);
        }
        b.iter(|| {
            pool.recycle(|_| {});
            while let Some(v) = pool.acquire(true) {
                pool.mark_used(black_box(v));
            }
        });
    });
}

fn bench_recycle_churn(c: &mut Criterion) {
    c.bench_function("swappable_churn_1024_no_cache", |b| {
        let mut pool = Swappable::new();
        b.iter(|| {
            for v in 0..1024u32 {
                if pool.acquire(false).is_none() {
                    pool.mark_used(black_box(v));
                }
            }
            black_box(pool.recycle(|v| {
                black_box(v);
            }));
        });
    });
}

// ---------------------------------------------------------------------------
// Pose derivation
// ---------------------------------------------------------------------------

fn bench_pose_look_at(c: &mut Criterion) {
    c.bench_function("pose_look_at", |b| {
        b.iter(|| {
            pose_look_at(
                black_box(Vec3::new(1.0, 2.0, 3.0)),
                black_box(Vec3::new(4.0, -2.0, 7.0)),
            )
        });
    });
}

criterion_group!(
    benches,
    bench_recycle_steady_state,
    bench_recycle_churn,
    bench_pose_look_at,
);
criterion_main!(benches);
