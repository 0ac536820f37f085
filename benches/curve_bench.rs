use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use osu_slider_editor::app::deformer;
use osu_slider_editor::core::{sample_curve, CurveEvaluator, CurveModel, SplitAnchors};
use std::hint::black_box;

/// Wellenlinie mit einem Split-Anker alle `split_every` Punkte.
fn build_curve(point_count: usize, split_every: usize) -> CurveModel {
    let points: Vec<Vec2> = (0..point_count)
        .map(|i| {
            let x = 100.0 + i as f32 * 12.0;
            let y = 360.0 + (i as f32 * 0.7).sin() * 80.0;
            Vec2::new(x, y)
        })
        .collect();
    let mut splits = SplitAnchors::new();
    if split_every > 0 {
        for i in (split_every..point_count.saturating_sub(1)).step_by(split_every) {
            splits.insert(i);
        }
    }
    CurveModel::from_parts(points, splits)
}

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_curve");

    for &point_count in &[8usize, 32, 64] {
        let model = build_curve(point_count, 0);
        group.bench_with_input(
            BenchmarkId::new("single_segment", point_count),
            &model,
            |b, model| {
                b.iter(|| {
                    let samples =
                        sample_curve(black_box(model.points()), model.split_anchors(), 100);
                    black_box(samples.map(|s| s.len()))
                })
            },
        );

        let model = build_curve(point_count, 4);
        group.bench_with_input(
            BenchmarkId::new("split_every_4", point_count),
            &model,
            |b, model| {
                b.iter(|| {
                    let samples =
                        sample_curve(black_box(model.points()), model.split_anchors(), 100);
                    black_box(samples.map(|s| s.len()))
                })
            },
        );
    }

    group.finish();
}

fn bench_cache_rebuild(c: &mut Criterion) {
    c.bench_function("evaluator_rebuild_after_move", |b| {
        let mut model = build_curve(32, 6);
        let mut evaluator = CurveEvaluator::new(100);
        let mut step = 0.0f32;
        b.iter(|| {
            step += 1.0;
            let _ = model.move_point(10, Vec2::new(220.0, 300.0 + step % 40.0));
            black_box(evaluator.samples(&model).map(|s| s.len()))
        })
    });
}

fn bench_deformation(c: &mut Criterion) {
    c.bench_function("deform_drag_step", |b| {
        let mut model = build_curve(32, 6);
        let mut evaluator = CurveEvaluator::new(100);
        let samples = evaluator.samples(&model).map(|s| s.to_vec()).unwrap_or_default();
        let grab = samples[samples.len() / 2];
        let mut gesture = deformer::DeformGesture::default();
        gesture.press(&model, &samples, grab, 50.0, 100);

        let mut cursor = grab;
        b.iter(|| {
            cursor += Vec2::new(0.1, -0.1);
            gesture.drag(&mut model, black_box(cursor), 2.0);
            black_box(evaluator.samples(&model).map(|s| s.len()))
        })
    });
}

criterion_group!(benches, bench_sampling, bench_cache_rebuild, bench_deformation);
criterion_main!(benches);
