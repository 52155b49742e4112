//! Benchmarks for the recommendation engine
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lesson_recommender::recommender::{LessonSignal, RecommendationEngine, RecommendationInput};

fn curriculum(size: usize) -> RecommendationInput {
    let lessons = (0..size)
        .map(|i| LessonSignal {
            prerequisites: if i > 0 { vec![format!("lesson-{}", i - 1)] } else { Vec::new() },
            completed: i < size / 2,
            completion_percent: 70,
            quiz_score_ratio: 0.9,
            goals_overlap_score: (i % 3) as u32,
            ..LessonSignal::new(format!("lesson-{i}"), format!("module-{}", i / 10), i as i64)
        })
        .collect();

    RecommendationInput {
        lessons,
        weekly_time_commitment_h: 4,
    }
}

fn bench_recommend(c: &mut Criterion) {
    let engine = RecommendationEngine::default();
    let mut group = c.benchmark_group("recommend");

    for size in [10, 100, 1000] {
        let input = curriculum(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| engine.recommend(black_box(input)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_recommend);
criterion_main!(benches);
