//! Performance benchmark for the full analysis pipeline

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::SmallRng, Rng, SeedableRng};

use beatmapper::{analyze, Waveform};

/// 30 seconds of low-level noise with a kick-style burst every 500 ms
fn synthetic_track(sample_rate: u32) -> Waveform {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut samples: Vec<f32> = (0..sample_rate as usize * 30)
        .map(|_| rng.gen_range(-0.05f32..0.05))
        .collect();

    for burst in 0..60 {
        let start = burst * sample_rate as usize / 2;
        for sample in samples.iter_mut().skip(start).take(900) {
            *sample = 0.9;
        }
    }

    Waveform::new(vec![samples], sample_rate)
}

fn bench_analyze(c: &mut Criterion) {
    let waveform = synthetic_track(44100);

    c.bench_function("analyze_30s", |b| {
        b.iter(|| analyze(black_box(&waveform), black_box(60.0)).unwrap())
    });
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
