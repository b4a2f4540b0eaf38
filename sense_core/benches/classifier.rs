use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sense_core::{GasLevel, LevelBands, ProximityDetector};

fn bench_classify(c: &mut Criterion) {
    let bands = LevelBands::default();
    c.bench_function("classify_sweep_0_to_1000", |b| {
        b.iter(|| {
            let mut critical = 0u32;
            for i in 0..1000u32 {
                if bands.classify(black_box(i as f32)) == GasLevel::Critical {
                    critical += 1;
                }
            }
            critical
        })
    });
}

fn bench_detector(c: &mut Criterion) {
    // Triangle wave crossing the threshold repeatedly, with some dropouts.
    let wave: Vec<Option<f32>> = (0..1000)
        .map(|i| {
            if i % 17 == 0 {
                None
            } else {
                Some(((i % 40) as f32 - 20.0).abs())
            }
        })
        .collect();
    c.bench_function("detector_triangle_wave", |b| {
        b.iter(|| {
            let mut det = ProximityDetector::new(10.0).unwrap();
            let mut transitions = 0u32;
            for r in &wave {
                if det.on_reading(black_box(*r)).is_some() {
                    transitions += 1;
                }
            }
            transitions
        })
    });
}

criterion_group!(benches, bench_classify, bench_detector);
criterion_main!(benches);
