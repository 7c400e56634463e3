use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sketchpad::draw::{flood_fill_at, Color, HistoryConfig, HistoryManager, PixelBuffer};

fn bench_flood_fill(c: &mut Criterion) {
    let blank = PixelBuffer::new(1024, 768, Color::WHITE);

    c.bench_function("flood_fill_1024x768_uniform", |b| {
        b.iter_batched(
            || blank.clone(),
            |mut buffer| flood_fill_at(&mut buffer, 512, 384, Color::BLACK, 0),
            criterion::BatchSize::LargeInput,
        )
    });

    let mut striped = blank.clone();
    for x in (0..1024).step_by(8) {
        for y in 0..760 {
            striped.set_pixel(x, y, Color::BLACK);
        }
    }
    c.bench_function("flood_fill_1024x768_serpentine", |b| {
        b.iter_batched(
            || striped.clone(),
            |mut buffer| flood_fill_at(&mut buffer, 4, 4, Color::rgb(255, 0, 0), 0),
            criterion::BatchSize::LargeInput,
        )
    });
}

fn bench_history_save(c: &mut Criterion) {
    let frame = PixelBuffer::new(1920, 1080, Color::WHITE);
    c.bench_function("history_save_1080p", |b| {
        let mut history = HistoryManager::new(HistoryConfig::default());
        b.iter(|| history.save_state(black_box(frame.clone())))
    });
}

criterion_group!(benches, bench_flood_fill, bench_history_save);
criterion_main!(benches);
