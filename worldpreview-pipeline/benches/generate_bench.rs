use criterion::{criterion_group, criterion_main, Criterion};

use worldpreview_core::{Color, LayerSampler, PreviewGrid, SampleError, SampleRect};
use worldpreview_pipeline::{generate, TaskCancel};

/// Cheap hash-based sampler so the benchmark measures scan overhead, not
/// a real generator.
struct HashSampler;

impl LayerSampler for HashSampler {
    fn layers(&self) -> Vec<String> {
        vec!["height".into()]
    }

    fn set_seed(&self, _seed: &str) {}

    fn sample(&self, _layer: &str, area: SampleRect) -> Result<Color, SampleError> {
        let h = (area.x as i64)
            .wrapping_mul(0x9E37_79B9)
            .wrapping_add((area.y as i64).wrapping_mul(0x85EB_CA6B)) as u64;
        let v = (h >> 16) as u8;
        Ok(Color::rgb(v, v, v))
    }
}

fn bench_default_preview(c: &mut Criterion) {
    let grid = PreviewGrid::default();
    let cancel = TaskCancel::new();

    c.bench_function("generate_128x128_zoom10", |b| {
        b.iter(|| generate(&grid, 10, "height", &HashSampler, &cancel));
    });
}

fn bench_small_preview(c: &mut Criterion) {
    let grid = PreviewGrid::square(64).unwrap();
    let cancel = TaskCancel::new();

    c.bench_function("generate_64x64_zoom1", |b| {
        b.iter(|| generate(&grid, 1, "height", &HashSampler, &cancel));
    });
}

criterion_group!(benches, bench_default_preview, bench_small_preview);
criterion_main!(benches);
