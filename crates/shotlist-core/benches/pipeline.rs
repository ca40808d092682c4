//! Benchmarks for the shotlist pipeline.
//!
//! Run with: cargo bench -p shotlist-core

use chrono::{DateTime, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use shotlist_core::config::{Config, LimitsConfig, ThumbnailConfig};
use shotlist_core::pipeline::{project_names, render_placeholder, Ingestor, ThumbnailSynthesizer};
use shotlist_core::types::{Asset, CaptureTime, FormatClass, SourceRef};
use shotlist_core::{MemoryStorage, StatusBoard, TabularDataset};
use std::io::Cursor;

fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 96]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, format)
        .expect("encode fixture");
    buf.into_inner()
}

fn benchmark_thumbnail(c: &mut Criterion) {
    let jpeg = encoded(1920, 1080, ImageFormat::Jpeg);
    let synth = ThumbnailSynthesizer::new(ThumbnailConfig::default(), LimitsConfig::default());

    c.bench_function("thumbnail_standard_1080p", |b| {
        b.iter(|| synth.synthesize(black_box(&jpeg), "frame.jpg", false))
    });

    let mut raw = vec![0u8; 64 * 1024];
    raw.extend(encoded(1600, 1067, ImageFormat::Jpeg));
    c.bench_function("thumbnail_raw_embedded", |b| {
        b.iter(|| synth.synthesize(black_box(&raw), "DSC_0001.NEF", true))
    });
}

fn benchmark_placeholder(c: &mut Criterion) {
    c.bench_function("placeholder_render", |b| {
        b.iter(|| render_placeholder(black_box("IMG_0001.CR2"), 400, 300))
    });
}

fn benchmark_projection(c: &mut Criterion) {
    let mut assets: Vec<Asset> = (0..5000)
        .map(|i| Asset {
            source_ref: SourceRef::new(format!("IMG_{:04}.JPG", i)),
            original_name: format!("IMG_{:04}.JPG", i),
            capture_time: CaptureTime::from_modified(DateTime::<Utc>::UNIX_EPOCH),
            format_class: FormatClass::Standard,
            size: 0,
            thumbnail: None,
            target_name: None,
        })
        .collect();
    let dataset = TabularDataset::new(
        vec!["name".to_string()],
        (0..5000).map(|i| vec![format!("Guest {}", i)]).collect(),
    )
    .expect("valid dataset");

    c.bench_function("project_names_5000", |b| {
        b.iter(|| project_names(black_box(&mut assets), Some(&dataset), Some("name")))
    });
}

fn benchmark_ingest(c: &mut Criterion) {
    let source = MemoryStorage::new("bench");
    let jpeg = encoded(800, 600, ImageFormat::Jpeg);
    for i in 0..32 {
        source.insert(
            format!("IMG_{:04}.JPG", i),
            Some("image/jpeg"),
            Utc::now(),
            jpeg.clone(),
        );
    }
    let ingestor = Ingestor::new(&Config::default());
    let status = StatusBoard::new();
    let rt = tokio::runtime::Runtime::new().expect("runtime");

    c.bench_function("ingest_32_jpegs", |b| {
        b.iter(|| rt.block_on(ingestor.ingest(black_box(&source), &status)))
    });
}

criterion_group!(
    benches,
    benchmark_thumbnail,
    benchmark_placeholder,
    benchmark_projection,
    benchmark_ingest,
);
criterion_main!(benches);
