use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dsgconvert::prelude::*;
use tempfile::TempDir;

/// Build a synthetic glider track with `rows` observations
fn generate_track(rows: usize) -> (Template, ParsedTable) {
    let template = Template::from_json_str(
        r#"{
        "feature_id": "bench",
        "variables": [
            { "column": "when", "name": "when",
              "role": { "kind": "time_component", "time_kind": "full_date_time",
                        "format": "yyyy-MM-dd'T'HH:mm:ss" } },
            { "column": "lat", "name": "latitude", "type": "float",
              "role": { "kind": "coordinate", "axis": "latitude" } },
            { "column": "lon", "name": "longitude", "type": "float",
              "role": { "kind": "coordinate", "axis": "longitude" } },
            { "column": "temp", "name": "temperature", "type": "float", "role": { "kind": "data" } },
            { "column": "flag", "name": "qc", "type": "integer", "role": { "kind": "data" } },
            { "column": "station", "name": "station", "role": { "kind": "data" } }
        ]
    }"#,
    )
    .expect("valid template");

    let start = chrono::DateTime::from_timestamp(1_600_000_000, 0).expect("valid timestamp");
    let mut when = Vec::with_capacity(rows);
    let mut lat = Vec::with_capacity(rows);
    let mut lon = Vec::with_capacity(rows);
    let mut temp = Vec::with_capacity(rows);
    let mut flag = Vec::with_capacity(rows);
    let mut station = Vec::with_capacity(rows);
    for i in 0..rows {
        let t = start + chrono::Duration::seconds(i as i64 * 30);
        when.push(t.format("%Y-%m-%dT%H:%M:%S").to_string());
        lat.push(format!("{:.5}", 44.0 + i as f64 * 1e-4));
        lon.push(format!("{:.5}", -63.0 - i as f64 * 1e-4));
        temp.push(format!("{:.3}", 7.0 + (i as f64 * 0.01).sin()));
        flag.push((i % 4).to_string());
        station.push(format!("wp{}", i / 100));
    }
    let table = ParsedTable::from_columns([
        ("when", when),
        ("lat", lat),
        ("lon", lon),
        ("temp", temp),
        ("flag", flag),
        ("station", station),
    ])
    .expect("rectangular table");
    (template, table)
}

/// Benchmark in-memory encoding throughput
fn bench_encode_to_bytes(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_to_bytes");

    for rows in [1_000, 10_000, 100_000] {
        let (template, table) = generate_track(rows);
        let encoder = DsgEncoder::new();
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(format!("{}rows", rows)), &rows, |b, _| {
            b.iter(|| {
                let bytes = encoder
                    .encode_to_bytes(black_box(&template), black_box(&table), FeatureType::Trajectory)
                    .expect("encoding failed");
                black_box(bytes.len())
            });
        });
    }

    group.finish();
}

/// Benchmark the full file path including the atomic rename
fn bench_encode_to_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_to_file");
    let (template, table) = generate_track(10_000);
    let encoder = DsgEncoder::with_config(EncoderConfig::wide());

    group.throughput(Throughput::Elements(10_000));
    group.bench_function("10000rows_cdf5", |b| {
        b.iter_batched(
            || TempDir::new().expect("temp dir"),
            |dir| {
                let target = OutputTarget::new(dir.path(), "track.csv");
                let stats = encoder
                    .encode(&template, &table, FeatureType::Trajectory, &target)
                    .expect("encoding failed");
                black_box(stats.bytes_written);
                drop(dir);
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

/// Benchmark time axis parsing on its own
fn bench_time_synthesis(c: &mut Criterion) {
    use dsgconvert::time::{synthesize, IntegerWidth, TimeMode};

    let (template, table) = generate_track(10_000);
    let classification = classify(&template.variables).expect("classification");
    let mode = TimeMode::detect(&classification).expect("time mode");

    c.bench_function("synthesize_time_10000", |b| {
        b.iter(|| synthesize(black_box(&mode), black_box(&table), IntegerWidth::I64).expect("time axis"))
    });
}

criterion_group!(
    benches,
    bench_encode_to_bytes,
    bench_encode_to_file,
    bench_time_synthesis
);
criterion_main!(benches);
