//! Benchmark suite for ACS character decoding and playback
//!
//! Measures image decompression, the full decode pipeline, frame composition
//! and the scheduler tick loop on synthetic characters.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use std::{hint::black_box, sync::Arc};

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use kairu_benches::{generate_compressed_image, generate_test_acs_data, row_stride, sizes};
use kairu_runtime::{PlaybackConfig, Scheduler};
use kairu_types::file::acs::{self, compression};

fn bench_decompress(c: &mut Criterion) {
	let mut group = c.benchmark_group("acs_decompress");

	for (name, (width, height)) in
		[("small", sizes::SMALL), ("typical", sizes::TYPICAL), ("large", sizes::LARGE)]
	{
		let data = generate_compressed_image(width, height, 0);
		let expected = row_stride(width) * usize::from(height);

		group.throughput(Throughput::Bytes(expected as u64));
		group.bench_with_input(BenchmarkId::new("decompress", name), &data, |b, data| {
			b.iter(|| {
				let result = compression::decompress(black_box(data), expected);
				black_box(result)
			});
		});
	}

	group.finish();
}

fn bench_unpack_rows(c: &mut Criterion) {
	let mut group = c.benchmark_group("acs_unpack_rows");

	let (width, height) = sizes::TYPICAL;
	let padded: Vec<u8> =
		(0..row_stride(width) * usize::from(height)).map(|i| (i % 256) as u8).collect();

	group.throughput(Throughput::Elements(u64::from(width) * u64::from(height)));
	group.bench_function("bottom_up_to_top_down", |b| {
		b.iter(|| {
			let pixels =
				compression::unpack_rows(black_box(&padded), usize::from(width), usize::from(height));
			black_box(pixels)
		});
	});

	group.finish();
}

fn bench_full_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("acs_decode");
	group.sample_size(50);

	for (animations, frames) in [(8, 4), (32, 8)] {
		let (width, height) = sizes::TYPICAL;
		let data = generate_test_acs_data(animations, frames, width, height);
		let id = format!("{animations}x{frames}");

		group.throughput(Throughput::Bytes(data.len() as u64));
		group.bench_with_input(BenchmarkId::new("decode", &id), &data, |b, data| {
			b.iter(|| {
				let result = acs::decode(black_box(data));
				black_box(result)
			});
		});
	}

	group.finish();
}

fn bench_compose_frame(c: &mut Criterion) {
	let mut group = c.benchmark_group("acs_compose");

	let (width, height) = sizes::TYPICAL;
	let data = generate_test_acs_data(4, 4, width, height);
	let definition = match acs::decode(&data) {
		Ok(definition) => definition,
		Err(err) => {
			eprintln!("Warning: Could not decode synthetic character: {err}");
			return;
		}
	};
	let Some(frame) = definition.states().first().and_then(|state| state.frame(0)) else {
		return;
	};

	group.throughput(Throughput::Elements(u64::from(width) * u64::from(height)));
	group.bench_function("compose_rgba", |b| {
		b.iter(|| black_box(definition.compose_frame(black_box(frame))));
	});

	group.finish();
}

fn bench_playback(c: &mut Criterion) {
	let mut group = c.benchmark_group("playback");

	let data = generate_test_acs_data(16, 8, 16, 16);
	let definition = match acs::decode(&data) {
		Ok(definition) => Arc::new(definition),
		Err(err) => {
			eprintln!("Warning: Could not decode synthetic character: {err}");
			return;
		}
	};

	// one simulated minute at 10 ms per tick
	group.throughput(Throughput::Elements(6_000));
	group.bench_function("tick_loop", |b| {
		b.iter(|| {
			let mut scheduler =
				Scheduler::with_seed(Arc::clone(&definition), PlaybackConfig::manual(), 7);
			let mut events = 0;
			for i in 0..6_000u32 {
				if scheduler.is_stopped() {
					let name = format!("Idle1_{}", i % 14 + 1);
					events += scheduler.start(&name).map_or(0, |e| e.len());
				}
				events += scheduler.tick(10).len();
			}
			black_box(events)
		});
	});

	group.finish();
}

criterion_group!(
	benches,
	bench_decompress,
	bench_unpack_rows,
	bench_full_decode,
	bench_compose_frame,
	bench_playback,
);

criterion_main!(benches);
