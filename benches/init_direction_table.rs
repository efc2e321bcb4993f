//! Measure building the DirectionTable of every neighbour code for a map width
//!

use bevy_crowd_flowfield::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

pub fn criterion_benchmark(c: &mut Criterion) {
	let mut group = c.benchmark_group("data_initialisation");
	group.significance_level(0.1).sample_size(100);
	group.bench_function("init_direction_table", |b| {
		b.iter(|| DirectionTable::new(black_box(1000)))
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
