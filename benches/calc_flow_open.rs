//! Measure a FlowField generation for a world of uniform terrain (hence open - open space) with
//! a crowd gathered in the middle
//!
//! World is 500 tiles by 500 tiles
//!

use bevy::prelude::*;
use bevy_crowd_flowfield::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Create an initialised engine with a block of crowded tiles in the centre
fn prepare_engine(width: usize, height: usize) -> FlowFieldEngine {
	let mut engine = FlowFieldEngine::default();
	engine.initialize(width, height).unwrap();
	let mut positions = Vec::new();
	for column in (width / 2 - 20)..(width / 2 + 20) {
		for row in (height / 2 - 20)..(height / 2 + 20) {
			positions.push(Vec2::new(column as f32 + 0.5, row as f32 + 0.5));
		}
	}
	engine.refresh_occupancy(positions).unwrap();
	engine
}

/// Retarget from the bottom left corner to the top right and recompute
fn calc(engine: &mut FlowFieldEngine, target: usize) {
	engine.set_target(target).unwrap();
	engine.recompute().unwrap();
}

pub fn criterion_benchmark(c: &mut Criterion) {
	let mut group = c.benchmark_group("algorithm_use");
	group.significance_level(0.05).sample_size(10);
	let mut engine = prepare_engine(500, 500);
	let targets = [0, 500 * 500 - 1];
	let mut i = 0;
	group.bench_function("calc_flow_open", |b| {
		b.iter(|| {
			i = (i + 1) % targets.len();
			calc(black_box(&mut engine), black_box(targets[i]))
		})
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
