//! Measure a FlowField generation for a world of serpentine walls which forces the wavefront to
//! turn many corridor corners
//!
//! World is 300 tiles by 300 tiles
//!

use bevy_crowd_flowfield::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Build a grid where every fourth column is a wall with a gap at alternating ends
fn prepare_grid(width: usize, height: usize) -> Grid {
	let mut grid = Grid::new(width, height).unwrap();
	for column in (3..width).step_by(4) {
		let gap = if (column / 4) % 2 == 0 { height - 1 } else { 0 };
		for row in 0..height {
			if row != gap {
				grid.set_terrain(TileCoord::new(column, row), WALL_COST)
					.unwrap();
			}
		}
	}
	grid
}

pub fn criterion_benchmark(c: &mut Criterion) {
	let mut group = c.benchmark_group("algorithm_use");
	group.significance_level(0.05).sample_size(10);
	let mut engine = FlowFieldEngine::default();
	engine
		.initialize_with_grid(prepare_grid(300, 300))
		.unwrap();
	group.bench_function("calc_flow_maze", |b| {
		b.iter(|| {
			// alternate targets so every iteration does a full propagation
			engine.set_target(black_box(0)).unwrap();
			engine.recompute().unwrap();
			engine.set_target(black_box(296)).unwrap();
			engine.recompute().unwrap();
		})
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
