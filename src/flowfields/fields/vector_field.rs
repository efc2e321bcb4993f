//! A [VectorField] holds one steering direction per tile. Each non-wall tile points at the
//! neighbour with the cheapest [CostField] value, provided that neighbour is cheaper than the
//! tile itself:
//!
//! ```text
//!  _________________
//! |     |     |     |
//! |  ↘  |  ↓  |  ↙  |
//! |_____|_____|_____|
//! |     |     |     |
//! |  →  |  ·  |  ←  |
//! |_____|_____|_____|
//! |     |     |     |
//! |  ↗  |  ↑  |  ↖  |
//! |_____|_____|_____|
//! ```
//!
//! The target, walls, unreachable tiles and local minima get a zero vector. A steering
//! pipeline/character controller should read the vector of the tile an agent stands on and
//! accelerate along it.
//!

use bevy::prelude::*;
use rayon::prelude::*;

use crate::prelude::*;

/// Fields with at least this many tiles are derived in parallel
const PARALLEL_TILE_THRESHOLD: usize = 4096;

/// Steering unit vector (or zero) of every tile
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct VectorField(Vec<Vec2>);

impl Field<Vec2> for VectorField {
	/// Get a reference to the field array
	fn get(&self) -> &[Vec2] {
		&self.0
	}
	/// Set a tile to a value
	fn set_field_cell_value(&mut self, value: Vec2, index: usize) {
		if let Some(vector) = self.0.get_mut(index) {
			*vector = value;
		}
	}
}

impl VectorField {
	/// Creates a new [VectorField] of `len` zero vectors
	pub fn new(len: usize) -> Self {
		VectorField(vec![Vec2::ZERO; len])
	}
	/// Derive every tile's direction from a converged [CostField]
	pub fn calculate(&mut self, grid: &Grid, table: &DirectionTable, cost_field: &CostField) {
		if self.0.len() != grid.len() {
			self.0 = vec![Vec2::ZERO; grid.len()];
		}
		let costs = cost_field.get();
		if self.0.len() >= PARALLEL_TILE_THRESHOLD {
			self.0
				.par_iter_mut()
				.enumerate()
				.for_each(|(index, vector)| *vector = derive_vector(index, grid, table, costs));
		} else {
			for (index, vector) in self.0.iter_mut().enumerate() {
				*vector = derive_vector(index, grid, table, costs);
			}
		}
	}
}

/// Point a tile towards its cheapest legal neighbour, first in [Ordinal] order on a tie
fn derive_vector(index: usize, grid: &Grid, table: &DirectionTable, costs: &[f32]) -> Vec2 {
	let Some(tile) = grid.get_tile(index) else {
		return Vec2::ZERO;
	};
	if tile.is_wall() {
		return Vec2::ZERO;
	}
	let mut cheapest = costs.get(index).copied().unwrap_or(f32::INFINITY);
	let mut direction = Vec2::ZERO;
	for entry in table.directions(tile.neighbor_code) {
		let Some(cost) = grid
			.neighbour_index(index, entry)
			.and_then(|i| costs.get(i))
		else {
			continue;
		};
		if *cost < cheapest {
			cheapest = *cost;
			direction = entry.unit_vector;
		}
	}
	direction
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;

	/// Build the cost and vector fields of `grid` towards `target`
	fn fields(grid: &Grid, target: TileCoord) -> (CostField, VectorField) {
		let table = DirectionTable::new(grid.get_width());
		let mut cost_field = CostField::new(grid.len());
		cost_field.calculate_field(
			grid.index_of(target).unwrap(),
			grid,
			&table,
			&FlowFieldConfig::default(),
			&mut Frontier::default(),
		);
		let mut vector_field = VectorField::new(grid.len());
		vector_field.calculate(grid, &table, &cost_field);
		(cost_field, vector_field)
	}
	#[test]
	fn everything_points_at_centre() {
		let grid = Grid::new(3, 3).unwrap();
		let target = TileCoord::new(1, 1);
		let (_, vector_field) = fields(&grid, target);
		for (index, vector) in vector_field.get().iter().enumerate() {
			let coord = grid.coord_of(index).unwrap();
			if coord == target {
				assert_eq!(Vec2::ZERO, *vector);
				continue;
			}
			let actual = (Vec2::new(1.0, 1.0)
				- Vec2::new(coord.get_column() as f32, coord.get_row() as f32))
			.normalize();
			assert!((actual - *vector).length() < 1e-6, "tile {:?}", coord);
		}
	}
	#[test]
	fn walls_and_unreachable_are_zero() {
		let grid = Grid::from_ascii(&[
			".....",
			".###.",
			".#.#.",
			".###.",
			".....",
		]).unwrap();
		let (_, vector_field) = fields(&grid, TileCoord::new(4, 0));
		for (index, tile) in grid.get_tiles().iter().enumerate() {
			if tile.is_wall() {
				assert_eq!(Vec2::ZERO, vector_field.get()[index]);
			}
		}
		let pocket = grid.index_of(TileCoord::new(2, 2)).unwrap();
		assert_eq!(Vec2::ZERO, vector_field.get()[pocket]);
		let corner = grid.index_of(TileCoord::new(0, 4)).unwrap();
		assert_ne!(Vec2::ZERO, vector_field.get()[corner]);
	}
	#[test]
	fn crowd_steers_the_other_way() {
		//  ________
		// |__|t_|__|
		// |__|x_|__|  crowd on the eastern tile of the middle row
		// |__|a_|__|
		let mut grid = Grid::from_ascii(&["...", ".#.", "..."]).unwrap();
		let (_, calm) = fields(&grid, TileCoord::new(1, 2));
		let agent = grid.index_of(TileCoord::new(1, 0)).unwrap();
		assert_eq!(Ordinal::NorthEast.unit_vector(), calm.get()[agent]);

		grid.set_occupancy(TileCoord::new(2, 1), 4).unwrap();
		let (_, crowded) = fields(&grid, TileCoord::new(1, 2));
		assert_eq!(Ordinal::NorthWest.unit_vector(), crowded.get()[agent]);
	}
	#[test]
	fn ties_prefer_direction_order() {
		let grid = Grid::new(3, 1).unwrap();
		let table = DirectionTable::new(3);
		let mut cost_field = CostField::new(3);
		cost_field.set_field_cell_value(1.0, 0);
		cost_field.set_field_cell_value(5.0, 1);
		cost_field.set_field_cell_value(1.0, 2);
		let mut vector_field = VectorField::new(3);
		vector_field.calculate(&grid, &table, &cost_field);
		// East comes before West
		assert_eq!(Vec2::new(1.0, 0.0), vector_field.get()[1]);
	}
	#[test]
	fn wrapped_neighbours_are_ignored() {
		let mut grid = Grid::new(3, 2).unwrap();
		// codes claiming every neighbour is open
		grid.write_tiles(&[(1, 0); 6]).unwrap();
		let table = DirectionTable::new(3);
		let mut cost_field = CostField::new(6);
		for index in 0..6 {
			cost_field.set_field_cell_value(5.0, index);
		}
		// the cheapest tile sits at the western end of the top row
		cost_field.set_field_cell_value(0.0, 3);
		let mut vector_field = VectorField::new(6);
		vector_field.calculate(&grid, &table, &cost_field);
		// east of (2, 0) and south east of (2, 1) both wrap onto (0, 1)
		assert_eq!(Vec2::ZERO, vector_field.get()[2]);
		assert_eq!(Vec2::ZERO, vector_field.get()[5]);
		assert_eq!(Ordinal::West.unit_vector(), vector_field.get()[4]);
	}
	#[test]
	fn local_minimum_is_zero() {
		let grid = Grid::new(3, 1).unwrap();
		let table = DirectionTable::new(3);
		let mut cost_field = CostField::new(3);
		cost_field.set_field_cell_value(2.0, 0);
		cost_field.set_field_cell_value(1.0, 1);
		cost_field.set_field_cell_value(2.0, 2);
		let mut vector_field = VectorField::new(3);
		vector_field.calculate(&grid, &table, &cost_field);
		assert_eq!(Vec2::ZERO, vector_field.get()[1]);
		assert_eq!(Vec2::new(1.0, 0.0), vector_field.get()[0]);
		assert_eq!(Vec2::new(-1.0, 0.0), vector_field.get()[2]);
	}
}
