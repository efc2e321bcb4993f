//! Useful structures and tools used by the fields
//!

use bevy::prelude::*;

/// A tile `terrain_cost` of this value marks the tile as a wall
pub const WALL_COST: u8 = 8;
/// The most expensive passable `terrain_cost`
pub const MAX_TERRAIN_COST: u8 = 7;
/// Neighbour code of a tile which is itself a wall, every direction is blocked
pub const WALL_CODE: u8 = u8::MAX;
/// A candidate cost must be cheaper than the existing cost scaled by this factor to be accepted
/// during propagation. Tiny floating point improvements are ignored which guarantees the
/// wavefront settles
pub const DEFAULT_RELAXATION_FACTOR: f32 = 0.98;
/// Extra traversal cost added to a tile per agent standing on it
pub const DEFAULT_OCCUPANCY_WEIGHT: f32 = 0.1;

/// Static cut masks indexed by [Ordinal::index]. A tile reached by moving in a direction
/// must not expand the wavefront back into the directions flagged here
const CUT_MASKS: [u8; 8] = [
	0b0111_1100, // N  -> E, SE, S, SW, W
	0b0111_0000, // NE -> S, SW, W
	0b1111_0001, // E  -> N, S, SW, W, NW
	0b1100_0001, // SE -> N, W, NW
	0b1100_0111, // S  -> N, NE, E, W, NW
	0b0000_0111, // SW -> N, NE, E
	0b0001_1111, // W  -> N, NE, E, SE, S
	0b0001_1100, // NW -> E, SE, S
];

/// The 8 directions of movement across the grid, in the fixed order used by neighbour codes.
///
/// North points along `+y` (the next row up), East along `+x`:
///
/// ```text
///  ________________
/// |NW(7)|N(0)|NE(1)|
/// |W(6) | x  |E(2) |
/// |SW(5)|S(4)|SE(3)|
///  ‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾
/// ```
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Reflect)]
#[repr(u8)]
pub enum Ordinal {
	North = 0,
	NorthEast = 1,
	East = 2,
	SouthEast = 3,
	South = 4,
	SouthWest = 5,
	West = 6,
	NorthWest = 7,
}

impl Ordinal {
	/// Every direction in neighbour code bit order
	pub const ALL: [Ordinal; 8] = [
		Ordinal::North,
		Ordinal::NorthEast,
		Ordinal::East,
		Ordinal::SouthEast,
		Ordinal::South,
		Ordinal::SouthWest,
		Ordinal::West,
		Ordinal::NorthWest,
	];
	/// Position of the direction in neighbour codes and cut masks
	pub fn index(&self) -> usize {
		*self as usize
	}
	/// The neighbour code bit of this direction
	pub fn bit(&self) -> u8 {
		1 << self.index()
	}
	/// `(column, row)` delta of a single step
	pub fn step(&self) -> (isize, isize) {
		match self {
			Ordinal::North => (0, 1),
			Ordinal::NorthEast => (1, 1),
			Ordinal::East => (1, 0),
			Ordinal::SouthEast => (1, -1),
			Ordinal::South => (0, -1),
			Ordinal::SouthWest => (-1, -1),
			Ordinal::West => (-1, 0),
			Ordinal::NorthWest => (-1, 1),
		}
	}
	/// Linear index delta of a single step on a grid `width` tiles wide
	pub fn offset(&self, width: usize) -> isize {
		let (column, row) = self.step();
		column + row * width as isize
	}
	/// Whether the direction moves across two axes at once
	pub fn is_diagonal(&self) -> bool {
		self.index() % 2 == 1
	}
	/// Distance covered by a single step, `1` orthogonally and `√2` diagonally
	pub fn length(&self) -> f32 {
		if self.is_diagonal() {
			std::f32::consts::SQRT_2
		} else {
			1.0
		}
	}
	/// Normalised direction of movement
	pub fn unit_vector(&self) -> Vec2 {
		let (column, row) = self.step();
		Vec2::new(column as f32, row as f32).normalize()
	}
	/// Directions which a tile entered by moving this way must not expand into
	pub fn cut_mask(&self) -> u8 {
		CUT_MASKS[self.index()]
	}
	/// For a diagonal, the two orthogonal directions either side of it
	pub fn flanking(&self) -> Option<(Ordinal, Ordinal)> {
		match self {
			Ordinal::NorthEast => Some((Ordinal::North, Ordinal::East)),
			Ordinal::SouthEast => Some((Ordinal::South, Ordinal::East)),
			Ordinal::SouthWest => Some((Ordinal::South, Ordinal::West)),
			Ordinal::NorthWest => Some((Ordinal::North, Ordinal::West)),
			_ => None,
		}
	}
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn bits_follow_index_order() {
		let result: Vec<u8> = Ordinal::ALL.iter().map(|o| o.bit()).collect();
		let actual = vec![1, 2, 4, 8, 16, 32, 64, 128];
		assert_eq!(actual, result);
	}
	#[test]
	fn offsets_for_width() {
		let result: Vec<isize> = Ordinal::ALL.iter().map(|o| o.offset(10)).collect();
		let actual = vec![10, 11, 1, -9, -10, -11, -1, 9];
		assert_eq!(actual, result);
	}
	#[test]
	fn diagonal_lengths() {
		for ordinal in Ordinal::ALL {
			if ordinal.is_diagonal() {
				assert_eq!(std::f32::consts::SQRT_2, ordinal.length());
			} else {
				assert_eq!(1.0, ordinal.length());
			}
		}
	}
	#[test]
	fn unit_vectors_are_normalised() {
		for ordinal in Ordinal::ALL {
			assert!((ordinal.unit_vector().length() - 1.0).abs() < 1e-6);
		}
		let north_east = Ordinal::NorthEast.unit_vector();
		assert!((north_east.x - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
		assert!((north_east.y - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
	}
	#[test]
	fn cut_masks_never_block_the_way_forward() {
		for ordinal in Ordinal::ALL {
			assert_eq!(0, ordinal.cut_mask() & ordinal.bit());
		}
	}
	#[test]
	fn cut_masks_block_the_way_back() {
		for ordinal in Ordinal::ALL {
			let (column, row) = ordinal.step();
			let back = Ordinal::ALL
				.into_iter()
				.find(|o| o.step() == (-column, -row))
				.unwrap();
			assert_ne!(0, ordinal.cut_mask() & back.bit());
		}
	}
	#[test]
	fn north_cut_mask() {
		let result = Ordinal::North.cut_mask();
		let actual = Ordinal::East.bit()
			| Ordinal::SouthEast.bit()
			| Ordinal::South.bit()
			| Ordinal::SouthWest.bit()
			| Ordinal::West.bit();
		assert_eq!(actual, result);
	}
	#[test]
	fn flanking_only_for_diagonals() {
		assert_eq!(None, Ordinal::East.flanking());
		assert_eq!(
			Some((Ordinal::South, Ordinal::West)),
			Ordinal::SouthWest.flanking()
		);
	}
}
