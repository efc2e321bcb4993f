//! The [Grid] is the authoritative terrain and crowd state the flow field is computed from.
//!
//! Each [Tile] stores an 8-bit `terrain_cost` where `0..=7` is passable and `8` marks a wall, the
//! number of agents currently standing on it and a neighbour code recording which of its 8
//! neighbours cannot be entered:
//!
//! ```text
//!  _______________________
//! |     |     |     |     |
//! |  1  |  1  |  8  |  1  |   bit 0 N, bit 1 NE, bit 2 E, bit 3 SE,
//! |_____|_____|_____|_____|   bit 4 S, bit 5 SW, bit 6 W, bit 7 NW
//! |     |     |     |     |
//! |  1  |  x  |  1  |  1  |   code of x = NE (wall)
//! |_____|_____|_____|_____|
//! |     |     |     |     |
//! |  1  |  1  |  1  |  1  |
//! |_____|_____|_____|_____|
//! ```
//!
//! Tiles are stored row by row from the south-west corner, `index = column + row * width`, and
//! North is the next row up.
//!

use bevy::prelude::*;

use crate::prelude::*;

/// `(column, row)` of a tile within the [Grid]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct TileCoord((usize, usize));

impl TileCoord {
	/// Create a new instance of [TileCoord]
	pub fn new(column: usize, row: usize) -> Self {
		TileCoord((column, row))
	}
	/// Get the `(column, row)` tuple
	pub fn get_column_row(&self) -> (usize, usize) {
		self.0
	}
	/// Get the column
	pub fn get_column(&self) -> usize {
		self.0 .0
	}
	/// Get the row
	pub fn get_row(&self) -> usize {
		self.0 .1
	}
}

/// A single grid cell
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Reflect)]
pub struct Tile {
	/// `0..=7` is the cost of traversing the tile, [WALL_COST] is impassable
	pub terrain_cost: u8,
	/// Number of agents on the tile, refreshed once per cycle
	pub occupancy: u16,
	/// Bit `i` set means the neighbour in [Ordinal] `i` cannot be entered
	pub neighbor_code: u8,
}

impl Default for Tile {
	fn default() -> Self {
		Tile::new(1)
	}
}

impl Tile {
	/// Create an unoccupied tile. The neighbour code is filled in by the [Grid]
	pub fn new(terrain_cost: u8) -> Self {
		Tile {
			terrain_cost,
			occupancy: 0,
			neighbor_code: 0,
		}
	}
	/// Create a wall tile
	pub fn wall() -> Self {
		Tile {
			terrain_cost: WALL_COST,
			occupancy: 0,
			neighbor_code: WALL_CODE,
		}
	}
	/// Whether the tile is impassable
	pub fn is_wall(&self) -> bool {
		self.terrain_cost == WALL_COST
	}
}

/// Rejects terrain values above [WALL_COST]
fn check_terrain_cost(terrain_cost: u8) -> Result<(), FlowFieldError> {
	if terrain_cost > WALL_COST {
		Err(FlowFieldError::TerrainCostOutOfRange(terrain_cost))
	} else {
		Ok(())
	}
}

/// Tile array plus its dimensions
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct Grid {
	/// Number of columns
	width: usize,
	/// Number of rows
	height: usize,
	/// Tiles stored row by row
	tiles: Vec<Tile>,
	/// How neighbour codes treat diagonal wall gaps
	diagonal_policy: DiagonalPolicy,
}

impl Grid {
	/// Create a grid of `width` by `height` tiles with a `terrain_cost` of `1`
	pub fn new(width: usize, height: usize) -> Result<Self, FlowFieldError> {
		Grid::with_diagonal_policy(width, height, DiagonalPolicy::default())
	}
	/// Create a grid of default tiles which builds its neighbour codes with `diagonal_policy`
	pub fn with_diagonal_policy(
		width: usize,
		height: usize,
		diagonal_policy: DiagonalPolicy,
	) -> Result<Self, FlowFieldError> {
		if width == 0 || height == 0 {
			return Err(FlowFieldError::ZeroSizedGrid { width, height });
		}
		let mut grid = Grid {
			width,
			height,
			tiles: vec![Tile::default(); width * height],
			diagonal_policy,
		};
		grid.refresh_neighbor_codes();
		Ok(grid)
	}
	/// Build a grid from rows of symbols, the first row being the northern-most. `#` is a wall,
	/// `.` a tile of cost `1` and the digits `0`-`7` a tile of that cost
	pub fn from_ascii(rows: &[&str]) -> Result<Self, FlowFieldError> {
		let height = rows.len();
		let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
		let mut grid = Grid::new(width, height)?;
		for (i, line) in rows.iter().enumerate() {
			let count = line.chars().count();
			if count != width {
				return Err(FlowFieldError::TileCountMismatch {
					expected: width,
					actual: count,
				});
			}
			let row = height - 1 - i;
			for (column, symbol) in line.chars().enumerate() {
				let terrain_cost = match symbol {
					'#' => WALL_COST,
					'.' => 1,
					'0'..='7' => symbol as u8 - b'0',
					_ => return Err(FlowFieldError::InvalidMapSymbol { symbol, row: i }),
				};
				grid.tiles[column + row * width].terrain_cost = terrain_cost;
			}
		}
		grid.refresh_neighbor_codes();
		Ok(grid)
	}
	/// Number of columns
	pub fn get_width(&self) -> usize {
		self.width
	}
	/// Number of rows
	pub fn get_height(&self) -> usize {
		self.height
	}
	/// Total number of tiles
	pub fn len(&self) -> usize {
		self.tiles.len()
	}
	/// Whether the grid holds no tiles
	pub fn is_empty(&self) -> bool {
		self.tiles.is_empty()
	}
	/// Get a reference to the tile array
	pub fn get_tiles(&self) -> &[Tile] {
		&self.tiles
	}
	/// Diagonal policy used when building neighbour codes
	pub fn get_diagonal_policy(&self) -> DiagonalPolicy {
		self.diagonal_policy
	}
	/// Change the diagonal policy, every neighbour code is rebuilt
	pub fn set_diagonal_policy(&mut self, diagonal_policy: DiagonalPolicy) {
		self.diagonal_policy = diagonal_policy;
		self.refresh_neighbor_codes();
	}
	/// Whether signed `(column, row)` coordinates lie on the grid
	pub fn is_in_bounds(&self, column: isize, row: isize) -> bool {
		column >= 0 && row >= 0 && (column as usize) < self.width && (row as usize) < self.height
	}
	/// Convert a [TileCoord] into a linear tile index
	pub fn index_of(&self, coord: TileCoord) -> Result<usize, FlowFieldError> {
		let (column, row) = coord.get_column_row();
		if column >= self.width || row >= self.height {
			return Err(FlowFieldError::CoordsOutOfBounds {
				column,
				row,
				width: self.width,
				height: self.height,
			});
		}
		Ok(column + row * self.width)
	}
	/// Convert a linear tile index into a [TileCoord]
	pub fn coord_of(&self, index: usize) -> Option<TileCoord> {
		(index < self.tiles.len()).then(|| TileCoord::new(index % self.width, index / self.width))
	}
	/// A tile is a wall if it's outside the grid or has a [WALL_COST] terrain
	pub fn is_wall(&self, index: usize) -> bool {
		self.tiles.get(index).is_none_or(|t| t.is_wall())
	}
	/// A position is a wall if it's outside the grid or has a [WALL_COST] terrain
	pub fn is_wall_at(&self, column: isize, row: isize) -> bool {
		if !self.is_in_bounds(column, row) {
			return true;
		}
		self.tiles[column as usize + row as usize * self.width].is_wall()
	}
	/// Index of the tile `entry` steps onto from `index`. `None` when the step leaves the grid,
	/// including offsets that would wrap around onto another row
	pub fn neighbour_index(&self, index: usize, entry: &DirectionEntry) -> Option<usize> {
		let next = index
			.checked_add_signed(entry.offset)
			.filter(|i| *i < self.tiles.len())?;
		let (column, _) = entry.ordinal.step();
		let moved = (next % self.width) as isize - (index % self.width) as isize;
		(moved == column).then_some(next)
	}
	/// Retrieve a tile by linear index
	pub fn get_tile(&self, index: usize) -> Option<&Tile> {
		self.tiles.get(index)
	}
	/// Retrieve a tile by coordinates
	pub fn get_tile_at(&self, coord: TileCoord) -> Result<&Tile, FlowFieldError> {
		let index = self.index_of(coord)?;
		Ok(&self.tiles[index])
	}
	/// Overwrite the terrain and occupancy of a tile. Its neighbour code is rebuilt from the
	/// layout around it, along with the codes of its neighbours if it became or stopped being a
	/// wall
	pub fn set_tile(&mut self, coord: TileCoord, tile: Tile) -> Result<(), FlowFieldError> {
		check_terrain_cost(tile.terrain_cost)?;
		let index = self.index_of(coord)?;
		let was_wall = self.tiles[index].is_wall();
		self.tiles[index] = tile;
		if was_wall != tile.is_wall() {
			trace!("Wall layout changed at {:?}", coord);
			self.refresh_local_neighbor_codes(coord);
		} else {
			self.tiles[index].neighbor_code = self.compute_neighbor_code(coord);
		}
		Ok(())
	}
	/// Change the terrain of a tile. If that adds or removes a wall the neighbour codes of the
	/// tile and its neighbours are rebuilt
	pub fn set_terrain(&mut self, coord: TileCoord, terrain_cost: u8) -> Result<(), FlowFieldError> {
		check_terrain_cost(terrain_cost)?;
		let index = self.index_of(coord)?;
		let was_wall = self.tiles[index].is_wall();
		self.tiles[index].terrain_cost = terrain_cost;
		if was_wall != self.tiles[index].is_wall() {
			trace!("Wall layout changed at {:?}", coord);
			self.refresh_local_neighbor_codes(coord);
		}
		Ok(())
	}
	/// Full-grid write of `(terrain_cost, neighbor_code)` pairs supplied by a map generator. The
	/// codes are trusted as given and occupancy is left untouched
	pub fn write_tiles(&mut self, tiles: &[(u8, u8)]) -> Result<(), FlowFieldError> {
		if tiles.len() != self.tiles.len() {
			return Err(FlowFieldError::TileCountMismatch {
				expected: self.tiles.len(),
				actual: tiles.len(),
			});
		}
		for (terrain_cost, _) in tiles.iter() {
			check_terrain_cost(*terrain_cost)?;
		}
		for (tile, (terrain_cost, neighbor_code)) in self.tiles.iter_mut().zip(tiles.iter()) {
			tile.terrain_cost = *terrain_cost;
			tile.neighbor_code = *neighbor_code;
		}
		Ok(())
	}
	/// Work out the neighbour code of a tile from the wall layout around it
	pub fn compute_neighbor_code(&self, coord: TileCoord) -> u8 {
		let column = coord.get_column() as isize;
		let row = coord.get_row() as isize;
		if self.is_wall_at(column, row) {
			return WALL_CODE;
		}
		let mut code = 0;
		for ordinal in Ordinal::ALL {
			let (dc, dr) = ordinal.step();
			if self.is_wall_at(column + dc, row + dr) {
				code |= ordinal.bit();
			}
		}
		if self.diagonal_policy == DiagonalPolicy::BlockWallGaps {
			for ordinal in Ordinal::ALL {
				if let Some((a, b)) = ordinal.flanking() {
					if code & a.bit() != 0 && code & b.bit() != 0 {
						code |= ordinal.bit();
					}
				}
			}
		}
		code
	}
	/// Rebuild the neighbour code of every tile
	pub fn refresh_neighbor_codes(&mut self) {
		for index in 0..self.tiles.len() {
			let coord = TileCoord::new(index % self.width, index / self.width);
			self.tiles[index].neighbor_code = self.compute_neighbor_code(coord);
		}
	}
	/// Rebuild the neighbour codes of a tile and the 8 tiles around it
	fn refresh_local_neighbor_codes(&mut self, coord: TileCoord) {
		let column = coord.get_column() as isize;
		let row = coord.get_row() as isize;
		for dr in -1..=1 {
			for dc in -1..=1 {
				if self.is_in_bounds(column + dc, row + dr) {
					let neighbour = TileCoord::new((column + dc) as usize, (row + dr) as usize);
					let index = neighbour.get_column() + neighbour.get_row() * self.width;
					self.tiles[index].neighbor_code = self.compute_neighbor_code(neighbour);
				}
			}
		}
	}
	/// Set every tile's occupancy to `0`
	pub fn clear_occupancy(&mut self) {
		for tile in self.tiles.iter_mut() {
			tile.occupancy = 0;
		}
	}
	/// Set the number of agents standing on a tile
	pub fn set_occupancy(&mut self, coord: TileCoord, occupancy: u16) -> Result<(), FlowFieldError> {
		let index = self.index_of(coord)?;
		self.tiles[index].occupancy = occupancy;
		Ok(())
	}
	/// Find the tile underneath a position, one tile being one unit of space
	pub fn tile_at_position(&self, position: Vec2) -> Option<TileCoord> {
		if !position.is_finite() {
			return None;
		}
		let column = position.x.floor();
		let row = position.y.floor();
		if column < 0.0 || row < 0.0 {
			return None;
		}
		let (column, row) = (column as usize, row as usize);
		(column < self.width && row < self.height).then(|| TileCoord::new(column, row))
	}
	/// Crowd count pass, replaces every tile's occupancy with the number of `positions` on top
	/// of it. Positions off the grid are ignored, returns how many positions were counted
	pub fn count_occupancy(&mut self, positions: impl IntoIterator<Item = Vec2>) -> usize {
		self.clear_occupancy();
		let mut counted = 0;
		for position in positions {
			if let Some(coord) = self.tile_at_position(position) {
				let index = coord.get_column() + coord.get_row() * self.width;
				let tile = &mut self.tiles[index];
				tile.occupancy = tile.occupancy.saturating_add(1);
				counted += 1;
			}
		}
		counted
	}
}
