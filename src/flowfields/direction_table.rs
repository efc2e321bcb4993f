//! The [DirectionTable] is a lookup of every legal direction of movement for each of the 256
//! possible neighbour codes of a tile.
//!
//! A tile's neighbour code has bit `i` set when the neighbour in [Ordinal] `i` cannot be
//! entered (it's a wall, sits off the grid or hides behind a diagonal wall gap). Rather than
//! testing bits while the wavefront expands, every code is expanded once up front into the run of
//! directions whose bit is clear:
//!
//! ```text
//! code 0b1000_0011 (N, NE and NW blocked)
//!
//!   runs[code] = (start, end) ──┐
//!                               ▼
//!  entries: ... | E | SE | S | SW | W | ...
//! ```
//!
//! The runs of all codes are packed into a single pool of 1024 entries (each of the 8 directions
//! is clear in exactly half of the codes). Offsets depend on the grid width so the table is
//! rebuilt whenever the width changes.
//!

use bevy::prelude::*;

use crate::prelude::*;

/// Total number of entries across the runs of all 256 codes
const POOL_SIZE: usize = 256 * 8 / 2;

/// A single legal move out of a tile
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct DirectionEntry {
	/// Direction of the move
	pub ordinal: Ordinal,
	/// Linear index delta from the current tile to the neighbour
	pub offset: isize,
	/// Distance covered by the move
	pub length: f32,
	/// Normalised direction of the move
	pub unit_vector: Vec2,
	/// Directions the neighbour must not expand into once entered by this move
	pub cut_mask: u8,
}

impl DirectionEntry {
	/// Create the entry of `ordinal` for a grid `width` tiles wide
	pub fn new(ordinal: Ordinal, width: usize) -> Self {
		DirectionEntry {
			ordinal,
			offset: ordinal.offset(width),
			length: ordinal.length(),
			unit_vector: ordinal.unit_vector(),
			cut_mask: ordinal.cut_mask(),
		}
	}
}

/// Half-open `[start, end)` range of a code's entries inside the pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub struct CodeRun {
	/// First entry of the run
	start: u16,
	/// One past the last entry of the run
	end: u16,
}

impl CodeRun {
	/// Index of the first entry
	pub fn get_start(&self) -> usize {
		self.start as usize
	}
	/// Index one past the last entry
	pub fn get_end(&self) -> usize {
		self.end as usize
	}
	/// Number of legal directions in the run
	pub fn len(&self) -> usize {
		(self.end - self.start) as usize
	}
	/// Whether the code blocks every direction
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}
}

/// Immutable lookup from neighbour code to its legal [DirectionEntry]s
#[derive(Debug, Clone)]
pub struct DirectionTable {
	/// Grid width the offsets were generated for
	width: usize,
	/// Run of each code
	runs: [CodeRun; 256],
	/// Packed runs of every code
	entries: Vec<DirectionEntry>,
	/// Cut mask of each direction, indexed by [Ordinal::index]
	cut_masks: [u8; 8],
}

impl DirectionTable {
	/// Generate the table for a grid `width` tiles wide
	pub fn new(width: usize) -> Self {
		let prototypes = Ordinal::ALL.map(|o| DirectionEntry::new(o, width));
		let mut runs = [CodeRun::default(); 256];
		let mut entries = Vec::with_capacity(POOL_SIZE);
		for (code, run) in runs.iter_mut().enumerate() {
			let start = entries.len() as u16;
			for entry in prototypes.iter() {
				if code as u8 & entry.ordinal.bit() == 0 {
					entries.push(*entry);
				}
			}
			*run = CodeRun {
				start,
				end: entries.len() as u16,
			};
		}
		debug!(
			"Generated direction table for width {} with {} entries",
			width,
			entries.len()
		);
		DirectionTable {
			width,
			runs,
			entries,
			cut_masks: Ordinal::ALL.map(|o| o.cut_mask()),
		}
	}
	/// Width of the grid the offsets were generated for
	pub fn get_width(&self) -> usize {
		self.width
	}
	/// Get the `(start, end)` run of a neighbour code
	pub fn get_run(&self, code: u8) -> CodeRun {
		self.runs[code as usize]
	}
	/// Legal directions of a neighbour code in [Ordinal] order
	pub fn directions(&self, code: u8) -> &[DirectionEntry] {
		let run = self.runs[code as usize];
		&self.entries[run.get_start()..run.get_end()]
	}
	/// The shared pool of entries
	pub fn get_entries(&self) -> &[DirectionEntry] {
		&self.entries
	}
	/// Cut mask applied to a tile entered by moving towards `ordinal`
	pub fn get_cut_mask(&self, ordinal: Ordinal) -> u8 {
		self.cut_masks[ordinal.index()]
	}
	/// All 8 cut masks in [Ordinal] order
	pub fn get_cut_masks(&self) -> &[u8; 8] {
		&self.cut_masks
	}
}
