//! The CostField contains a scalar distance-to-target per tile. It uses the terrain and crowd
//! of the [Grid] to produce a cumulative cost of reaching the target.
//!
//! When a new target is processed the field is reset to `f32::INFINITY` and the target tile is
//! set to `0`. The wavefront then expands in rounds from the target:
//!
//! 1. Every tile in the current frontier looks up the legal directions of its neighbour code,
//! with the cut mask of the move that reached it OR'd in so it never expands back the way it came
//! 2. For each legal neighbour a candidate cost is `(terrain + occupancy * weight) * length`
//! added to the tile's own cost
//! 3. The candidate is accepted only if it undercuts the neighbour's cost scaled by the relaxation
//! factor, accepted neighbours form the next frontier along with the cut mask of their move
//! 4. The frontiers are swapped and the rounds repeat until nothing is accepted
//!
//! A tile can be accepted again in a later round when a cheaper route arrives from elsewhere.
//! All candidates of a round are computed from the costs as they stood before the round, the
//! cheapest per tile wins, so the order tiles are processed in never changes the result and
//! large frontiers are expanded in parallel.
//!
//! From a uniform grid of terrain cost `1` with the target in the centre:
//!
//! ```text
//!  __________________________________
//! |      |      |      |      |      |
//! | 2.83 | 2.41 |  2   | 2.41 | 2.83 |
//! |______|______|______|______|______|
//! |      |      |      |      |      |
//! | 2.41 | 1.41 |  1   | 1.41 | 2.41 |
//! |______|______|______|______|______|
//! |      |      |      |      |      |
//! |  2   |  1   |  0   |  1   |  2   |
//! |______|______|______|______|______|
//! |      |      |      |      |      |
//! | 2.41 | 1.41 |  1   | 1.41 | 2.41 |
//! |______|______|______|______|______|
//! |      |      |      |      |      |
//! | 2.83 | 2.41 |  2   | 2.41 | 2.83 |
//! |______|______|______|______|______|
//! ```
//!
//! Tiles that can't be reached keep `f32::INFINITY`.
//!

use rayon::prelude::*;

use crate::prelude::*;

/// Frontiers at least this long generate their candidates in parallel
const PARALLEL_FRONTIER_THRESHOLD: usize = 512;

/// A tile waiting to expand the wavefront into its neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrontierEntry {
	/// Linear index of the tile
	pub index: usize,
	/// Extra blocked directions from the move that reached the tile
	pub code_modifier: u8,
}

/// Double buffered frontier lists
#[derive(Debug, Clone, Default)]
pub struct Frontier {
	/// Tiles expanding this round
	current: Vec<FrontierEntry>,
	/// Tiles accepted this round, expanding next round
	next: Vec<FrontierEntry>,
}

impl Frontier {
	/// Empty both buffers
	pub fn clear(&mut self) {
		self.current.clear();
		self.next.clear();
	}
	/// Empty both buffers and start the wavefront from `target`
	pub fn seed(&mut self, target: usize) {
		self.clear();
		self.current.push(FrontierEntry {
			index: target,
			code_modifier: 0,
		});
	}
	/// Tiles expanding this round
	pub fn get_current(&self) -> &[FrontierEntry] {
		&self.current
	}
	/// Whether the wavefront has settled
	pub fn is_converged(&self) -> bool {
		self.current.is_empty()
	}
	/// Promote the next buffer to current and empty the other
	fn swap(&mut self) {
		std::mem::swap(&mut self.current, &mut self.next);
		self.next.clear();
	}
}

/// An accepted improvement to a neighbour's cost
#[derive(Debug, Clone, Copy)]
struct Candidate {
	/// Tile being improved
	index: usize,
	/// New cost of the tile
	cost: f32,
	/// Cut mask of the move onto the tile
	cut_mask: u8,
}

/// Summary of a propagation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationReport {
	/// Number of rounds run until the wavefront settled
	pub rounds: usize,
	/// Number of improvements that became a tile's cost, a tile improved by several equally
	/// cheap moves counts each of them
	pub relaxations: usize,
}

/// Distance-to-target of every tile
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CostField(Vec<f32>);

impl Field<f32> for CostField {
	/// Get a reference to the field array
	fn get(&self) -> &[f32] {
		&self.0
	}
	/// Set a tile to a value
	fn set_field_cell_value(&mut self, value: f32, index: usize) {
		if let Some(cost) = self.0.get_mut(index) {
			*cost = value;
		}
	}
}

impl CostField {
	/// Creates a new [CostField] of `len` unreachable tiles
	pub fn new(len: usize) -> Self {
		CostField(vec![f32::INFINITY; len])
	}
	/// Reset every tile to `f32::INFINITY` apart from the `target` which is set to `0`
	pub fn reset(&mut self, target: usize) {
		self.0.fill(f32::INFINITY);
		if let Some(cost) = self.0.get_mut(target) {
			*cost = 0.0;
		}
	}
	/// Whether the tile has a finite cost
	pub fn is_reachable(&self, index: usize) -> bool {
		self.0.get(index).is_some_and(|c| c.is_finite())
	}
	/// Run the wavefront from `target` until it settles
	pub fn calculate_field(
		&mut self,
		target: usize,
		grid: &Grid,
		table: &DirectionTable,
		config: &FlowFieldConfig,
		frontier: &mut Frontier,
	) -> PropagationReport {
		if self.0.len() != grid.len() {
			self.0 = vec![f32::INFINITY; grid.len()];
		}
		self.reset(target);
		let mut report = PropagationReport::default();
		if target >= grid.len() {
			frontier.clear();
			return report;
		}
		frontier.seed(target);
		while !frontier.is_converged() {
			report.relaxations +=
				self.relax_round(&frontier.current, grid, table, config, &mut frontier.next);
			report.rounds += 1;
			frontier.swap();
		}
		report
	}
	/// Expand every entry of `current` once, writing improved costs and pushing the improved
	/// tiles into `next`. Returns the number of winning improvements
	pub fn relax_round(
		&mut self,
		current: &[FrontierEntry],
		grid: &Grid,
		table: &DirectionTable,
		config: &FlowFieldConfig,
		next: &mut Vec<FrontierEntry>,
	) -> usize {
		let candidates = if current.len() >= PARALLEL_FRONTIER_THRESHOLD {
			current
				.par_iter()
				.fold(Vec::new, |mut found, entry| {
					self.expand_entry(entry, grid, table, config, &mut found);
					found
				})
				.reduce(Vec::new, |mut a, mut b| {
					a.append(&mut b);
					a
				})
		} else {
			let mut found = Vec::new();
			for entry in current.iter() {
				self.expand_entry(entry, grid, table, config, &mut found);
			}
			found
		};
		// cheapest candidate per tile wins
		for candidate in candidates.iter() {
			let cost = &mut self.0[candidate.index];
			if candidate.cost < *cost {
				*cost = candidate.cost;
			}
		}
		let queued = next.len();
		next.extend(
			candidates
				.iter()
				.filter(|c| c.cost == self.0[c.index])
				.map(|c| FrontierEntry {
					index: c.index,
					code_modifier: c.cut_mask,
				}),
		);
		let winners = next.len() - queued;
		next.sort_unstable();
		next.dedup();
		winners
	}
	/// Collect the neighbours of `entry` whose cost it would improve
	fn expand_entry(
		&self,
		entry: &FrontierEntry,
		grid: &Grid,
		table: &DirectionTable,
		config: &FlowFieldConfig,
		found: &mut Vec<Candidate>,
	) {
		let Some(tile) = grid.get_tile(entry.index) else {
			return;
		};
		let existing_cost = self.0[entry.index];
		let code = tile.neighbor_code | entry.code_modifier;
		for direction in table.directions(code) {
			// codes can come from an external generator, never trust them to stay on the grid
			let Some(index) = grid.neighbour_index(entry.index, direction) else {
				continue;
			};
			let Some(neighbour) = grid.get_tile(index) else {
				continue;
			};
			if neighbour.is_wall() {
				continue;
			}
			let cost = config.step_cost(neighbour, direction.length) + existing_cost;
			if cost < self.0[index] * config.relaxation_factor {
				found.push(Candidate {
					index,
					cost,
					cut_mask: direction.cut_mask,
				});
			}
		}
	}
}
