//! The [FlowFieldEngine] owns the [Grid], the [DirectionTable] and the fields computed from them
//! and walks them through their lifecycle:
//!
//! ```text
//!                 initialize                 recompute
//!  Uninitialized ───────────► Stale ◄──────────────────► Valid
//!        ▲                      set_target / grid_mut /
//!        └──── release ──────── refresh_occupancy
//! ```
//!
//! Fields can only be sampled while [EngineState::Valid]. A rejected call never touches the
//! last computed fields so steering can keep using them.
//!

use bevy::prelude::*;

use crate::prelude::*;

/// Lifecycle of the engine's fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum EngineState {
	/// No grid or fields allocated
	#[default]
	Uninitialized,
	/// The target, grid or crowd changed since the fields were computed
	Stale,
	/// Fields have converged and are safe to read
	Valid,
}

/// Everything allocated between [FlowFieldEngine::initialize] and [FlowFieldEngine::release]
#[derive(Debug, Clone)]
struct Workspace {
	/// Terrain and crowd
	grid: Grid,
	/// Legal directions per neighbour code for the grid's width
	table: DirectionTable,
	/// Distance to the target
	cost_field: CostField,
	/// Steering directions
	vector_field: VectorField,
	/// Propagation buffers
	frontier: Frontier,
}

/// Single target flow field over a crowded tile grid
#[derive(Resource, Debug, Clone, Default)]
pub struct FlowFieldEngine {
	/// Tuning of the cost model
	config: FlowFieldConfig,
	/// Current lifecycle state
	state: EngineState,
	/// Tile index the field flows towards
	target: Option<usize>,
	/// Allocated data, present unless uninitialised
	workspace: Option<Workspace>,
}

impl FlowFieldEngine {
	/// Create an uninitialised engine using `config`
	pub fn new(config: FlowFieldConfig) -> Result<Self, FlowFieldError> {
		config.validate()?;
		Ok(FlowFieldEngine {
			config,
			..default()
		})
	}
	/// Allocate a `width` by `height` grid of cost `1` tiles and empty fields. The direction
	/// table is only rebuilt when the width differs from the previous grid
	pub fn initialize(&mut self, width: usize, height: usize) -> Result<(), FlowFieldError> {
		let grid = Grid::with_diagonal_policy(width, height, self.config.diagonal_policy)?;
		self.install_grid(grid);
		Ok(())
	}
	/// Initialise from a ready made grid, e.g one built by a map generator
	pub fn initialize_with_grid(&mut self, mut grid: Grid) -> Result<(), FlowFieldError> {
		if grid.is_empty() {
			return Err(FlowFieldError::ZeroSizedGrid {
				width: grid.get_width(),
				height: grid.get_height(),
			});
		}
		if grid.get_diagonal_policy() != self.config.diagonal_policy {
			grid.set_diagonal_policy(self.config.diagonal_policy);
		}
		self.install_grid(grid);
		Ok(())
	}
	/// Swap in a new grid and allocate fields to match
	fn install_grid(&mut self, grid: Grid) {
		let table = match self.workspace.take() {
			Some(workspace) if workspace.table.get_width() == grid.get_width() => {
				trace!("Reusing direction table for width {}", grid.get_width());
				workspace.table
			}
			_ => DirectionTable::new(grid.get_width()),
		};
		debug!(
			"Initialised flow field of {}x{} tiles",
			grid.get_width(),
			grid.get_height()
		);
		self.workspace = Some(Workspace {
			cost_field: CostField::new(grid.len()),
			vector_field: VectorField::new(grid.len()),
			frontier: Frontier::default(),
			table,
			grid,
		});
		self.target = None;
		self.state = EngineState::Stale;
	}
	/// Drop the grid and fields
	pub fn release(&mut self) {
		debug!("Released flow field");
		self.workspace = None;
		self.target = None;
		self.state = EngineState::Uninitialized;
	}
	/// Current lifecycle state
	pub fn get_state(&self) -> EngineState {
		self.state
	}
	/// Tile index the field flows towards
	pub fn get_target(&self) -> Option<usize> {
		self.target
	}
	/// Tuning of the cost model
	pub fn get_config(&self) -> &FlowFieldConfig {
		&self.config
	}
	/// Borrow the allocated data
	fn workspace(&self) -> Result<&Workspace, FlowFieldError> {
		self.workspace.as_ref().ok_or(FlowFieldError::NotInitialized)
	}
	/// Borrow the allocated data once fields are readable
	fn valid_workspace(&self) -> Result<&Workspace, FlowFieldError> {
		match self.state {
			EngineState::Valid => self.workspace(),
			state => Err(FlowFieldError::FieldNotReady(state)),
		}
	}
	/// Terrain and crowd state
	pub fn get_grid(&self) -> Result<&Grid, FlowFieldError> {
		Ok(&self.workspace()?.grid)
	}
	/// Mutable access to the grid, the fields become stale
	pub fn grid_mut(&mut self) -> Result<&mut Grid, FlowFieldError> {
		let workspace = self.workspace.as_mut().ok_or(FlowFieldError::NotInitialized)?;
		self.state = EngineState::Stale;
		Ok(&mut workspace.grid)
	}
	/// Legal directions per neighbour code
	pub fn get_direction_table(&self) -> Result<&DirectionTable, FlowFieldError> {
		Ok(&self.workspace()?.table)
	}
	/// The last computed [CostField], regardless of state
	pub fn get_cost_field(&self) -> Result<&CostField, FlowFieldError> {
		Ok(&self.workspace()?.cost_field)
	}
	/// The last computed [VectorField], regardless of state. Useful to keep steering on the
	/// previous field while a new one is pending
	pub fn get_vector_field(&self) -> Result<&VectorField, FlowFieldError> {
		Ok(&self.workspace()?.vector_field)
	}
	/// Point the field at a new tile. Setting the same target while valid does nothing
	pub fn set_target(&mut self, target: usize) -> Result<(), FlowFieldError> {
		let workspace = self.workspace.as_mut().ok_or(FlowFieldError::NotInitialized)?;
		let len = workspace.grid.len();
		if target >= len {
			return Err(FlowFieldError::IndexOutOfBounds { index: target, len });
		}
		if self.target == Some(target) && self.state == EngineState::Valid {
			return Ok(());
		}
		if workspace.grid.is_wall(target) {
			warn!("Flow field target {} is a wall, nothing will reach it", target);
		}
		workspace.frontier.clear();
		workspace.cost_field.reset(target);
		self.target = Some(target);
		self.state = EngineState::Stale;
		Ok(())
	}
	/// Point the field at the tile at `coord`
	pub fn set_target_coords(&mut self, coord: TileCoord) -> Result<(), FlowFieldError> {
		let index = self.get_grid()?.index_of(coord)?;
		self.set_target(index)
	}
	/// Replace the grid's occupancy with a count of agents at `positions`, the fields become
	/// stale. Returns how many agents stood on the grid
	pub fn refresh_occupancy(
		&mut self,
		positions: impl IntoIterator<Item = Vec2>,
	) -> Result<usize, FlowFieldError> {
		let grid = self.grid_mut()?;
		let counted = grid.count_occupancy(positions);
		trace!("Counted {} agents on the grid", counted);
		Ok(counted)
	}
	/// Propagate costs from the target and derive the vector field
	pub fn recompute(&mut self) -> Result<PropagationReport, FlowFieldError> {
		let workspace = self.workspace.as_mut().ok_or(FlowFieldError::NotInitialized)?;
		let target = self.target.ok_or(FlowFieldError::NoTarget)?;
		let report = workspace.cost_field.calculate_field(
			target,
			&workspace.grid,
			&workspace.table,
			&self.config,
			&mut workspace.frontier,
		);
		workspace
			.vector_field
			.calculate(&workspace.grid, &workspace.table, &workspace.cost_field);
		debug!(
			"Flow field to {} converged after {} rounds, {} relaxations",
			target, report.rounds, report.relaxations
		);
		self.state = EngineState::Valid;
		Ok(report)
	}
	/// Steering vector of a tile
	pub fn sample(&self, index: usize) -> Result<Vec2, FlowFieldError> {
		let workspace = self.valid_workspace()?;
		workspace
			.vector_field
			.get_field_cell_value(index)
			.ok_or(FlowFieldError::IndexOutOfBounds {
				index,
				len: workspace.grid.len(),
			})
	}
	/// Steering vector of the tile underneath a position, zero when off the grid
	pub fn sample_position(&self, position: Vec2) -> Result<Vec2, FlowFieldError> {
		let workspace = self.valid_workspace()?;
		match workspace.grid.tile_at_position(position) {
			Some(coord) => self.sample(workspace.grid.index_of(coord)?),
			None => Ok(Vec2::ZERO),
		}
	}
	/// Cost of reaching the target from a tile, `f32::INFINITY` when it can't
	pub fn cost_at(&self, index: usize) -> Result<f32, FlowFieldError> {
		let workspace = self.valid_workspace()?;
		workspace
			.cost_field
			.get_field_cell_value(index)
			.ok_or(FlowFieldError::IndexOutOfBounds {
				index,
				len: workspace.grid.len(),
			})
	}
}
