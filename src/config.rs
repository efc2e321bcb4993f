//! Tunable constants of the cost model.
//!
//! The relaxation factor and occupancy weight have no derivation beyond reproducing the feel of
//! crowds flowing around each other, so they default to the long standing values and can be
//! overridden per engine or loaded from a `ron` file:
//!
//! ```text
//! (
//!     relaxation_factor: 0.98,
//!     occupancy_weight: 0.1,
//!     diagonal_policy: BlockWallGaps,
//! )
//! ```
//!

use bevy::prelude::*;

use crate::prelude::*;

/// How diagonal movement between two wall corners is treated when neighbour codes are built
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum DiagonalPolicy {
	/// A diagonal is blocked when both orthogonal tiles either side of it are walls, i.e
	///
	/// ```text
	///   X ~ <- ignore diagonal from o
	///   o X
	/// ```
	#[default]
	BlockWallGaps,
	/// Diagonals are only blocked by the diagonal neighbour itself
	AllowWallGaps,
}

/// Settings shared by propagation and the grid
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct FlowFieldConfig {
	/// A candidate cost must be below the current cost multiplied by this to be accepted
	pub relaxation_factor: f32,
	/// Traversal cost added per agent occupying a tile
	pub occupancy_weight: f32,
	/// Treatment of diagonal wall gaps
	pub diagonal_policy: DiagonalPolicy,
}

impl Default for FlowFieldConfig {
	fn default() -> Self {
		FlowFieldConfig {
			relaxation_factor: DEFAULT_RELAXATION_FACTOR,
			occupancy_weight: DEFAULT_OCCUPANCY_WEIGHT,
			diagonal_policy: DiagonalPolicy::default(),
		}
	}
}

impl FlowFieldConfig {
	/// Ensure the settings keep traversal costs non-negative and propagation terminating
	pub fn validate(&self) -> Result<(), FlowFieldError> {
		if !self.relaxation_factor.is_finite()
			|| self.relaxation_factor <= 0.0
			|| self.relaxation_factor > 1.0
		{
			return Err(FlowFieldError::InvalidConfig(
				"relaxation_factor must be within (0, 1]",
			));
		}
		if !self.occupancy_weight.is_finite() || self.occupancy_weight < 0.0 {
			return Err(FlowFieldError::InvalidConfig(
				"occupancy_weight must be finite and non-negative",
			));
		}
		Ok(())
	}
	/// Traversal cost of stepping onto `tile` over a distance of `length`
	pub fn step_cost(&self, tile: &Tile, length: f32) -> f32 {
		(tile.terrain_cost as f32 + tile.occupancy as f32 * self.occupancy_weight) * length
	}
	/// From a `ron` file generate the [FlowFieldConfig]
	#[cfg(feature = "ron")]
	pub fn from_ron(path: &str) -> Result<Self, FlowFieldError> {
		let file = std::fs::File::open(path)?;
		let config: FlowFieldConfig = ron::de::from_reader(file)?;
		config.validate()?;
		Ok(config)
	}
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn default_is_valid() {
		let config = FlowFieldConfig::default();
		assert!(config.validate().is_ok());
		assert_eq!(0.98, config.relaxation_factor);
		assert_eq!(0.1, config.occupancy_weight);
		assert_eq!(DiagonalPolicy::BlockWallGaps, config.diagonal_policy);
	}
	#[test]
	fn negative_weight_rejected() {
		let config = FlowFieldConfig {
			occupancy_weight: -0.5,
			..default()
		};
		assert!(matches!(
			config.validate(),
			Err(FlowFieldError::InvalidConfig(_))
		));
	}
	#[test]
	fn relaxation_out_of_range_rejected() {
		for factor in [0.0, -1.0, 1.5, f32::NAN] {
			let config = FlowFieldConfig {
				relaxation_factor: factor,
				..default()
			};
			assert!(config.validate().is_err(), "factor {}", factor);
		}
	}
	#[test]
	fn step_cost_includes_crowd() {
		let config = FlowFieldConfig::default();
		let tile = Tile {
			terrain_cost: 2,
			occupancy: 5,
			neighbor_code: 0,
		};
		let result = config.step_cost(&tile, 1.0);
		assert!((result - 2.5).abs() < 1e-6);
		let diagonal = config.step_cost(&tile, std::f32::consts::SQRT_2);
		assert!((diagonal - 2.5 * std::f32::consts::SQRT_2).abs() < 1e-5);
	}
	#[test]
	#[cfg(feature = "ron")]
	fn config_file() {
		let path = env!("CARGO_MANIFEST_DIR").to_string() + "/assets/flowfield_config.ron";
		let config = FlowFieldConfig::from_ron(&path).unwrap();
		assert_eq!(0.95, config.relaxation_factor);
		assert_eq!(0.25, config.occupancy_weight);
		assert_eq!(DiagonalPolicy::AllowWallGaps, config.diagonal_policy);
	}
}
