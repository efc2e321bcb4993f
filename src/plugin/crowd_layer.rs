//! Logic relating to counting the crowd onto the [Grid]
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Marks an entity as an actor whose position makes tiles more expensive to cross
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct CrowdAgent;

/// Which pair of world axes map onto the grid's `(column, row)`
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum CrowdPlane {
	/// `x` to column, `y` to row, for 2d scenes
	XY,
	/// `x` to column, `z` to row, for 3d scenes with `y` up
	#[default]
	XZ,
}

impl CrowdPlane {
	/// Project a world position onto the grid plane
	pub fn project(&self, translation: Vec3) -> Vec2 {
		match self {
			CrowdPlane::XY => Vec2::new(translation.x, translation.y),
			CrowdPlane::XZ => Vec2::new(translation.x, translation.z),
		}
	}
}

/// Replace the grid occupancy with the current positions of every [CrowdAgent]
#[cfg(not(tarpaulin_include))]
pub fn count_crowd(
	engine: Option<ResMut<FlowFieldEngine>>,
	plane: Res<CrowdPlane>,
	agents: Query<&Transform, With<CrowdAgent>>,
) {
	let Some(mut engine) = engine else {
		return;
	};
	if engine.get_state() == EngineState::Uninitialized {
		return;
	}
	let positions = agents.iter().map(|t| plane.project(t.translation));
	if let Err(e) = engine.refresh_occupancy(positions) {
		warn!("Unable to count crowd: {}", e);
	}
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn project_xz() {
		let result = CrowdPlane::XZ.project(Vec3::new(1.0, 2.0, 3.0));
		assert_eq!(Vec2::new(1.0, 3.0), result);
	}
	#[test]
	fn project_xy() {
		let result = CrowdPlane::XY.project(Vec3::new(1.0, 2.0, 3.0));
		assert_eq!(Vec2::new(1.0, 2.0), result);
	}
}
