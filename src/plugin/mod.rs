//! Defines the Bevy [Plugin] for a crowd aware FlowField
//!
//! The application inserts an initialised [FlowFieldEngine] resource, tags its actors with
//! [CrowdAgent] and sends [EventSetTarget] to point the field somewhere. Each tick the crowd is
//! counted onto the grid and the field is recomputed, steering code then reads
//! [FlowFieldEngine::sample_position] (or [FlowFieldEngine::get_vector_field] while a new
//! field is pending).
//!

use crate::prelude::*;
use bevy::prelude::*;

pub mod crowd_layer;
pub mod flow_layer;

/// Order of the plugin's systems within `Update`
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum OrderingSet {
	/// Write agent positions into the grid occupancy
	Count,
	/// Retarget and recompute the fields
	Calculate,
}

/// Counts the crowd and keeps the [FlowFieldEngine] resource up to date
pub struct FlowFieldCrowdPlugin;

impl Plugin for FlowFieldCrowdPlugin {
	#[cfg(not(tarpaulin_include))]
	fn build(&self, app: &mut App) {
		app.register_type::<Ordinal>()
			.register_type::<TileCoord>()
			.register_type::<Tile>()
			.register_type::<EngineState>()
			.register_type::<DiagonalPolicy>()
			.register_type::<FlowFieldConfig>()
			.register_type::<CrowdPlane>()
			.init_resource::<CrowdPlane>()
			.add_event::<EventSetTarget>()
			.configure_sets(Update, (OrderingSet::Count, OrderingSet::Calculate).chain())
			.add_systems(
				Update,
				(
					crowd_layer::count_crowd.in_set(OrderingSet::Count),
					(
						flow_layer::apply_target_requests,
						flow_layer::recompute_flow_field,
					)
						.chain()
						.in_set(OrderingSet::Calculate),
				),
			);
	}
}
