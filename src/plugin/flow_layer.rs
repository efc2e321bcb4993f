//! Logic relating to retargeting and recomputing the fields
//!

use crate::prelude::*;
use bevy::prelude::*;

/// A request to point the flow field at a new tile
#[derive(Event, Debug, Clone, Copy)]
pub struct EventSetTarget {
	/// Tile the crowd should flow towards
	target: TileCoord,
}

impl EventSetTarget {
	/// Request the field flows towards `target`
	pub fn new(target: TileCoord) -> Self {
		EventSetTarget { target }
	}
	/// Tile the crowd should flow towards
	pub fn get_target(&self) -> TileCoord {
		self.target
	}
}

/// Apply the latest [EventSetTarget], earlier requests in the same tick are superseded
#[cfg(not(tarpaulin_include))]
pub fn apply_target_requests(
	mut events: EventReader<EventSetTarget>,
	engine: Option<ResMut<FlowFieldEngine>>,
) {
	// several actors may request at once, only the freshest matters
	let Some(event) = events.read().last() else {
		return;
	};
	let Some(mut engine) = engine else {
		warn!("Target requested without a FlowFieldEngine resource");
		return;
	};
	if let Err(e) = engine.set_target_coords(event.get_target()) {
		warn!("Rejected target {:?}: {}", event.get_target(), e);
	}
}

/// Recompute stale fields once a target is known
#[cfg(not(tarpaulin_include))]
pub fn recompute_flow_field(engine: Option<ResMut<FlowFieldEngine>>) {
	let Some(mut engine) = engine else {
		return;
	};
	if engine.get_state() != EngineState::Stale || engine.get_target().is_none() {
		return;
	}
	if let Err(e) = engine.recompute() {
		error!("Flow field recompute failed: {}", e);
	}
}
