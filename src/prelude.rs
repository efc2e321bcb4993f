//! `use bevy_crowd_flowfield::prelude::*;` to import common structures and methods
//!

#[doc(hidden)]
pub use crate::flowfields::{
	direction_table::*,
	fields::{cost_field::*, vector_field::*, *},
	grid::*,
	utilities::*,
};

#[doc(hidden)]
pub use crate::{
	config::*,
	engine::*,
	error::*,
	plugin::{crowd_layer::*, flow_layer::*, *},
};
