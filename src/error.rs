//! Errors reported back to callers of the flow field. Nothing here is fatal, a rejected call
//! leaves the last valid field in place
//!

use thiserror::Error;

use crate::prelude::*;

/// Reasons a flow field operation was rejected
#[derive(Debug, Error)]
pub enum FlowFieldError {
	#[error("grid dimensions ({width}, {height}) must both be non-zero")]
	ZeroSizedGrid { width: usize, height: usize },
	#[error("the flow field has not been initialised with a grid")]
	NotInitialized,
	#[error("tile index {index} is outside of a grid of {len} tiles")]
	IndexOutOfBounds { index: usize, len: usize },
	#[error("tile ({column}, {row}) is outside of a {width}x{height} grid")]
	CoordsOutOfBounds {
		column: usize,
		row: usize,
		width: usize,
		height: usize,
	},
	#[error("terrain cost {0} is outside the range 0..=8")]
	TerrainCostOutOfRange(u8),
	#[error("expected {expected} tiles for the grid but {actual} were supplied")]
	TileCountMismatch { expected: usize, actual: usize },
	#[error("unrecognised map symbol {symbol:?} in row {row}")]
	InvalidMapSymbol { symbol: char, row: usize },
	#[error("a target tile must be set before computing the flow field")]
	NoTarget,
	#[error("fields are not readable while the engine is {0:?}")]
	FieldNotReady(EngineState),
	#[error("invalid configuration: {0}")]
	InvalidConfig(&'static str),
	#[cfg(feature = "ron")]
	#[error("failed reading configuration file: {0}")]
	Io(#[from] std::io::Error),
	#[cfg(feature = "ron")]
	#[error("failed deserializing configuration: {0}")]
	Ron(#[from] ron::error::SpannedError),
}
