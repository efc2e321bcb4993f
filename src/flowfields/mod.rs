//! Flowfields are a means of handling pathfinding for a crowd of actors. Rather than each actor
//! searching for its own path a single field is computed from the target outwards and every
//! actor simply reads the direction of the tile it stands on.
//!
//! [Crowd Pathfinding and Steering Using Flow Field Tiles](https://www.gameaipro.com/GameAIPro/GameAIPro_Chapter23_Crowd_Pathfinding_and_Steering_Using_Flow_Field_Tiles.pdf)
//!
//! [leifnode](https://leifnode.com/2013/12/flow-field-pathfinding/)
//!
//! The map is a single [grid::Grid] of tiles indexed from the south-west corner. Actors standing
//! on a tile make it more expensive to cross so the field routes the crowd around congestion.
//!
//! Definitions:
//!
//! * Tile - a unit square of the map with a terrain cost, an occupancy and a neighbour code
//! * Neighbour code - 8-bit mask where a set bit means the neighbour in that direction can't be entered
//! * Direction table - precomputed list of the enterable directions for every one of the 256 neighbour codes
//! * Cost field - `f32` field of the cumulative cost of reaching the target from each tile
//! * Vector field - unit vector per tile pointing towards its cheapest neighbour
//!
//! ```text
//!  _____________________________
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|x_|x_|x_|__|__|__|__|
//! |__|__|__|__|__|x_|__|__|__|__|
//! |__|__|__|__|__|x_|__|t_|__|__|
//! |__|__|o_|o_|__|x_|__|__|__|__|
//! |__|__|o_|o_|__|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|__|__|
//!
//!  x wall, t target, o crowded tile
//! ```
//!

pub mod direction_table;
pub mod fields;
pub mod grid;
pub mod utilities;
