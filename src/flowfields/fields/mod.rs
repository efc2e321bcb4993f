//! The kinds of fields used by the algorithm
//!

pub mod cost_field;
pub mod vector_field;

/// Defines required access to field arrays
pub trait Field<T: Copy> {
	/// Get a reference to the field array
	fn get(&self) -> &[T];
	/// Retrieve the value of a tile, `None` if the index is outside the field
	fn get_field_cell_value(&self, index: usize) -> Option<T> {
		self.get().get(index).copied()
	}
	/// Set a tile to a value
	fn set_field_cell_value(&mut self, value: T, index: usize);
}
