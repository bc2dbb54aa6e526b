//! The drawing half of the engine: renderers that measure rows, place them
//! with the page cursor, and hand the positioned result to a backend.

mod grid;
pub use grid::*;

mod placed;
pub use placed::*;

mod table;
pub use table::*;
