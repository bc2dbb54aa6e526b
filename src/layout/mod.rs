//! The measuring half of the engine: turning cell text into line breaks and
//! heights, and deciding where on which page each row lands.
//!
//! Nothing in here draws. [`TextMetrics`] sanitizes and wraps text,
//! [`RowLayout`] turns a row of cells into a single row height, and
//! [`PageCursor`] applies the break-then-draw policy as rows are placed.
//!
//! # Example
//!
//! ```
//! use casefile_print::layout::{CellSpec, CellPadding, RowLayout, RowMetrics, TextMetrics};
//! use casefile_print::{Fonts, Pt};
//!
//! let fonts = Fonts::helvetica();
//! let metrics = TextMetrics::new(&fonts, Pt(2.0));
//! let body = RowMetrics {
//!     font_size: Pt(8.0),
//!     padding: CellPadding::default(),
//!     min_height: Pt(20.0),
//!     force_bold: false,
//! };
//! let layout = RowLayout::new(metrics, body);
//!
//! let cells = vec![
//!     CellSpec::new("Nama Tertanggung", Pt(140.0)),
//!     CellSpec::maybe(None::<String>, Pt(92.0)),
//! ];
//! assert!(layout.compute_row_height(&cells) >= Pt(20.0));
//! ```

mod cell;
pub use cell::*;

mod cursor;
pub use cursor::*;

mod margins;
pub use margins::*;

mod row;
pub use row::*;

mod text;
pub use text::*;
