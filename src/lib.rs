//! An adaptive, paginated table layout engine for printable case-file reports.
//!
//! A report is an ordered list of [Section]s (banners, label/value grids, free
//! text, repeating tables and signature blocks) built from a case [Record].
//! The [DocumentAssembler] measures every row from its wrapped text, breaks
//! pages before any row that wouldn't fit, and drives a [backend::Backend]
//! that writes the result as PDF or as a WordprocessingML document.

/// Output formats, and the [backend::Backend] trait they implement
pub mod backend;

mod colour;
pub use colour::*;

mod config;
pub use config::*;

mod document;
pub use document::*;

mod error;
pub use error::*;

mod font;
pub use font::*;

mod info;
pub use info::*;

pub mod layout;

pub mod pagesize;

mod record;
pub use record::*;

mod rect;
pub use rect::*;

pub(crate) mod refs;

pub mod render;

mod section;
pub use section::*;

mod standard_font;
pub use standard_font::*;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality, mostly for inspecting generated content
pub use pdf_writer;
