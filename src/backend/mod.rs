//! Output formats. The renderers only ever talk to a [Backend]; every backend
//! receives the same positioned rows, gaps and page breaks.

use crate::error::RenderError;
use crate::render::PlacedRow;
use crate::units::Pt;

mod pdf;
pub use pdf::*;

mod recorder;
pub use recorder::*;

mod word;
pub use word::*;

/// The output stream a document is laid out into
pub trait Backend {
    /// Draw one row. The row's position has already been decided.
    fn draw_row(&mut self, row: &PlacedRow) -> Result<(), RenderError>;

    /// Leave `height` of vertical space between two sections
    fn gap(&mut self, height: Pt) -> Result<(), RenderError>;

    /// Finish the current page and start a new one
    fn page_break(&mut self) -> Result<(), RenderError>;

    /// Finalize the document and hand back its bytes
    fn finish(&mut self) -> Result<Vec<u8>, RenderError>;

    /// The MIME type of the finished bytes
    fn content_type(&self) -> &'static str;

    /// The file extension of the finished bytes, without the dot
    fn extension(&self) -> &'static str;
}

impl<B: Backend + ?Sized> Backend for &mut B {
    fn draw_row(&mut self, row: &PlacedRow) -> Result<(), RenderError> {
        (**self).draw_row(row)
    }

    fn gap(&mut self, height: Pt) -> Result<(), RenderError> {
        (**self).gap(height)
    }

    fn page_break(&mut self) -> Result<(), RenderError> {
        (**self).page_break()
    }

    fn finish(&mut self) -> Result<Vec<u8>, RenderError> {
        (**self).finish()
    }

    fn content_type(&self) -> &'static str {
        (**self).content_type()
    }

    fn extension(&self) -> &'static str {
        (**self).extension()
    }
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn draw_row(&mut self, row: &PlacedRow) -> Result<(), RenderError> {
        (**self).draw_row(row)
    }

    fn gap(&mut self, height: Pt) -> Result<(), RenderError> {
        (**self).gap(height)
    }

    fn page_break(&mut self) -> Result<(), RenderError> {
        (**self).page_break()
    }

    fn finish(&mut self) -> Result<Vec<u8>, RenderError> {
        (**self).finish()
    }

    fn content_type(&self) -> &'static str {
        (**self).content_type()
    }

    fn extension(&self) -> &'static str {
        (**self).extension()
    }
}
