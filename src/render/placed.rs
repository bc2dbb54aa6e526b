use crate::colour::Colour;
use crate::font::FontSpec;
use crate::layout::{Align, CellPadding, SanitizedText};
use crate::rect::Rect;
use crate::units::Pt;

/// What a row is for, which backends use to pick native features (repeating
/// header rows, exact heights)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RowKind {
    Body,
    /// A table or grid column header
    Header,
    /// A full-width banner or section title
    Title,
    /// Space reserved for hand signatures
    Signature,
}

/// Where the text block sits inside a cell that is taller than it
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
}

/// One line of text at its final position. `x` is the left edge of the line
/// and `baseline` is measured down from the top of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: Pt,
    pub baseline: Pt,
    pub width: Pt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedCell {
    pub rect: Rect,
    /// The sanitized text the cell was measured with, or [None] for cells that
    /// are deliberately left empty
    pub text: Option<SanitizedText>,
    pub font: FontSpec,
    pub align: Align,
    pub fill: Option<Colour>,
    /// The wrapped lines, already positioned for fixed-layout output
    pub lines: Vec<PlacedLine>,
}

/// A fully resolved row: the page it is on, its position, and every cell with
/// its text laid out. This is all a backend ever receives.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRow {
    pub kind: RowKind,
    pub page_index: usize,
    pub top: Pt,
    pub left: Pt,
    pub height: Pt,
    pub padding: CellPadding,
    pub valign: VerticalAlign,
    pub border_width: Pt,
    pub border_colour: Colour,
    pub cells: Vec<PlacedCell>,
}

impl PlacedRow {
    pub fn bottom(&self) -> Pt {
        self.top + self.height
    }

    pub fn width(&self) -> Pt {
        self.cells.iter().map(|cell| cell.rect.width()).sum()
    }
}
