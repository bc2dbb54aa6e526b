use super::cell::{Align, CellSpec, RowSpec};
use super::text::{SanitizedText, TextMeasure, TextMetrics};
use crate::font::FontSpec;
use crate::units::Pt;
use serde::Deserialize;

/// Space kept clear between a cell's border and its text
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CellPadding {
    pub horizontal: Pt,
    pub top: Pt,
    pub bottom: Pt,
}

impl CellPadding {
    pub fn new(horizontal: Pt, top: Pt, bottom: Pt) -> CellPadding {
        CellPadding {
            horizontal,
            top,
            bottom,
        }
    }

    pub fn vertical(&self) -> Pt {
        self.top + self.bottom
    }
}

impl Default for CellPadding {
    fn default() -> Self {
        CellPadding {
            horizontal: Pt(5.0),
            top: Pt(6.0),
            bottom: Pt(6.0),
        }
    }
}

/// How the cells of one row are set: the text size, the padding, the floor on
/// the row height, and whether every cell is forced bold (header rows)
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RowMetrics {
    pub font_size: Pt,
    pub padding: CellPadding,
    pub min_height: Pt,
    pub force_bold: bool,
}

/// A cell after sanitizing and measuring; the text here is what gets drawn
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredCell {
    pub text: SanitizedText,
    pub font: FontSpec,
    pub width: Pt,
    pub align: Align,
    pub measure: TextMeasure,
    /// Measured text height plus vertical padding, floored at the cell's minimum
    pub height: Pt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredRow {
    pub cells: Vec<MeasuredCell>,
    pub height: Pt,
}

/// Computes row heights from wrapped-text measurement
#[derive(Debug, Clone, Copy)]
pub struct RowLayout<'f> {
    metrics: TextMetrics<'f>,
    body: RowMetrics,
}

impl<'f> RowLayout<'f> {
    /// `body` is used by [RowLayout::compute_row_height]
    pub fn new(metrics: TextMetrics<'f>, body: RowMetrics) -> RowLayout<'f> {
        RowLayout { metrics, body }
    }

    pub fn metrics(&self) -> &TextMetrics<'f> {
        &self.metrics
    }

    /// The height a row of body cells needs: the tallest cell's wrapped text plus
    /// padding, never less than any cell's minimum or the row minimum
    pub fn compute_row_height(&self, cells: &[CellSpec]) -> Pt {
        self.measure_cells(cells, None, &self.body).height
    }

    /// Sanitize and measure every cell in `row`
    pub fn measure_row(&self, row: &RowSpec, style: &RowMetrics) -> MeasuredRow {
        self.measure_cells(&row.cells, row.min_height, style)
    }

    fn measure_cells(&self, cells: &[CellSpec], row_min: Option<Pt>, style: &RowMetrics) -> MeasuredRow {
        let floor = row_min.unwrap_or(style.min_height);
        let cells: Vec<MeasuredCell> = cells.iter().map(|cell| self.measure_cell(cell, style)).collect();
        let height = cells.iter().map(|cell| cell.height).fold(floor, Pt::max);
        MeasuredRow { cells, height }
    }

    fn measure_cell(&self, cell: &CellSpec, style: &RowMetrics) -> MeasuredCell {
        let font = FontSpec::with_emphasis(style.font_size, cell.bold || style.force_bold);
        let text = self.metrics.sanitize(cell.text.as_deref(), font);
        let usable = (cell.width - style.padding.horizontal * 2.0).max(Pt::ZERO);
        let measure = self.metrics.measure(&text, usable, font);
        let height = (measure.height + style.padding.vertical()).max(cell.min_height);
        MeasuredCell {
            text,
            font,
            width: cell.width,
            align: cell.align,
            measure,
            height,
        }
    }

    /// Lay out a row at a fixed height instead of a measured one. Used for
    /// signature space, which must keep its reserved height whatever it holds.
    pub fn fixed_row(&self, row: &RowSpec, style: &RowMetrics, height: Pt) -> MeasuredRow {
        let mut measured = self.measure_row(row, style);
        measured.height = height;
        measured
    }
}
