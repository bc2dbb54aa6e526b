use crate::units::Pt;
use serde::Deserialize;

/// Horizontal placement of text inside a cell
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// The smallest addressable unit of a report: a fixed-width box whose height is
/// measured from its text. `text: None` is drawn as a placeholder dash.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CellSpec {
    #[serde(default)]
    pub text: Option<String>,
    pub width: Pt,
    #[serde(default)]
    pub align: Align,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub min_height: Pt,
}

impl CellSpec {
    pub fn new<S: Into<String>>(text: S, width: Pt) -> CellSpec {
        CellSpec {
            text: Some(text.into()),
            width,
            align: Align::Left,
            bold: false,
            min_height: Pt::ZERO,
        }
    }

    /// A cell for a value that may be absent
    pub fn maybe<S: Into<String>>(text: Option<S>, width: Pt) -> CellSpec {
        CellSpec {
            text: text.map(Into::into),
            ..CellSpec::new("", width)
        }
    }

    /// A cell with no content at all, e.g. a box reserved for a signature
    pub fn blank(width: Pt) -> CellSpec {
        CellSpec::new("", width)
    }

    pub fn align(mut self, align: Align) -> CellSpec {
        self.align = align;
        self
    }

    pub fn centered(self) -> CellSpec {
        self.align(Align::Center)
    }

    pub fn bold(mut self) -> CellSpec {
        self.bold = true;
        self
    }

    pub fn min_height(mut self, min_height: Pt) -> CellSpec {
        self.min_height = min_height;
        self
    }
}

/// One horizontal band of cells sharing a single computed height. The cell
/// widths are expected to add up to the width of the section the row is in.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RowSpec {
    pub cells: Vec<CellSpec>,
    /// Overrides the configured minimum row height
    #[serde(default)]
    pub min_height: Option<Pt>,
}

impl RowSpec {
    pub fn new(cells: Vec<CellSpec>) -> RowSpec {
        RowSpec {
            cells,
            min_height: None,
        }
    }

    pub fn with_min_height(mut self, min_height: Pt) -> RowSpec {
        self.min_height = Some(min_height);
        self
    }

    /// Build a row from parallel lists of widths and values; missing values
    /// become placeholder cells
    pub fn from_values<S: Into<String>>(widths: &[Pt], values: Vec<Option<S>>) -> RowSpec {
        RowSpec::new(
            widths
                .iter()
                .zip(values)
                .map(|(&width, value)| CellSpec::maybe(value, width))
                .collect(),
        )
    }

    pub fn total_width(&self) -> Pt {
        self.cells.iter().map(|cell| cell.width).sum()
    }

    /// Whether the cells exactly span `expected`, give or take `tolerance`
    pub fn spans(&self, expected: Pt, tolerance: Pt) -> bool {
        (self.total_width() - expected).0.abs() <= tolerance.0
    }
}

impl From<Vec<CellSpec>> for RowSpec {
    fn from(cells: Vec<CellSpec>) -> Self {
        RowSpec::new(cells)
    }
}
