use crate::colour::{colours, Colour};
use crate::layout::{CellPadding, PageGeometry, RowMetrics};
use crate::units::Pt;
use serde::Deserialize;

/// How a full-width title row is set: the document banner at the very top, or
/// the coloured title above a section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BannerStyle {
    pub font_size: Pt,
    pub min_height: Pt,
    pub fill: Colour,
    pub padding: CellPadding,
}

impl Default for BannerStyle {
    fn default() -> Self {
        BannerStyle::section_title()
    }
}

impl BannerStyle {
    /// The grey banner carrying the name of the form
    pub fn document_banner() -> BannerStyle {
        BannerStyle {
            font_size: Pt(12.0),
            min_height: Pt(25.0),
            fill: colours::HEADER_GREY,
            padding: CellPadding::new(Pt(5.0), Pt(3.0), Pt(3.0)),
        }
    }

    /// The green bar above each section
    pub fn section_title() -> BannerStyle {
        BannerStyle {
            font_size: Pt(9.0),
            min_height: Pt(18.0),
            fill: colours::BANNER_GREEN,
            padding: CellPadding::new(Pt(5.0), Pt(3.0), Pt(3.0)),
        }
    }

    pub(crate) fn metrics(&self) -> RowMetrics {
        RowMetrics {
            font_size: self.font_size,
            padding: self.padding,
            min_height: self.min_height,
            force_bold: true,
        }
    }
}

/// Everything that shapes a report's layout. There are no layout constants
/// anywhere else; a config is handed to the assembler and threaded through
/// every renderer.
///
/// The defaults reproduce the printed investigation forms: A4 paper, a
/// 545pt wide body, 8pt Helvetica with a 2pt line gap, and cells padded 5pt
/// left and right and 6pt above and below.
///
/// Any field can be overridden from JSON:
///
/// ```
/// use casefile_print::{LayoutConfig, Pt};
///
/// let config = LayoutConfig::from_json(r#"{ "font_size": 9, "signature_height": 100 }"#)
///     .expect("valid config");
/// assert_eq!(config.font_size, Pt(9.0));
/// assert_eq!(config.section_width, Pt(545.0));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub geometry: PageGeometry,
    /// The width every row's cells are expected to add up to
    pub section_width: Pt,
    pub font_size: Pt,
    /// Extra space added below every line of text
    pub line_gap: Pt,
    pub cell_padding: CellPadding,
    pub min_row_height: Pt,
    /// Floor on the height of free-text blocks
    pub narrative_min_height: Pt,
    pub border_width: Pt,
    pub border_colour: Colour,
    /// Vertical space between consecutive sections
    pub section_gap: Pt,
    pub document_banner: BannerStyle,
    pub section_title: BannerStyle,
    /// Fill behind column headers
    pub header_fill: Colour,
    /// Height reserved for hand signatures, whatever the cells contain
    pub signature_height: Pt,
    /// Redraw a table's column header at the top of every page it continues on
    pub repeat_table_headers: bool,
    /// Never leave a section title alone at the bottom of a page
    pub keep_titles_with_content: bool,
    /// How far a row's width may stray from `section_width` before it's reported
    pub width_tolerance: Pt,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            geometry: PageGeometry::default(),
            section_width: Pt(545.0),
            font_size: Pt(8.0),
            line_gap: Pt(2.0),
            cell_padding: CellPadding::default(),
            min_row_height: Pt(20.0),
            narrative_min_height: Pt(40.0),
            border_width: Pt(0.6),
            border_colour: colours::BLACK,
            section_gap: Pt(15.0),
            document_banner: BannerStyle::document_banner(),
            section_title: BannerStyle::section_title(),
            header_fill: colours::HEADER_GREY,
            signature_height: Pt(80.0),
            repeat_table_headers: true,
            keep_titles_with_content: true,
            width_tolerance: Pt(0.5),
        }
    }
}

impl LayoutConfig {
    /// Parse a config from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<LayoutConfig, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Metrics for ordinary body rows
    pub fn body_metrics(&self) -> RowMetrics {
        RowMetrics {
            font_size: self.font_size,
            padding: self.cell_padding,
            min_height: self.min_row_height,
            force_bold: false,
        }
    }

    /// Metrics for column header rows, which are always bold
    pub fn header_metrics(&self) -> RowMetrics {
        RowMetrics {
            force_bold: true,
            ..self.body_metrics()
        }
    }

    /// Metrics for free-text blocks
    pub fn narrative_metrics(&self) -> RowMetrics {
        RowMetrics {
            min_height: self.narrative_min_height,
            ..self.body_metrics()
        }
    }
}
