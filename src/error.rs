use crate::units::Pt;
use thiserror::Error;

/// Fatal errors that abort generating a document. No partial document is ever
/// returned alongside one of these.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    /// The output stream rejected a write
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [quick_xml] failed while writing the WordprocessingML body
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    /// [zip] failed while packaging the `.docx` parts
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),
}

/// Structural problems in the sections handed to the layout engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("row {row} of section {section} is {actual} wide, expected {expected}")]
    /// The widths of a row's cells don't add up to the section width
    WidthMismatch {
        section: usize,
        row: usize,
        expected: Pt,
        actual: Pt,
    },
}

/// Non-fatal problems found while laying out a document. These are returned
/// with the finished document rather than aborting it.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutWarning {
    /// A single block was taller than the usable height of a whole page. It was
    /// placed at the top of a fresh page and runs past the bottom margin.
    Overflow {
        page_index: usize,
        height: Pt,
        available: Pt,
    },
    /// A row's cell widths didn't sum to the section width; it was drawn anyway
    WidthMismatch(LayoutError),
}

impl std::fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutWarning::Overflow {
                page_index,
                height,
                available,
            } => write!(
                f,
                "block of height {height} overflows page {} (only {available} usable)",
                page_index + 1
            ),
            LayoutWarning::WidthMismatch(e) => write!(f, "{e}"),
        }
    }
}
