//! Metrics for the standard PDF base fonts the reports are set in. These fonts
//! never need embedding: every PDF reader ships them, and Word substitutes the
//! metric-compatible Arial.

/// First character code covered by the width tables
const FIRST_CHAR: u32 = 0x20;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

/// One of the built-in PDF base fonts
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    /// The PostScript name used as the `BaseFont` of the PDF font dictionary
    pub fn pdf_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// The family name a word processor should use for this font
    pub fn word_family(&self) -> &'static str {
        "Arial"
    }

    fn widths(&self) -> &'static [u16; 95] {
        match self {
            StandardFont::Helvetica => &HELVETICA_WIDTHS,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Advance width in 1/1000 em, or [None] if the character isn't in the
    /// font's printable range
    pub fn advance(&self, ch: char) -> Option<u16> {
        let code = u32::from(ch).checked_sub(FIRST_CHAR)?;
        self.widths().get(code as usize).copied()
    }

    pub fn units_per_em(&self) -> u16 {
        1000
    }

    pub fn ascender(&self) -> i16 {
        718
    }

    pub fn descender(&self) -> i16 {
        -207
    }

    /// The gap left between the bounding box height and the ascender/descender span
    pub fn line_gap(&self) -> i16 {
        match self {
            StandardFont::Helvetica => 231,
            StandardFont::HelveticaBold => 265,
        }
    }
}
