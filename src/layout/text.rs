use crate::font::{FontSpec, Fonts, Typeface};
use crate::units::Pt;

/// What a missing or blank value is drawn as
pub const PLACEHOLDER: &str = "-";

const TABSIZE: usize = 4;

/// Slack allowed when comparing a line's width against the space it must fit in
const WIDTH_EPSILON: f32 = 1e-3;

/// Cell text that has been cleaned down to what the target typeface can draw.
///
/// The only way to get one is [`TextMetrics::sanitize`], and both measuring and
/// every backend consume this type, so a cell is always drawn with exactly the
/// string it was measured with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedText(String);

impl SanitizedText {
    fn placeholder() -> SanitizedText {
        SanitizedText(PLACEHOLDER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this text is the stand-in for a missing value
    pub fn is_placeholder(&self) -> bool {
        self.0 == PLACEHOLDER
    }

    /// The explicit (hard) lines of the text
    pub fn hard_lines(&self) -> std::str::Split<'_, char> {
        self.0.split('\n')
    }
}

impl std::fmt::Display for SanitizedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The result of measuring a block of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextMeasure {
    /// The vertical space the wrapped lines occupy, gaps included
    pub height: Pt,
    pub line_count: usize,
    /// The text broken into the lines it will be drawn as
    pub lines: Vec<String>,
}

/// Wraps and measures text in the document's faces.
///
/// Wrapping honours explicit line breaks, then breaks at whitespace; a single
/// word wider than the line is broken between characters so nothing ever spills
/// past the right edge.
#[derive(Debug, Clone, Copy)]
pub struct TextMetrics<'f> {
    fonts: &'f Fonts,
    line_gap: Pt,
}

impl<'f> TextMetrics<'f> {
    /// `line_gap` is the extra space added below every line
    pub fn new(fonts: &'f Fonts, line_gap: Pt) -> TextMetrics<'f> {
        TextMetrics { fonts, line_gap }
    }

    pub fn face(&self, font: FontSpec) -> &'f Typeface {
        self.fonts.get(font.weight)
    }

    /// Clean raw cell text into something `font` can draw.
    ///
    /// Missing text becomes the placeholder dash. Typographic quotes and dashes
    /// fold to their ASCII forms, non-breaking spaces become spaces, tabs expand
    /// and line endings normalize to `\n`. Anything else the face can't draw is
    /// dropped. Text that ends up blank is also drawn as the placeholder.
    pub fn sanitize(&self, raw: Option<&str>, font: FontSpec) -> SanitizedText {
        let Some(raw) = raw else {
            return SanitizedText::placeholder();
        };

        let face = self.face(font);
        let raw = raw.replace("\r\n", "\n").replace('\r', "\n");
        let mut clean = String::with_capacity(raw.len());
        let mut dropped = 0usize;
        for ch in raw.chars() {
            match ch {
                '\u{2018}' | '\u{2019}' => clean.push('\''),
                '\u{201C}' | '\u{201D}' => clean.push('"'),
                '\u{2013}' | '\u{2014}' => clean.push('-'),
                '\u{00A0}' => clean.push(' '),
                '\t' => clean.push_str(&" ".repeat(TABSIZE)),
                '\n' => clean.push('\n'),
                ch if face.covers(ch) => clean.push(ch),
                _ => dropped += 1,
            }
        }
        if dropped > 0 {
            log::debug!("dropped {dropped} character(s) the font can't render");
        }

        let clean = clean.trim();
        if clean.is_empty() {
            SanitizedText::placeholder()
        } else {
            SanitizedText(clean.to_string())
        }
    }

    /// The distance from one baseline to the next
    pub fn line_pitch(&self, font: FontSpec) -> Pt {
        self.face(font).line_height(font.size) + self.line_gap
    }

    pub fn line_gap(&self) -> Pt {
        self.line_gap
    }

    /// The width `line` takes up when set in `font`
    pub fn width_of(&self, line: &str, font: FontSpec) -> Pt {
        self.face(font).width_of_text(line, font.size)
    }

    /// Measure `text` wrapped to `width` (the usable width, padding already
    /// removed). The height is `line_count * line_pitch`, so empty text still
    /// measures as one line.
    pub fn measure(&self, text: &SanitizedText, width: Pt, font: FontSpec) -> TextMeasure {
        let lines = self.wrap(text, width, font);
        let line_count = lines.len().max(1);
        TextMeasure {
            height: self.line_pitch(font) * line_count as f32,
            line_count,
            lines,
        }
    }

    /// Break `text` into lines no wider than `width`
    pub fn wrap(&self, text: &SanitizedText, width: Pt, font: FontSpec) -> Vec<String> {
        let mut lines = Vec::new();
        for hard_line in text.hard_lines() {
            self.wrap_hard_line(hard_line, width, font, &mut lines);
        }
        lines
    }

    fn fits(&self, used: Pt, extra: Pt, width: Pt) -> bool {
        (used + extra).0 <= width.0 + WIDTH_EPSILON
    }

    fn wrap_hard_line(&self, hard_line: &str, width: Pt, font: FontSpec, lines: &mut Vec<String>) {
        let space = self.width_of(" ", font);
        let mut line = String::new();
        let mut line_width = Pt::ZERO;
        let mut started = false;

        for word in hard_line.split(' ') {
            let word_width = self.width_of(word, font);
            if !started {
                started = true;
            } else if self.fits(line_width, space + word_width, width) {
                line.push(' ');
                line.push_str(word);
                line_width += space + word_width;
                continue;
            } else {
                lines.push(line.trim_end().to_string());
                line.clear();
                line_width = Pt::ZERO;
            }

            if self.fits(Pt::ZERO, word_width, width) {
                line.push_str(word);
                line_width = word_width;
            } else {
                // too wide for any line, break between characters
                for ch in word.chars() {
                    let mut buf = [0u8; 4];
                    let ch_width = self.width_of(ch.encode_utf8(&mut buf), font);
                    if !line.is_empty() && !self.fits(line_width, ch_width, width) {
                        lines.push(std::mem::take(&mut line));
                        line_width = Pt::ZERO;
                    }
                    line.push(ch);
                    line_width += ch_width;
                }
            }
        }

        lines.push(line.trim_end().to_string());
    }
}
