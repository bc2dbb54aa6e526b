use crate::{
    refs::{ObjectReferences, RefType},
    standard_font::StandardFont,
    Pt, RenderError,
};
use owned_ttf_parser::{AsFaceRef, Face, GlyphId, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Ref, Str,
};
use std::collections::HashMap;
use std::sync::Arc;

/// A parsed TrueType / OpenType font. Reports set in an embedded font are measured
/// with the font's own advance widths and the font is embedded in its entirety in
/// the generated PDF, so large fonts will dramatically increase the size of the
/// output.
pub struct Font {
    pub face: OwnedFace,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("family", &self.family())
            .finish_non_exhaustive()
    }
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, RenderError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font { face })
    }

    fn face(&self) -> &Face<'_> {
        self.face.as_face_ref()
    }

    fn name_entry(&self, name_id: u16) -> Option<String> {
        self.face()
            .names()
            .into_iter()
            .find(|name| name.name_id == name_id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// The full name of the font, if the font carries one
    pub fn name(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::FULL_NAME)
    }

    /// The family name of the font, if the font carries one
    pub fn family(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::FAMILY)
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face().glyph_index(ch).map(|i| i.0)
    }

    fn advance(&self, ch: char) -> Option<u16> {
        let gid = self.face().glyph_index(ch)?;
        Some(self.face().glyph_hor_advance(gid).unwrap_or_default())
    }

    /// Map every unicode codepoint the font covers to its glyph id (adapted from printpdf)
    fn glyph_ids(&self) -> HashMap<u16, char> {
        let mut map: HashMap<u16, char> = HashMap::new();
        let Some(cmap) = self.face().tables().cmap else {
            return map;
        };

        for subtable in cmap.subtables.into_iter().filter(|table| table.is_unicode()) {
            subtable.codepoints(|codepoint: u32| {
                if let Ok(ch) = char::try_from(codepoint) {
                    if let Some(index) = subtable.glyph_index(codepoint).filter(|index| index.0 > 0)
                    {
                        map.entry(index.0).or_insert(ch);
                    }
                }
            });
        }

        map
    }

    /// Glyph id -> (advance, height) in font units
    fn glyph_sizes(&self, ids: &HashMap<u16, char>) -> HashMap<u16, (u16, i16)> {
        let face = self.face();
        ids.keys()
            .filter_map(|&id| {
                let gid = GlyphId(id);
                let advance = face.glyph_hor_advance(gid)?;
                let height = face
                    .glyph_bounding_box(gid)
                    .map(|bbox| bbox.y_max - bbox.y_min - face.descender())
                    .unwrap_or(1000);
                Some((id, (advance, height)))
            })
            .collect()
    }

    fn write_cid(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        sizes: &HashMap<u16, (u16, i16)>,
        writer: &mut Pdf,
    ) -> Ref {
        let font_descriptor_id = self.write_descriptor(refs, font_index, sizes, writer);
        let scaling = 1000.0 / self.face().units_per_em() as f32;

        let id = refs.gen(RefType::CidFont(font_index));
        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(CidFontType::Type2);
        cid_font.base_font(Name(format!("F{font_index}").as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(font_descriptor_id);

        // the most popular width becomes the default
        let mut width_counts: HashMap<u16, usize> = HashMap::new();
        for (width, _) in sizes.values() {
            *width_counts.entry(*width).or_insert(0) += 1;
        }
        let default_width = width_counts
            .iter()
            .max_by_key(|(&width, &count)| (count, width))
            .map(|(&width, _)| width as f32 * scaling)
            .unwrap_or(1000.0);

        let mut id_widths: Vec<(u16, f32)> = sizes
            .iter()
            .map(|(&gid, &(width, _))| (gid, width as f32 * scaling))
            .collect();
        id_widths.sort_by_key(|(gid, _)| *gid);

        // group runs of consecutive glyph ids into single width arrays
        let mut widths = cid_font.widths();
        let mut runs: Vec<(u16, Vec<f32>)> = Vec::new();
        for (gid, width) in id_widths {
            let extends_run = runs
                .last()
                .is_some_and(|(start, run)| (gid - start) as usize == run.len());
            if extends_run {
                if let Some((_, run)) = runs.last_mut() {
                    run.push(width);
                }
            } else {
                runs.push((gid, vec![width]));
            }
        }
        for (start, run) in runs {
            widths.consecutive(start, run);
        }
        widths.finish();

        cid_font.default_width(default_width);
        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

        id
    }

    fn write_descriptor(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        sizes: &HashMap<u16, (u16, i16)>,
        writer: &mut Pdf,
    ) -> Ref {
        let font_data_id = refs.gen(RefType::FontData(font_index));
        writer
            .stream(font_data_id, self.face.as_slice())
            .pair(Name(b"Length1"), self.face.as_slice().len() as i32);

        let face = self.face();
        let scaling = 1000.0 / face.units_per_em() as f32;
        let max_width = sizes.values().map(|&(w, _)| w).max().unwrap_or_default();
        let max_height = sizes.values().map(|&(_, h)| h).max().unwrap_or_default();
        let sum_width: usize = sizes.values().map(|&(w, _)| w as usize).sum();
        let avg_width = sum_width as f32 / sizes.len().max(1) as f32;

        let id = refs.gen(RefType::FontDescriptor(font_index));
        let mut descriptor = writer.font_descriptor(id);
        let name = self.name().unwrap_or_else(|| format!("F{font_index}"));
        descriptor.name(Name(name.as_bytes()));
        if let Some(family) = self.family() {
            descriptor.family(Str(family.as_bytes()));
        }
        descriptor.weight(face.weight().to_number());

        let mut flags = FontFlags::empty();
        flags.set(FontFlags::FIXED_PITCH, face.is_monospaced());
        flags.set(FontFlags::ITALIC, face.is_italic());
        flags.set(FontFlags::NON_SYMBOLIC, true);
        descriptor.flags(flags);

        descriptor.bbox(pdf_writer::Rect {
            x1: 0.0,
            y1: face.descender() as f32 * scaling,
            x2: max_width as f32 * scaling,
            y2: max_height as f32 * scaling,
        });
        descriptor.italic_angle(face.italic_angle());
        descriptor.ascent(face.ascender() as f32 * scaling);
        descriptor.descent(face.descender() as f32 * scaling);
        descriptor.leading(face.line_gap() as f32 * scaling);
        descriptor.cap_height(
            face.capital_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(1000.0),
        );
        descriptor.x_height(
            face.x_height()
                .unwrap_or_else(|| face.capital_height().unwrap_or_default()) as f32
                * scaling,
        );
        descriptor.stem_v(80.0);
        descriptor.avg_width(avg_width * scaling);
        descriptor.max_width(max_width as f32 * scaling);
        descriptor.missing_width(max_width as f32 * scaling);
        descriptor.font_file2(font_data_id);

        id
    }

    fn write_to_unicode(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        ids: HashMap<u16, char>,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::ToUnicode(font_index));

        let mut map = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo\n\
             << /Registry (Adobe)\n\
             /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n\
             <0000> <FFFF>\n\
             endcodespacerange\n",
        );

        let mut ids: Vec<(u16, char)> = ids.into_iter().collect();
        ids.sort_by_key(|&(id, _)| id);

        // bfchar blocks hold at most 100 entries, all sharing a high byte
        let mut blocks: Vec<Vec<(u16, char)>> = Vec::new();
        for (gid, ch) in ids {
            let starts_block = blocks
                .last()
                .map_or(true, |block| block.len() >= 100 || block[0].0 >> 8 != gid >> 8);
            if starts_block {
                blocks.push(Vec::new());
            }
            if let Some(block) = blocks.last_mut() {
                block.push((gid, ch));
            }
        }

        for block in blocks {
            map.push_str(&format!("{} beginbfchar\n", block.len()));
            for (gid, ch) in block {
                map.push_str(&format!("<{gid:04x}> <{:04x}>\n", u32::from(ch)));
            }
            map.push_str("endbfchar\n");
        }
        map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            map.as_bytes(),
            miniz_oxide::deflate::CompressionLevel::DefaultCompression as u8,
        );
        writer.stream(id, compressed.as_slice()).filter(Filter::FlateDecode);

        id
    }

    /// Embed the font as a Type0 font under the object reserved for `font_index`
    pub(crate) fn write(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) {
        let font_id = refs.get_or_gen(RefType::Font(font_index));
        let ids = self.glyph_ids();
        let sizes = self.glyph_sizes(&ids);
        let cid_font_id = self.write_cid(refs, font_index, &sizes, writer);
        let to_unicode_id = self.write_to_unicode(refs, font_index, ids, writer);

        let mut font = writer.type0_font(font_id);
        font.base_font(Name(format!("F{font_index}").as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);
    }
}

/// Emphasis of a cell's text
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Weight {
    #[default]
    Regular,
    Bold,
}

/// Which face and size a run of text is set in
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FontSpec {
    pub weight: Weight,
    pub size: Pt,
}

impl FontSpec {
    pub fn regular(size: Pt) -> FontSpec {
        FontSpec {
            weight: Weight::Regular,
            size,
        }
    }

    pub fn bold(size: Pt) -> FontSpec {
        FontSpec {
            weight: Weight::Bold,
            size,
        }
    }

    /// Regular or bold depending on a cell's emphasis flag
    pub fn with_emphasis(size: Pt, bold: bool) -> FontSpec {
        if bold {
            FontSpec::bold(size)
        } else {
            FontSpec::regular(size)
        }
    }
}

/// A face text can be measured and drawn in: either a standard base font or an
/// embedded TrueType font
#[derive(Debug, Clone)]
pub enum Typeface {
    Standard(StandardFont),
    Embedded(Arc<Font>),
}

impl Typeface {
    fn units_per_em(&self) -> f32 {
        match self {
            Typeface::Standard(font) => font.units_per_em() as f32,
            Typeface::Embedded(font) => font.face().units_per_em() as f32,
        }
    }

    fn vertical_metrics(&self) -> (i16, i16, i16) {
        match self {
            Typeface::Standard(font) => (font.ascender(), font.descender(), font.line_gap()),
            Typeface::Embedded(font) => {
                let face = font.face();
                (face.ascender(), face.descender(), face.line_gap())
            }
        }
    }

    /// Whether the face can draw `ch`. Control characters are never drawable.
    pub fn covers(&self, ch: char) -> bool {
        !ch.is_control() && self.advance_units(ch).is_some()
    }

    fn advance_units(&self, ch: char) -> Option<u16> {
        match self {
            Typeface::Standard(font) => font.advance(ch),
            Typeface::Embedded(font) => font.advance(ch),
        }
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given font size
    pub fn ascent(&self, size: Pt) -> Pt {
        size * (self.vertical_metrics().0 as f32 / self.units_per_em())
    }

    /// Calculate the descent (distance from the baseline to the bottom of the font) for the given font size.
    /// Note: this is usually negative
    pub fn descent(&self, size: Pt) -> Pt {
        size * (self.vertical_metrics().1 as f32 / self.units_per_em())
    }

    /// Calculate the default line height of the font for the given size. The returned value is
    /// how much to vertically offset a second row of text below a first row of text.
    pub fn line_height(&self, size: Pt) -> Pt {
        let (ascender, descender, line_gap) = self.vertical_metrics();
        size * ((line_gap as f32 + ascender as f32 - descender as f32) / self.units_per_em())
    }

    /// Calculate the width of a given string of text; characters the face can't
    /// draw contribute nothing
    pub fn width_of_text(&self, text: &str, size: Pt) -> Pt {
        let scaling = size.0 / self.units_per_em();
        Pt(text
            .chars()
            .filter_map(|ch| self.advance_units(ch))
            .map(|advance| advance as f32 * scaling)
            .sum())
    }

    /// The family name a word processor should substitute for this face
    pub fn word_family(&self) -> String {
        match self {
            Typeface::Standard(font) => font.word_family().to_string(),
            Typeface::Embedded(font) => font.family().unwrap_or_else(|| "Arial".to_string()),
        }
    }
}

/// The pair of faces a document is set in
#[derive(Debug, Clone)]
pub struct Fonts {
    pub regular: Typeface,
    pub bold: Typeface,
}

impl Default for Fonts {
    fn default() -> Self {
        Fonts::helvetica()
    }
}

impl Fonts {
    /// Helvetica and Helvetica-Bold, which need no font files at all
    pub fn helvetica() -> Fonts {
        Fonts {
            regular: Typeface::Standard(StandardFont::Helvetica),
            bold: Typeface::Standard(StandardFont::HelveticaBold),
        }
    }

    /// Set the document in a pair of TrueType fonts
    pub fn embedded(regular: Font, bold: Font) -> Fonts {
        Fonts {
            regular: Typeface::Embedded(Arc::new(regular)),
            bold: Typeface::Embedded(Arc::new(bold)),
        }
    }

    pub fn get(&self, weight: Weight) -> &Typeface {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_garbage_font_data() {
        assert!(matches!(
            Font::load(vec![0u8; 16]),
            Err(RenderError::FaceParsingError(_))
        ));
    }

    #[test]
    fn helvetica_vertical_metrics() {
        let fonts = Fonts::helvetica();
        let regular = fonts.get(Weight::Regular);
        assert!((regular.line_height(Pt(8.0)).0 - 9.248).abs() < 1e-4);
        assert!((regular.ascent(Pt(10.0)).0 - 7.18).abs() < 1e-4);
        assert!(regular.descent(Pt(10.0)).0 < 0.0);
    }

    #[test]
    fn measures_text_width() {
        let fonts = Fonts::helvetica();
        // "ab" = 556 + 556 at 10pt
        assert!((fonts.regular.width_of_text("ab", Pt(10.0)).0 - 11.12).abs() < 1e-4);
        // unrenderable characters are ignored
        assert_eq!(
            fonts.regular.width_of_text("a\u{1F600}b", Pt(10.0)),
            fonts.regular.width_of_text("ab", Pt(10.0))
        );
        assert!(!fonts.regular.covers('\n'));
        assert!(fonts.bold.covers('Z'));
    }
}
