use super::Backend;
use crate::colour::{colours, Colour};
use crate::error::RenderError;
use crate::font::{Fonts, Typeface, Weight};
use crate::info::Info;
use crate::layout::PageGeometry;
use crate::refs::{ObjectReferences, RefType};
use crate::render::{PlacedCell, PlacedRow};
use crate::units::Pt;
use id_arena::{Arena, Id};
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Ref, Str};

/// Writes finished reports as PDF.
///
/// Every page gets its own compressed content stream. Standard faces are
/// referenced by name (no font data is embedded); TrueType faces are embedded
/// whole as Type0 fonts.
pub struct PdfBackend {
    geometry: PageGeometry,
    info: Info,
    faces: Arena<Typeface>,
    regular: Id<Typeface>,
    bold: Id<Typeface>,
    pages: Vec<Vec<u8>>,
    current: Content,
}

impl PdfBackend {
    pub fn new(geometry: PageGeometry, fonts: &Fonts, info: Info) -> PdfBackend {
        let mut faces = Arena::new();
        let regular = faces.alloc(fonts.regular.clone());
        let bold = faces.alloc(fonts.bold.clone());
        PdfBackend {
            geometry,
            info,
            faces,
            regular,
            bold,
            pages: Vec::new(),
            current: Content::new(),
        }
    }

    fn face_id(&self, weight: Weight) -> Id<Typeface> {
        match weight {
            Weight::Regular => self.regular,
            Weight::Bold => self.bold,
        }
    }

    fn font_name(id: Id<Typeface>) -> String {
        format!("F{}", id.index())
    }

    fn fill_cell(&mut self, cell: &PlacedCell, fill: Colour) {
        let r = cell.rect.to_pdf(self.geometry.height);
        let content = &mut self.current;
        content.save_state();
        set_fill(content, fill);
        content.rect(r.x1, r.y1, r.x2 - r.x1, r.y2 - r.y1);
        content.fill_nonzero();
        content.restore_state();
    }

    fn stroke_cells(&mut self, row: &PlacedRow) {
        let page_height = self.geometry.height;
        let content = &mut self.current;
        content.save_state();
        content.set_line_width(row.border_width.0);
        set_stroke(content, row.border_colour);
        for cell in &row.cells {
            let r = cell.rect.to_pdf(page_height);
            content.rect(r.x1, r.y1, r.x2 - r.x1, r.y2 - r.y1);
        }
        content.stroke();
        content.restore_state();
    }

    fn show_text(&mut self, row: &PlacedRow) {
        let page_height = self.geometry.height;
        let mut started = false;
        for cell in &row.cells {
            if cell.lines.is_empty() {
                continue;
            }
            let id = self.face_id(cell.font.weight);
            let face = &self.faces[id];
            if !started {
                self.current.begin_text();
                set_fill(&mut self.current, colours::BLACK);
                started = true;
            }
            self.current
                .set_font(Name(Self::font_name(id).as_bytes()), cell.font.size.0);
            for line in &cell.lines {
                let encoded = encode(face, &line.text);
                self.current.set_text_matrix([
                    1.0,
                    0.0,
                    0.0,
                    1.0,
                    line.x.0,
                    (page_height - line.baseline).0,
                ]);
                self.current.show(Str(&encoded));
            }
        }
        if started {
            self.current.end_text();
        }
    }

    fn write_fonts(&self, refs: &mut ObjectReferences, writer: &mut Pdf) {
        for (id, face) in self.faces.iter() {
            match face {
                Typeface::Standard(font) => {
                    let font_id = refs.gen(RefType::Font(id.index()));
                    writer
                        .type1_font(font_id)
                        .base_font(Name(font.pdf_name().as_bytes()))
                        .encoding_predefined(Name(b"WinAnsiEncoding"));
                }
                Typeface::Embedded(font) => font.write(refs, id.index(), writer),
            }
        }
    }
}

/// Encode a line for the face it is set in: single bytes for standard faces,
/// big-endian glyph ids for embedded ones
fn encode(face: &Typeface, text: &str) -> Vec<u8> {
    match face {
        Typeface::Standard(_) => text.bytes().collect(),
        Typeface::Embedded(font) => text
            .chars()
            .filter_map(|ch| font.glyph_id(ch))
            .flat_map(u16::to_be_bytes)
            .collect(),
    }
}

fn set_fill(content: &mut Content, colour: Colour) {
    match colour {
        Colour::RGB { r, g, b } => content.set_fill_rgb(r, g, b),
        Colour::CMYK { c, m, y, k } => content.set_fill_cmyk(c, m, y, k),
        Colour::Grey { g } => content.set_fill_gray(g),
    };
}

fn set_stroke(content: &mut Content, colour: Colour) {
    match colour {
        Colour::RGB { r, g, b } => content.set_stroke_rgb(r, g, b),
        Colour::CMYK { c, m, y, k } => content.set_stroke_cmyk(c, m, y, k),
        Colour::Grey { g } => content.set_stroke_gray(g),
    };
}

impl Backend for PdfBackend {
    fn draw_row(&mut self, row: &PlacedRow) -> Result<(), RenderError> {
        for cell in &row.cells {
            if let Some(fill) = cell.fill {
                self.fill_cell(cell, fill);
            }
        }
        if row.border_width > Pt::ZERO {
            self.stroke_cells(row);
        }
        self.show_text(row);
        Ok(())
    }

    fn gap(&mut self, _height: Pt) -> Result<(), RenderError> {
        // positions are absolute, so a gap needs no drawing
        Ok(())
    }

    fn page_break(&mut self) -> Result<(), RenderError> {
        let page = std::mem::replace(&mut self.current, Content::new());
        self.pages.push(page.finish());
        Ok(())
    }

    fn finish(&mut self) -> Result<Vec<u8>, RenderError> {
        let last = std::mem::replace(&mut self.current, Content::new());
        let mut pages = std::mem::take(&mut self.pages);
        pages.push(last.finish());

        let mut refs = ObjectReferences::new();
        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        self.info.write(&mut refs, &mut writer);

        let page_refs: Vec<Ref> = (0..pages.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();
        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs.iter().copied());

        self.write_fonts(&mut refs, &mut writer);

        let media_box = pdf_writer::Rect::new(0.0, 0.0, self.geometry.width.0, self.geometry.height.0);
        for (i, (page_id, content)) in page_refs.iter().zip(pages).enumerate() {
            let content_id = refs.gen(RefType::ContentForPage(i));

            let mut page = writer.page(*page_id);
            page.media_box(media_box);
            page.parent(page_tree_id);
            page.contents(content_id);
            let mut resources = page.resources();
            let mut fonts = resources.fonts();
            for (id, _) in self.faces.iter() {
                if let Some(font_ref) = refs.get(RefType::Font(id.index())) {
                    fonts.pair(Name(Self::font_name(id).as_bytes()), font_ref);
                }
            }
            fonts.finish();
            resources.finish();
            page.finish();

            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
                content.as_slice(),
                miniz_oxide::deflate::CompressionLevel::DefaultCompression as u8,
            );
            writer
                .stream(content_id, compressed.as_slice())
                .filter(Filter::FlateDecode);
        }

        writer.catalog(catalog_id).pages(page_tree_id);
        log::debug!("wrote {} PDF page(s)", page_refs.len());
        Ok(writer.finish())
    }

    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }
}
