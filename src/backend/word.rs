use super::Backend;
use crate::error::RenderError;
use crate::font::{Fonts, Weight};
use crate::info::Info;
use crate::layout::{Align, PageGeometry};
use crate::render::{PlacedCell, PlacedRow, RowKind, VerticalAlign};
use crate::units::Pt;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::BTreeSet;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const CP_NS: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
const DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const CORE_REL: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

/// Writes finished reports as a WordprocessingML (`.docx`) document: the
/// document body, its relationships and core properties zipped into one OPC
/// package.
///
/// Word reflows text itself, so cells carry their sanitized text rather than
/// the positioned lines. Rows between two gaps or page breaks form one table;
/// its column grid is the union of every cell edge in it, and cells span as
/// many grid columns as they cover.
pub struct WordBackend {
    geometry: PageGeometry,
    fonts: Fonts,
    info: Info,
    blocks: Vec<Block>,
}

enum Block {
    Table(Vec<PlacedRow>),
    Gap(Pt),
    PageBreak,
}

impl WordBackend {
    pub fn new(geometry: PageGeometry, fonts: &Fonts, info: Info) -> WordBackend {
        WordBackend {
            geometry,
            fonts: fonts.clone(),
            info,
            blocks: Vec::new(),
        }
    }

    fn write_content_types(&self, xml: &mut XmlWriter) -> Result<(), RenderError> {
        xml.start("Types", &[("xmlns", TYPES_NS)])?;
        xml.empty(
            "Default",
            &[
                ("Extension", "rels"),
                ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
            ],
        )?;
        xml.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;
        for (part, content_type) in PARTS {
            xml.empty("Override", &[("PartName", part), ("ContentType", content_type)])?;
        }
        xml.end("Types")
    }

    fn write_relationships(&self, xml: &mut XmlWriter) -> Result<(), RenderError> {
        xml.start("Relationships", &[("xmlns", RELS_NS)])?;
        xml.empty(
            "Relationship",
            &[("Id", "rId1"), ("Type", DOCUMENT_REL), ("Target", "word/document.xml")],
        )?;
        xml.empty(
            "Relationship",
            &[("Id", "rId2"), ("Type", CORE_REL), ("Target", "docProps/core.xml")],
        )?;
        xml.end("Relationships")
    }

    fn write_core_properties(&self, xml: &mut XmlWriter) -> Result<(), RenderError> {
        xml.start(
            "cp:coreProperties",
            &[
                ("xmlns:cp", CP_NS),
                ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
                ("xmlns:dcterms", "http://purl.org/dc/terms/"),
                ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
            ],
        )?;
        let fields = [
            ("dc:title", &self.info.title),
            ("dc:subject", &self.info.subject),
            ("dc:creator", &self.info.author),
            ("cp:keywords", &self.info.keywords),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                xml.text_element(name, &[], value)?;
            }
        }
        let created = self
            .info
            .creation_date()
            .with_timezone(&chrono::Utc)
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string();
        xml.text_element("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")], &created)?;
        xml.end("cp:coreProperties")
    }

    fn write_document(&self, xml: &mut XmlWriter) -> Result<(), RenderError> {
        xml.start("w:document", &[("xmlns:w", W_NS)])?;
        xml.start("w:body", &[])?;
        for block in &self.blocks {
            match block {
                Block::Table(rows) => self.write_table(xml, rows)?,
                Block::Gap(height) => write_spacer(xml, *height)?,
                Block::PageBreak => {
                    xml.start("w:p", &[])?;
                    write_tight_spacing(xml, Some(Pt(1.0)))?;
                    xml.start("w:r", &[])?;
                    xml.empty("w:br", &[("w:type", "page")])?;
                    xml.end("w:r")?;
                    xml.end("w:p")?;
                }
            }
        }
        // a body may not end on a table
        write_spacer(xml, Pt(1.0))?;
        self.write_section_properties(xml)?;
        xml.end("w:body")?;
        xml.end("w:document")
    }

    fn write_section_properties(&self, xml: &mut XmlWriter) -> Result<(), RenderError> {
        let g = &self.geometry;
        xml.start("w:sectPr", &[])?;
        xml.empty(
            "w:pgSz",
            &[
                ("w:w", &g.width.twips().to_string()),
                ("w:h", &g.height.twips().to_string()),
            ],
        )?;
        xml.empty(
            "w:pgMar",
            &[
                ("w:top", &g.margins.top.twips().to_string()),
                ("w:right", &g.margins.right.twips().to_string()),
                ("w:bottom", &g.margins.bottom.twips().to_string()),
                ("w:left", &g.margins.left.twips().to_string()),
                ("w:header", "0"),
                ("w:footer", "0"),
                ("w:gutter", "0"),
            ],
        )?;
        xml.end("w:sectPr")
    }

    fn write_table(&self, xml: &mut XmlWriter, rows: &[PlacedRow]) -> Result<(), RenderError> {
        let Some(first) = rows.first() else {
            return Ok(());
        };
        let edges = column_edges(rows);
        let (Some(&left), Some(&right)) = (edges.first(), edges.last()) else {
            return Ok(());
        };

        xml.start("w:tbl", &[])?;
        xml.start("w:tblPr", &[])?;
        xml.empty("w:tblW", &[("w:w", &(right - left).to_string()), ("w:type", "dxa")])?;
        let indent = left - self.geometry.margins.left.twips();
        xml.empty("w:tblInd", &[("w:w", &indent.to_string()), ("w:type", "dxa")])?;
        xml.start("w:tblBorders", &[])?;
        // border widths are in eighths of a point, 2 at the least
        let size = ((first.border_width.0 * 8.0).round() as i64).max(2).to_string();
        let (border, size) = if first.border_width > Pt::ZERO {
            ("single", size.as_str())
        } else {
            ("nil", "0")
        };
        let colour = first.border_colour.to_hex();
        for side in ["w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV"] {
            xml.empty(
                side,
                &[("w:val", border), ("w:sz", size), ("w:space", "0"), ("w:color", &colour)],
            )?;
        }
        xml.end("w:tblBorders")?;
        xml.empty("w:tblLayout", &[("w:type", "fixed")])?;
        xml.end("w:tblPr")?;

        xml.start("w:tblGrid", &[])?;
        for pair in edges.windows(2) {
            xml.empty("w:gridCol", &[("w:w", &(pair[1] - pair[0]).to_string())])?;
        }
        xml.end("w:tblGrid")?;

        for (i, row) in rows.iter().enumerate() {
            let repeats = row.kind == RowKind::Header
                && rows[..i].iter().all(|prev| prev.kind == RowKind::Header);
            self.write_row(xml, row, repeats, &edges)?;
        }

        xml.end("w:tbl")
    }

    fn write_row(
        &self,
        xml: &mut XmlWriter,
        row: &PlacedRow,
        repeats: bool,
        edges: &[i64],
    ) -> Result<(), RenderError> {
        xml.start("w:tr", &[])?;
        xml.start("w:trPr", &[])?;
        xml.empty("w:cantSplit", &[])?;
        if repeats {
            xml.empty("w:tblHeader", &[])?;
        }
        let rule = match row.kind {
            RowKind::Signature => "exact",
            _ => "atLeast",
        };
        xml.empty(
            "w:trHeight",
            &[("w:val", &row.height.twips().to_string()), ("w:hRule", rule)],
        )?;
        xml.end("w:trPr")?;

        for cell in &row.cells {
            self.write_cell(xml, row, cell, edges)?;
        }
        xml.end("w:tr")
    }

    fn write_cell(
        &self,
        xml: &mut XmlWriter,
        row: &PlacedRow,
        cell: &PlacedCell,
        edges: &[i64],
    ) -> Result<(), RenderError> {
        let (x1, x2) = (cell.rect.x1.twips(), cell.rect.x2.twips());
        let span = edges.iter().filter(|&&edge| edge > x1 && edge <= x2).count().max(1);

        xml.start("w:tc", &[])?;
        xml.start("w:tcPr", &[])?;
        xml.empty("w:tcW", &[("w:w", &(x2 - x1).to_string()), ("w:type", "dxa")])?;
        if span > 1 {
            xml.empty("w:gridSpan", &[("w:val", &span.to_string())])?;
        }
        if let Some(fill) = cell.fill {
            xml.empty(
                "w:shd",
                &[("w:val", "clear"), ("w:color", "auto"), ("w:fill", &fill.to_hex())],
            )?;
        }
        let padding = row.padding;
        xml.start("w:tcMar", &[])?;
        for (side, value) in [
            ("w:top", padding.top),
            ("w:left", padding.horizontal),
            ("w:bottom", padding.bottom),
            ("w:right", padding.horizontal),
        ] {
            xml.empty(side, &[("w:w", &value.twips().to_string()), ("w:type", "dxa")])?;
        }
        xml.end("w:tcMar")?;
        if row.valign == VerticalAlign::Middle {
            xml.empty("w:vAlign", &[("w:val", "center")])?;
        }
        xml.end("w:tcPr")?;

        xml.start("w:p", &[])?;
        xml.start("w:pPr", &[])?;
        xml.empty("w:spacing", &[("w:before", "0"), ("w:after", "0")])?;
        let justify = match cell.align {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        };
        xml.empty("w:jc", &[("w:val", justify)])?;
        xml.end("w:pPr")?;

        if let Some(text) = &cell.text {
            let family = self.fonts.get(cell.font.weight).word_family();
            let size = cell.font.size.half_points().to_string();
            for (i, line) in text.hard_lines().enumerate() {
                xml.start("w:r", &[])?;
                xml.start("w:rPr", &[])?;
                xml.empty(
                    "w:rFonts",
                    &[("w:ascii", &family), ("w:hAnsi", &family), ("w:cs", &family)],
                )?;
                if cell.font.weight == Weight::Bold {
                    xml.empty("w:b", &[])?;
                }
                xml.empty("w:sz", &[("w:val", &size)])?;
                xml.empty("w:szCs", &[("w:val", &size)])?;
                xml.end("w:rPr")?;
                if i > 0 {
                    xml.empty("w:br", &[])?;
                }
                xml.text_element("w:t", &[("xml:space", "preserve")], line)?;
                xml.end("w:r")?;
            }
        }
        xml.end("w:p")?;
        xml.end("w:tc")
    }
}

/// Every distinct cell edge in a run of rows, in twips
fn column_edges(rows: &[PlacedRow]) -> Vec<i64> {
    let mut edges = BTreeSet::new();
    for cell in rows.iter().flat_map(|row| &row.cells) {
        edges.insert(cell.rect.x1.twips());
        edges.insert(cell.rect.x2.twips());
    }
    edges.into_iter().collect()
}

/// Paragraph spacing with nothing before or after, and optionally an exact
/// line height
fn write_tight_spacing(xml: &mut XmlWriter, line: Option<Pt>) -> Result<(), RenderError> {
    xml.start("w:pPr", &[])?;
    match line {
        Some(line) => xml.empty(
            "w:spacing",
            &[
                ("w:before", "0"),
                ("w:after", "0"),
                ("w:line", &line.twips().max(1).to_string()),
                ("w:lineRule", "exact"),
            ],
        )?,
        None => xml.empty("w:spacing", &[("w:before", "0"), ("w:after", "0")])?,
    }
    xml.end("w:pPr")
}

/// An empty paragraph exactly `height` tall
fn write_spacer(xml: &mut XmlWriter, height: Pt) -> Result<(), RenderError> {
    xml.start("w:p", &[])?;
    write_tight_spacing(xml, Some(height))?;
    xml.end("w:p")
}

/// Thin helpers over [quick_xml::Writer] for the handful of event shapes
/// WordprocessingML needs
struct XmlWriter {
    writer: Writer<Vec<u8>>,
}

impl XmlWriter {
    fn new() -> XmlWriter {
        XmlWriter {
            writer: Writer::new(Vec::new()),
        }
    }

    fn element<'a>(name: &'a str, attributes: &[(&'a str, &'a str)]) -> BytesStart<'a> {
        let mut element = BytesStart::new(name);
        for &attribute in attributes {
            element.push_attribute(attribute);
        }
        element
    }

    fn declaration(&mut self) -> Result<(), RenderError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(())
    }

    fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), RenderError> {
        self.writer
            .write_event(Event::Start(Self::element(name, attributes)))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), RenderError> {
        self.writer
            .write_event(Event::Empty(Self::element(name, attributes)))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<(), RenderError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn text_element(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
        text: &str,
    ) -> Result<(), RenderError> {
        self.start(name, attributes)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn into_inner(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

impl Backend for WordBackend {
    fn draw_row(&mut self, row: &PlacedRow) -> Result<(), RenderError> {
        if let Some(Block::Table(rows)) = self.blocks.last_mut() {
            rows.push(row.clone());
        } else {
            self.blocks.push(Block::Table(vec![row.clone()]));
        }
        Ok(())
    }

    fn gap(&mut self, height: Pt) -> Result<(), RenderError> {
        self.blocks.push(Block::Gap(height));
        Ok(())
    }

    fn page_break(&mut self) -> Result<(), RenderError> {
        self.blocks.push(Block::PageBreak);
        Ok(())
    }

    fn finish(&mut self) -> Result<Vec<u8>, RenderError> {
        let mut package = Package::new();
        package.part("[Content_Types].xml", |xml| self.write_content_types(xml))?;
        package.part("_rels/.rels", |xml| self.write_relationships(xml))?;
        package.part("word/document.xml", |xml| self.write_document(xml))?;
        package.part("docProps/core.xml", |xml| self.write_core_properties(xml))?;
        let bytes = package.finish()?;

        let tables = self
            .blocks
            .iter()
            .filter(|block| matches!(block, Block::Table(_)))
            .count();
        log::debug!("wrote {tables} WordprocessingML table(s)");
        self.blocks.clear();
        Ok(bytes)
    }

    fn content_type(&self) -> &'static str {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    }

    fn extension(&self) -> &'static str {
        "docx"
    }
}

/// The parts named in `[Content_Types].xml`, besides the relationships
const PARTS: [(&str, &str); 2] = [
    (
        "/word/document.xml",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
    ),
    (
        "/docProps/core.xml",
        "application/vnd.openxmlformats-package.core-properties+xml",
    ),
];

/// An OPC package being zipped in memory. Entries carry a fixed timestamp so
/// the same report always produces the same bytes.
struct Package {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl Package {
    fn new() -> Package {
        Package {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .last_modified_time(zip::DateTime::default()),
        }
    }

    fn part<F>(&mut self, name: &str, body: F) -> Result<(), RenderError>
    where
        F: FnOnce(&mut XmlWriter) -> Result<(), RenderError>,
    {
        let mut xml = XmlWriter::new();
        xml.declaration()?;
        body(&mut xml)?;
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(&xml.into_inner())?;
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        Ok(self.zip.finish()?.into_inner())
    }
}
