use crate::backend::{Backend, PdfBackend, WordBackend};
use crate::config::LayoutConfig;
use crate::error::{LayoutWarning, RenderError};
use crate::font::{FontSpec, Fonts};
use crate::info::Info;
use crate::layout::{PageCursor, RowSpec, TextMetrics};
use crate::render::{GridRenderer, RowStyle, TableOptions, TableRenderer};
use crate::section::{Section, SectionKind};
use crate::units::Pt;
use std::io::Write;

/// Which backend a document is rendered with
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// A fixed-layout PDF
    #[default]
    Pdf,
    /// A WordprocessingML (`.docx`) document
    Word,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Word => "docx",
        }
    }
}

/// Who a report is about, used to name the finished file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseIdentity {
    /// Usually the name of the insured
    pub subject: Option<String>,
    pub case_id: String,
}

impl CaseIdentity {
    pub fn new<S: Into<String>, I: ToString>(subject: Option<S>, case_id: I) -> CaseIdentity {
        CaseIdentity {
            subject: subject.map(Into::into),
            case_id: case_id.to_string(),
        }
    }
}

/// What laying out a document produced, apart from the bytes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutSummary {
    pub page_count: usize,
    pub warnings: Vec<LayoutWarning>,
}

/// A finished document and everything a caller needs to deliver it
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub content_type: &'static str,
    pub filename: String,
    /// Problems that didn't stop the document from being produced
    pub warnings: Vec<LayoutWarning>,
}

impl RenderedDocument {
    /// Write the document to `sink` and flush it
    pub fn write_to<W: Write>(&self, mut sink: W) -> Result<(), RenderError> {
        sink.write_all(&self.bytes)?;
        sink.flush()?;
        Ok(())
    }
}

/// Build the name a finished report is saved under: `"{subject} - {id}.{ext}"`.
///
/// The subject goes through the same sanitizer as cell text, then loses any
/// characters file systems object to and has its whitespace collapsed.
pub fn suggested_filename(identity: &CaseIdentity, extension: &str) -> String {
    let fonts = Fonts::helvetica();
    let metrics = TextMetrics::new(&fonts, Pt::ZERO);
    let clean = metrics.sanitize(identity.subject.as_deref(), FontSpec::regular(Pt(8.0)));
    let stripped: String = clean
        .as_str()
        .chars()
        .filter(|ch| !matches!(ch, '/' | '\\' | '?' | '%' | '*' | ':' | '|' | '"' | '<' | '>'))
        .collect();
    let subject = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("{subject} - {}.{extension}", identity.case_id)
}

/// Lays out an ordered list of sections onto pages and drives a backend.
///
/// Sections are drawn in order, each optionally under a coloured title bar,
/// with a fixed gap between consecutive sections. A single [PageCursor] is
/// threaded through all of them, so every block anywhere in the document
/// follows the same break-then-draw policy.
///
/// ```
/// use casefile_print::{CaseIdentity, DocumentAssembler, LayoutConfig, OutputFormat, Pt, Section};
///
/// let sections = vec![
///     Section::banner("FORMULIR INVESTIGASI"),
///     Section::narrative(Some("Ahli waris menyampaikan kronologi."), Pt(545.0))
///         .titled("RESUME HASIL WAWANCARA AHLI WARIS"),
/// ];
/// let assembler = DocumentAssembler::new(LayoutConfig::default());
/// let document = assembler
///     .render_format(&CaseIdentity::new(Some("Budi Santoso"), 42), &sections, OutputFormat::Pdf)
///     .expect("rendered");
/// assert_eq!(document.page_count, 1);
/// assert_eq!(document.filename, "Budi Santoso - 42.pdf");
/// ```
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    config: LayoutConfig,
    fonts: Fonts,
    info: Info,
}

impl DocumentAssembler {
    /// An assembler setting text in Helvetica
    pub fn new(config: LayoutConfig) -> DocumentAssembler {
        DocumentAssembler {
            config,
            fonts: Fonts::helvetica(),
            info: Info::default(),
        }
    }

    pub fn with_fonts(mut self, fonts: Fonts) -> DocumentAssembler {
        self.fonts = fonts;
        self
    }

    pub fn with_info(mut self, info: Info) -> DocumentAssembler {
        self.info = info;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn fonts(&self) -> &Fonts {
        &self.fonts
    }

    /// A fresh backend for `format`, set up with this assembler's page, faces
    /// and metadata
    pub fn backend(&self, format: OutputFormat) -> Box<dyn Backend> {
        match format {
            OutputFormat::Pdf => Box::new(PdfBackend::new(
                self.config.geometry.clone(),
                &self.fonts,
                self.info.clone(),
            )),
            OutputFormat::Word => Box::new(WordBackend::new(
                self.config.geometry.clone(),
                &self.fonts,
                self.info.clone(),
            )),
        }
    }

    /// Draw every section into `backend` without finishing it
    pub fn layout<B: Backend + ?Sized>(
        &self,
        sections: &[Section],
        backend: &mut B,
    ) -> Result<LayoutSummary, RenderError> {
        let grid = GridRenderer::new(&self.config, &self.fonts);
        let mut cursor = PageCursor::new(self.config.geometry.clone());
        let mut warnings = Vec::new();

        for (index, section) in sections.iter().enumerate() {
            for mismatch in section.check_widths(index, self.config.section_width, self.config.width_tolerance) {
                log::warn!("{mismatch}");
                warnings.push(LayoutWarning::WidthMismatch(mismatch));
            }

            if index > 0 && !cursor.at_page_top() {
                cursor.advance(self.config.section_gap);
                backend.gap(self.config.section_gap)?;
            }

            log::debug!(
                "section {index} ({:?}) starts on page {} at {}",
                section.kind,
                cursor.page_count(),
                cursor.cursor_y()
            );
            self.draw_section(section, &grid, &mut cursor, backend)?;
        }

        warnings.extend(cursor.take_warnings());
        Ok(LayoutSummary {
            page_count: cursor.page_count(),
            warnings,
        })
    }

    /// Lay out `sections` into `backend` and finish it. If anything fails the
    /// backend is dropped with whatever it held and no document is returned.
    pub fn render<B: Backend>(
        &self,
        identity: &CaseIdentity,
        sections: &[Section],
        mut backend: B,
    ) -> Result<RenderedDocument, RenderError> {
        let summary = self.layout(sections, &mut backend)?;
        let bytes = backend.finish()?;
        log::debug!(
            "rendered {} page(s), {} byte(s), {} warning(s)",
            summary.page_count,
            bytes.len(),
            summary.warnings.len()
        );
        Ok(RenderedDocument {
            bytes,
            page_count: summary.page_count,
            content_type: backend.content_type(),
            filename: suggested_filename(identity, backend.extension()),
            warnings: summary.warnings,
        })
    }

    pub fn render_format(
        &self,
        identity: &CaseIdentity,
        sections: &[Section],
        format: OutputFormat,
    ) -> Result<RenderedDocument, RenderError> {
        self.render(identity, sections, self.backend(format))
    }

    /// Render and then write the finished bytes to `sink`. Nothing is written
    /// unless rendering succeeded.
    pub fn render_into<W: Write>(
        &self,
        identity: &CaseIdentity,
        sections: &[Section],
        format: OutputFormat,
        sink: W,
    ) -> Result<RenderedDocument, RenderError> {
        let document = self.render_format(identity, sections, format)?;
        document.write_to(sink)?;
        Ok(document)
    }

    fn title_style(&self, section: &Section) -> RowStyle {
        let banner = match section.kind {
            SectionKind::Banner => &self.config.document_banner,
            _ => &self.config.section_title,
        };
        RowStyle::title(banner, section.accent)
    }

    fn body_style(&self, section: &Section) -> RowStyle {
        match section.kind {
            SectionKind::Narrative => RowStyle::narrative(&self.config),
            _ => RowStyle::body(&self.config),
        }
    }

    /// The height of everything that must share a page with the section title
    fn lead_height(&self, section: &Section, grid: &GridRenderer) -> Pt {
        let header = || {
            section
                .header
                .as_ref()
                .filter(|header| !header.cells.is_empty())
        };
        match section.kind {
            SectionKind::Table => TableRenderer::new(grid).lead_height(header(), &section.rows),
            SectionKind::SignatureBlock => grid
                .measure_signature_block(header(), &section.rows)
                .iter()
                .map(|(row, _)| row.height)
                .sum(),
            SectionKind::Banner | SectionKind::Grid | SectionKind::Narrative => {
                let header = header()
                    .map(|header| grid.measure(header, &RowStyle::header(&self.config)).height)
                    .unwrap_or(Pt::ZERO);
                let first = section
                    .rows
                    .first()
                    .map(|row| grid.measure(row, &self.body_style(section)).height)
                    .unwrap_or(Pt::ZERO);
                header + first
            }
        }
    }

    fn draw_section<B: Backend + ?Sized>(
        &self,
        section: &Section,
        grid: &GridRenderer,
        cursor: &mut PageCursor,
        backend: &mut B,
    ) -> Result<(), RenderError> {
        let title_style = self.title_style(section);
        // the banner section draws its title even when it has none
        let title = match (&section.title, section.kind) {
            (Some(title), _) => Some(title.as_str()),
            (None, SectionKind::Banner) => Some(""),
            (None, _) => None,
        };

        if let Some(title) = title {
            if self.config.keep_titles_with_content {
                let title_height = grid.measure(&grid.title_row(title), &title_style).height;
                cursor.ensure(title_height + self.lead_height(section, grid), backend)?;
            }
            grid.draw_title(title, &title_style, cursor, backend)?;
        }

        let header = section
            .header
            .as_ref()
            .filter(|header| !header.cells.is_empty());

        match section.kind {
            SectionKind::Table => {
                let options = TableOptions {
                    repeat_header_on_break: section
                        .repeat_header
                        .unwrap_or(self.config.repeat_table_headers),
                };
                TableRenderer::new(grid).draw_table(header, &section.rows, cursor, backend, options)?;
            }
            SectionKind::SignatureBlock => {
                grid.draw_signature_block(header, &section.rows, cursor, backend)?;
            }
            SectionKind::Banner | SectionKind::Grid | SectionKind::Narrative => {
                if let Some(header) = header {
                    self.draw_header_with_first_row(section, header, grid, cursor, backend)?;
                }
                grid.draw_grid(&section.rows, &self.body_style(section), cursor, backend)?;
            }
        }
        Ok(())
    }

    fn draw_header_with_first_row<B: Backend + ?Sized>(
        &self,
        section: &Section,
        header: &RowSpec,
        grid: &GridRenderer,
        cursor: &mut PageCursor,
        backend: &mut B,
    ) -> Result<(), RenderError> {
        let header_style = RowStyle::header(&self.config);
        let measured = grid.measure(header, &header_style);
        let first = section
            .rows
            .first()
            .map(|row| grid.measure(row, &self.body_style(section)).height)
            .unwrap_or(Pt::ZERO);
        cursor.ensure(measured.height + first, backend)?;
        let top = cursor.claim_kept(measured.height);
        grid.emit(&measured, &header_style, top, cursor.page_index(), backend)
    }
}
