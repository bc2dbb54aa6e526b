use super::placed::{PlacedCell, PlacedLine, PlacedRow, RowKind, VerticalAlign};
use crate::backend::Backend;
use crate::colour::Colour;
use crate::config::{BannerStyle, LayoutConfig};
use crate::error::RenderError;
use crate::font::Fonts;
use crate::layout::{
    Align, CellSpec, MeasuredCell, MeasuredRow, PageCursor, RowLayout, RowMetrics, RowSpec,
    TextMetrics,
};
use crate::rect::Rect;
use crate::units::Pt;

/// How the rows of a block are drawn
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RowStyle {
    pub kind: RowKind,
    pub metrics: RowMetrics,
    pub fill: Option<Colour>,
    pub valign: VerticalAlign,
    /// Overrides the alignment of every cell in the row
    pub align: Option<Align>,
}

impl RowStyle {
    pub fn body(config: &LayoutConfig) -> RowStyle {
        RowStyle {
            kind: RowKind::Body,
            metrics: config.body_metrics(),
            fill: None,
            valign: VerticalAlign::Top,
            align: None,
        }
    }

    /// Free-text blocks: body rows with a taller floor
    pub fn narrative(config: &LayoutConfig) -> RowStyle {
        RowStyle {
            metrics: config.narrative_metrics(),
            ..RowStyle::body(config)
        }
    }

    /// Column headers: bold, centred and shaded
    pub fn header(config: &LayoutConfig) -> RowStyle {
        RowStyle {
            kind: RowKind::Header,
            metrics: config.header_metrics(),
            fill: Some(config.header_fill),
            valign: VerticalAlign::Middle,
            align: Some(Align::Center),
        }
    }

    /// A full-width title bar. `accent` replaces the banner's own fill.
    pub fn title(banner: &BannerStyle, accent: Option<Colour>) -> RowStyle {
        RowStyle {
            kind: RowKind::Title,
            metrics: banner.metrics(),
            fill: Some(accent.unwrap_or(banner.fill)),
            valign: VerticalAlign::Middle,
            align: Some(Align::Center),
        }
    }

    /// Blank boxes kept at a fixed height for signing
    pub fn signature(config: &LayoutConfig) -> RowStyle {
        RowStyle {
            kind: RowKind::Signature,
            ..RowStyle::body(config)
        }
    }

    pub fn centered(mut self) -> RowStyle {
        self.align = Some(Align::Center);
        self
    }

    pub fn bold(mut self) -> RowStyle {
        self.metrics.force_bold = true;
        self
    }
}

/// Draws bordered rows of cells: label/value grids, banners and section
/// titles, free-text blocks and signature boxes.
///
/// Every row goes through the same steps: measure it with [RowLayout], let the
/// [PageCursor] break the page if the row won't fit, then hand the positioned
/// row to the backend.
pub struct GridRenderer<'a> {
    config: &'a LayoutConfig,
    layout: RowLayout<'a>,
}

impl<'a> GridRenderer<'a> {
    pub fn new(config: &'a LayoutConfig, fonts: &'a Fonts) -> GridRenderer<'a> {
        let metrics = TextMetrics::new(fonts, config.line_gap);
        GridRenderer {
            config,
            layout: RowLayout::new(metrics, config.body_metrics()),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        self.config
    }

    pub fn layout(&self) -> &RowLayout<'a> {
        &self.layout
    }

    /// Measure `row` the way it would be drawn in `style`. Signature rows keep
    /// their reserved height no matter what they hold.
    pub fn measure(&self, row: &RowSpec, style: &RowStyle) -> MeasuredRow {
        match style.kind {
            RowKind::Signature => {
                self.layout
                    .fixed_row(row, &style.metrics, self.config.signature_height)
            }
            _ => self.layout.measure_row(row, &style.metrics),
        }
    }

    /// A single full-width cell holding `title`
    pub fn title_row(&self, title: &str) -> RowSpec {
        RowSpec::new(vec![CellSpec::new(title, self.config.section_width)])
    }

    /// Position an already measured row at `top` and send it to the backend
    pub fn emit<B: Backend + ?Sized>(
        &self,
        measured: &MeasuredRow,
        style: &RowStyle,
        top: Pt,
        page_index: usize,
        backend: &mut B,
    ) -> Result<(), RenderError> {
        let row = self.position(measured, style, top, page_index);
        backend.draw_row(&row)
    }

    /// Draw one row with the break-then-draw policy, returning its height
    pub fn draw_row<B: Backend + ?Sized>(
        &self,
        row: &RowSpec,
        style: &RowStyle,
        cursor: &mut PageCursor,
        backend: &mut B,
    ) -> Result<Pt, RenderError> {
        let measured = self.measure(row, style);
        let top = cursor.place(measured.height, backend)?;
        self.emit(&measured, style, top, cursor.page_index(), backend)?;
        Ok(measured.height)
    }

    /// Draw every row in order, returning how many were drawn
    pub fn draw_grid<B: Backend + ?Sized>(
        &self,
        rows: &[RowSpec],
        style: &RowStyle,
        cursor: &mut PageCursor,
        backend: &mut B,
    ) -> Result<usize, RenderError> {
        for row in rows {
            self.draw_row(row, style, cursor, backend)?;
        }
        Ok(rows.len())
    }

    /// Draw a full-width title bar, kept with whatever is drawn after it
    pub fn draw_title<B: Backend + ?Sized>(
        &self,
        title: &str,
        style: &RowStyle,
        cursor: &mut PageCursor,
        backend: &mut B,
    ) -> Result<Pt, RenderError> {
        let measured = self.measure(&self.title_row(title), style);
        cursor.ensure(measured.height, backend)?;
        let top = cursor.claim_kept(measured.height);
        self.emit(&measured, style, top, cursor.page_index(), backend)?;
        Ok(measured.height)
    }

    /// The rows of a signature block, measured: the bold labels, the blank
    /// signing space beneath them, then any name rows. Without labels every
    /// row is signing space.
    pub fn measure_signature_block(
        &self,
        labels: Option<&RowSpec>,
        names: &[RowSpec],
    ) -> Vec<(MeasuredRow, RowStyle)> {
        let label_style = RowStyle::body(self.config).centered().bold();
        let space_style = RowStyle::signature(self.config);
        let name_style = RowStyle::body(self.config).centered();

        let Some(labels) = labels else {
            return names
                .iter()
                .map(|row| (self.measure(&signing_space(row), &space_style), space_style))
                .collect();
        };

        let mut rows = vec![
            (self.measure(labels, &label_style), label_style),
            (self.measure(&signing_space(labels), &space_style), space_style),
        ];
        rows.extend(names.iter().map(|row| (self.measure(row, &name_style), name_style)));
        rows
    }

    /// Draw a signature block as one unbreakable block, returning its height
    pub fn draw_signature_block<B: Backend + ?Sized>(
        &self,
        labels: Option<&RowSpec>,
        names: &[RowSpec],
        cursor: &mut PageCursor,
        backend: &mut B,
    ) -> Result<Pt, RenderError> {
        let rows = self.measure_signature_block(labels, names);
        let total: Pt = rows.iter().map(|(row, _)| row.height).sum();
        let mut top = cursor.place(total, backend)?;
        for (row, style) in &rows {
            self.emit(row, style, top, cursor.page_index(), backend)?;
            top += row.height;
        }
        Ok(total)
    }

    fn position(&self, measured: &MeasuredRow, style: &RowStyle, top: Pt, page_index: usize) -> PlacedRow {
        let left = self.config.geometry.margins.left;
        let mut x = left;
        let cells = measured
            .cells
            .iter()
            .map(|cell| {
                let rect = Rect::from_xywh(x, top, cell.width, measured.height);
                x += cell.width;
                self.position_cell(cell, rect, style)
            })
            .collect();

        PlacedRow {
            kind: style.kind,
            page_index,
            top,
            left,
            height: measured.height,
            padding: style.metrics.padding,
            valign: style.valign,
            border_width: self.config.border_width,
            border_colour: self.config.border_colour,
            cells,
        }
    }

    fn position_cell(&self, cell: &MeasuredCell, rect: Rect, style: &RowStyle) -> PlacedCell {
        let align = style.align.unwrap_or(cell.align);
        if style.kind == RowKind::Signature {
            return PlacedCell {
                rect,
                text: None,
                font: cell.font,
                align,
                fill: style.fill,
                lines: Vec::new(),
            };
        }

        let metrics = self.layout.metrics();
        let padding = style.metrics.padding;
        let pitch = metrics.line_pitch(cell.font);
        let ascent = metrics.face(cell.font).ascent(cell.font.size);
        let block_top = match style.valign {
            VerticalAlign::Top => rect.y1 + padding.top,
            VerticalAlign::Middle => {
                let block = cell.measure.height - metrics.line_gap();
                rect.y1 + ((rect.height() - block) / 2.0).max(Pt::ZERO)
            }
        };

        let lines = cell
            .measure
            .lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.is_empty())
            .map(|(i, line)| {
                let width = metrics.width_of(line, cell.font);
                let x = match align {
                    Align::Left => rect.x1 + padding.horizontal,
                    Align::Center => rect.x1 + (rect.width() - width) / 2.0,
                    Align::Right => rect.x2 - padding.horizontal - width,
                };
                PlacedLine {
                    text: line.clone(),
                    x,
                    baseline: block_top + pitch * i as f32 + ascent,
                    width,
                }
            })
            .collect();

        PlacedCell {
            rect,
            text: Some(cell.text.clone()),
            font: cell.font,
            align,
            fill: style.fill,
            lines,
        }
    }
}

/// Blank boxes as wide as the cells of `row`
fn signing_space(row: &RowSpec) -> RowSpec {
    RowSpec::new(row.cells.iter().map(|cell| CellSpec::blank(cell.width)).collect())
}
