use super::grid::{GridRenderer, RowStyle};
use crate::backend::Backend;
use crate::error::RenderError;
use crate::layout::{PageCursor, RowSpec};
use crate::units::Pt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TableOptions {
    /// Redraw the column header at the top of every page the table continues on
    pub repeat_header_on_break: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions {
            repeat_header_on_break: true,
        }
    }
}

/// What drawing a table did
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct TableOutcome {
    /// Always equal to the number of data rows supplied
    pub rows_drawn: usize,
    /// How many times the header was redrawn after a page break
    pub header_repeats: usize,
    pub page_breaks: usize,
}

/// Draws a repeating table: a fixed column header followed by any number of
/// data rows, each tested against the remaining page space before it's drawn.
///
/// Rows are drawn in the order given and none is ever dropped. A row taller than
/// a whole page starts at the top of a fresh one, beneath the repeated header,
/// and is reported as an overflow by the cursor. A row that fits a page only on
/// its own is drawn there without the header.
pub struct TableRenderer<'g, 'a> {
    grid: &'g GridRenderer<'a>,
}

impl<'g, 'a> TableRenderer<'g, 'a> {
    pub fn new(grid: &'g GridRenderer<'a>) -> TableRenderer<'g, 'a> {
        TableRenderer { grid }
    }

    /// The height of the header plus the first data row, which are always kept
    /// on the same page
    pub fn lead_height(&self, header: Option<&RowSpec>, rows: &[RowSpec]) -> Pt {
        let config = self.grid.config();
        let header = header
            .filter(|header| !header.cells.is_empty())
            .map(|header| self.grid.measure(header, &RowStyle::header(config)).height)
            .unwrap_or(Pt::ZERO);
        let first = rows
            .first()
            .map(|row| self.grid.measure(row, &RowStyle::body(config)).height)
            .unwrap_or(Pt::ZERO);
        header + first
    }

    pub fn draw_table<B: Backend + ?Sized>(
        &self,
        header: Option<&RowSpec>,
        rows: &[RowSpec],
        cursor: &mut PageCursor,
        backend: &mut B,
        options: TableOptions,
    ) -> Result<TableOutcome, RenderError> {
        let config = self.grid.config();
        let header_style = RowStyle::header(config);
        let body_style = RowStyle::body(config);
        let header = header
            .filter(|header| !header.cells.is_empty())
            .map(|header| self.grid.measure(header, &header_style));

        let mut outcome = TableOutcome::default();

        if let Some(header) = &header {
            // never leave the header alone at the bottom of a page
            if cursor.ensure(self.lead_height(None, rows) + header.height, backend)? {
                outcome.page_breaks += 1;
            }
            let top = cursor.claim_kept(header.height);
            self.grid
                .emit(header, &header_style, top, cursor.page_index(), backend)?;
        }

        for row in rows {
            let measured = self.grid.measure(row, &body_style);
            if cursor.ensure(measured.height, backend)? {
                outcome.page_breaks += 1;
                // a row that only fits a page by itself goes without the header
                let repeated = header.as_ref().filter(|header| {
                    options.repeat_header_on_break
                        && (cursor.oversized(measured.height)
                            || !cursor.oversized(header.height + measured.height))
                });
                if let Some(header) = repeated {
                    let top = cursor.claim_kept(header.height);
                    self.grid
                        .emit(header, &header_style, top, cursor.page_index(), backend)?;
                    outcome.header_repeats += 1;
                }
            }
            let top = cursor.claim(measured.height);
            self.grid
                .emit(&measured, &body_style, top, cursor.page_index(), backend)?;
            outcome.rows_drawn += 1;
        }

        log::debug!(
            "table drew {} row(s) across {} page break(s)",
            outcome.rows_drawn,
            outcome.page_breaks
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{RecordedEvent, Recorder};
    use crate::config::LayoutConfig;
    use crate::font::Fonts;
    use crate::layout::{CellSpec, Margins, PageGeometry};
    use crate::render::placed::RowKind;

    fn config(height: f32) -> LayoutConfig {
        LayoutConfig {
            geometry: PageGeometry {
                width: Pt(595.0),
                height: Pt(height),
                margins: Margins::trbl(Pt(30.0), Pt(25.0), Pt(40.0), Pt(25.0)),
            },
            ..LayoutConfig::default()
        }
    }

    fn header() -> RowSpec {
        RowSpec::new(vec![
            CellSpec::new("Tanggal", Pt(90.0)),
            CellSpec::new("Hasil", Pt(455.0)),
        ])
    }

    fn rows(count: usize) -> Vec<RowSpec> {
        (0..count)
            .map(|i| {
                RowSpec::new(vec![
                    CellSpec::new(format!("{}/01/2024", i + 1), Pt(90.0)),
                    CellSpec::new(format!("hasil {i}"), Pt(455.0)),
                ])
            })
            .collect()
    }

    #[test]
    fn draws_every_row_in_order() {
        let config = config(300.0);
        let fonts = Fonts::helvetica();
        let grid = GridRenderer::new(&config, &fonts);
        let mut cursor = PageCursor::new(config.geometry.clone());
        let mut recorder = Recorder::default();

        let data = rows(25);
        let outcome = TableRenderer::new(&grid)
            .draw_table(Some(&header()), &data, &mut cursor, &mut recorder, TableOptions::default())
            .expect("drawn");

        assert_eq!(outcome.rows_drawn, 25);
        assert!(outcome.page_breaks > 0);
        assert_eq!(outcome.header_repeats, outcome.page_breaks);

        let bodies: Vec<String> = recorder
            .rows()
            .filter(|row| row.kind == RowKind::Body)
            .map(|row| row.cells[1].text.as_ref().map(|t| t.to_string()).unwrap_or_default())
            .collect();
        let expected: Vec<String> = (0..25).map(|i| format!("hasil {i}")).collect();
        assert_eq!(bodies, expected);

        // every page starts with the header
        let mut after_break = true;
        for event in recorder.events() {
            match event {
                RecordedEvent::PageBreak => after_break = true,
                RecordedEvent::Row(row) if after_break => {
                    assert_eq!(row.kind, RowKind::Header);
                    assert_eq!(row.top, Pt(30.0));
                    after_break = false;
                }
                _ => {}
            }
        }
    }

    #[test]
    fn header_can_stay_on_the_first_page() {
        let config = config(300.0);
        let fonts = Fonts::helvetica();
        let grid = GridRenderer::new(&config, &fonts);
        let mut cursor = PageCursor::new(config.geometry.clone());
        let mut recorder = Recorder::default();

        let outcome = TableRenderer::new(&grid)
            .draw_table(
                Some(&header()),
                &rows(25),
                &mut cursor,
                &mut recorder,
                TableOptions {
                    repeat_header_on_break: false,
                },
            )
            .expect("drawn");

        assert_eq!(outcome.header_repeats, 0);
        assert_eq!(recorder.rows().filter(|row| row.kind == RowKind::Header).count(), 1);
    }

    #[test]
    fn header_moves_with_the_first_row() {
        let config = config(300.0);
        let fonts = Fonts::helvetica();
        let grid = GridRenderer::new(&config, &fonts);
        let mut cursor = PageCursor::new(config.geometry.clone());
        let mut recorder = Recorder::default();

        // leave 35pt: room for the header but not for the first row too
        cursor.advance(Pt(195.0));
        TableRenderer::new(&grid)
            .draw_table(Some(&header()), &rows(1), &mut cursor, &mut recorder, TableOptions::default())
            .expect("drawn");

        assert_eq!(recorder.events()[0], RecordedEvent::PageBreak);
        let header_row = recorder.rows().next().expect("header");
        assert_eq!(header_row.kind, RowKind::Header);
        assert_eq!(header_row.page_index, 1);
    }

    #[test]
    fn rows_that_need_a_whole_page_go_without_the_header() {
        let config = config(300.0);
        let fonts = Fonts::helvetica();
        let grid = GridRenderer::new(&config, &fonts);
        let mut cursor = PageCursor::new(config.geometry.clone());
        let mut recorder = Recorder::default();

        // 220pt fits the 230pt page, but not beneath the header
        let mut data = rows(2);
        data[1] = data[1].clone().with_min_height(Pt(220.0));
        let outcome = TableRenderer::new(&grid)
            .draw_table(Some(&header()), &data, &mut cursor, &mut recorder, TableOptions::default())
            .expect("drawn");

        assert_eq!(outcome.rows_drawn, 2);
        assert_eq!(outcome.page_breaks, 1);
        assert_eq!(outcome.header_repeats, 0);
        let tall = recorder.rows().last().expect("tall row");
        assert_eq!(tall.page_index, 1);
        assert_eq!(tall.top, Pt(30.0));
        assert!(tall.bottom() <= config.geometry.bottom_limit());
        assert!(cursor.take_warnings().is_empty());
    }

    #[test]
    fn empty_table_draws_only_the_header() {
        let config = LayoutConfig::default();
        let fonts = Fonts::helvetica();
        let grid = GridRenderer::new(&config, &fonts);
        let mut cursor = PageCursor::new(config.geometry.clone());
        let mut recorder = Recorder::default();

        let outcome = TableRenderer::new(&grid)
            .draw_table(Some(&header()), &[], &mut cursor, &mut recorder, TableOptions::default())
            .expect("drawn");
        assert_eq!(outcome.rows_drawn, 0);
        assert_eq!(recorder.rows().count(), 1);
    }
}
