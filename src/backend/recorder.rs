use super::Backend;
use crate::error::RenderError;
use crate::render::PlacedRow;
use crate::units::Pt;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedEvent {
    Row(PlacedRow),
    Gap(Pt),
    PageBreak,
}

/// Keeps everything it is asked to draw in memory. Useful for checking a
/// layout without producing a file; [Backend::finish] returns a plain-text
/// listing of the pages and rows.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    events: Vec<RecordedEvent>,
}

impl Recorder {
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    pub fn rows(&self) -> impl Iterator<Item = &PlacedRow> {
        self.events.iter().filter_map(|event| match event {
            RecordedEvent::Row(row) => Some(row),
            _ => None,
        })
    }

    pub fn page_breaks(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, RecordedEvent::PageBreak))
            .count()
    }

    /// The rows drawn on the page with the given 0-based index
    pub fn rows_on_page(&self, page_index: usize) -> impl Iterator<Item = &PlacedRow> {
        self.rows().filter(move |row| row.page_index == page_index)
    }

    fn listing(&self) -> String {
        let mut out = String::new();
        let mut page = 1;
        let _ = writeln!(out, "page {page}");
        for event in &self.events {
            let _ = match event {
                RecordedEvent::Row(row) => {
                    let texts: Vec<&str> = row
                        .cells
                        .iter()
                        .map(|cell| cell.text.as_ref().map_or("", |text| text.as_str()))
                        .collect();
                    writeln!(
                        out,
                        "  {:?} y={:.2} h={:.2} | {}",
                        row.kind,
                        row.top.0,
                        row.height.0,
                        texts.join(" | ").replace('\n', "\\n")
                    )
                }
                RecordedEvent::Gap(height) => writeln!(out, "  gap {:.2}", height.0),
                RecordedEvent::PageBreak => {
                    page += 1;
                    writeln!(out, "page {page}")
                }
            };
        }
        out
    }
}

impl Backend for Recorder {
    fn draw_row(&mut self, row: &PlacedRow) -> Result<(), RenderError> {
        self.events.push(RecordedEvent::Row(row.clone()));
        Ok(())
    }

    fn gap(&mut self, height: Pt) -> Result<(), RenderError> {
        self.events.push(RecordedEvent::Gap(height));
        Ok(())
    }

    fn page_break(&mut self) -> Result<(), RenderError> {
        self.events.push(RecordedEvent::PageBreak);
        Ok(())
    }

    fn finish(&mut self) -> Result<Vec<u8>, RenderError> {
        Ok(self.listing().into_bytes())
    }

    fn content_type(&self) -> &'static str {
        "text/plain"
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}
