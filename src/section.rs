use crate::colour::Colour;
use crate::error::LayoutError;
use crate::layout::{CellSpec, RowSpec};
use crate::units::Pt;
use serde::Deserialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// The full-width banner at the top of a document, naming the form
    Banner,
    /// Label/value rows
    Grid,
    /// Free text, one full-width cell per row
    Narrative,
    /// A column header followed by any number of data rows
    Table,
    /// Labelled boxes left blank for signing
    SignatureBlock,
}

/// A titled, self-contained block of a report, already bound to its values.
///
/// Sections are built by the caller and consumed once by
/// [DocumentAssembler](crate::DocumentAssembler), in order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    /// Drawn as a coloured bar above the section (or as the banner itself)
    #[serde(default)]
    pub title: Option<String>,
    /// Replaces the configured title fill
    #[serde(default)]
    pub accent: Option<Colour>,
    /// Column header for tables and grids; the labels of a signature block.
    /// A signature block without labels reserves signing space for every row.
    #[serde(default)]
    pub header: Option<RowSpec>,
    #[serde(default)]
    pub rows: Vec<RowSpec>,
    /// Overrides the configured header repetition for this table
    #[serde(default)]
    pub repeat_header: Option<bool>,
}

impl Section {
    fn new(kind: SectionKind) -> Section {
        Section {
            kind,
            title: None,
            accent: None,
            header: None,
            rows: Vec::new(),
            repeat_header: None,
        }
    }

    pub fn banner<S: Into<String>>(title: S) -> Section {
        Section::new(SectionKind::Banner).titled(title)
    }

    pub fn grid(rows: Vec<RowSpec>) -> Section {
        Section {
            rows,
            ..Section::new(SectionKind::Grid)
        }
    }

    /// A single block of free text spanning `width`
    pub fn narrative<S: Into<String>>(text: Option<S>, width: Pt) -> Section {
        Section {
            rows: vec![RowSpec::new(vec![CellSpec::maybe(text, width)])],
            ..Section::new(SectionKind::Narrative)
        }
    }

    pub fn table(header: RowSpec, rows: Vec<RowSpec>) -> Section {
        Section {
            header: Some(header),
            rows,
            ..Section::new(SectionKind::Table)
        }
    }

    /// `labels` name who signs each box; `names` are drawn below the boxes
    pub fn signature_block(labels: RowSpec, names: Vec<RowSpec>) -> Section {
        Section {
            header: Some(labels),
            rows: names,
            ..Section::new(SectionKind::SignatureBlock)
        }
    }

    pub fn titled<S: Into<String>>(mut self, title: S) -> Section {
        self.title = Some(title.into());
        self
    }

    pub fn with_accent(mut self, accent: Colour) -> Section {
        self.accent = Some(accent);
        self
    }

    pub fn with_header(mut self, header: RowSpec) -> Section {
        self.header = Some(header);
        self
    }

    pub fn repeat_header(mut self, repeat: bool) -> Section {
        self.repeat_header = Some(repeat);
        self
    }

    /// Every row (header first) whose cell widths don't add up to `expected`.
    /// `index` is this section's position in the document, for reporting.
    pub fn check_widths(&self, index: usize, expected: Pt, tolerance: Pt) -> Vec<LayoutError> {
        self.header
            .iter()
            .chain(self.rows.iter())
            .enumerate()
            .filter(|(_, row)| !row.spans(expected, tolerance))
            .map(|(row, spec)| LayoutError::WidthMismatch {
                section: index,
                row,
                expected,
                actual: spec.total_width(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_rows_of_the_wrong_width() {
        let good = RowSpec::new(vec![CellSpec::new("a", Pt(300.0)), CellSpec::new("b", Pt(245.0))]);
        let bad = RowSpec::new(vec![CellSpec::new("a", Pt(300.0)), CellSpec::new("b", Pt(200.0))]);
        let section = Section::table(good.clone(), vec![good, bad]);
        assert_eq!(
            section.check_widths(3, Pt(545.0), Pt(0.5)),
            vec![LayoutError::WidthMismatch {
                section: 3,
                row: 2,
                expected: Pt(545.0),
                actual: Pt(500.0),
            }]
        );
    }

    #[test]
    fn deserializes_from_json() {
        let section: Section = serde_json::from_str(
            r##"{
                "kind": "signature_block",
                "title": "PERSETUJUAN HASIL INVESTIGASI",
                "accent": "#E7E6E6",
                "header": { "cells": [ { "text": "MA", "width": 545, "bold": true } ] }
            }"##,
        )
        .expect("valid section");
        assert_eq!(section.kind, SectionKind::SignatureBlock);
        assert!(section.rows.is_empty());
        assert_eq!(section.header.map(|h| h.cells.len()), Some(1));
    }

    #[test]
    fn narrative_is_one_full_width_cell() {
        let section = Section::narrative(None::<String>, Pt(545.0)).titled("ANALISA MA");
        assert_eq!(section.rows.len(), 1);
        assert_eq!(section.rows[0].cells[0].text, None);
        assert!(section.check_widths(0, Pt(545.0), Pt(0.5)).is_empty());
    }
}
