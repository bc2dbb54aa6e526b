mod common;

use casefile_print::backend::{Backend, RecordedEvent, Recorder};
use casefile_print::layout::{CellSpec, PageCursor, RowSpec, TextMetrics, PLACEHOLDER};
use casefile_print::render::{GridRenderer, RowKind, RowStyle, TableOptions, TableRenderer};
use casefile_print::{
    DocumentAssembler, FontSpec, Fonts, LayoutConfig, LayoutWarning, Pt, Section,
};
use common::*;
use pretty_assertions::assert_eq;

fn record(config: &LayoutConfig, sections: &[Section]) -> (Recorder, casefile_print::LayoutSummary) {
    let mut recorder = Recorder::default();
    let summary = DocumentAssembler::new(config.clone())
        .layout(sections, &mut recorder)
        .expect("laid out");
    (recorder, summary)
}

#[test]
fn narrative_height_matches_its_wrapped_lines() {
    let config = LayoutConfig::default();
    let text: String = lipsum::lipsum(100).chars().take(300).collect();
    assert_eq!(text.chars().count(), 300);

    let sections = vec![
        Section::narrative(Some(text.clone()), WIDTH).titled("KRONOLOGI"),
        Section::narrative(Some("berikutnya"), WIDTH),
    ];
    let (recorder, _) = record(&config, &sections);

    let fonts = Fonts::helvetica();
    let metrics = TextMetrics::new(&fonts, config.line_gap);
    let font = FontSpec::regular(config.font_size);
    let clean = metrics.sanitize(Some(&text), font);
    let measure = metrics.measure(&clean, WIDTH - config.cell_padding.horizontal * 2.0, font);
    assert!(measure.line_count > 1);
    assert_eq!(measure.height, metrics.line_pitch(font) * measure.line_count as f32);

    let rows: Vec<_> = recorder.rows().collect();
    assert_eq!(rows.len(), 3);
    let narrative = rows[1];
    let expected = (measure.height + config.cell_padding.vertical()).max(config.narrative_min_height);
    assert_eq!(narrative.height, expected);
    assert_eq!(narrative.cells[0].lines.len(), measure.line_count);
    assert_eq!(
        narrative.cells[0].text.as_ref().map(|t| t.as_str()),
        Some(clean.as_str())
    );

    // the title sits directly on top, the next section one gap below
    assert_eq!(narrative.top, rows[0].bottom());
    assert_eq!(rows[2].top, narrative.bottom() + config.section_gap);
}

#[test]
fn table_breaks_before_the_row_that_does_not_fit() {
    let config = LayoutConfig::default();
    let fonts = Fonts::helvetica();
    let grid = GridRenderer::new(&config, &fonts);
    let mut cursor = PageCursor::new(config.geometry.clone());
    let mut recorder = Recorder::default();

    let header = RowSpec::new(vec![CellSpec::new("No", Pt(45.0)), CellSpec::new("Hasil", Pt(500.0))]);
    let rows: Vec<RowSpec> = (1..=5)
        .map(|i| {
            RowSpec::new(vec![
                CellSpec::new(i.to_string(), Pt(45.0)),
                CellSpec::new(format!("baris {i}"), Pt(500.0)),
            ])
            .with_min_height(Pt(60.0))
        })
        .collect();

    // leave exactly 200pt below the header
    let header_height = grid.measure(&header, &RowStyle::header(&config)).height;
    cursor.advance(cursor.remaining() - Pt(200.0) - header_height);

    let outcome = TableRenderer::new(&grid)
        .draw_table(Some(&header), &rows, &mut cursor, &mut recorder, TableOptions::default())
        .expect("drawn");
    assert_eq!(outcome.rows_drawn, 5);
    assert_eq!(outcome.page_breaks, 1);
    assert_eq!(outcome.header_repeats, 1);

    let describe = |page: usize| -> Vec<String> {
        recorder
            .rows_on_page(page)
            .map(|row| match row.kind {
                RowKind::Header => "header".to_string(),
                _ => row.cells[0].text.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            })
            .collect()
    };
    assert_eq!(describe(0), vec!["header", "1", "2", "3"]);
    assert_eq!(describe(1), vec!["header", "4", "5"]);

    let break_at = recorder
        .events()
        .iter()
        .position(|event| event == &RecordedEvent::PageBreak)
        .expect("a page break");
    match &recorder.events()[break_at + 1] {
        RecordedEvent::Row(row) => {
            assert_eq!(row.kind, RowKind::Header);
            assert_eq!(row.top, config.geometry.margins.top);
        }
        other => panic!("expected the repeated header, got {other:?}"),
    }
}

#[test]
fn missing_text_draws_a_single_placeholder_line() {
    let config = LayoutConfig::default();
    let fonts = Fonts::helvetica();
    let grid = GridRenderer::new(&config, &fonts);
    let mut cursor = PageCursor::new(config.geometry.clone());
    let mut recorder = Recorder::default();

    let row = RowSpec::new(vec![CellSpec::maybe(None::<String>, WIDTH)]);
    let measured = grid.measure(&row, &RowStyle::body(&config));
    let metrics = grid.layout().metrics();
    let font = FontSpec::regular(config.font_size);
    assert_eq!(measured.cells[0].measure.line_count, 1);
    assert_eq!(measured.cells[0].measure.height, metrics.line_pitch(font));

    grid.draw_row(&row, &RowStyle::body(&config), &mut cursor, &mut recorder)
        .expect("drawn");
    let placed = recorder.rows().next().expect("a row");
    assert_eq!(placed.cells[0].text.as_ref().map(|t| t.as_str()), Some(PLACEHOLDER));
    assert_eq!(placed.cells[0].lines.len(), 1);
    assert_eq!(placed.cells[0].lines[0].text, "-");
    assert_eq!(placed.height, (metrics.line_pitch(font) + config.cell_padding.vertical()).max(config.min_row_height));
}

#[test]
fn report_grid_rows_span_the_section_width() {
    let config = LayoutConfig::default();
    let case = case_record(3, 40);
    let sections = investigation_report(&case);

    let grid = sections
        .iter()
        .find(|section| section.title.as_deref() == Some("INFORMASI DATA POLIS"))
        .expect("policy grid");
    assert_eq!(grid.rows.len(), 3);
    for row in &grid.rows {
        assert_eq!(row.total_width(), Pt(545.0));
    }

    // a six-row grid of the same shape
    let six: Vec<RowSpec> = (0..6)
        .map(|i| {
            info_row(
                ("1", "label", Some(format!("value {i}"))),
                ("2", "label", None),
            )
        })
        .collect();
    let section = Section::grid(six);
    assert!(section.check_widths(0, WIDTH, config.width_tolerance).is_empty());

    for (index, section) in sections.iter().enumerate() {
        assert_eq!(section.check_widths(index, WIDTH, config.width_tolerance), vec![]);
    }
    let (_, summary) = record(&config, &sections);
    assert!(summary
        .warnings
        .iter()
        .all(|w| !matches!(w, LayoutWarning::WidthMismatch(_))));
}

#[test]
fn mismatched_widths_are_reported_but_still_drawn() {
    let config = LayoutConfig::default();
    let sections = vec![Section::grid(vec![RowSpec::new(vec![
        CellSpec::new("a", Pt(100.0)),
        CellSpec::new("b", Pt(100.0)),
    ])])];
    let (recorder, summary) = record(&config, &sections);
    assert_eq!(recorder.rows().count(), 1);
    assert_eq!(summary.warnings.len(), 1);
    assert!(matches!(summary.warnings[0], LayoutWarning::WidthMismatch(_)));
}

#[test]
fn signature_space_is_fixed_whatever_the_content() {
    for height in [80.0, 120.0] {
        let config = LayoutConfig {
            signature_height: Pt(height),
            ..LayoutConfig::default()
        };
        let labels = RowSpec::new(vec![
            CellSpec::new(lipsum::lipsum(40), Pt(180.0)),
            CellSpec::new("Team Leader", Pt(180.0)),
            CellSpec::new("MA", Pt(185.0)),
        ]);
        let names = vec![RowSpec::new(vec![
            CellSpec::new("dr. A", Pt(180.0)),
            CellSpec::new("B", Pt(180.0)),
            CellSpec::new("C", Pt(185.0)),
        ])];
        let sections = vec![Section::signature_block(labels, names).titled("PERSETUJUAN")];
        let (recorder, _) = record(&config, &sections);

        let kinds: Vec<RowKind> = recorder.rows().map(|row| row.kind).collect();
        assert_eq!(kinds, vec![RowKind::Title, RowKind::Body, RowKind::Signature, RowKind::Body]);
        let space = recorder
            .rows()
            .find(|row| row.kind == RowKind::Signature)
            .expect("signature space");
        assert_eq!(space.height, Pt(height));
        assert!(space.cells.iter().all(|cell| cell.text.is_none()));
    }
}

#[test]
fn unlabelled_signature_rows_are_all_signing_space() {
    let config = LayoutConfig::default();
    let section: Section = serde_json::from_str(
        r#"{
            "kind": "signature_block",
            "rows": [
                { "cells": [ { "text": "", "width": 180 }, { "text": "", "width": 180 }, { "text": "", "width": 185 } ] },
                { "cells": [ { "text": "dr. A", "width": 180 }, { "width": 180 }, { "width": 185 } ] }
            ]
        }"#,
    )
    .expect("valid section");
    let (recorder, summary) = record(&config, &[section]);

    let rows: Vec<_> = recorder.rows().collect();
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.kind, RowKind::Signature);
        assert_eq!(row.height, config.signature_height);
        assert!(row.cells.iter().all(|cell| cell.text.is_none() && cell.lines.is_empty()));
    }
    assert_eq!(rows[1].top, rows[0].bottom());
    assert!(summary.warnings.is_empty());
}

#[test]
fn signature_block_moves_to_a_new_page_as_a_whole() {
    let config = LayoutConfig::default();
    let filler: Vec<RowSpec> = (0..31)
        .map(|i| RowSpec::new(vec![CellSpec::new(format!("baris {i}"), WIDTH)]))
        .collect();
    let sections = vec![
        Section::grid(filler),
        Section::signature_block(signature_labels(), Vec::new()).titled("PERSETUJUAN"),
    ];
    let (recorder, summary) = record(&config, &sections);

    assert_eq!(summary.page_count, 2);
    let page_two: Vec<RowKind> = recorder.rows_on_page(1).map(|row| row.kind).collect();
    assert_eq!(page_two, vec![RowKind::Title, RowKind::Body, RowKind::Signature]);
}

#[test]
fn rows_are_never_split_across_pages() {
    let config = LayoutConfig::default();
    let case = case_record(40, 400);
    let (recorder, summary) = record(&config, &investigation_report(&case));
    assert!(summary.page_count > 2);

    let bottom = config.geometry.bottom_limit();
    let top = config.geometry.margins.top;
    let mut previous_bottom: Option<(usize, Pt)> = None;
    for row in recorder.rows() {
        assert!(
            row.bottom() <= bottom || row.top == top,
            "row at {} with height {} crosses the bottom margin",
            row.top,
            row.height
        );
        if let Some((page, end)) = previous_bottom {
            if page == row.page_index {
                assert!(row.top >= end, "rows overlap on page {page}");
            }
        }
        previous_bottom = Some((row.page_index, row.bottom()));
    }
    assert_eq!(recorder.page_breaks() + 1, summary.page_count);
}

#[test]
fn rows_that_fit_a_page_never_run_past_its_margin() {
    let config = LayoutConfig::default();
    let usable = config.geometry.usable_height();
    let tall = RowSpec::new(vec![CellSpec::new("lampiran", WIDTH)]).with_min_height(usable - Pt(5.0));
    let sections = vec![
        Section::grid(vec![RowSpec::new(vec![CellSpec::new("pembuka", WIDTH)])]),
        Section::grid(vec![tall]).titled("LAMPIRAN"),
    ];
    let (recorder, summary) = record(&config, &sections);

    let bottom = config.geometry.bottom_limit();
    let top = config.geometry.margins.top;
    for row in recorder.rows() {
        assert!(row.bottom() <= bottom || row.top == top);
    }
    let tall = recorder
        .rows()
        .find(|row| row.height == usable - Pt(5.0))
        .expect("tall row");
    assert_eq!(tall.top, top);
    assert!(tall.bottom() <= bottom);
    assert!(summary.warnings.is_empty(), "{:?}", summary.warnings);
}

#[test]
fn table_rows_are_conserved_in_order() {
    let config = LayoutConfig::default();
    let case = case_record(60, 20);
    let (recorder, _) = record(&config, &investigation_report(&case));

    let drawn: Vec<String> = recorder
        .rows()
        .filter(|row| row.kind == RowKind::Body && row.cells.len() == 7)
        .map(|row| row.cells[2].text.as_ref().map(|t| t.to_string()).unwrap_or_default())
        .collect();
    let expected: Vec<String> = (0..60).map(|i| format!("Petugas {i}")).collect();
    assert_eq!(drawn, expected);

    let headers = recorder
        .rows()
        .filter(|row| row.kind == RowKind::Header && row.cells.len() == 7)
        .count();
    assert!(headers > 1, "the log header repeats on continuation pages");
}

#[test]
fn titles_stay_with_their_content() {
    let config = LayoutConfig::default();
    let case = case_record(60, 120);
    let (recorder, _) = record(&config, &investigation_report(&case));

    let rows: Vec<_> = recorder.rows().collect();
    for (i, row) in rows.iter().enumerate() {
        if row.kind == RowKind::Title {
            let next = rows.get(i + 1).expect("titles are followed by content");
            assert_eq!(next.page_index, row.page_index, "title {i} left alone");
        }
    }
}

#[test]
fn oversized_rows_are_flagged_not_dropped() {
    let config = LayoutConfig::default();
    let sections = vec![
        Section::narrative(Some("pembuka"), WIDTH),
        Section::narrative(Some(lipsum::lipsum(3000)), WIDTH).titled("ANALISA"),
        Section::narrative(Some("penutup"), WIDTH),
    ];
    let (recorder, summary) = record(&config, &sections);

    let overflow = summary
        .warnings
        .iter()
        .find_map(|warning| match warning {
            LayoutWarning::Overflow { page_index, height, available } => Some((*page_index, *height, *available)),
            _ => None,
        })
        .expect("an overflow warning");
    assert_eq!(overflow.0, 1);
    assert!(overflow.1 > config.geometry.usable_height());

    // the long block starts on a fresh page, the next section gets its own
    let long = recorder
        .rows()
        .find(|row| row.height > config.geometry.usable_height())
        .expect("long row");
    assert_eq!(long.page_index, 1);
    assert_eq!(recorder.rows().count(), 4);
    assert_eq!(recorder.rows().last().map(|row| row.page_index), Some(2));
}

#[test]
fn layout_is_deterministic() {
    let config = LayoutConfig::default();
    let case = case_record(12, 150);
    let sections = investigation_report(&case);
    let (a, _) = record(&config, &sections);
    let (b, _) = record(&config, &sections);
    assert_eq!(a.events(), b.events());

    let mut a = a;
    let listing = String::from_utf8(a.finish().expect("finished")).expect("utf-8");
    assert!(listing.starts_with("page 1\n"));
    assert!(listing.contains("FORMULIR INVESTIGASI BRI LIFE"));
}
