#![allow(dead_code)]

use casefile_print::layout::{Align, CellSpec, RowSpec};
use casefile_print::{Pt, Record, Section};
use std::io::{Cursor, Read};

pub const WIDTH: Pt = Pt(545.0);
pub const INFO_WIDTHS: [f32; 6] = [20.0, 140.0, 92.0, 20.0, 150.0, 123.0];
pub const LOG_WIDTHS: [f32; 7] = [90.0, 45.0, 65.0, 65.0, 75.0, 95.0, 110.0];

pub fn widths<const N: usize>(values: [f32; N]) -> Vec<Pt> {
    values.into_iter().map(Pt).collect()
}

/// A numbered label/value pair on each side of the row
pub fn info_row(left: (&str, &str, Option<String>), right: (&str, &str, Option<String>)) -> RowSpec {
    let w = widths(INFO_WIDTHS);
    RowSpec::new(vec![
        CellSpec::new(left.0, w[0]).centered(),
        CellSpec::new(left.1, w[1]),
        CellSpec::maybe(left.2, w[2]),
        CellSpec::new(right.0, w[3]).centered(),
        CellSpec::new(right.1, w[4]),
        CellSpec::maybe(right.2, w[5]),
    ])
}

pub fn log_header() -> RowSpec {
    let labels = ["Tanggal / Jam", "Activity", "Petugas", "No Kontak", "Faskes", "Alamat Faskes", "Hasil"];
    RowSpec::new(
        labels
            .iter()
            .zip(widths(LOG_WIDTHS))
            .map(|(label, width)| CellSpec::new(*label, width))
            .collect(),
    )
}

pub fn log_row(entry: &Record) -> RowSpec {
    let w = widths(LOG_WIDTHS);
    let when = format!(
        "{}\nJam {}",
        entry.date_long("tanggal_investigasi"),
        entry.text("jam_telepon").unwrap_or_else(|| "--:--".to_string())
    );
    RowSpec::new(vec![
        CellSpec::new(when, w[0]).align(Align::Center),
        CellSpec::maybe(entry.text("activity"), w[1]),
        CellSpec::maybe(entry.text("nama_petugas"), w[2]),
        CellSpec::maybe(entry.text("no_kontak"), w[3]),
        CellSpec::maybe(entry.text("nama_faskes"), w[4]),
        CellSpec::maybe(entry.text("alamat_faskes"), w[5]),
        CellSpec::maybe(entry.text("hasil_investigasi"), w[6]),
    ])
}

pub fn signature_labels() -> RowSpec {
    RowSpec::new(vec![
        CellSpec::new("Departement Head", Pt(180.0)),
        CellSpec::new("Team Leader", Pt(180.0)),
        CellSpec::new("MA", Pt(185.0)),
    ])
}

/// The full investigation form, built from a case record
pub fn investigation_report(case: &Record) -> Vec<Section> {
    let mut sections = vec![
        Section::banner("FORMULIR INVESTIGASI BRI LIFE"),
        Section::grid(vec![
            info_row(
                ("1", "Pemegang Polis", case.text("nama_pemegang_polis")),
                ("4", "Jenis Klaim", case.text("jenis_klaim")),
            ),
            info_row(
                ("2", "Tertanggung", case.text("nama_tertanggung")),
                ("5", "Jenis Produk", case.text("jenis_produk")),
            ),
            info_row(
                ("3", "Mulai Asuransi", Some(case.date_short("tgl_mulai_asuransi"))),
                ("6", "Tgl Meninggal", Some(case.date_short("tanggal_meninggal"))),
            ),
        ])
        .titled("INFORMASI DATA POLIS"),
        Section::narrative(case.text("kronologis"), WIDTH)
            .titled("CATATAN INFORMASI DATA POLIS")
            .with_header(RowSpec::new(vec![CellSpec::new("Diagnosa / Kronologis Kematian", WIDTH)])),
        Section::table(
            log_header(),
            case.rows("hasil_on_desk").iter().map(log_row).collect(),
        )
        .titled("HASIL KONFIRMASI / INVESTIGASI"),
    ];

    for (title, key) in [
        ("ANALISA INVESTIGATOR INDEPENDENT", "hasil"),
        ("ANALISA MA", "analisa_ma"),
        ("KEPUTUSAN TEAM LEADER", "analisa_putusan"),
    ] {
        sections.push(Section::narrative(case.text(key), WIDTH).titled(title));
    }

    sections.push(
        Section::signature_block(signature_labels(), Vec::new()).titled("PERSETUJUAN HASIL INVESTIGASI"),
    );
    sections
}

/// A case with `entries` on-desk log entries and narratives of `words` words
pub fn case_record(entries: usize, words: usize) -> Record {
    let desk: Vec<String> = (0..entries)
        .map(|i| {
            format!(
                r#"{{
                    "tanggal_investigasi": "2024-03-{day:02}",
                    "jam_telepon": "10:{minute:02}",
                    "activity": "Telepon",
                    "nama_petugas": "Petugas {i}",
                    "no_kontak": "08123456789{i}",
                    "nama_faskes": "RSUD Kota",
                    "alamat_faskes": "Jl. Merdeka No. {i}",
                    "hasil_investigasi": "{result}"
                }}"#,
                day = i % 28 + 1,
                minute = i % 60,
                result = lipsum::lipsum(8 + (i * 7) % 40),
            )
        })
        .collect();

    let json = format!(
        r#"{{
            "nama_pemegang_polis": "PT Sejahtera Abadi",
            "nama_tertanggung": "Budi Santoso",
            "jenis_klaim": "Meninggal Dunia",
            "jenis_produk": null,
            "tgl_mulai_asuransi": "2021-06-01",
            "tanggal_meninggal": "0000-00-00",
            "kronologis": "{kronologis}",
            "hasil": "{hasil}",
            "analisa_ma": null,
            "analisa_putusan": "Klaim dibayarkan.",
            "hasil_on_desk": [{desk}]
        }}"#,
        kronologis = lipsum::lipsum(words),
        hasil = lipsum::lipsum(words / 2 + 1),
        desk = desk.join(","),
    );
    Record::from_json(&json).expect("valid case record")
}

/// Read one part of a `.docx` package as text
pub fn docx_part(package: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(package)).expect("a zip package");
    let mut part = archive.by_name(name).expect("part present");
    let mut xml = String::new();
    part.read_to_string(&mut xml).expect("utf-8");
    xml
}
