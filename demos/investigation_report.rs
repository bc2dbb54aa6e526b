use casefile_print::layout::{Align, CellSpec, RowSpec};
use casefile_print::{
    CaseIdentity, DocumentAssembler, Info, LayoutConfig, OutputFormat, Pt, Record, Section,
};

const WIDTH: Pt = Pt(545.0);

fn info_row(w: &[Pt], left: (&str, &str, Option<String>), right: (&str, &str, Option<String>)) -> RowSpec {
    RowSpec::new(vec![
        CellSpec::new(left.0, w[0]).centered(),
        CellSpec::new(left.1, w[1]),
        CellSpec::maybe(left.2, w[2]),
        CellSpec::new(right.0, w[3]).centered(),
        CellSpec::new(right.1, w[4]),
        CellSpec::maybe(right.2, w[5]),
    ])
}

fn report(case: &Record) -> Vec<Section> {
    let info = [20.0, 140.0, 92.0, 20.0, 150.0, 123.0].map(Pt);
    let log = [90.0, 45.0, 65.0, 65.0, 75.0, 95.0, 110.0].map(Pt);

    let log_header = RowSpec::new(
        ["Tanggal / Jam", "Activity", "Petugas", "No Kontak", "Faskes", "Alamat Faskes", "Hasil"]
            .iter()
            .zip(log)
            .map(|(label, width)| CellSpec::new(*label, width))
            .collect(),
    );
    let log_rows = case
        .rows("hasil_on_desk")
        .iter()
        .map(|entry| {
            let when = format!(
                "{}\nJam {}",
                entry.date_long("tanggal_investigasi"),
                entry.text("jam_telepon").unwrap_or_default()
            );
            let mut cells = vec![CellSpec::new(when, log[0]).align(Align::Center)];
            let fields = ["activity", "nama_petugas", "no_kontak", "nama_faskes", "alamat_faskes", "hasil_investigasi"];
            cells.extend(fields.iter().zip(&log[1..]).map(|(key, width)| CellSpec::maybe(entry.text(key), *width)));
            RowSpec::new(cells)
        })
        .collect();

    let signature_widths = [180.0, 180.0, 185.0].map(Pt);
    let labels = RowSpec::from_values(
        &signature_widths,
        vec![Some("Departement Head"), Some("Team Leader"), Some("MA")],
    );
    let names = RowSpec::from_values(
        &signature_widths,
        vec![
            case.text("nama_dept_head"),
            case.text("nama_team_leader"),
            case.text("nama_ma"),
        ],
    );

    let mut sections = vec![
        Section::banner("FORMULIR INVESTIGASI BRI LIFE"),
        Section::grid(vec![
            info_row(
                &info,
                ("1", "Pemegang Polis", case.text("nama_pemegang_polis")),
                ("5", "No Polis", case.text("no_polis")),
            ),
            info_row(
                &info,
                ("2", "Tertanggung", case.text("nama_tertanggung")),
                ("6", "Jenis Klaim", case.text("jenis_klaim")),
            ),
            info_row(
                &info,
                ("3", "Mulai Asuransi", Some(case.date_short("tgl_mulai_asuransi"))),
                ("7", "Jenis Produk", case.text("jenis_produk")),
            ),
            info_row(
                &info,
                ("4", "Tgl Meninggal", Some(case.date_short("tanggal_meninggal"))),
                ("8", "Uang Pertanggungan", case.text("uang_pertanggungan")),
            ),
        ])
        .titled("INFORMASI DATA POLIS"),
        Section::narrative(case.text("kronologis"), WIDTH)
            .titled("CATATAN INFORMASI DATA POLIS")
            .with_header(RowSpec::new(vec![CellSpec::new("Diagnosa / Kronologis Kematian", WIDTH)])),
        Section::table(log_header, log_rows).titled("HASIL KONFIRMASI / INVESTIGASI"),
    ];
    for (title, key) in [
        ("ANALISA INVESTIGATOR INDEPENDENT", "hasil"),
        ("ANALISA MA", "analisa_ma"),
        ("KEPUTUSAN TEAM LEADER", "analisa_putusan"),
    ] {
        sections.push(Section::narrative(case.text(key), WIDTH).titled(title));
    }
    sections.push(Section::signature_block(labels, vec![names]).titled("PERSETUJUAN HASIL INVESTIGASI"));
    sections
}

fn main() {
    let case = Record::from_json(include_str!("case.json")).expect("can parse the case");
    let sections = report(&case);

    let mut info = Info::new();
    info.title("Formulir Investigasi").author("Divisi Klaim");
    let assembler = DocumentAssembler::new(LayoutConfig::default()).with_info(info);
    let identity = CaseIdentity::new(case.text("nama_tertanggung"), case.text("id").unwrap_or_default());

    for format in [OutputFormat::Pdf, OutputFormat::Word] {
        let document = assembler
            .render_format(&identity, &sections, format)
            .expect("can render the report");
        for warning in &document.warnings {
            eprintln!("warning: {warning}");
        }
        let out = std::fs::File::create(&document.filename).expect("can create the output file");
        document.write_to(out).expect("can write the report");
        println!("wrote {} ({} page(s))", document.filename, document.page_count);
    }
}
