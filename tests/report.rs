// tests/report.rs

use calamine::{Data, Reader, open_workbook_auto};
use std::fs;
use tabla::core::report::{self, ReportError};
use tabla::core::xlsx_export::{self, ExportOptions, SheetSelector};
use tabla::models::ReportSpec;

const FIRST_SHEET: &str = "إحصائيات الذكاء الاصطناعي";
const SECOND_SHEET: &str = "تحليل الأداء";

#[test]
fn writes_builtin_report() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("AI_telecom.xlsx");

    let spec = report::builtin_report("ai_telecom").unwrap();
    let summary = report::write_report(&spec, &output).unwrap();
    assert_eq!(
        (summary.sheets, summary.rows, summary.charts),
        (2, 20, 2)
    );

    let mut workbook = open_workbook_auto(&output).unwrap();
    assert_eq!(workbook.sheet_names(), vec![FIRST_SHEET, SECOND_SHEET]);

    let range = workbook.worksheet_range(FIRST_SHEET).unwrap();
    assert_eq!(range.get_size(), (11, 6));
    let header = range.rows().next().unwrap();
    assert_eq!(header[0], Data::String("رقم الشركة".to_string()));
    assert_eq!(header[4], Data::String("نسبة الزيادة في العملاء".to_string()));

    let first = range.rows().nth(1).unwrap();
    assert_eq!(first[1], Data::String("STC".to_string()));
    assert_eq!(first[2], Data::Float(20_000_000.0));
}

#[test]
fn formulas_reference_their_own_row() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("AI_telecom.xlsx");
    report::write_report(&report::builtin_report("ai_telecom").unwrap(), &output).unwrap();

    let mut workbook = open_workbook_auto(&output).unwrap();

    let growth: Vec<String> = workbook
        .worksheet_formula(FIRST_SHEET)
        .unwrap()
        .used_cells()
        .map(|(_, _, f)| f.clone())
        .collect();
    assert_eq!(growth.len(), 10);
    assert!(growth.contains(&"((D2-C2)/C2)*100".to_string()));
    assert!(growth.contains(&"((D11-C11)/C11)*100".to_string()));

    let roi: Vec<String> = workbook
        .worksheet_formula(SECOND_SHEET)
        .unwrap()
        .used_cells()
        .map(|(_, _, f)| f.clone())
        .collect();
    assert!(roi.contains(&"IF(C2=0, 0, (D2/C2)*100)".to_string()));
}

#[test]
fn dates_round_trip_through_csv_export() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("AI_telecom.xlsx");
    report::write_report(&report::builtin_report("ai_telecom").unwrap(), &output).unwrap();

    let rows = xlsx_export::read_sheet(&output, &SheetSelector::First).unwrap();
    assert_eq!(rows[1][5], "2023-01-15");
    assert_eq!(rows[10][5], "2023-05-15");
    assert_eq!(rows[10][1], "Virgin Mobile - فرع الدمام");

    let options = ExportOptions {
        sheet: SheetSelector::Named(SECOND_SHEET.to_string()),
        range: None,
    };
    let mut csv = Vec::new();
    xlsx_export::export_to_csv(&output, &mut csv, &options).unwrap();
    let csv = String::from_utf8(csv).unwrap();
    assert!(csv.contains("STC - فرع الغرب,45,6.5,"));
}

#[test]
fn custom_report_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("ventas.toml");
    fs::write(
        &data,
        r#"
title = "Ventas"

[[sheets]]
name = "Ventas"
rows = [
    ["Norte", 120, 100],
    ["Sur", 80, 0],
]

[[sheets.columns]]
header = "Región"
kind = "text"
width = 20

[[sheets.columns]]
header = "Ingresos"
kind = "number"

[[sheets.columns]]
header = "Coste"
kind = "number"

[[sheets.columns]]
header = "Margen"
kind = "formula"
formula = "=IF(C{row}=0, 0, B{row}-C{row})"

[sheets.chart]
kind = "bar"
title = "Margen por región"
categories_column = "A"
values_column = "D"
"#,
    )
    .unwrap();

    let spec = report::load_report_spec(&data).unwrap();
    let output = dir.path().join("ventas.xlsx");
    let summary = report::write_report(&spec, &output).unwrap();
    assert_eq!((summary.sheets, summary.rows, summary.charts), (1, 2, 1));

    let rows = xlsx_export::read_sheet(&output, &SheetSelector::First).unwrap();
    assert_eq!(rows[0], vec!["Región", "Ingresos", "Coste", "Margen"]);
    assert_eq!(rows[2][0], "Sur");
}

#[test]
fn invalid_report_is_not_written() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("roto.xlsx");
    let spec = ReportSpec::from_toml(
        r#"
[[sheets]]
name = "A"
rows = [[1, 2]]
[[sheets.columns]]
header = "x"
kind = "integer"
"#,
        "test",
    )
    .unwrap();

    let err = report::write_report(&spec, &output).unwrap_err();
    assert!(matches!(
        err,
        ReportError::RowWidth {
            expected: 1,
            found: 2,
            ..
        }
    ));
    assert!(!output.exists());
}

#[test]
fn malformed_data_file_reports_toml_error() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("mal.toml");
    fs::write(&data, "[[sheets]\nname = ").unwrap();
    assert!(matches!(
        report::load_report_spec(&data),
        Err(ReportError::TomlParse { .. })
    ));
}

#[test]
fn cli_writes_default_report_and_lists_templates() {
    let dir = tempfile::tempdir().unwrap();
    let run = |args: &[&str]| {
        std::process::Command::new(env!("CARGO_BIN_EXE_tabla"))
            .args(args)
            .current_dir(dir.path())
            .env("TABLA_CONFIG", dir.path().join("no-existe.toml"))
            .output()
            .unwrap()
    };

    let out = run(&["report"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(dir.path().join("AI_telecom.xlsx").is_file());

    let out = run(&["templates"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("ai_telecom"));

    let out = run(&["report", "--template", "no-existe", "--force"]);
    assert_eq!(out.status.code(), Some(1));
}
