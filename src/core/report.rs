// src/core/report.rs

use crate::constants::MAX_SHEET_NAME_LEN;
use crate::core::cell_ref::{self, CellRefError};
use crate::core::interpolator::Interpolator;
use crate::core::templates;
use crate::models::{
    CellValue, ChartKind, ChartSpec, ColumnKind, ColumnSpec, ReportSpec, ReportSummary, SheetSpec,
};
use rust_xlsxwriter::{
    Chart, ChartType, Color, DocProperties, ExcelDateTime, Format, FormatAlign, FormatBorder,
    Formula, Workbook, Worksheet, XlsxError,
};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Error de Ficheros en '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Error al parsear TOML en '{path}': {source}")]
    TomlParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("No existe la plantilla interna '{name}' (disponibles: {available}).")]
    UnknownTemplate { name: String, available: String },
    #[error("El informe no define ninguna hoja.")]
    NoSheets,
    #[error("El nombre de hoja '{name}' no es válido: {reason}.")]
    InvalidSheetName { name: String, reason: &'static str },
    #[error("La hoja '{name}' está definida más de una vez.")]
    DuplicateSheet { name: String },
    #[error("Hoja '{sheet}', columna '{column}': {reason}.")]
    Formula {
        sheet: String,
        column: String,
        reason: &'static str,
    },
    #[error("Hoja '{sheet}', fila {row}: se esperaban {expected} valores y hay {found}.")]
    RowWidth {
        sheet: String,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Hoja '{sheet}', fila {row}, columna '{column}': el valor no es de tipo {expected:?}.")]
    CellType {
        sheet: String,
        row: usize,
        column: String,
        expected: ColumnKind,
    },
    #[error("Hoja '{sheet}', fila {row}: la fecha '{value}' no es válida (formato AAAA-MM-DD).")]
    InvalidDate {
        sheet: String,
        row: usize,
        value: String,
    },
    #[error("Hoja '{sheet}': la columna '{column}' del gráfico está fuera de la tabla.")]
    ChartColumn { sheet: String, column: String },
    #[error("Hoja '{sheet}': un gráfico necesita al menos una fila de datos.")]
    ChartWithoutData { sheet: String },
    #[error("Referencia de celda: {0}")]
    CellRef(#[from] CellRefError),
    #[error("Error al generar el libro Excel: {0}")]
    Xlsx(#[from] XlsxError),
}

type ReportResult<T> = Result<T, ReportError>;

impl ReportSpec {
    /// Parsea la descripción de un informe desde TOML. `origin` solo se usa en los errores.
    pub fn from_toml(content: &str, origin: &str) -> ReportResult<Self> {
        toml::from_str(content).map_err(|source| ReportError::TomlParse {
            path: origin.to_string(),
            source,
        })
    }

    /// Comprueba que el informe se puede escribir tal cual.
    pub fn validate(&self) -> ReportResult<()> {
        if self.sheets.is_empty() {
            return Err(ReportError::NoSheets);
        }

        let mut seen = HashSet::new();
        for sheet in &self.sheets {
            validate_sheet_name(&sheet.name)?;
            // Excel compara los nombres de hoja sin distinguir mayúsculas.
            if !seen.insert(sheet.name.to_lowercase()) {
                return Err(ReportError::DuplicateSheet {
                    name: sheet.name.clone(),
                });
            }
            sheet.validate()?;
        }
        Ok(())
    }

    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(|s| s.rows.len()).sum()
    }
}

impl SheetSpec {
    /// Columnas que reciben valores literales (todas menos las fórmulas).
    pub fn value_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns
            .iter()
            .filter(|c| c.kind != ColumnKind::Formula)
    }

    fn validate(&self) -> ReportResult<()> {
        for column in &self.columns {
            let reason = match (column.kind, &column.formula) {
                (ColumnKind::Formula, None) => Some("falta la plantilla 'formula'"),
                (ColumnKind::Formula, Some(_)) => None,
                (_, Some(_)) => Some("solo las columnas de tipo formula admiten 'formula'"),
                (_, None) => None,
            };
            if let Some(reason) = reason {
                return Err(ReportError::Formula {
                    sheet: self.name.clone(),
                    column: column.header.clone(),
                    reason,
                });
            }
        }

        let expected = self.value_columns().count();
        for (index, row) in self.rows.iter().enumerate() {
            let row_number = index + 1;
            if row.len() != expected {
                return Err(ReportError::RowWidth {
                    sheet: self.name.clone(),
                    row: row_number,
                    expected,
                    found: row.len(),
                });
            }

            for (column, value) in self.value_columns().zip(row) {
                let matches = matches!(
                    (column.kind, value),
                    (ColumnKind::Integer, CellValue::Integer(_))
                        | (ColumnKind::Number, CellValue::Integer(_) | CellValue::Number(_))
                        | (ColumnKind::Text, CellValue::Text(_))
                        | (ColumnKind::Date, CellValue::Text(_))
                );
                if !matches {
                    return Err(ReportError::CellType {
                        sheet: self.name.clone(),
                        row: row_number,
                        column: column.header.clone(),
                        expected: column.kind,
                    });
                }
                if let (ColumnKind::Date, CellValue::Text(text)) = (column.kind, value) {
                    if parse_date(text).is_none() {
                        return Err(ReportError::InvalidDate {
                            sheet: self.name.clone(),
                            row: row_number,
                            value: text.clone(),
                        });
                    }
                }
            }
        }

        if let Some(chart) = &self.chart {
            if self.rows.is_empty() {
                return Err(ReportError::ChartWithoutData {
                    sheet: self.name.clone(),
                });
            }
            for column in [&chart.categories_column, &chart.values_column] {
                let index = cell_ref::column_name_to_index(column)?;
                if usize::from(index) >= self.columns.len() {
                    return Err(ReportError::ChartColumn {
                        sheet: self.name.clone(),
                        column: column.clone(),
                    });
                }
            }
            cell_ref::parse_cell_reference(&chart.anchor)?;
        }
        Ok(())
    }
}

fn validate_sheet_name(name: &str) -> ReportResult<()> {
    let reason = if name.trim().is_empty() {
        Some("está vacío")
    } else if name.chars().count() > MAX_SHEET_NAME_LEN {
        Some("supera los 31 caracteres")
    } else if name.contains(FORBIDDEN_SHEET_CHARS) {
        Some("contiene alguno de los caracteres []:*?/\\")
    } else if name.starts_with('\'') || name.ends_with('\'') {
        Some("no puede empezar ni terminar con apóstrofo")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ReportError::InvalidSheetName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Acepta solo fechas `AAAA-MM-DD` de calendario válidas. Horas sueltas ("10:30")
/// o fechas con hora no son fechas del informe.
fn parse_date(text: &str) -> Option<ExcelDateTime> {
    let text = text.trim();
    let bytes = text.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shape_ok {
        return None;
    }

    let year: u16 = text[0..4].parse().ok()?;
    let month: u8 = text[5..7].parse().ok()?;
    let day: u8 = text[8..10].parse().ok()?;
    if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
        return None;
    }
    ExcelDateTime::from_ymd(year, month, day).ok()
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Carga un informe desde un archivo TOML.
pub fn load_report_spec(path: &Path) -> ReportResult<ReportSpec> {
    log::info!("Cargando informe desde: {:?}", path);
    let content = fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    ReportSpec::from_toml(&content, &path.display().to_string())
}

/// Devuelve una de las plantillas de informe incluidas en el binario.
pub fn builtin_report(name: &str) -> ReportResult<ReportSpec> {
    let content =
        templates::builtin_template(name).ok_or_else(|| ReportError::UnknownTemplate {
            name: name.to_string(),
            available: templates::builtin_template_names().join(", "),
        })?;
    ReportSpec::from_toml(content, &format!("<plantilla {}>", name))
}

/// Los cuatro estilos de celda del informe.
pub struct ReportFormats {
    pub header: Format,
    pub number: Format,
    pub date: Format,
    pub normal: Format,
}

impl Default for ReportFormats {
    fn default() -> Self {
        let centered = || {
            Format::new()
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
        };

        Self {
            header: centered()
                .set_bold()
                .set_background_color(Color::RGB(0xD7E4BC)),
            number: centered().set_num_format("#,##0.00"),
            date: centered().set_num_format("yyyy-mm-dd"),
            normal: centered(),
        }
    }
}

fn chart_type(kind: ChartKind) -> ChartType {
    match kind {
        ChartKind::Column => ChartType::Column,
        ChartKind::Bar => ChartType::Bar,
        ChartKind::Line => ChartType::Line,
        ChartKind::Pie => ChartType::Pie,
    }
}

/// Construye el gráfico de una hoja. Las series cubren todas las filas de datos.
pub fn build_chart(sheet: &SheetSpec, spec: &ChartSpec) -> ReportResult<Chart> {
    let categories = cell_ref::column_name_to_index(&spec.categories_column)?;
    let values = cell_ref::column_name_to_index(&spec.values_column)?;
    let last_row = sheet.rows.len() as u32;
    let sheet_name = sheet.name.as_str();

    let mut chart = Chart::new(chart_type(spec.kind));
    let series = chart
        .add_series()
        .set_categories((sheet_name, 1, categories, last_row, categories))
        .set_values((sheet_name, 1, values, last_row, values));
    if let Some(name) = &spec.series_name {
        series.set_name(name.as_str());
    }

    if let Some(title) = &spec.title {
        chart.title().set_name(title.as_str());
    }

    // Los gráficos circulares no tienen ejes.
    if spec.kind != ChartKind::Pie {
        if let Some(x_axis) = &spec.x_axis {
            chart.x_axis().set_name(x_axis.as_str());
        }
        if let Some(y_axis) = &spec.y_axis {
            chart.y_axis().set_name(y_axis.as_str());
        }
        if let Some(num_format) = &spec.y_num_format {
            chart.y_axis().set_num_format(num_format.as_str());
        }
    }

    Ok(chart)
}

fn write_value(
    worksheet: &mut Worksheet,
    sheet: &str,
    row: u32,
    col: u16,
    kind: ColumnKind,
    value: &CellValue,
    formats: &ReportFormats,
) -> ReportResult<()> {
    match (kind, value) {
        (ColumnKind::Integer, CellValue::Integer(n)) => {
            worksheet.write_number_with_format(row, col, *n as f64, &formats.normal)?;
        }
        (ColumnKind::Number, CellValue::Integer(n)) => {
            worksheet.write_number_with_format(row, col, *n as f64, &formats.number)?;
        }
        (ColumnKind::Number, CellValue::Number(n)) => {
            worksheet.write_number_with_format(row, col, *n, &formats.number)?;
        }
        (ColumnKind::Date, CellValue::Text(text)) => {
            let Some(date) = parse_date(text) else {
                return Err(ReportError::InvalidDate {
                    sheet: sheet.to_string(),
                    row: row as usize,
                    value: text.clone(),
                });
            };
            worksheet.write_datetime_with_format(row, col, &date, &formats.date)?;
        }
        (_, CellValue::Text(text)) => {
            worksheet.write_string_with_format(row, col, text.as_str(), &formats.normal)?;
        }
        (_, CellValue::Integer(n)) => {
            worksheet.write_number_with_format(row, col, *n as f64, &formats.normal)?;
        }
        (_, CellValue::Number(n)) => {
            worksheet.write_number_with_format(row, col, *n, &formats.normal)?;
        }
    }
    Ok(())
}

/// Escribe una hoja completa: cabecera, datos, fórmulas, anchos y gráfico.
pub fn write_sheet(
    worksheet: &mut Worksheet,
    sheet: &SheetSpec,
    formats: &ReportFormats,
) -> ReportResult<()> {
    worksheet.set_name(sheet.name.as_str())?;

    for (col, column) in sheet.columns.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, column.header.as_str(), &formats.header)?;
        if let Some(width) = column.width {
            worksheet.set_column_width(col, width)?;
        }
        if let Some(template) = &column.formula {
            log::debug!(
                "Columna {} de '{}' calculada con {}",
                cell_ref::column_index_to_name(col),
                sheet.name,
                template
            );
        }
    }

    for (data_index, values) in sheet.rows.iter().enumerate() {
        let row = data_index as u32 + 1;
        let interpolator = Interpolator::for_data_row(data_index);
        let mut values = values.iter();

        for (col, column) in sheet.columns.iter().enumerate() {
            let col = col as u16;
            if let Some(template) = &column.formula {
                let formula = Formula::new(interpolator.interpolate(template));
                worksheet.write_formula_with_format(row, col, formula, &formats.number)?;
                continue;
            }

            let Some(value) = values.next() else {
                return Err(ReportError::RowWidth {
                    sheet: sheet.name.clone(),
                    row: data_index + 1,
                    expected: sheet.value_columns().count(),
                    found: sheet.rows[data_index].len(),
                });
            };
            write_value(worksheet, &sheet.name, row, col, column.kind, value, formats)?;
        }
    }

    if let Some(chart_spec) = &sheet.chart {
        let chart = build_chart(sheet, chart_spec)?;
        let (anchor_row, anchor_col) = cell_ref::parse_cell_reference(&chart_spec.anchor)?;
        worksheet.insert_chart_with_offset(
            anchor_row,
            anchor_col,
            &chart,
            chart_spec.x_offset,
            chart_spec.y_offset,
        )?;
        log::debug!(
            "Gráfico {:?} insertado en '{}'!{}",
            chart_spec.kind,
            sheet.name,
            chart_spec.anchor
        );
    }

    Ok(())
}

/// Valida el informe y construye el libro en memoria.
pub fn build_workbook(spec: &ReportSpec) -> ReportResult<Workbook> {
    spec.validate()?;

    let formats = ReportFormats::default();
    let mut workbook = Workbook::new();
    if let Some(title) = &spec.title {
        workbook.set_properties(&DocProperties::new().set_title(title.as_str()));
    }
    for sheet in &spec.sheets {
        log::debug!("Escribiendo hoja '{}' ({} filas)", sheet.name, sheet.rows.len());
        let worksheet = workbook.add_worksheet();
        write_sheet(worksheet, sheet, &formats)?;
    }
    Ok(workbook)
}

/// Genera el informe y lo guarda en `output`.
pub fn write_report(spec: &ReportSpec, output: &Path) -> ReportResult<ReportSummary> {
    log::info!("Generando informe en {:?}", output);
    let mut workbook = build_workbook(spec)?;
    workbook.save(output)?;

    let summary = ReportSummary {
        sheets: spec.sheets.len(),
        rows: spec.total_rows(),
        charts: spec.sheets.iter().filter(|s| s.chart.is_some()).count(),
        output: output.to_path_buf(),
    };
    log::info!(
        "Informe escrito: {} hojas, {} filas, {} gráficos",
        summary.sheets,
        summary.rows,
        summary.charts
    );
    Ok(summary)
}
