// src/core/xlsx_export.rs

use crate::models::ConversionSummary;
use calamine::{Data, DataType, Reader, open_workbook_auto};
use chrono::{Datelike, NaiveDateTime, Timelike};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No se pudo abrir el libro '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: calamine::Error,
    },
    #[error("El libro '{path}' no contiene ninguna hoja.")]
    NoWorksheets { path: String },
    #[error("No existe la hoja '{name}' (hojas disponibles: {available}).")]
    SheetNotFound { name: String, available: String },
    #[error("No se pudo leer la hoja '{sheet}': {source}")]
    Read {
        sheet: String,
        #[source]
        source: calamine::Error,
    },
    #[error("Rango no válido {from}..{to}: la hoja tiene {rows} filas de datos.")]
    InvalidRange { from: usize, to: usize, rows: usize },
    #[error("Error de Ficheros en '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Error al escribir el CSV: {0}")]
    Csv(#[from] csv::Error),
}

type ExportResult<T> = Result<T, ExportError>;

/// Qué hoja del libro se exporta.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SheetSelector {
    #[default]
    First,
    Named(String),
}

impl From<Option<String>> for SheetSelector {
    fn from(name: Option<String>) -> Self {
        name.map_or(SheetSelector::First, SheetSelector::Named)
    }
}

/// Rango de filas de datos, en base 1 e inclusivo. La cabecera no cuenta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub from: usize,
    pub to: usize,
}

impl RowRange {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    pub fn validate(&self, data_rows: usize) -> ExportResult<()> {
        if self.from < 1 || self.to > data_rows || self.from > self.to {
            return Err(ExportError::InvalidRange {
                from: self.from,
                to: self.to,
                rows: data_rows,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub sheet: SheetSelector,
    pub range: Option<RowRange>,
}

/// Representación textual de una celda para CSV.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        // `Display` de f64 ya omite la parte decimal en valores enteros (123.0 -> "123").
        Data::Float(f) => f.to_string(),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) => format_datetime(&dt),
            None => cell.to_string(),
        },
        Data::Error(e) => e.to_string(),
    }
}

/// `AAAA-MM-DD`, con ` HH:MM:SS` solo si la hora no es medianoche.
fn format_datetime(dt: &NaiveDateTime) -> String {
    let date = format!("{:04}-{:02}-{:02}", dt.year(), dt.month(), dt.day());
    match (dt.hour(), dt.minute(), dt.second()) {
        (0, 0, 0) => date,
        (h, m, s) => format!("{} {:02}:{:02}:{:02}", date, h, m, s),
    }
}

/// Elige la hoja a exportar entre las del libro.
pub fn select_sheet_name(
    sheet_names: &[String],
    selector: &SheetSelector,
    path: &Path,
) -> ExportResult<String> {
    match selector {
        SheetSelector::First => {
            sheet_names
                .first()
                .cloned()
                .ok_or_else(|| ExportError::NoWorksheets {
                    path: path.display().to_string(),
                })
        }
        SheetSelector::Named(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(ExportError::SheetNotFound {
                    name: name.clone(),
                    available: sheet_names.join(", "),
                });
            }
            Ok(name.clone())
        }
    }
}

/// Devuelve las filas a su posición A1: `start` es la primera celda usada
/// (fila, columna), y todo lo anterior se rellena con celdas vacías.
pub fn anchor_rows(rows: Vec<Vec<String>>, start: Option<(u32, u32)>) -> Vec<Vec<String>> {
    let Some((first_row, first_col)) = start else {
        return rows;
    };
    if first_row == 0 && first_col == 0 {
        return rows;
    }

    let lead = first_col as usize;
    let leading_rows = (0..first_row).map(|_| Vec::new());
    let shifted = rows.into_iter().map(|row| {
        let mut padded = vec![String::new(); lead];
        padded.extend(row);
        padded
    });
    leading_rows.chain(shifted).collect()
}

/// Lee una hoja completa como filas de texto (cabecera incluida).
pub fn read_sheet(path: &Path, selector: &SheetSelector) -> ExportResult<Vec<Vec<String>>> {
    log::info!("Leyendo libro: {:?}", path);
    let mut workbook = open_workbook_auto(path).map_err(|source| ExportError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let sheet_name = select_sheet_name(&workbook.sheet_names(), selector, path)?;
    log::debug!("Exportando hoja '{}'", sheet_name);

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|source| ExportError::Read {
            sheet: sheet_name.clone(),
            source,
        })?;

    // calamine recorta el rango a la primera celda usada.
    let start = range.start();
    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    let rows = anchor_rows(rows, start);
    log::debug!("Hoja '{}': {} filas leídas", sheet_name, rows.len());
    Ok(rows)
}

/// Aplica el rango de filas de datos, conservando siempre la cabecera.
pub fn select_rows(rows: Vec<Vec<String>>, range: Option<RowRange>) -> ExportResult<Vec<Vec<String>>> {
    let Some(range) = range else {
        return Ok(rows);
    };

    let data_rows = rows.len().saturating_sub(1);
    range.validate(data_rows)?;

    let mut iter = rows.into_iter();
    let header = iter.next();
    Ok(header
        .into_iter()
        .chain(iter.skip(range.from - 1).take(range.to - range.from + 1))
        .collect())
}

/// Escribe las filas como CSV. Las filas cortas se rellenan hasta la anchura máxima.
pub fn write_rows<W: Write>(rows: &[Vec<String>], writer: W) -> ExportResult<()> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    for row in rows {
        if row.len() < width {
            log::debug!("Rellenando fila de {} a {} columnas", row.len(), width);
            let padded = row
                .iter()
                .map(String::as_str)
                .chain(std::iter::repeat_n("", width - row.len()));
            csv_writer.write_record(padded)?;
        } else {
            csv_writer.write_record(row)?;
        }
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Exporta una hoja del libro a `writer`. Devuelve el número de filas de datos escritas.
pub fn export_to_csv<W: Write>(path: &Path, writer: W, options: &ExportOptions) -> ExportResult<usize> {
    let rows = read_sheet(path, &options.sheet)?;
    let rows = select_rows(rows, options.range)?;
    write_rows(&rows, writer)?;
    Ok(rows.len().saturating_sub(1))
}

/// Convierte el libro `input` en el CSV `output`.
pub fn convert_xlsx_file(
    input: &Path,
    output: &Path,
    options: &ExportOptions,
) -> ExportResult<ConversionSummary> {
    log::info!("Convirtiendo XLSX a CSV: {:?} -> {:?}", input, output);

    // Se lee antes de crear la salida para no dejar un CSV vacío si el libro falla.
    let rows = read_sheet(input, &options.sheet)?;
    let rows = select_rows(rows, options.range)?;

    let file = File::create(output).map_err(|source| ExportError::Io {
        path: output.display().to_string(),
        source,
    })?;
    write_rows(&rows, BufWriter::new(file))?;

    let data_rows = rows.len().saturating_sub(1);
    log::info!("{} filas de datos escritas en {:?}", data_rows, output);
    Ok(ConversionSummary {
        rows: data_rows,
        output: output.to_path_buf(),
    })
}
