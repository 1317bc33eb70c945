// src/core/contacts.rs

use crate::constants::{SOURCE_NAME_COLUMN, SOURCE_PHONE_COLUMN};
use crate::models::ConversionSummary;
use serde::Serialize;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

/// Cabeceras del CSV que importa Google Contacts, en orden.
pub const GOOGLE_HEADERS: [&str; 3] = ["First Name", "Last Name", "Phone Number"];

#[derive(Error, Debug)]
pub enum ContactsError {
    #[error("Error de Ficheros en '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Error al procesar el CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Falta la columna '{column}' en el CSV de origen (columnas encontradas: {available}).")]
    MissingColumn { column: String, available: String },
}

type ContactsResult<T> = Result<T, ContactsError>;

/// Nombres de las columnas de origen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactColumns {
    pub name: String,
    pub phone: String,
}

impl Default for ContactColumns {
    fn default() -> Self {
        Self {
            name: SOURCE_NAME_COLUMN.to_string(),
            phone: SOURCE_PHONE_COLUMN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactsOptions {
    pub columns: ContactColumns,
    /// Prefijo internacional que se antepone a cada teléfono no vacío (ej: "967").
    pub country_code: Option<String>,
}

/// Una fila del CSV de salida, en el orden de `GOOGLE_HEADERS`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GoogleContact {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}

/// Posiciones de las columnas de origen dentro de cada registro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderPositions {
    pub name: usize,
    pub phone: usize,
}

impl HeaderPositions {
    /// Busca las columnas configuradas en la cabecera del CSV.
    pub fn locate(headers: &csv::StringRecord, columns: &ContactColumns) -> ContactsResult<Self> {
        let normalized: Vec<&str> = headers.iter().map(normalize_header).collect();
        let find = |wanted: &str| {
            normalized
                .iter()
                .position(|h| *h == wanted)
                .ok_or_else(|| ContactsError::MissingColumn {
                    column: wanted.to_string(),
                    available: normalized.join(", "),
                })
        };

        Ok(Self {
            name: find(&columns.name)?,
            phone: find(&columns.phone)?,
        })
    }
}

fn normalize_header(header: &str) -> &str {
    header.trim_start_matches('\u{feff}').trim()
}

/// Divide un nombre completo en el primer espacio.
/// Lo anterior es el nombre; el resto, tal cual, es el apellido.
pub fn split_full_name(full: &str) -> (String, String) {
    match full.split_once(' ') {
        Some((first, last)) => (first.to_string(), last.to_string()),
        None => (full.to_string(), String::new()),
    }
}

/// Convierte un registro de origen en un contacto de Google.
pub fn convert_record(
    record: &csv::StringRecord,
    positions: HeaderPositions,
    options: &ContactsOptions,
) -> GoogleContact {
    let full_name = record.get(positions.name).unwrap_or("");
    let phone = record.get(positions.phone).unwrap_or("");
    let (first_name, last_name) = split_full_name(full_name);

    let phone_number = match options.country_code.as_deref() {
        Some(code) if !phone.trim().is_empty() => format!("{}{}", code, phone),
        _ => phone.to_string(),
    };

    GoogleContact {
        first_name,
        last_name,
        phone_number,
    }
}

/// Convierte un CSV de contactos en flujo. Devuelve el número de filas escritas.
pub fn convert_contacts<R: Read, W: Write>(
    reader: R,
    writer: W,
    options: &ContactsOptions,
) -> ContactsResult<usize> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let positions = HeaderPositions::locate(csv_reader.headers()?, &options.columns)?;
    log::debug!("Columnas de origen localizadas: {:?}", positions);

    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    // La cabecera se escribe siempre, aunque no haya filas de datos.
    csv_writer.write_record(GOOGLE_HEADERS)?;

    let mut rows = 0;
    for result in csv_reader.records() {
        let record = result?;
        csv_writer.serialize(convert_record(&record, positions, options))?;
        rows += 1;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(rows)
}

/// Convierte el archivo `input` y guarda el resultado en `output`.
pub fn convert_contacts_file(
    input: &Path,
    output: &Path,
    options: &ContactsOptions,
) -> ContactsResult<ConversionSummary> {
    log::info!("Convirtiendo contactos: {:?} -> {:?}", input, output);

    // `input` y `output` pueden ser el mismo archivo: no se toca la salida hasta tener todo.
    let source = fs::read(input).map_err(|source| ContactsError::Io {
        path: input.display().to_string(),
        source,
    })?;
    let mut converted = Vec::with_capacity(source.len());
    let rows = convert_contacts(source.as_slice(), &mut converted, options)?;

    fs::write(output, &converted).map_err(|source| ContactsError::Io {
        path: output.display().to_string(),
        source,
    })?;
    log::info!("{} contactos escritos en {:?}", rows, output);

    Ok(ConversionSummary {
        rows,
        output: output.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(input: &str, options: &ContactsOptions) -> ContactsResult<String> {
        let mut out = Vec::new();
        convert_contacts(input.as_bytes(), &mut out, options)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn splits_on_first_space_only() {
        assert_eq!(split_full_name("Jane Doe"), ("Jane".into(), "Doe".into()));
        assert_eq!(split_full_name("Madonna"), ("Madonna".into(), "".into()));
        assert_eq!(
            split_full_name("Mary Ann Smith"),
            ("Mary".into(), "Ann Smith".into())
        );
        assert_eq!(split_full_name("Jane  Doe"), ("Jane".into(), " Doe".into()));
        assert_eq!(split_full_name(""), ("".into(), "".into()));
    }

    #[test]
    fn converts_basic_rows() {
        let out = convert(
            "name,phone number\nJane Doe,555-1234\nMadonna,555-0000\n",
            &ContactsOptions::default(),
        )
        .unwrap();
        assert_eq!(
            out,
            "First Name,Last Name,Phone Number\nJane,Doe,555-1234\nMadonna,,555-0000\n"
        );
    }

    #[test]
    fn column_order_in_source_does_not_matter() {
        let out = convert(
            "phone number,email,name\n0771234567,a@b.c,Ali Hassan\n",
            &ContactsOptions::default(),
        )
        .unwrap();
        assert_eq!(
            out,
            "First Name,Last Name,Phone Number\nAli,Hassan,0771234567\n"
        );
    }

    #[test]
    fn country_code_skips_empty_phones() {
        let options = ContactsOptions {
            country_code: Some("967".to_string()),
            ..Default::default()
        };
        let out = convert("name,phone number\nA B,771234567\nC,\n", &options).unwrap();
        assert_eq!(
            out,
            "First Name,Last Name,Phone Number\nA,B,967771234567\nC,,\n"
        );
    }

    #[test]
    fn short_rows_yield_empty_fields() {
        let out = convert("name,phone number\nSolo\n", &ContactsOptions::default()).unwrap();
        assert_eq!(out, "First Name,Last Name,Phone Number\nSolo,,\n");
    }

    #[test]
    fn header_is_written_without_rows() {
        let out = convert("name,phone number\n", &ContactsOptions::default()).unwrap();
        assert_eq!(out, "First Name,Last Name,Phone Number\n");
    }

    #[test]
    fn headers_are_trimmed_and_bom_stripped() {
        let out = convert(
            "\u{feff}name , phone number\nJane Doe,1\n",
            &ContactsOptions::default(),
        )
        .unwrap();
        assert!(out.ends_with("Jane,Doe,1\n"));
    }

    #[test]
    fn missing_column_is_reported() {
        let err = convert("name,mobile\nJane,1\n", &ContactsOptions::default()).unwrap_err();
        match err {
            ContactsError::MissingColumn { column, available } => {
                assert_eq!(column, "phone number");
                assert_eq!(available, "name, mobile");
            }
            other => panic!("error inesperado: {other:?}"),
        }
    }

    #[test]
    fn custom_columns_are_honoured() {
        let options = ContactsOptions {
            columns: ContactColumns {
                name: "Nombre".to_string(),
                phone: "Tel".to_string(),
            },
            country_code: None,
        };
        let out = convert("Nombre,Tel\nJuan Pérez,600\n", &options).unwrap();
        assert_eq!(out, "First Name,Last Name,Phone Number\nJuan,Pérez,600\n");
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let out = convert(
            "name,phone number\n\"Doe, Jane Q\",1\n",
            &ContactsOptions::default(),
        )
        .unwrap();
        assert!(out.ends_with("\"Doe,\",Jane Q,1\n"));
    }
}
