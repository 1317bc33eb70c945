// src/core/settings.rs

use crate::config as global_paths;
use crate::constants::{
    DEFAULT_CONTACTS_INPUT, DEFAULT_CONTACTS_OUTPUT, DEFAULT_REPORT_OUTPUT,
    DEFAULT_REPORT_TEMPLATE, DEFAULT_XLSX_INPUT, DEFAULT_XLSX_OUTPUT, SOURCE_NAME_COLUMN,
    SOURCE_PHONE_COLUMN,
};
use crate::models::{ContactsSection, ReportSection, SettingsFile, XlsxSection};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
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
}

type SettingsResult<T> = Result<T, SettingsError>;

/// Configuración final de `contacts`, con todos los valores por defecto aplicados.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactsSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub name_column: String,
    pub phone_column: String,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XlsxSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub sheet: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    pub output: PathBuf,
    pub template: String,
    pub data: Option<PathBuf>,
}

/// Representa la vista fusionada de la configuración global y la local.
/// El resto del programa interactuará con esta struct.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub contacts: ContactsSettings,
    pub xlsx: XlsxSettings,
    pub report: ReportSettings,
}

impl Default for Settings {
    fn default() -> Self {
        resolve(SettingsFile::default())
    }
}

/// Carga un archivo de configuración. Si no existe, devuelve `None`.
pub fn load_settings_file(path: &Path) -> SettingsResult<Option<SettingsFile>> {
    if !path.is_file() {
        log::debug!("No hay configuración en {:?}", path);
        return Ok(None);
    }

    log::info!("Cargando configuración desde: {:?}", path);
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let file = toml::from_str(&content).map_err(|source| SettingsError::TomlParse {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(file))
}

/// Fusiona dos capas de configuración. `upper` tiene prioridad clave a clave.
pub fn merge(lower: SettingsFile, upper: SettingsFile) -> SettingsFile {
    SettingsFile {
        contacts: ContactsSection {
            input: upper.contacts.input.or(lower.contacts.input),
            output: upper.contacts.output.or(lower.contacts.output),
            name_column: upper.contacts.name_column.or(lower.contacts.name_column),
            phone_column: upper.contacts.phone_column.or(lower.contacts.phone_column),
            country_code: upper.contacts.country_code.or(lower.contacts.country_code),
        },
        xlsx: XlsxSection {
            input: upper.xlsx.input.or(lower.xlsx.input),
            output: upper.xlsx.output.or(lower.xlsx.output),
            sheet: upper.xlsx.sheet.or(lower.xlsx.sheet),
        },
        report: ReportSection {
            output: upper.report.output.or(lower.report.output),
            template: upper.report.template.or(lower.report.template),
            data: upper.report.data.or(lower.report.data),
        },
    }
}

/// Aplica los valores por defecto a una configuración ya fusionada.
pub fn resolve(file: SettingsFile) -> Settings {
    let SettingsFile {
        contacts,
        xlsx,
        report,
    } = file;

    Settings {
        contacts: ContactsSettings {
            input: contacts
                .input
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTACTS_INPUT)),
            output: contacts
                .output
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTACTS_OUTPUT)),
            name_column: contacts
                .name_column
                .unwrap_or_else(|| SOURCE_NAME_COLUMN.to_string()),
            phone_column: contacts
                .phone_column
                .unwrap_or_else(|| SOURCE_PHONE_COLUMN.to_string()),
            country_code: contacts.country_code.filter(|c| !c.trim().is_empty()),
        },
        xlsx: XlsxSettings {
            input: xlsx
                .input
                .unwrap_or_else(|| PathBuf::from(DEFAULT_XLSX_INPUT)),
            output: xlsx
                .output
                .unwrap_or_else(|| PathBuf::from(DEFAULT_XLSX_OUTPUT)),
            sheet: xlsx.sheet,
        },
        report: ReportSettings {
            output: report
                .output
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_OUTPUT)),
            template: report
                .template
                .unwrap_or_else(|| DEFAULT_REPORT_TEMPLATE.to_string()),
            data: report.data,
        },
    }
}

/// Carga las capas explícitas (global y local) y las resuelve.
pub fn load_settings_from(global: Option<&Path>, local: &Path) -> SettingsResult<Settings> {
    let global_file = match global {
        Some(path) => load_settings_file(path)?.unwrap_or_default(),
        None => {
            log::warn!("No se pudo determinar el directorio de configuración del sistema.");
            SettingsFile::default()
        }
    };
    let local_file = load_settings_file(local)?.unwrap_or_default();

    // Lógica de fusión: la configuración local siempre tiene prioridad.
    Ok(resolve(merge(global_file, local_file)))
}

/// Carga la configuración global y la del directorio `cwd`.
pub fn load_settings(cwd: &Path) -> SettingsResult<Settings> {
    let global = global_paths::get_global_config_path();
    let local = global_paths::get_local_config_path(cwd);
    load_settings_from(global.as_deref(), &local)
}
