// src/models.rs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// --- MODELOS DE CONFIGURACIÓN (tabla.toml / config.toml) ---
// Todas las claves son opcionales: lo que falte se toma de la capa inferior.

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ContactsSection {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub name_column: Option<String>,
    pub phone_column: Option<String>,
    pub country_code: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct XlsxSection {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub sheet: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ReportSection {
    pub output: Option<PathBuf>,
    pub template: Option<String>,
    pub data: Option<PathBuf>,
}

/// Representa la estructura deserializada de un archivo de configuración.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct SettingsFile {
    #[serde(default)]
    pub contacts: ContactsSection,
    #[serde(default)]
    pub xlsx: XlsxSection,
    #[serde(default)]
    pub report: ReportSection,
}

// --- MODELOS DE INFORME (plantillas TOML) ---

/// Tipo de dato de una columna del informe. Determina el formato de la celda.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Text,
    Number,
    Date,
    /// Columna calculada: no recibe valores, se rellena con `formula`.
    Formula,
}

/// Valor literal de una celda. Usa `untagged` para aceptar números y texto tal cual.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Column,
    Bar,
    Line,
    Pie,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub header: String,
    pub kind: ColumnKind,
    pub width: Option<f64>,
    /// Plantilla de fórmula con el token `{row}` (solo para `kind = "formula"`).
    pub formula: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: Option<String>,
    pub series_name: Option<String>,
    /// Letra de la columna con las categorías (ej: "B").
    pub categories_column: String,
    /// Letra de la columna con los valores (ej: "E").
    pub values_column: String,
    pub x_axis: Option<String>,
    pub y_axis: Option<String>,
    pub y_num_format: Option<String>,
    #[serde(default = "default_anchor")]
    pub anchor: String,
    #[serde(default = "default_x_offset")]
    pub x_offset: u32,
    #[serde(default = "default_y_offset")]
    pub y_offset: u32,
}

fn default_anchor() -> String {
    "H2".to_string()
}

fn default_x_offset() -> u32 {
    25
}

fn default_y_offset() -> u32 {
    10
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SheetSpec {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
    /// Una fila por registro, con un valor por cada columna que no sea fórmula.
    #[serde(default)]
    pub rows: Vec<Vec<CellValue>>,
    pub chart: Option<ChartSpec>,
}

/// Describe un libro completo: hojas, columnas, datos y gráficos.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ReportSpec {
    pub title: Option<String>,
    #[serde(default)]
    pub sheets: Vec<SheetSpec>,
}

/// Resultado de una conversión de archivo a archivo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub rows: usize,
    pub output: PathBuf,
}

/// Resultado de la generación de un informe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub sheets: usize,
    pub rows: usize,
    pub charts: usize,
    pub output: PathBuf,
}
