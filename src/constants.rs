// src/constants.rs

/// El nombre del directorio de configuración de tabla (dentro de ~/.config/).
pub const TABLA_DIR: &str = "tabla";

/// El nombre del archivo de configuración global (en ~/.config/tabla/).
pub const GLOBAL_CONFIG_FILENAME: &str = "config.toml";

/// El nombre del archivo de configuración local (en el directorio de trabajo).
pub const LOCAL_CONFIG_FILENAME: &str = "tabla.toml";

/// Variable de entorno que sustituye la ruta del archivo de configuración global.
pub const CONFIG_ENV_VAR: &str = "TABLA_CONFIG";

// --- Rutas por defecto de cada conversión ---

pub const DEFAULT_CONTACTS_INPUT: &str = "contacts.csv";
pub const DEFAULT_CONTACTS_OUTPUT: &str = "google_contacts.csv";

pub const DEFAULT_XLSX_INPUT: &str = "numbers.xlsx";
pub const DEFAULT_XLSX_OUTPUT: &str = "contacts.csv";

pub const DEFAULT_REPORT_OUTPUT: &str = "AI_telecom.xlsx";
pub const DEFAULT_REPORT_TEMPLATE: &str = "ai_telecom";

// --- Columnas ---

/// Columnas de origen del CSV de contactos.
pub const SOURCE_NAME_COLUMN: &str = "name";
pub const SOURCE_PHONE_COLUMN: &str = "phone number";

/// Longitud máxima del nombre de una hoja de Excel.
pub const MAX_SHEET_NAME_LEN: usize = 31;
