// src/config.rs

use crate::constants::{CONFIG_ENV_VAR, GLOBAL_CONFIG_FILENAME, LOCAL_CONFIG_FILENAME, TABLA_DIR};
use std::env;
use std::path::{Path, PathBuf};

/// Devuelve la ruta al directorio de configuración de tabla.
/// No lo crea: tabla solo lee su configuración.
pub fn get_config_dir() -> Option<PathBuf> {
    let config_path = dirs::config_dir()?.join(TABLA_DIR);
    log::debug!("Directorio de config: {:?}", config_path);
    Some(config_path)
}

/// Devuelve la ruta al archivo de configuración global.
/// `TABLA_CONFIG` tiene prioridad sobre el directorio del sistema.
pub fn get_global_config_path() -> Option<PathBuf> {
    if let Some(custom) = env::var_os(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(custom));
    }
    get_config_dir().map(|dir| dir.join(GLOBAL_CONFIG_FILENAME))
}

/// Devuelve la ruta al archivo `tabla.toml` del directorio dado.
pub fn get_local_config_path(cwd: &Path) -> PathBuf {
    cwd.join(LOCAL_CONFIG_FILENAME)
}
