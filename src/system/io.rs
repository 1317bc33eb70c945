// src/system/io.rs

use dialoguer::{Confirm, theme::ColorfulTheme};
use std::io::IsTerminal;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("El archivo '{0}' ya existe. Usa --force para sobrescribirlo.")]
    WouldOverwrite(String),
    #[error("Error al leer la respuesta del usuario: {0}")]
    Dialoguer(#[from] dialoguer::Error),
    #[error("No se pudo abrir '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: opener::OpenError,
    },
}

/// Qué hacer con un archivo de salida.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwritePolicy {
    Proceed,
    Ask,
    Refuse,
}

/// Decide sin efectos secundarios si se puede escribir en la salida.
pub fn overwrite_policy(exists: bool, force: bool, interactive: bool) -> OverwritePolicy {
    match (exists, force, interactive) {
        (false, _, _) | (true, true, _) => OverwritePolicy::Proceed,
        (true, false, true) => OverwritePolicy::Ask,
        (true, false, false) => OverwritePolicy::Refuse,
    }
}

/// Comprueba si se puede escribir en `path`, preguntando al usuario si hace falta.
/// Devuelve `false` si el usuario rechaza la sobrescritura.
pub fn confirm_overwrite(path: &Path, force: bool) -> Result<bool, PromptError> {
    let interactive = std::io::stdin().is_terminal() && std::io::stderr().is_terminal();
    match overwrite_policy(path.exists(), force, interactive) {
        OverwritePolicy::Proceed => Ok(true),
        OverwritePolicy::Refuse => Err(PromptError::WouldOverwrite(path.display().to_string())),
        OverwritePolicy::Ask => {
            let answer = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("'{}' ya existe. ¿Sobrescribir?", path.display()))
                .default(false)
                .interact()?;
            log::debug!("Respuesta de sobrescritura para {:?}: {}", path, answer);
            Ok(answer)
        }
    }
}

/// Abre un archivo con la aplicación predeterminada del sistema.
pub fn open_with_default_app(path: &Path) -> Result<(), PromptError> {
    log::info!("Abriendo {:?}", path);
    opener::open(path).map_err(|source| PromptError::Open {
        path: path.display().to_string(),
        source,
    })
}
