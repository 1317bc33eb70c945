// src/core/templates.rs

use include_dir::{Dir, include_dir};

static TEMPLATES_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/templates");

const TEMPLATE_EXTENSION: &str = "toml";

/// Devuelve el contenido TOML de una plantilla de informe interna.
pub fn builtin_template(name: &str) -> Option<&'static str> {
    let file_name = format!("{}.{}", name, TEMPLATE_EXTENSION);
    let file = TEMPLATES_DIR.get_file(&file_name)?;
    log::debug!("Plantilla interna encontrada: {:?}", file.path());
    file.contents_utf8()
}

/// Lista los nombres de las plantillas internas, ordenados alfabéticamente.
pub fn builtin_template_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = TEMPLATES_DIR
        .files()
        .filter(|f| f.path().extension().is_some_and(|ext| ext == TEMPLATE_EXTENSION))
        .filter_map(|f| f.path().file_stem()?.to_str())
        .collect();
    names.sort_unstable();
    names
}
