// src/core/interpolator.rs

/// Token que se sustituye por el número de fila de Excel (base 1).
pub const ROW_TOKEN: &str = "{row}";

/// Interpola las plantillas de fórmula de una fila de datos concreta.
pub struct Interpolator {
    excel_row: u32,
}

impl Interpolator {
    /// `data_index` es la posición de la fila dentro de los datos (base 0).
    /// La fila 1 de Excel es la cabecera, así que el primer dato vive en la fila 2.
    pub fn for_data_row(data_index: usize) -> Self {
        Self {
            excel_row: data_index as u32 + 2,
        }
    }

    pub fn excel_row(&self) -> u32 {
        self.excel_row
    }

    /// Reemplaza todos los tokens conocidos de la plantilla.
    pub fn interpolate(&self, template: &str) -> String {
        expand_formula(template, self.excel_row)
    }
}

/// Atajo para expandir una plantilla en la fila de Excel indicada (base 1).
pub fn expand_formula(template: &str, excel_row: u32) -> String {
    template.replace(ROW_TOKEN, &excel_row.to_string())
}
