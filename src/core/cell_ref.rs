// src/core/cell_ref.rs

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CellRefError {
    #[error("La referencia de celda '{0}' no es válida (se esperaba algo como 'H2').")]
    Invalid(String),
    #[error("La columna '{0}' no es válida (se esperaba una letra como 'B').")]
    InvalidColumn(String),
}

/// Convierte un índice de columna (base 0) en su nombre de Excel: 0 -> A, 26 -> AA.
pub fn column_index_to_name(col: u16) -> String {
    let mut n = col as u32 + 1;
    let mut name = String::new();
    while n > 0 {
        n -= 1;
        name.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    name
}

/// Convierte un nombre de columna ("A", "aa") en su índice base 0.
pub fn column_name_to_index(name: &str) -> Result<u16, CellRefError> {
    let invalid = || CellRefError::InvalidColumn(name.to_string());
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid());
    }

    let mut result: u32 = 0;
    for ch in name.chars() {
        let ch = ch.to_ascii_uppercase();
        if !ch.is_ascii_uppercase() {
            return Err(invalid());
        }
        result = result * 26 + (ch as u32 - 'A' as u32) + 1;
        // Excel no pasa de XFD (16384 columnas).
        if result > 16_384 {
            return Err(invalid());
        }
    }
    Ok((result - 1) as u16)
}

/// Parsea una referencia A1 y devuelve `(fila, columna)` en base 0.
pub fn parse_cell_reference(reference: &str) -> Result<(u32, u16), CellRefError> {
    let invalid = || CellRefError::Invalid(reference.to_string());

    let trimmed = reference.trim();
    let split = trimmed
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(invalid)?;
    let (letters, digits) = trimmed.split_at(split);

    if letters.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let col = column_name_to_index(letters).map_err(|_| invalid())?;
    let row: u32 = digits.parse().map_err(|_| invalid())?;
    if row == 0 {
        return Err(invalid());
    }

    Ok((row - 1, col))
}
