// src/core/mod.rs

pub mod cell_ref;
pub mod contacts;
pub mod interpolator;
pub mod report;
pub mod settings;
pub mod templates;
pub mod xlsx_export;
