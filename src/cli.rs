// src/cli.rs

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Tabla: conversiones de contactos, hojas XLSX e informes Excel.", long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convierte un CSV de contactos (name, phone number) al formato de Google Contacts.
    Contacts(ContactsArgs),
    /// Exporta una hoja de un libro XLSX a CSV.
    #[command(name = "xlsx2csv")]
    Xlsx2Csv(XlsxArgs),
    /// Genera un informe Excel con hojas, fórmulas y gráficos.
    Report(ReportArgs),
    /// Lista las plantillas de informe incluidas.
    Templates,
}

/// Opciones comunes a todos los comandos que escriben un archivo.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct OutputArgs {
    /// Sobrescribe el archivo de salida sin preguntar.
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ContactsArgs {
    /// CSV de origen (por defecto: contacts.csv).
    pub input: Option<PathBuf>,
    /// CSV de salida (por defecto: google_contacts.csv).
    pub output: Option<PathBuf>,
    /// Columna con el nombre completo.
    #[arg(long)]
    pub name_column: Option<String>,
    /// Columna con el número de teléfono.
    #[arg(long)]
    pub phone_column: Option<String>,
    /// Prefijo internacional que se antepone a cada teléfono (ej: 967).
    #[arg(long)]
    pub country_code: Option<String>,
    #[command(flatten)]
    pub output_args: OutputArgs,
}

#[derive(Args, Debug)]
pub struct XlsxArgs {
    /// Libro de origen (por defecto: numbers.xlsx).
    pub input: Option<PathBuf>,
    /// CSV de salida (por defecto: contacts.csv).
    pub output: Option<PathBuf>,
    /// Nombre de la hoja a exportar (por defecto, la primera).
    #[arg(long)]
    pub sheet: Option<String>,
    /// Primera fila de datos a exportar (base 1, sin contar la cabecera).
    #[arg(long, requires = "to")]
    pub from: Option<usize>,
    /// Última fila de datos a exportar (inclusive).
    #[arg(long, requires = "from")]
    pub to: Option<usize>,
    #[command(flatten)]
    pub output_args: OutputArgs,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Libro de salida (por defecto: AI_telecom.xlsx).
    pub output: Option<PathBuf>,
    /// Plantilla interna a usar (ver `tabla templates`).
    #[arg(long, conflicts_with = "data")]
    pub template: Option<String>,
    /// Archivo TOML con la descripción del informe.
    #[arg(long)]
    pub data: Option<PathBuf>,
    /// Abre el libro generado con la aplicación predeterminada.
    #[arg(long)]
    pub open: bool,
    #[command(flatten)]
    pub output_args: OutputArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_xlsx_range() {
        let cli = Cli::try_parse_from(["tabla", "xlsx2csv", "in.xlsx", "--from", "2", "--to", "5"])
            .unwrap();
        match cli.command {
            Command::Xlsx2Csv(args) => {
                assert_eq!(args.input, Some(PathBuf::from("in.xlsx")));
                assert_eq!((args.from, args.to), (Some(2), Some(5)));
            }
            other => panic!("comando inesperado: {other:?}"),
        }
    }

    #[test]
    fn range_bounds_go_together() {
        assert!(Cli::try_parse_from(["tabla", "xlsx2csv", "--from", "2"]).is_err());
    }

    #[test]
    fn template_and_data_conflict() {
        assert!(
            Cli::try_parse_from(["tabla", "report", "--template", "a", "--data", "b.toml"]).is_err()
        );
    }
}
