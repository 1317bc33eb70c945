// src/bin/tabla.rs

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::path::Path;

use tabla::cli::{Cli, Command, ContactsArgs, ReportArgs, XlsxArgs};
use tabla::core::contacts::{self, ContactColumns, ContactsOptions};
use tabla::core::report;
use tabla::core::settings::{self, Settings};
use tabla::core::templates;
use tabla::core::xlsx_export::{self, ExportOptions, RowRange, SheetSelector};
use tabla::system::io;

/// El punto de entrada principal de la aplicación.
fn main() {
    // Inicializar el logger. Para ver los logs, ejecuta con `RUST_LOG=debug tabla ...`
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run_cli(cli) {
        // `{:#}` muestra la cadena completa de contextos de `anyhow` en una línea.
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// El despachador principal de la aplicación.
fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    match cli.command {
        Command::Templates => handle_templates(),
        command => {
            let cwd = env::current_dir().context("No se pudo obtener el directorio actual.")?;
            let settings = settings::load_settings(&cwd)
                .context("No se pudo cargar la configuración de tabla.")?;
            log::debug!("Configuración resuelta: {:?}", settings);

            match command {
                Command::Contacts(args) => handle_contacts(&settings, args),
                Command::Xlsx2Csv(args) => handle_xlsx(&settings, args),
                Command::Report(args) => handle_report(&settings, args),
                Command::Templates => handle_templates(),
            }
        }
    }
}

/// Pregunta antes de pisar un archivo existente. `false` significa "cancelado".
fn ensure_writable(output: &Path, force: bool) -> Result<bool> {
    let proceed = io::confirm_overwrite(output, force)?;
    if !proceed {
        println!("Operación cancelada. No se modificó '{}'.", output.display());
    }
    Ok(proceed)
}

fn handle_contacts(settings: &Settings, args: ContactsArgs) -> Result<()> {
    let defaults = &settings.contacts;
    let input = args.input.unwrap_or_else(|| defaults.input.clone());
    let output = args.output.unwrap_or_else(|| defaults.output.clone());

    let options = ContactsOptions {
        columns: ContactColumns {
            name: args.name_column.unwrap_or_else(|| defaults.name_column.clone()),
            phone: args
                .phone_column
                .unwrap_or_else(|| defaults.phone_column.clone()),
        },
        country_code: args.country_code.or_else(|| defaults.country_code.clone()),
    };

    if !ensure_writable(&output, args.output_args.force)? {
        return Ok(());
    }

    let summary = contacts::convert_contacts_file(&input, &output, &options)
        .with_context(|| format!("No se pudo convertir '{}'.", input.display()))?;

    println!(
        "✔ Conversión completada: {} contactos guardados en {}",
        summary.rows,
        summary.output.display()
    );
    Ok(())
}

fn handle_xlsx(settings: &Settings, args: XlsxArgs) -> Result<()> {
    let defaults = &settings.xlsx;
    let input = args.input.unwrap_or_else(|| defaults.input.clone());
    let output = args.output.unwrap_or_else(|| defaults.output.clone());

    let options = ExportOptions {
        sheet: SheetSelector::from(args.sheet.or_else(|| defaults.sheet.clone())),
        // clap garantiza que --from y --to llegan juntos.
        range: args.from.zip(args.to).map(|(from, to)| RowRange::new(from, to)),
    };

    if !ensure_writable(&output, args.output_args.force)? {
        return Ok(());
    }

    let summary = xlsx_export::convert_xlsx_file(&input, &output, &options)
        .with_context(|| format!("No se pudo exportar '{}'.", input.display()))?;

    println!(
        "✔ Conversión completada: {} filas guardadas en {}",
        summary.rows,
        summary.output.display()
    );
    Ok(())
}

fn handle_report(settings: &Settings, args: ReportArgs) -> Result<()> {
    let defaults = &settings.report;
    let output = args.output.unwrap_or_else(|| defaults.output.clone());

    // Prioridad: --data, --template, [report].data, [report].template.
    let spec = match (&args.data, &args.template, &defaults.data) {
        (Some(path), _, _) => report::load_report_spec(path)?,
        (None, Some(name), _) => report::builtin_report(name)?,
        (None, None, Some(path)) => report::load_report_spec(path)?,
        (None, None, None) => report::builtin_report(&defaults.template)?,
    };

    if !ensure_writable(&output, args.output_args.force)? {
        return Ok(());
    }

    let summary = report::write_report(&spec, &output)
        .with_context(|| format!("No se pudo generar '{}'.", output.display()))?;

    println!(
        "✔ Informe '{}' creado: {} hojas, {} filas, {} gráficos.",
        summary.output.display(),
        summary.sheets,
        summary.rows,
        summary.charts
    );

    if args.open {
        io::open_with_default_app(&summary.output)?;
    }
    Ok(())
}

/// Muestra las plantillas de informe incluidas en el binario.
fn handle_templates() -> Result<()> {
    let names = templates::builtin_template_names();
    if names.is_empty() {
        println!("No hay plantillas internas.");
        return Ok(());
    }

    println!("Plantillas de informe disponibles:");
    for name in names {
        println!("  - {}", name);
    }
    Ok(())
}
