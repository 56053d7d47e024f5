use anyhow::{bail, Context, Result};
use csv_db_populator::{
    cli::{Cli, Commands},
    schema::catalog,
    Chooser, FixedColumnType, Populator, PromptChooser, Settings,
};
use log::LevelFilter;
use std::time::Instant;

fn init_logging() {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    if std::env::var("RUST_LOG").is_err() {
        builder.filter_module("csv_db_populator", LevelFilter::Info);
    }
    let _ = builder.format_timestamp_millis().try_init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse_args();

    let mut settings = match &cli.config {
        Some(path) => {
            Settings::load(path).with_context(|| format!("Loading settings from {:?}", path))?
        }
        None => Settings::default(),
    };
    if let Some(database) = cli.database {
        settings.database = database;
    }

    let mut chooser: Box<dyn Chooser> = match cli.column_type {
        Some(code) => {
            if catalog::lookup(&code).is_none() {
                bail!("Unknown column type {:?}, expected one of 1-6", code);
            }
            Box::new(FixedColumnType::wrap(code, PromptChooser::stdio()))
        }
        None => Box::new(PromptChooser::stdio()),
    };

    let mut populator = Populator::open(settings.clone())
        .with_context(|| format!("Failed to open database {:?}", settings.database))?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            println!("Primary table: {}", settings.primary_table);
            populator.run(&mut *chooser)?;
        }

        Commands::Primary { csv } => {
            let start = Instant::now();
            let count = populator
                .import_primary(&csv, &mut *chooser)
                .with_context(|| format!("Failed to import {:?}", csv))?;
            println!(
                "\nCreated {} ({} records) in {:.1}s",
                settings.primary_table,
                count,
                start.elapsed().as_secs_f64()
            );
        }

        Commands::Secondary { csv, table } => {
            let start = Instant::now();
            let count = populator
                .import_secondary(&csv, &table, &mut *chooser)
                .with_context(|| format!("Failed to import {:?}", csv))?;
            println!(
                "\nCreated {} ({} records) in {:.1}s",
                table,
                count,
                start.elapsed().as_secs_f64()
            );
        }

        Commands::Directory { dir } => {
            let imported = populator
                .import_directory(&dir, &mut *chooser)
                .with_context(|| format!("Failed to import directory {:?}", dir))?;
            println!("\nCreated {} tables:", imported.len());
            for (table, count) in imported {
                println!("  {} ({} records)", table, count);
            }
        }

        Commands::ListTables => {
            println!("Tables in {:?}:\n", settings.database);
            for name in populator.database().table_names()? {
                let count = populator.database().count_rows(&name)?;
                println!("  {} ({} records)", name, count);
            }
        }
    }

    Ok(())
}
