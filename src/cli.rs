use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "csv-db-populator")]
#[command(version, about = "Import CSV datasets into a primary table and its secondary tables")]
pub struct Cli {
    /// SQLite database path (overrides the settings file)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// JSON settings file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Answer every column type question with this catalog code (1-6)
    #[arg(short = 't', long, global = true)]
    pub column_type: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive menu (default)
    Menu,

    /// Create and populate the primary table from a CSV file
    Primary {
        /// CSV file whose rows become the primary table
        csv: PathBuf,
    },

    /// Create and populate a secondary table from a CSV file
    Secondary {
        /// CSV file to import
        csv: PathBuf,

        /// Name of the new table
        #[arg(short = 'n', long)]
        table: String,
    },

    /// Create a secondary table for every CSV file in a directory
    Directory {
        /// Directory containing CSV files
        dir: PathBuf,
    },

    /// List tables in the database
    ListTables,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
