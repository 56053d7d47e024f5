//! Orchestration of imports on top of [`TableManager`]
//!
//! Owns the database session and settings for a run, enforces that the
//! primary table exists before any secondary import, and drives the
//! interactive menu.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::chooser::Chooser;
use crate::error::{Error, Result};
use crate::manager::TableManager;
use crate::settings::Settings;
use crate::writer::Database;

/// Top-level menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    CreatePrimary,
    AddSecondary,
    AddDirectory,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 4] = [
        MenuAction::CreatePrimary,
        MenuAction::AddSecondary,
        MenuAction::AddDirectory,
        MenuAction::Exit,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            MenuAction::CreatePrimary => "1",
            MenuAction::AddSecondary => "2",
            MenuAction::AddDirectory => "3",
            MenuAction::Exit => "4",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL.into_iter().find(|action| action.code() == code)
    }

    /// Menu line text; the primary entry names the configured table
    pub fn label(&self, primary_table: &str) -> String {
        match self {
            MenuAction::CreatePrimary => format!("Add primary '{}' table from csv", primary_table),
            MenuAction::AddSecondary => {
                "Add dataset that will populate a secondary table as csv".to_string()
            }
            MenuAction::AddDirectory => {
                "Add datasets from directory to create secondary tables".to_string()
            }
            MenuAction::Exit => "exit".to_string(),
        }
    }
}

/// One line of the menu as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub action: MenuAction,
    pub label: String,
}

impl MenuOption {
    pub fn code(&self) -> &'static str {
        self.action.code()
    }
}

pub struct Populator {
    db: Database,
    settings: Settings,
}

impl Populator {
    pub fn new(db: Database, settings: Settings) -> Self {
        Self { db, settings }
    }

    /// Open the database named in the settings
    pub fn open(settings: Settings) -> Result<Self> {
        let db = Database::open(&settings.database)?;
        Ok(Self::new(db, settings))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The top-level menu for this run's primary table
    pub fn menu(&self) -> Vec<MenuOption> {
        MenuAction::ALL
            .into_iter()
            .map(|action| MenuOption {
                action,
                label: action.label(&self.settings.primary_table),
            })
            .collect()
    }

    /// Fails with [`Error::MissingPrimaryTable`] unless the primary table exists
    pub fn require_primary(&self) -> Result<()> {
        if self.db.table_exists(&self.settings.primary_table)? {
            Ok(())
        } else {
            Err(Error::MissingPrimaryTable {
                table: self.settings.primary_table.clone(),
            })
        }
    }

    pub fn import_primary(&mut self, file: &Path, chooser: &mut dyn Chooser) -> Result<u64> {
        require_file(file)?;
        TableManager::primary(&mut self.db, &self.settings, file).populate_table(chooser)
    }

    pub fn import_secondary(
        &mut self,
        file: &Path,
        table_name: &str,
        chooser: &mut dyn Chooser,
    ) -> Result<u64> {
        self.require_primary()?;
        require_file(file)?;
        TableManager::secondary(&mut self.db, &self.settings, file, table_name)
            .populate_table(chooser)
    }

    /// Import every `.csv` file of `dir` as a secondary table, asking for a
    /// table name per file. A blank answer uses the file stem.
    pub fn import_directory(
        &mut self,
        dir: &Path,
        chooser: &mut dyn Chooser,
    ) -> Result<Vec<(String, u64)>> {
        self.require_primary()?;
        let files = csv_files(dir)?;
        info!("Found {} csv files in {:?}", files.len(), dir);

        let mut imported = Vec::with_capacity(files.len());
        for file in files {
            let table_name = ask_table_name(&file, chooser)?;
            let count = self.import_secondary(&file, &table_name, chooser)?;
            imported.push((table_name, count));
        }
        Ok(imported)
    }

    /// Interactive loop: ask for a menu action, run it, report failures and
    /// ask again. Ends on the exit action or when the chooser's input closes.
    pub fn run(&mut self, chooser: &mut dyn Chooser) -> Result<()> {
        let menu = self.menu();
        loop {
            let answer = match chooser.choose_menu_action(&menu) {
                Ok(answer) => answer,
                Err(Error::InputClosed) => return Ok(()),
                Err(err) => return Err(err),
            };
            let Some(action) = MenuAction::from_code(&answer) else {
                warn!("{:?} is not a menu option", answer);
                continue;
            };
            if action == MenuAction::Exit {
                return Ok(());
            }

            match self.dispatch(action, chooser) {
                Ok(()) => println!("Success!"),
                Err(Error::InputClosed) => return Ok(()),
                Err(err) => {
                    debug!("{:?} failed: {:?}", action, err);
                    println!("{}", err);
                }
            }
        }
    }

    fn dispatch(&mut self, action: MenuAction, chooser: &mut dyn Chooser) -> Result<()> {
        match action {
            MenuAction::CreatePrimary => {
                let file = ask_for_csv(chooser)?;
                self.import_primary(&file, chooser)?;
            }
            MenuAction::AddSecondary => {
                self.require_primary()?;
                let file = ask_for_csv(chooser)?;
                let table_name = ask_table_name(&file, chooser)?;
                self.import_secondary(&file, &table_name, chooser)?;
            }
            MenuAction::AddDirectory => {
                self.require_primary()?;
                let dir = PathBuf::from(chooser.ask("Type the name of the directory: ")?);
                self.import_directory(&dir, chooser)?;
            }
            MenuAction::Exit => {}
        }
        Ok(())
    }
}

fn require_file(file: &Path) -> Result<()> {
    if file.is_file() {
        Ok(())
    } else {
        Err(Error::FileNotFound(file.to_path_buf()))
    }
}

fn ask_for_csv(chooser: &mut dyn Chooser) -> Result<PathBuf> {
    Ok(PathBuf::from(
        chooser.ask("Type the path name of the .csv file: ")?,
    ))
}

fn ask_table_name(file: &Path, chooser: &mut dyn Chooser) -> Result<String> {
    let answer = chooser.ask(&format!("Type a table name for {}: ", file.display()))?;
    let answer = answer.trim();
    if !answer.is_empty() {
        return Ok(answer.to_string());
    }
    Ok(file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default())
}

/// `.csv` files directly inside `dir`, sorted by path
fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::FileNotFound(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
