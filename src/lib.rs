pub mod chooser;
pub mod cli;
pub mod error;
pub mod manager;
pub mod parser;
pub mod populator;
pub mod schema;
pub mod settings;
pub mod writer;

pub use chooser::{Chooser, FixedColumnType, PromptChooser, ScriptedChooser};
pub use cli::{Cli, Commands};
pub use error::{Error, Result};
pub use manager::TableManager;
pub use populator::{MenuAction, MenuOption, Populator};
pub use settings::Settings;
pub use writer::Database;
