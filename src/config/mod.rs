pub mod aliases;
pub mod settings;

pub use aliases::load_alias_registry;
pub use settings::{AppConfig, SheetsSettings};
