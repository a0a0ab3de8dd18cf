pub mod client;
pub mod readers;
pub mod table;

pub use client::{SheetLocator, SheetsClient, TabularSource};
pub use readers::{LeagueReader, SheetReaders, StatsSheetReader};
pub use table::{SheetRow, SheetRows, SheetTable};
