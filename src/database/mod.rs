pub mod aliases;
pub mod connection;
pub mod entries;
pub mod leagues;
pub mod matches;
pub mod models;
pub mod players;
pub mod setup;
pub mod store;

pub use connection::{DbConn, DbPool, create_memory_pool, create_pool, get_connection};
pub use models::*;
pub use store::{LeagueStore, NewPlayer, SqliteStore};
