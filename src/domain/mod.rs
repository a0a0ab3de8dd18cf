pub mod achievements;
pub mod aliases;
pub mod dates;
pub mod matches;
pub mod models;
pub mod names;

pub use achievements::{Achievement, Rarity, achievements_for};
pub use aliases::{AliasGroup, AliasRegistry};
pub use matches::{MatchHalf, MatchPairReconciler, MatchResult, SheetMatch};
pub use models::*;
pub use names::{FullName, NAME_SEPARATOR, NameReference, PartialName};
