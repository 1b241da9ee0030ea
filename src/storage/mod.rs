//! SQLite storage for harvested race data
//!
//! Each race aggregate (race header, entries, players, payouts and the
//! pending-phase ledger) is committed in a single transaction.

pub mod repository;
pub mod schema;

pub use repository::{PendingTarget, RaceRepository, SaveReport};
pub use schema::create_tables;
