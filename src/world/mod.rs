pub mod repository;
pub mod sqlite;

pub use repository::{RepositoryError, StatsRepository};
pub use sqlite::{ActionStat, StatsDb, StatsDbError};
