use crate::components::agent::Faction;
use crate::rules::action::Action;
use crate::rules::weights::ActionWeights;
use crate::world::sqlite::{ActionStat, StatsDb};

pub type RepositoryError = Box<dyn std::error::Error + Send + Sync>;

/// Storage the story loop writes realized actions and outcomes into.
pub trait StatsRepository {
    fn load_weights(&self) -> Result<ActionWeights, RepositoryError>;
    fn record_action(&mut self, action: Action, faction: Faction) -> Result<(), RepositoryError>;
    fn record_outcome(&mut self, winner: Faction) -> Result<(), RepositoryError>;
    fn outcomes(&self) -> Result<Vec<(Faction, u64)>, RepositoryError>;
    fn action_stats(&self, faction: Faction) -> Result<Vec<ActionStat>, RepositoryError>;
}

impl StatsRepository for StatsDb {
    fn load_weights(&self) -> Result<ActionWeights, RepositoryError> {
        Ok(StatsDb::load_weights(self)?)
    }

    fn record_action(&mut self, action: Action, faction: Faction) -> Result<(), RepositoryError> {
        Ok(StatsDb::record_action(self, action, faction)?)
    }

    fn record_outcome(&mut self, winner: Faction) -> Result<(), RepositoryError> {
        Ok(StatsDb::record_outcome(self, winner)?)
    }

    fn outcomes(&self) -> Result<Vec<(Faction, u64)>, RepositoryError> {
        Ok(StatsDb::outcomes(self)?)
    }

    fn action_stats(&self, faction: Faction) -> Result<Vec<ActionStat>, RepositoryError> {
        Ok(StatsDb::action_stats(self, faction)?)
    }
}
