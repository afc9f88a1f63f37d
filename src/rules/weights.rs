use std::collections::HashMap;

use bevy_ecs::prelude::*;

use crate::components::agent::Faction;
use crate::rules::action::Action;

#[derive(Debug, thiserror::Error)]
pub enum WeightError {
    #[error("weight source unavailable: {0}")]
    Unavailable(String),
}

/// Historical action frequencies used to scale tension deltas.
///
/// Implementations must be total: an action a faction has never taken reads `0.0`.
/// `Err` is reserved for a backing store that cannot be read at all.
pub trait WeightSource {
    fn weight(&self, action: Action, faction: Faction) -> Result<f64, WeightError>;
}

/// In-memory snapshot of the action statistics, refreshed after every round.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ActionWeights {
    weights: HashMap<(Faction, Action), f64>,
}

impl ActionWeights {
    pub fn set(&mut self, faction: Faction, action: Action, weight: f64) {
        self.weights.insert((faction, action), weight);
    }

    pub fn with(mut self, faction: Faction, action: Action, weight: f64) -> Self {
        self.set(faction, action, weight);
        self
    }

    pub fn get(&self, faction: Faction, action: Action) -> f64 {
        self.weights.get(&(faction, action)).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.weights.values().all(|w| *w == 0.0)
    }
}

impl WeightSource for ActionWeights {
    fn weight(&self, action: Action, faction: Faction) -> Result<f64, WeightError> {
        Ok(self.get(faction, action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_history_reads_zero() {
        let weights = ActionWeights::default().with(Faction::Human, Action::Attack, 0.25);
        assert_eq!(weights.weight(Action::Attack, Faction::Human).unwrap(), 0.25);
        assert_eq!(weights.weight(Action::Attack, Faction::Monster).unwrap(), 0.0);
        assert_eq!(weights.weight(Action::Flee, Faction::Human).unwrap(), 0.0);
        assert!(ActionWeights::default().is_empty());
    }
}
