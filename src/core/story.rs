use bevy_ecs::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::components::agent::{Agent, Faction};
use crate::config::{ConfigError, StoryConfig};
use crate::core::ecs::{create_schedule, create_world};
use crate::rules::action::Action;
use crate::rules::weights::ActionWeights;
use crate::simulation::events::{RealizedActions, StoryEvent, StoryEventLog};
use crate::simulation::search::{choose_actions_with, RoundPlan, SearchError, SearchOptions};
use crate::simulation::story::{Cast, StoryState};
use crate::systems::round::{PlannedActions, RoundCounter};
use crate::world::repository::{RepositoryError, StatsRepository};

#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    #[error("a story needs at least one agent")]
    EmptyCast,
    #[error("the story is already complete")]
    Finished,
    #[error("invalid story configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("round planning failed: {0}")]
    Search(#[from] SearchError),
    #[error("statistics store failed: {0}")]
    Stats(RepositoryError),
}

/// What one round planned and what actually happened.
#[derive(Debug, Clone)]
pub struct RoundReport {
    pub round: u32,
    pub plan: RoundPlan,
    pub events: Vec<StoryEvent>,
    pub realized: Vec<(Action, Faction)>,
    pub state: StoryState,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoryOutcome {
    pub winner: Faction,
    pub rounds: u32,
    pub state: StoryState,
}

/// Wrapper around the ECS world, the round schedule and the statistics store.
pub struct Story {
    world: World,
    schedule: Schedule,
    stats: Box<dyn StatsRepository>,
    options: SearchOptions,
}

impl Story {
    /// Start a story for `cast`. Action weights are read from `stats` up front.
    pub fn new(
        cast: Vec<Agent>,
        config: &StoryConfig,
        stats: Box<dyn StatsRepository>,
        rng: ChaCha8Rng,
    ) -> Result<Self, StoryError> {
        if cast.is_empty() {
            return Err(StoryError::EmptyCast);
        }
        config.validate()?;
        let weights = stats.load_weights().map_err(StoryError::Stats)?;
        let world = create_world(cast, config, weights, rng);

        Ok(Self {
            world,
            schedule: create_schedule(),
            stats,
            options: SearchOptions::default(),
        })
    }

    pub fn with_search_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn cast(&self) -> &[Agent] {
        &self.world.resource::<Cast>().0
    }

    pub fn state(&self) -> StoryState {
        *self.world.resource::<StoryState>()
    }

    pub fn is_complete(&self) -> bool {
        self.world.resource::<StoryState>().complete
    }

    pub fn rounds_played(&self) -> u32 {
        self.world.resource::<RoundCounter>().0
    }

    pub fn stats(&self) -> &dyn StatsRepository {
        self.stats.as_ref()
    }

    /// Plan a round over the current cast, resolve it, and feed the realized actions
    /// back into the statistics store.
    pub fn play_round(&mut self) -> Result<RoundReport, StoryError> {
        if self.is_complete() {
            return Err(StoryError::Finished);
        }

        let plan = {
            let state = self.world.resource::<StoryState>();
            let cast = &self.world.resource::<Cast>().0;
            let weights = self.world.resource::<ActionWeights>();
            choose_actions_with(state, cast, weights, self.options)?
        };
        self.world.resource_mut::<StoryState>().tension = plan.tension;
        self.world.resource_mut::<PlannedActions>().0 = plan.choices.clone();

        self.schedule.run(&mut self.world);

        let realized = self.world.resource::<RealizedActions>().0.clone();
        for &(action, faction) in &realized {
            self.stats
                .record_action(action, faction)
                .map_err(StoryError::Stats)?;
        }
        let weights = self.stats.load_weights().map_err(StoryError::Stats)?;
        self.world.insert_resource(weights);

        let report = RoundReport {
            round: self.rounds_played(),
            events: self.world.resource::<StoryEventLog>().0.clone(),
            state: self.state(),
            plan,
            realized,
        };
        debug!(
            round = report.round,
            realized = report.realized.len(),
            events = report.events.len(),
            "Round resolved"
        );
        info!(
            round = report.round,
            tension = report.plan.tension,
            complete = report.state.complete,
            "Round complete"
        );
        Ok(report)
    }

    /// Play rounds until the story completes, then record the winner.
    pub fn run_to_completion<F>(&mut self, mut on_round: F) -> Result<StoryOutcome, StoryError>
    where
        F: FnMut(&RoundReport, &[Agent]),
    {
        while !self.is_complete() {
            let report = self.play_round()?;
            on_round(&report, self.cast());
        }

        let state = self.state();
        let winner = state.winner();
        self.stats
            .record_outcome(winner)
            .map_err(StoryError::Stats)?;
        info!(winner = %winner, rounds = self.rounds_played(), "Story finished");

        Ok(StoryOutcome {
            winner,
            rounds: self.rounds_played(),
            state,
        })
    }
}
