use bevy_ecs::prelude::*;
use bevy_ecs::schedule::SystemSet;
use rand_chacha::ChaCha8Rng;

use crate::components::agent::Agent;
use crate::config::StoryConfig;
use crate::rules::weights::ActionWeights;
use crate::simulation::events::{RealizedActions, StoryEventLog};
use crate::simulation::story::{Cast, StoryState};
use crate::systems::round::{
    completion_system, resolve_actions_system, PlannedActions, RoundCounter, RoundRules, StoryRng,
};

/// Canonical round ordering.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum RoundSet {
    Resolve,
    Cleanup,
}

/// Build the ECS world with the cast and baseline resources.
pub fn create_world(
    cast: Vec<Agent>,
    config: &StoryConfig,
    weights: ActionWeights,
    rng: ChaCha8Rng,
) -> World {
    let mut world = World::new();
    world.insert_resource(StoryState::for_cast(&cast));
    world.insert_resource(Cast(cast));
    world.insert_resource(PlannedActions::default());
    world.insert_resource(StoryEventLog::default());
    world.insert_resource(RealizedActions::default());
    world.insert_resource(RoundCounter::default());
    world.insert_resource(RoundRules {
        outcome: config.rules,
        zone_count: config.zone_count,
        max_rounds: config.max_rounds,
    });
    world.insert_resource(StoryRng(rng));
    world.insert_resource(weights);
    world
}

/// Build the system schedule in the canonical order.
pub fn create_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.configure_sets((RoundSet::Resolve, RoundSet::Cleanup).chain());

    schedule.add_systems((
        resolve_actions_system.in_set(RoundSet::Resolve),
        completion_system.in_set(RoundSet::Cleanup),
    ));

    schedule
}
