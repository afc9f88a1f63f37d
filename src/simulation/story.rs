use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::agent::{Agent, Faction};

/// The live roster, in search order. Mutated only between rounds.
#[derive(Resource, Debug, Clone, Default)]
pub struct Cast(pub Vec<Agent>);

/// Aggregate story snapshot the search evaluates.
///
/// This is a plain value: every hypothetical step derives a new one through
/// [`StoryState::with_tension`], so search branches never share mutable state.
/// Counters are only advanced by the story loop after a round concludes.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StoryState {
    pub tension: f64,
    pub num_humans: u32,
    pub num_monsters: u32,
    pub num_humans_dead: u32,
    pub num_monsters_dead: u32,
    pub num_escaped: u32,
    pub complete: bool,
}

impl StoryState {
    /// Initial state for a freshly loaded cast.
    pub fn for_cast(cast: &[Agent]) -> Self {
        let num_humans = cast.iter().filter(|a| a.is_human()).count() as u32;
        let num_monsters = cast.len() as u32 - num_humans;
        Self {
            num_humans,
            num_monsters,
            ..Self::default()
        }
    }

    pub fn with_tension(self, tension: f64) -> Self {
        Self { tension, ..self }
    }

    /// True once every human is dead or gone, or every monster is dead.
    pub fn is_resolved(&self) -> bool {
        self.num_humans_dead + self.num_escaped == self.num_humans
            || self.num_monsters_dead == self.num_monsters
    }

    /// Monsters win only if every human died.
    pub fn winner(&self) -> Faction {
        if self.num_humans_dead == self.num_humans {
            Faction::Monster
        } else {
            Faction::Human
        }
    }

    pub fn record_death(&mut self, faction: Faction) {
        match faction {
            Faction::Human => self.num_humans_dead += 1,
            Faction::Monster => self.num_monsters_dead += 1,
        }
    }
}
