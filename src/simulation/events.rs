use bevy_ecs::prelude::*;

use crate::components::agent::{AgentId, Faction, ZoneId};
use crate::rules::action::Action;

/// Something that happened while a round was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum StoryEvent {
    Killed {
        attacker: AgentId,
        victim: AgentId,
    },
    Wounded {
        attacker: AgentId,
        victim: AgentId,
    },
    GotAway {
        attacker: AgentId,
        target: AgentId,
    },
    Escaped {
        agent: AgentId,
    },
    EscapeFailed {
        agent: AgentId,
    },
    Discovered {
        agent: AgentId,
        found: AgentId,
        zone: ZoneId,
    },
    FoundNothing {
        agent: AgentId,
        zone: Option<ZoneId>,
    },
    Fled {
        agent: AgentId,
        zone: Option<ZoneId>,
    },
}

/// Events of the last resolved round, in the order they happened.
#[derive(Resource, Debug, Default, Clone)]
pub struct StoryEventLog(pub Vec<StoryEvent>);

/// Actions actually carried out during the last round, for the statistics store.
#[derive(Resource, Debug, Default, Clone)]
pub struct RealizedActions(pub Vec<(Action, Faction)>);
