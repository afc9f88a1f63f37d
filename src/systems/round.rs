use bevy_ecs::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::components::agent::{Agent, Faction, ZoneId};
use crate::config::OutcomeRules;
use crate::rules::action::{is_conflict, Action};
use crate::simulation::events::{RealizedActions, StoryEvent, StoryEventLog};
use crate::simulation::search::Choice;
use crate::simulation::story::{Cast, StoryState};

/// Choices the search made for the round about to be resolved.
#[derive(Resource, Debug, Default, Clone)]
pub struct PlannedActions(pub Vec<Choice>);

#[derive(Resource, Debug, Clone)]
pub struct StoryRng(pub ChaCha8Rng);

#[derive(Resource, Debug, Clone, Copy)]
pub struct RoundRules {
    pub outcome: OutcomeRules,
    pub zone_count: u8,
    pub max_rounds: u32,
}

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct RoundCounter(pub u32);

/// Carry out the planned actions in roster order.
///
/// An attack with no opponent in the zone is dropped, and agents that are dead or
/// gone do nothing. Resolution stops as soon as the story is resolved.
pub fn resolve_round<R: Rng + ?Sized>(
    cast: &mut [Agent],
    state: &mut StoryState,
    choices: &[Choice],
    rules: &RoundRules,
    rng: &mut R,
    events: &mut StoryEventLog,
    realized: &mut RealizedActions,
) {
    events.0.clear();
    realized.0.clear();

    for choice in choices {
        let Some(idx) = cast.iter().position(|agent| agent.id == choice.agent_id) else {
            warn!(agent = %choice.agent_id, "planned action for unknown agent");
            continue;
        };
        if choice.action == Action::Attack && !is_conflict(cast, &cast[idx]) {
            continue;
        }
        if !cast[idx].is_active() {
            continue;
        }

        let faction = cast[idx].faction;
        match choice.action {
            Action::Attack => resolve_attack(cast, idx, state, &rules.outcome, rng, events),
            Action::Escape => resolve_escape(cast, idx, state, &rules.outcome, rng, events),
            Action::Investigate => resolve_investigate(cast, idx, rules, rng, events),
            Action::Flee => resolve_flee(cast, idx, rules.zone_count, rng, events),
        }
        realized.0.push((choice.action, faction));

        if state.is_resolved() {
            state.complete = true;
            break;
        }
    }
}

fn resolve_attack<R: Rng + ?Sized>(
    cast: &mut [Agent],
    idx: usize,
    state: &mut StoryState,
    rules: &OutcomeRules,
    rng: &mut R,
    events: &mut StoryEventLog,
) {
    let attacker = &cast[idx];
    let Some(target) = cast.iter().position(|other| {
        other.id != attacker.id
            && other.alive
            && other.faction == attacker.faction.opponent()
            && other.shares_zone_with(attacker)
    }) else {
        return;
    };
    let attacker_id = attacker.id;
    let target_id = cast[target].id;
    let roll: u8 = rng.gen_range(1..=100);

    match cast[idx].faction {
        Faction::Human => {
            let fatal = if roll <= rules.human_kill_chance {
                cast[target].kill();
                true
            } else {
                cast[target].wound()
            };
            if fatal {
                state.record_death(Faction::Monster);
                events.0.push(StoryEvent::Killed {
                    attacker: attacker_id,
                    victim: target_id,
                });
            } else {
                events.0.push(StoryEvent::Wounded {
                    attacker: attacker_id,
                    victim: target_id,
                });
            }
        }
        Faction::Monster => {
            if roll > 100 - rules.monster_kill_chance {
                cast[target].kill();
                state.record_death(Faction::Human);
                events.0.push(StoryEvent::Killed {
                    attacker: attacker_id,
                    victim: target_id,
                });
            } else {
                events.0.push(StoryEvent::GotAway {
                    attacker: attacker_id,
                    target: target_id,
                });
            }
        }
    }
}

fn resolve_escape<R: Rng + ?Sized>(
    cast: &mut [Agent],
    idx: usize,
    state: &mut StoryState,
    rules: &OutcomeRules,
    rng: &mut R,
    events: &mut StoryEventLog,
) {
    let agent = &mut cast[idx];
    let roll: u8 = rng.gen_range(1..=100);
    if roll <= rules.escape_chance {
        agent.position = None;
        state.num_escaped += 1;
        events.0.push(StoryEvent::Escaped { agent: agent.id });
    } else {
        events.0.push(StoryEvent::EscapeFailed { agent: agent.id });
    }
}

fn resolve_investigate<R: Rng + ?Sized>(
    cast: &mut [Agent],
    idx: usize,
    rules: &RoundRules,
    rng: &mut R,
    events: &mut StoryEventLog,
) {
    let step: u8 = rng.gen_range(1..=3);
    let find_roll: u8 = rng.gen_range(1..=100);

    if let Some(ZoneId(zone)) = cast[idx].position {
        cast[idx].position = Some(ZoneId(wander(zone, rules.zone_count, step)));
    }

    let agent = &cast[idx];
    let found = cast
        .iter()
        .find(|other| other.faction != agent.faction && other.shares_zone_with(agent))
        .map(|other| other.id);
    let agent_id = agent.id;
    let zone = agent.position;

    match (found, zone) {
        (Some(found), Some(zone)) if find_roll <= rules.outcome.discover_chance => {
            cast[idx].aware = true;
            events.0.push(StoryEvent::Discovered {
                agent: agent_id,
                found,
                zone,
            });
        }
        _ => events.0.push(StoryEvent::FoundNothing {
            agent: agent_id,
            zone,
        }),
    }
}

fn resolve_flee<R: Rng + ?Sized>(
    cast: &mut [Agent],
    idx: usize,
    zone_count: u8,
    rng: &mut R,
    events: &mut StoryEventLog,
) {
    let roll: u8 = rng.gen_range(1..=2);
    let agent = &mut cast[idx];
    if let Some(ZoneId(zone)) = agent.position {
        agent.position = Some(ZoneId(flee(zone, zone_count, roll)));
    }
    events.0.push(StoryEvent::Fled {
        agent: agent.id,
        zone: agent.position,
    });
}

/// One investigation step: interior zones drift down, up or stay by `roll` (1..=3);
/// edge zones step inward unless the roll says stay.
pub fn wander(zone: u8, zone_count: u8, roll: u8) -> u8 {
    let interior = zone > 1 && zone < zone_count;
    match roll {
        3 => zone,
        1 if interior => zone - 1,
        2 if interior => zone + 1,
        _ if zone <= 1 => 2.min(zone_count).max(1),
        _ => zone_count.saturating_sub(1).max(1),
    }
}

/// Fleeing covers two zones: down on roll 1, up on roll 2, if the world allows it.
pub fn flee(zone: u8, zone_count: u8, roll: u8) -> u8 {
    match roll {
        1 if zone > 2 => zone - 2,
        2 if zone.saturating_add(2) <= zone_count => zone + 2,
        _ => zone,
    }
}

/// System: resolves the planned actions against the live cast.
pub fn resolve_actions_system(
    mut cast: ResMut<Cast>,
    mut state: ResMut<StoryState>,
    plan: Res<PlannedActions>,
    rules: Res<RoundRules>,
    mut rng: ResMut<StoryRng>,
    mut events: ResMut<StoryEventLog>,
    mut realized: ResMut<RealizedActions>,
) {
    resolve_round(
        &mut cast.0,
        &mut state,
        &plan.0,
        &rules,
        &mut rng.0,
        &mut events,
        &mut realized,
    );
}

/// System: counts the round and closes the story when it is resolved or out of rounds.
pub fn completion_system(
    mut state: ResMut<StoryState>,
    mut counter: ResMut<RoundCounter>,
    rules: Res<RoundRules>,
) {
    counter.0 += 1;
    if state.is_resolved() {
        state.complete = true;
    } else if counter.0 >= rules.max_rounds && !state.complete {
        info!(rounds = counter.0, "Round limit reached; closing the story");
        state.complete = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agent::{AgentId, HealthStatus};
    use rand::SeedableRng;

    fn rules(outcome: OutcomeRules) -> RoundRules {
        RoundRules {
            outcome,
            zone_count: 4,
            max_rounds: 10,
        }
    }

    fn certain() -> OutcomeRules {
        OutcomeRules {
            human_kill_chance: 100,
            monster_kill_chance: 100,
            escape_chance: 100,
            discover_chance: 100,
        }
    }

    fn never() -> OutcomeRules {
        OutcomeRules {
            human_kill_chance: 0,
            monster_kill_chance: 0,
            escape_chance: 0,
            discover_chance: 0,
        }
    }

    fn choice(id: u32, action: Action) -> Choice {
        Choice {
            agent_id: AgentId(id),
            action,
        }
    }

    struct Round {
        cast: Vec<Agent>,
        state: StoryState,
        events: StoryEventLog,
        realized: RealizedActions,
    }

    fn run(cast: Vec<Agent>, choices: &[Choice], outcome: OutcomeRules) -> Round {
        let mut round = Round {
            state: StoryState::for_cast(&cast),
            cast,
            events: StoryEventLog::default(),
            realized: RealizedActions::default(),
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        resolve_round(
            &mut round.cast,
            &mut round.state,
            choices,
            &rules(outcome),
            &mut rng,
            &mut round.events,
            &mut round.realized,
        );
        round
    }

    fn duel() -> Vec<Agent> {
        vec![
            Agent::new(0, "Ada", Faction::Human, 2),
            Agent::new(1, "Grist", Faction::Monster, 2),
            Agent::new(2, "Bo", Faction::Human, 4),
        ]
    }

    #[test]
    fn certain_human_attack_kills_and_ends_the_story() {
        let round = run(
            duel(),
            &[choice(0, Action::Attack), choice(1, Action::Attack)],
            certain(),
        );
        assert!(round.cast[1].is_dead());
        assert_eq!(round.state.num_monsters_dead, 1);
        assert!(round.state.complete);
        assert_eq!(round.realized.0, vec![(Action::Attack, Faction::Human)]);
        assert_eq!(
            round.events.0,
            vec![StoryEvent::Killed {
                attacker: AgentId(0),
                victim: AgentId(1)
            }]
        );
    }

    #[test]
    fn failed_human_attacks_wound_then_kill() {
        let round = run(
            duel(),
            &[choice(0, Action::Attack), choice(2, Action::Investigate)],
            never(),
        );
        assert_eq!(round.cast[1].health, HealthStatus::Injured);
        assert!(round.cast[1].alive);

        let round = run(
            round.cast,
            &[choice(0, Action::Attack)],
            never(),
        );
        assert!(round.cast[1].is_dead());
        assert_eq!(round.state.num_monsters_dead, 1);
    }

    #[test]
    fn monster_attack_can_miss() {
        let round = run(duel(), &[choice(1, Action::Attack)], never());
        assert!(round.cast[0].alive);
        assert!(matches!(round.events.0[0], StoryEvent::GotAway { .. }));

        let round = run(duel(), &[choice(1, Action::Attack)], certain());
        assert!(round.cast[0].is_dead());
        assert_eq!(round.state.num_humans_dead, 1);
        assert!(!round.state.complete);
    }

    #[test]
    fn attack_without_conflict_is_dropped() {
        let round = run(duel(), &[choice(2, Action::Attack)], certain());
        assert!(round.realized.0.is_empty());
        assert!(round.events.0.is_empty());
    }

    #[test]
    fn inactive_agents_do_nothing() {
        let mut cast = duel();
        cast[0].kill();
        let round = run(cast, &[choice(0, Action::Flee)], certain());
        assert!(round.realized.0.is_empty());
        assert_eq!(round.cast[0].position, Some(ZoneId(2)));
    }

    #[test]
    fn escapes_stop_resolution_once_resolved() {
        let round = run(
            duel(),
            &[
                choice(0, Action::Escape),
                choice(2, Action::Escape),
                choice(1, Action::Investigate),
            ],
            certain(),
        );
        assert_eq!(round.state.num_escaped, 2);
        assert!(round.state.complete);
        assert_eq!(round.realized.0.len(), 2);
        assert!(round.cast[0].has_escaped());
        assert_eq!(round.state.winner(), Faction::Human);
    }

    #[test]
    fn failed_escape_keeps_position() {
        let round = run(duel(), &[choice(2, Action::Escape)], never());
        assert_eq!(round.cast[2].position, Some(ZoneId(4)));
        assert_eq!(round.events.0, vec![StoryEvent::EscapeFailed { agent: AgentId(2) }]);
    }

    #[test]
    fn wander_table() {
        assert_eq!(wander(2, 4, 1), 1);
        assert_eq!(wander(2, 4, 2), 3);
        assert_eq!(wander(3, 4, 3), 3);
        assert_eq!(wander(1, 4, 1), 2);
        assert_eq!(wander(1, 4, 3), 1);
        assert_eq!(wander(4, 4, 2), 3);
        assert_eq!(wander(1, 1, 2), 1);
    }

    #[test]
    fn flee_table() {
        assert_eq!(flee(3, 4, 1), 1);
        assert_eq!(flee(2, 4, 1), 2);
        assert_eq!(flee(2, 4, 2), 4);
        assert_eq!(flee(3, 4, 2), 3);
    }
}
