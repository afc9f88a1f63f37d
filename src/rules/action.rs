use std::fmt;

use serde::{Deserialize, Serialize};

use crate::components::agent::{Agent, Faction};

/// Everything an agent can do in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Escape,
    Investigate,
    Flee,
    Attack,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::Escape,
        Action::Investigate,
        Action::Flee,
        Action::Attack,
    ];

    /// Past-tense verb used when narrating the action.
    pub fn verb(self) -> &'static str {
        match self {
            Action::Escape => "escaped",
            Action::Investigate => "investigated",
            Action::Flee => "ran",
            Action::Attack => "attacked",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Escape => "escape",
            Action::Investigate => "investigate",
            Action::Flee => "flee",
            Action::Attack => "attack",
        };
        f.write_str(name)
    }
}

/// True if another agent of the opposing faction stands in `agent`'s zone.
///
/// Dead agents still count: a corpse of the other side keeps the zone contested.
pub fn is_conflict(roster: &[Agent], agent: &Agent) -> bool {
    roster
        .iter()
        .filter(|other| other.id != agent.id)
        .any(|other| other.faction != agent.faction && other.shares_zone_with(agent))
}

/// Ordered set of actions `agent` may consider this round.
///
/// Never empty. An unaware agent can only investigate, whatever its surroundings.
pub fn legal_actions(roster: &[Agent], agent: &Agent) -> Vec<Action> {
    if !agent.aware {
        return vec![Action::Investigate];
    }

    let conflict = is_conflict(roster, agent);
    match (agent.faction, conflict) {
        (Faction::Human, true) => vec![Action::Attack, Action::Investigate, Action::Flee],
        (Faction::Human, false) => vec![Action::Escape, Action::Investigate, Action::Flee],
        (Faction::Monster, true) if agent.is_injured() => vec![Action::Attack, Action::Flee],
        (Faction::Monster, true) => vec![Action::Attack],
        (Faction::Monster, false) if agent.is_injured() => {
            vec![Action::Investigate, Action::Flee]
        }
        (Faction::Monster, false) => vec![Action::Investigate],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agent::{HealthStatus, ZoneId};

    fn aware(mut agent: Agent) -> Agent {
        agent.aware = true;
        agent
    }

    #[test]
    fn conflict_is_symmetric_across_factions() {
        let roster = vec![
            Agent::new(0, "Ada", Faction::Human, 2),
            Agent::new(1, "Grist", Faction::Monster, 2),
        ];
        assert!(is_conflict(&roster, &roster[0]));
        assert!(is_conflict(&roster, &roster[1]));
    }

    #[test]
    fn same_faction_never_conflicts() {
        let roster = vec![
            Agent::new(0, "Ada", Faction::Human, 3),
            Agent::new(1, "Bo", Faction::Human, 3),
            Agent::new(2, "Cy", Faction::Human, 3),
            Agent::new(3, "Grist", Faction::Monster, 1),
        ];
        for agent in &roster[..3] {
            assert!(!is_conflict(&roster, agent));
        }
    }

    #[test]
    fn dead_opponents_still_count() {
        let mut monster = Agent::new(1, "Grist", Faction::Monster, 4);
        monster.kill();
        let roster = vec![Agent::new(0, "Ada", Faction::Human, 4), monster];
        assert!(is_conflict(&roster, &roster[0]));
    }

    #[test]
    fn escaped_agents_leave_conflict() {
        let mut human = Agent::new(0, "Ada", Faction::Human, 4);
        human.position = None;
        let roster = vec![human, Agent::new(1, "Grist", Faction::Monster, 4)];
        assert!(!is_conflict(&roster, &roster[1]));
    }

    #[test]
    fn unaware_agents_only_investigate() {
        let roster = vec![
            Agent::new(0, "Ada", Faction::Human, 1),
            Agent::new(1, "Grist", Faction::Monster, 1),
        ];
        assert_eq!(legal_actions(&roster, &roster[0]), vec![Action::Investigate]);
        assert_eq!(legal_actions(&roster, &roster[1]), vec![Action::Investigate]);
    }

    #[test]
    fn legality_table_in_conflict() {
        let mut injured = aware(Agent::new(2, "Maw", Faction::Monster, 1));
        injured.health = HealthStatus::Injured;
        let roster = vec![
            aware(Agent::new(0, "Ada", Faction::Human, 1)),
            aware(Agent::new(1, "Grist", Faction::Monster, 1)),
            injured,
        ];
        assert_eq!(
            legal_actions(&roster, &roster[0]),
            vec![Action::Attack, Action::Investigate, Action::Flee]
        );
        assert_eq!(legal_actions(&roster, &roster[1]), vec![Action::Attack]);
        assert_eq!(
            legal_actions(&roster, &roster[2]),
            vec![Action::Attack, Action::Flee]
        );
    }

    #[test]
    fn legality_table_without_conflict() {
        let mut injured = aware(Agent::new(2, "Maw", Faction::Monster, 3));
        injured.health = HealthStatus::Injured;
        let mut roster = vec![
            aware(Agent::new(0, "Ada", Faction::Human, 1)),
            aware(Agent::new(1, "Grist", Faction::Monster, 2)),
            injured,
        ];
        roster[2].position = Some(ZoneId(3));
        assert_eq!(
            legal_actions(&roster, &roster[0]),
            vec![Action::Escape, Action::Investigate, Action::Flee]
        );
        assert_eq!(legal_actions(&roster, &roster[1]), vec![Action::Investigate]);
        assert_eq!(
            legal_actions(&roster, &roster[2]),
            vec![Action::Investigate, Action::Flee]
        );
    }
}
