//! Plain-text narration of a story. Presentation only; nothing here feeds back
//! into the simulation.

use crate::components::agent::{Agent, AgentId};
use crate::simulation::events::StoryEvent;
use crate::simulation::story::StoryState;

pub fn introduce_world(state: &StoryState) -> String {
    let mut text = String::from("In this world there are monsters and humans.");
    if state.num_humans == 1 {
        text.push_str(&format!(
            " A human must find {} {}, and destroy {}.",
            state.num_monsters,
            plural(state.num_monsters, "monster", "monsters"),
            plural(state.num_monsters, "it", "them"),
        ));
    } else if state.num_monsters == 1 {
        text.push_str(" The humans must find the monster, and destroy it.");
    } else {
        text.push_str(&format!(
            " The {} humans must find the {} monsters, and destroy them.",
            state.num_humans, state.num_monsters
        ));
    }
    text
}

pub fn introduce_cast(cast: &[Agent]) -> Vec<String> {
    cast.iter()
        .map(|agent| {
            let description = if agent.appearance.is_empty() {
                agent.faction.to_string()
            } else {
                format!("{} {}", agent.appearance, agent.faction)
            };
            let article = if description.starts_with(['a', 'e', 'i', 'o', 'u']) {
                "an"
            } else {
                "a"
            };
            format!("{} was {} {}.", agent.name, article, description)
        })
        .collect()
}

pub fn render_event(event: &StoryEvent, cast: &[Agent]) -> String {
    match event {
        StoryEvent::Killed { attacker, victim } => {
            let victim_agent = find(cast, *victim);
            if victim_agent.map(Agent::is_monster).unwrap_or(false) {
                format!(
                    "{} attacked the monster, {}, killing it.",
                    name(cast, *attacker),
                    name(cast, *victim)
                )
            } else {
                let pronoun = victim_agent
                    .map(|a| a.gender.object_pronoun())
                    .unwrap_or("them");
                format!(
                    "{} attacked {}, killing {}.",
                    name(cast, *attacker),
                    name(cast, *victim),
                    pronoun
                )
            }
        }
        StoryEvent::Wounded { attacker, victim } => format!(
            "{} attacked the monster, {}, but failed to kill it.",
            name(cast, *attacker),
            name(cast, *victim)
        ),
        StoryEvent::GotAway { attacker, target } => {
            let pronoun = find(cast, *target)
                .map(|a| a.gender.subject_pronoun())
                .unwrap_or("they");
            format!(
                "{} attacked {}, but {} managed to get away.",
                name(cast, *attacker),
                name(cast, *target),
                pronoun
            )
        }
        StoryEvent::Escaped { agent } => {
            format!("{} escaped from the monsters' domain.", name(cast, *agent))
        }
        StoryEvent::EscapeFailed { agent } => format!(
            "{} attempted to escape from the monsters' domain, but failed.",
            name(cast, *agent)
        ),
        StoryEvent::Discovered { agent, found, .. } => {
            let seeker = find(cast, *agent);
            if seeker.map(Agent::is_monster).unwrap_or(false) {
                format!(
                    "The monster, {}, investigated, finding {}.",
                    name(cast, *agent),
                    name(cast, *found)
                )
            } else {
                format!(
                    "{} investigated, finding the monster, {}.",
                    name(cast, *agent),
                    name(cast, *found)
                )
            }
        }
        StoryEvent::FoundNothing { agent, .. } => {
            format!("{} investigated, finding nothing.", name(cast, *agent))
        }
        StoryEvent::Fled { agent, .. } => {
            let reason = if find(cast, *agent).map(Agent::is_human).unwrap_or(true) {
                "fleeing in terror"
            } else {
                "fleeing to tend to its wounds"
            };
            format!("{} ran, {}.", name(cast, *agent), reason)
        }
    }
}

pub fn conclude(state: &StoryState, cast: &[Agent]) -> Vec<String> {
    let mut lines = vec!["Thus, the story ends.".to_string()];
    if state.num_monsters_dead == state.num_monsters {
        lines.push(
            plural(
                state.num_monsters,
                "The monster was defeated.",
                "The monsters were defeated.",
            )
            .to_string(),
        );
    } else {
        lines.push("The humans had failed to defeat the monsters.".to_string());
    }

    for agent in cast {
        let fate = if agent.has_escaped() {
            "escaped"
        } else if agent.alive {
            "survived"
        } else {
            "died"
        };
        lines.push(format!("{} {}.", agent.name, fate));
    }
    lines
}

fn find(cast: &[Agent], id: AgentId) -> Option<&Agent> {
    cast.iter().find(|agent| agent.id == id)
}

fn name(cast: &[Agent], id: AgentId) -> String {
    find(cast, id)
        .map(|agent| agent.name.clone())
        .unwrap_or_else(|| format!("Agent {}", id))
}

fn plural<'a>(count: u32, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agent::{Faction, Gender};

    fn cast() -> Vec<Agent> {
        let mut ada = Agent::new(0, "Ada", Faction::Human, 1);
        ada.gender = Gender::Female;
        ada.appearance = "attractive".into();
        let mut grist = Agent::new(1, "Grist", Faction::Monster, 1);
        grist.appearance = "vile".into();
        vec![ada, grist]
    }

    #[test]
    fn introduces_each_agent() {
        let lines = introduce_cast(&cast());
        assert_eq!(lines[0], "Ada was an attractive human.");
        assert_eq!(lines[1], "Grist was a vile monster.");
    }

    #[test]
    fn kill_lines_use_pronouns() {
        let cast = cast();
        let line = render_event(
            &StoryEvent::Killed {
                attacker: AgentId(1),
                victim: AgentId(0),
            },
            &cast,
        );
        assert_eq!(line, "Grist attacked Ada, killing her.");
        let line = render_event(
            &StoryEvent::Killed {
                attacker: AgentId(0),
                victim: AgentId(1),
            },
            &cast,
        );
        assert_eq!(line, "Ada attacked the monster, Grist, killing it.");
    }

    #[test]
    fn conclusion_reports_each_fate() {
        let mut cast = cast();
        cast[0].position = None;
        cast[1].kill();
        let state = StoryState {
            num_humans: 1,
            num_monsters: 1,
            num_monsters_dead: 1,
            num_escaped: 1,
            ..StoryState::default()
        };
        let lines = conclude(&state, &cast);
        assert_eq!(lines[1], "The monster was defeated.");
        assert_eq!(lines[2], "Ada escaped.");
        assert_eq!(lines[3], "Grist died.");
    }
}
