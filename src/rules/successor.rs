use crate::components::agent::{Agent, Faction};
use crate::rules::action::{is_conflict, Action};
use crate::rules::weights::WeightSource;
use crate::simulation::search::SearchError;
use crate::simulation::story::StoryState;

/// Multiplier applied to the tension delta when a `faction` member takes `action`.
///
/// Monsters are damped by how often their side already took the action, humans are
/// amplified by it.
pub fn tension_modifier<W: WeightSource + ?Sized>(
    weights: &W,
    action: Action,
    faction: Faction,
) -> Result<f64, SearchError> {
    let weight = weights.weight(action, faction)?;
    if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
        return Err(SearchError::WeightOutOfRange {
            action,
            faction,
            weight,
        });
    }
    Ok(match faction {
        Faction::Monster => 1.0 - weight,
        Faction::Human => 1.0 + weight,
    })
}

/// Tension delta for `agent` taking `action`, or `None` when the action leaves the
/// story untouched.
fn tension_delta(roster: &[Agent], agent: &Agent, action: Action) -> Option<f64> {
    let conflict = is_conflict(roster, agent);
    let engaged = conflict && agent.aware;
    let wounded_monster = agent.is_monster() && agent.is_injured();

    match action {
        Action::Escape => Some(-1.0),
        Action::Investigate if engaged => Some(3.0),
        Action::Investigate if conflict => Some(2.0),
        Action::Investigate => Some(1.0),
        Action::Flee if engaged && agent.is_human() => Some(4.0),
        Action::Flee if engaged && wounded_monster => Some(-1.0),
        Action::Attack if engaged && agent.is_human() => Some(5.0),
        Action::Attack if engaged && wounded_monster => Some(2.0),
        Action::Flee | Action::Attack => None,
    }
}

/// Hypothetical state after `agent` takes `action`.
///
/// Only tension changes. The weight is read once per call, before the delta is
/// known, so a failing weight source aborts even a passthrough step.
pub fn successor<W: WeightSource + ?Sized>(
    state: &StoryState,
    roster: &[Agent],
    agent: &Agent,
    action: Action,
    weights: &W,
) -> Result<StoryState, SearchError> {
    let modifier = tension_modifier(weights, action, agent.faction)?;
    let next = match tension_delta(roster, agent, action) {
        Some(delta) => state.with_tension((state.tension + delta) * modifier),
        None => *state,
    };
    Ok(next)
}
