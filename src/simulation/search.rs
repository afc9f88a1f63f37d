//! Adversarial tension search.
//!
//! Every agent in the roster is one level of a minimax tree: monsters maximize the
//! story's tension, humans minimize it. Each level enumerates the agent's legal
//! actions, derives the hypothetical successor state and recurses into the next
//! agent; once every agent has chosen, the tension of the resulting state is the
//! leaf value. Alpha-beta bounds prune branches that cannot change the root value.
//!
//! Each node returns its value together with its own `(action, running value)` entries
//! and the trace of the child that set that value. The root result is therefore the
//! principal line of the tree: level `L` of the [`DecisionTrace`] holds the entries of
//! the node reached through the selected actions of agents `0..L`. A cutoff only ever
//! truncates nodes off that line, so the selected actions do not depend on pruning.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::components::agent::{Agent, AgentId, Faction};
use crate::rules::action::{legal_actions, Action};
use crate::rules::successor::successor;
use crate::rules::weights::{WeightError, WeightSource};
use crate::simulation::story::StoryState;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("agent {0} appears more than once in the roster")]
    DuplicateAgent(AgentId),
    #[error(transparent)]
    Weights(#[from] WeightError),
    #[error("weight {weight} for {faction} action {action} is outside [0, 1]")]
    WeightOutOfRange {
        action: Action,
        faction: Faction,
        weight: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Stop enumerating a level once its value falls outside the alpha-beta window.
    pub pruning: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { pruning: true }
    }
}

/// One explored action and the level's running value right after it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceEntry {
    pub action: Action,
    pub value: f64,
}

/// Per-level record of the choices explored along the principal line of one search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecisionTrace {
    layers: Vec<Vec<TraceEntry>>,
}

impl DecisionTrace {
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, level: usize) -> &[TraceEntry] {
        self.layers.get(level).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The action `faction` would pick at `level`: first maximal entry for monsters,
    /// first minimal entry for humans.
    pub fn select(&self, level: usize, faction: Faction) -> Option<Action> {
        let mut best: Option<TraceEntry> = None;
        for entry in self.layer(level) {
            let better = match (best, faction) {
                (None, _) => true,
                (Some(current), Faction::Monster) => entry.value > current.value,
                (Some(current), Faction::Human) => entry.value < current.value,
            };
            if better {
                best = Some(*entry);
            }
        }
        best.map(|entry| entry.action)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub agent_id: AgentId,
    pub action: Action,
}

/// Result of planning one round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundPlan {
    /// Root value of the search; becomes the live story's tension.
    pub tension: f64,
    /// One choice per agent, in roster order.
    pub choices: Vec<Choice>,
    pub trace: DecisionTrace,
}

impl RoundPlan {
    pub fn action_for(&self, agent_id: AgentId) -> Option<Action> {
        self.choices
            .iter()
            .find(|choice| choice.agent_id == agent_id)
            .map(|choice| choice.action)
    }
}

/// Plan a round with alpha-beta pruning enabled.
pub fn choose_actions<W: WeightSource + ?Sized>(
    state: &StoryState,
    roster: &[Agent],
    weights: &W,
) -> Result<RoundPlan, SearchError> {
    choose_actions_with(state, roster, weights, SearchOptions::default())
}

pub fn choose_actions_with<W: WeightSource + ?Sized>(
    state: &StoryState,
    roster: &[Agent],
    weights: &W,
    options: SearchOptions,
) -> Result<RoundPlan, SearchError> {
    validate_roster(roster)?;

    let mut search = TensionSearch {
        roster,
        weights,
        options,
        nodes: 0,
        cutoffs: 0,
    };
    let root = search.value(*state, 0, f64::NEG_INFINITY, f64::INFINITY)?;
    let trace = DecisionTrace { layers: root.layers };

    let mut choices = Vec::with_capacity(roster.len());
    for (level, agent) in roster.iter().enumerate() {
        match trace.select(level, agent.faction) {
            Some(action) => choices.push(Choice {
                agent_id: agent.id,
                action,
            }),
            None => warn!(agent = %agent.id, level, "no action explored for agent"),
        }
    }

    debug!(
        agents = roster.len(),
        tension_in = state.tension,
        tension_out = root.value,
        nodes = search.nodes,
        cutoffs = search.cutoffs,
        "Round planned"
    );

    Ok(RoundPlan {
        tension: root.value,
        choices,
        trace,
    })
}

fn validate_roster(roster: &[Agent]) -> Result<(), SearchError> {
    let mut seen = HashSet::with_capacity(roster.len());
    for agent in roster {
        if !seen.insert(agent.id) {
            return Err(SearchError::DuplicateAgent(agent.id));
        }
    }
    Ok(())
}

/// Value of a subtree, its own trace entries and the principal child's layers below.
struct Node {
    value: f64,
    layers: Vec<Vec<TraceEntry>>,
}

impl Node {
    fn empty(value: f64, depth: usize) -> Self {
        Self {
            value,
            layers: vec![Vec::new(); depth],
        }
    }

    fn with_line(value: f64, entries: Vec<TraceEntry>, below: Vec<Vec<TraceEntry>>) -> Self {
        let mut layers = Vec::with_capacity(below.len() + 1);
        layers.push(entries);
        layers.extend(below);
        Self { value, layers }
    }
}

struct TensionSearch<'a, W: ?Sized> {
    roster: &'a [Agent],
    weights: &'a W,
    options: SearchOptions,
    nodes: u64,
    cutoffs: u64,
}

impl<'a, W: WeightSource + ?Sized> TensionSearch<'a, W> {
    fn value(
        &mut self,
        state: StoryState,
        level: usize,
        alpha: f64,
        beta: f64,
    ) -> Result<Node, SearchError> {
        self.nodes += 1;
        let roster = self.roster;
        let Some(agent) = roster.get(level) else {
            return Ok(Node::empty(state.tension, 0));
        };

        match agent.faction {
            Faction::Monster => self.max_value(state, agent, level, alpha, beta),
            Faction::Human => self.min_value(state, agent, level, alpha, beta),
        }
    }

    fn max_value(
        &mut self,
        state: StoryState,
        agent: &'a Agent,
        level: usize,
        mut alpha: f64,
        beta: f64,
    ) -> Result<Node, SearchError> {
        let roster = self.roster;
        let actions = legal_actions(roster, agent);
        if actions.is_empty() {
            return Ok(Node::empty(state.tension, roster.len() - level));
        }

        let mut value = f64::NEG_INFINITY;
        let mut entries = Vec::with_capacity(actions.len());
        let mut principal = Vec::new();
        for action in actions {
            let next = successor(&state, roster, agent, action, self.weights)?;
            let child = self.value(next, level + 1, alpha, beta)?;
            if child.value > value {
                value = child.value;
                principal = child.layers;
            }
            entries.push(TraceEntry { action, value });

            if self.options.pruning && value > beta {
                self.cutoffs += 1;
                break;
            }
            alpha = alpha.max(value);
        }

        Ok(Node::with_line(value, entries, principal))
    }

    fn min_value(
        &mut self,
        state: StoryState,
        agent: &'a Agent,
        level: usize,
        alpha: f64,
        mut beta: f64,
    ) -> Result<Node, SearchError> {
        let roster = self.roster;
        let actions = legal_actions(roster, agent);
        if actions.is_empty() {
            return Ok(Node::empty(state.tension, roster.len() - level));
        }

        let mut value = f64::INFINITY;
        let mut entries = Vec::with_capacity(actions.len());
        let mut principal = Vec::new();
        for action in actions {
            let next = successor(&state, roster, agent, action, self.weights)?;
            let child = self.value(next, level + 1, alpha, beta)?;
            if child.value < value {
                value = child.value;
                principal = child.layers;
            }
            entries.push(TraceEntry { action, value });

            if self.options.pruning && value < alpha {
                self.cutoffs += 1;
                break;
            }
            beta = beta.min(value);
        }

        Ok(Node::with_line(value, entries, principal))
    }
}
