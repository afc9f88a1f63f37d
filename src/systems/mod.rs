pub mod round;

pub use round::{
    completion_system, resolve_actions_system, resolve_round, PlannedActions, RoundCounter,
    RoundRules, StoryRng,
};
