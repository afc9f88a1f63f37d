pub mod events;
pub mod search;
pub mod story;

pub use search::{
    choose_actions, choose_actions_with, Choice, DecisionTrace, RoundPlan, SearchError,
    SearchOptions, TraceEntry,
};
pub use events::{RealizedActions, StoryEvent, StoryEventLog};
pub use story::{Cast, StoryState};
