pub mod ecs;
pub mod story;

pub use ecs::{create_schedule, create_world, RoundSet};
pub use story::{RoundReport, Story, StoryError, StoryOutcome};
