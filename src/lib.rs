// Re-export core modules for use by the binary or other consumers
pub mod components;
pub mod config;
pub mod content;
pub mod core;
pub mod narrative;
pub mod rules;
pub mod simulation;
pub mod systems;
pub mod world;

// Expose the story wrapper and the planning entry points
pub use crate::config::StoryConfig;
pub use crate::core::story::{RoundReport, Story, StoryError, StoryOutcome};
pub use crate::simulation::search::{choose_actions, choose_actions_with, RoundPlan, SearchOptions};
