pub mod action;
pub mod successor;
pub mod weights;

pub use action::{is_conflict, legal_actions, Action};
pub use successor::{successor, tension_modifier};
pub use weights::{ActionWeights, WeightError, WeightSource};
