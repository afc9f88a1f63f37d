pub mod agent;

pub use agent::{Agent, AgentId, Faction, Gender, HealthStatus, ZoneId};
