use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier for a cast member, unique within one story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The two sides of a story. Monsters push tension up, humans pull it down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Monster,
    Human,
}

impl Faction {
    pub const ALL: [Faction; 2] = [Faction::Monster, Faction::Human];

    pub fn opponent(self) -> Faction {
        match self {
            Faction::Monster => Faction::Human,
            Faction::Human => Faction::Monster,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Faction::Monster => "monster",
            Faction::Human => "human",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Health only ever moves forward: Healthy, then Injured, then Dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Injured,
    Dead,
}

impl HealthStatus {
    pub fn worsened(self) -> HealthStatus {
        match self {
            HealthStatus::Healthy => HealthStatus::Injured,
            HealthStatus::Injured | HealthStatus::Dead => HealthStatus::Dead,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn object_pronoun(self) -> &'static str {
        match self {
            Gender::Male => "him",
            Gender::Female => "her",
        }
    }

    pub fn subject_pronoun(self) -> &'static str {
        match self {
            Gender::Male => "he",
            Gender::Female => "she",
        }
    }
}

/// A zone of the story world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(pub u8);

/// A single cast member.
///
/// `position` is `None` once the agent has escaped the story world. Agents are only
/// mutated by the story loop between rounds; the search reads them through an
/// immutable roster slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub faction: Faction,
    pub gender: Gender,
    pub appearance: String,
    pub health: HealthStatus,
    pub alive: bool,
    pub aware: bool,
    pub position: Option<ZoneId>,
}

impl Agent {
    /// A fresh, healthy and unaware agent standing in `zone`.
    pub fn new(id: u32, name: impl Into<String>, faction: Faction, zone: u8) -> Self {
        Self {
            id: AgentId(id),
            name: name.into(),
            faction,
            gender: Gender::Female,
            appearance: String::new(),
            health: HealthStatus::Healthy,
            alive: true,
            aware: false,
            position: Some(ZoneId(zone)),
        }
    }

    pub fn is_monster(&self) -> bool {
        self.faction == Faction::Monster
    }

    pub fn is_human(&self) -> bool {
        self.faction == Faction::Human
    }

    pub fn is_healthy(&self) -> bool {
        self.health == HealthStatus::Healthy
    }

    pub fn is_injured(&self) -> bool {
        self.health == HealthStatus::Injured
    }

    pub fn is_dead(&self) -> bool {
        self.health == HealthStatus::Dead
    }

    pub fn has_escaped(&self) -> bool {
        self.alive && self.position.is_none()
    }

    /// Alive and still inside the story world.
    pub fn is_active(&self) -> bool {
        self.alive && self.position.is_some()
    }

    pub fn shares_zone_with(&self, other: &Agent) -> bool {
        matches!((self.position, other.position), (Some(a), Some(b)) if a == b)
    }

    /// Apply one wound. Returns true when the wound was fatal.
    pub fn wound(&mut self) -> bool {
        self.health = self.health.worsened();
        if self.health == HealthStatus::Dead {
            self.alive = false;
        }
        !self.alive
    }

    pub fn kill(&mut self) {
        self.health = HealthStatus::Dead;
        self.alive = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_never_regresses() {
        assert_eq!(HealthStatus::Healthy.worsened(), HealthStatus::Injured);
        assert_eq!(HealthStatus::Injured.worsened(), HealthStatus::Dead);
        assert_eq!(HealthStatus::Dead.worsened(), HealthStatus::Dead);
    }

    #[test]
    fn second_wound_kills() {
        let mut agent = Agent::new(0, "Grist", Faction::Monster, 1);
        assert!(!agent.wound());
        assert!(agent.is_injured());
        assert!(agent.wound());
        assert!(agent.is_dead());
        assert!(!agent.alive);
    }

    #[test]
    fn escaped_agents_share_no_zone() {
        let mut a = Agent::new(0, "Ada", Faction::Human, 2);
        let b = Agent::new(1, "Bo", Faction::Monster, 2);
        assert!(a.shares_zone_with(&b));
        a.position = None;
        assert!(!a.shares_zone_with(&b));
        assert!(a.has_escaped());
        assert!(!a.is_active());
    }
}
