use std::fs;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::agent::{Agent, AgentId, Faction, Gender, HealthStatus, ZoneId};

pub const APPEARANCES: [&str; 10] = [
    "attractive",
    "beautiful",
    "fetching",
    "grotesque",
    "handsome",
    "hideous",
    "pretty",
    "terrible",
    "ugly",
    "vile",
];

#[derive(Debug, thiserror::Error)]
pub enum CastLoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("cast is empty")]
    Empty,
    #[error("zone {zone} of {name} is outside 1..={zone_count}")]
    BadZone { name: String, zone: u8, zone_count: u8 },
}

/// Explicit cast description, for stories that should not be rolled at random.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastCatalog {
    pub agents: Vec<CastTemplate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastTemplate {
    pub name: String,
    pub faction: Faction,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub appearance: Option<String>,
    #[serde(default)]
    pub zone: Option<u8>,
    #[serde(default)]
    pub aware: bool,
}

/// Load a cast from a JSON catalog (`.json`) or a plain list of names.
pub fn load_cast_from_path<R: Rng + ?Sized>(
    path: &Path,
    zone_count: u8,
    rng: &mut R,
) -> Result<Vec<Agent>, CastLoadError> {
    let data = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        let catalog: CastCatalog = serde_json::from_str(&data)?;
        cast_from_catalog(catalog, zone_count, rng)
    } else {
        cast_from_names(&data, zone_count, rng)
    }
}

/// One agent per non-blank line, using the line's first word as the name.
///
/// Faction, gender, looks and starting zone are rolled. A side that nobody was
/// drawn into gets a stand-in so the story always has both factions.
pub fn cast_from_names<R: Rng + ?Sized>(
    names: &str,
    zone_count: u8,
    rng: &mut R,
) -> Result<Vec<Agent>, CastLoadError> {
    let mut cast = Vec::new();
    for name in names.lines().filter_map(|line| line.split_whitespace().next()) {
        let faction = if rng.gen_bool(0.5) {
            Faction::Human
        } else {
            Faction::Monster
        };
        cast.push(rolled_agent(cast.len() as u32, name, faction, zone_count, rng));
    }
    if cast.is_empty() {
        return Err(CastLoadError::Empty);
    }

    for (faction, stand_in) in [
        (Faction::Human, "The Human"),
        (Faction::Monster, "The Monster"),
    ] {
        if !cast.iter().any(|agent| agent.faction == faction) {
            cast.push(rolled_agent(cast.len() as u32, stand_in, faction, zone_count, rng));
        }
    }
    Ok(cast)
}

pub fn cast_from_catalog<R: Rng + ?Sized>(
    catalog: CastCatalog,
    zone_count: u8,
    rng: &mut R,
) -> Result<Vec<Agent>, CastLoadError> {
    if catalog.agents.is_empty() {
        return Err(CastLoadError::Empty);
    }

    let mut cast = Vec::with_capacity(catalog.agents.len());
    for (idx, template) in catalog.agents.into_iter().enumerate() {
        let mut agent = rolled_agent(idx as u32, &template.name, template.faction, zone_count, rng);
        if let Some(zone) = template.zone {
            if zone == 0 || zone > zone_count {
                return Err(CastLoadError::BadZone {
                    name: template.name,
                    zone,
                    zone_count,
                });
            }
            agent.position = Some(ZoneId(zone));
        }
        if let Some(gender) = template.gender {
            agent.gender = gender;
        }
        if let Some(appearance) = template.appearance {
            agent.appearance = appearance;
        }
        agent.aware = template.aware;
        cast.push(agent);
    }
    Ok(cast)
}

fn rolled_agent<R: Rng + ?Sized>(
    id: u32,
    name: &str,
    faction: Faction,
    zone_count: u8,
    rng: &mut R,
) -> Agent {
    let gender = if rng.gen_bool(0.5) {
        Gender::Male
    } else {
        Gender::Female
    };
    let appearance = APPEARANCES
        .choose(rng)
        .copied()
        .unwrap_or(APPEARANCES[0])
        .to_string();
    Agent {
        id: AgentId(id),
        name: name.to_string(),
        faction,
        gender,
        appearance,
        health: HealthStatus::Healthy,
        alive: true,
        aware: false,
        position: Some(ZoneId(rng.gen_range(1..=zone_count.max(1)))),
    }
}
