use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::components::agent::Faction;
use crate::rules::action::Action;
use crate::rules::weights::{ActionWeights, WeightError, WeightSource};

const STATS_SCHEMA_VERSION: i64 = 1;

const STATS_DB_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS stats_meta (
  id INTEGER PRIMARY KEY CHECK (id = 1),
  schema_version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS action_likelihood (
  faction TEXT NOT NULL,
  action TEXT NOT NULL,
  times_used INTEGER NOT NULL DEFAULT 0,
  percentage REAL NOT NULL DEFAULT 0,
  PRIMARY KEY (faction, action)
);

CREATE TABLE IF NOT EXISTS story_outcomes (
  winner TEXT PRIMARY KEY,
  times_won INTEGER NOT NULL DEFAULT 0
);
"#;

#[derive(Debug, thiserror::Error)]
pub enum StatsDbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("{0}")]
    InvalidData(String),
}

/// Usage counter for one action of one faction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionStat {
    pub action: Action,
    pub times_used: u64,
    pub percentage: f64,
}

fn faction_to_str(faction: Faction) -> &'static str {
    match faction {
        Faction::Monster => "MONSTER",
        Faction::Human => "HUMAN",
    }
}

fn faction_from_str(value: &str) -> Result<Faction, StatsDbError> {
    match value {
        "MONSTER" => Ok(Faction::Monster),
        "HUMAN" => Ok(Faction::Human),
        _ => Err(StatsDbError::InvalidData(format!(
            "unknown faction {}",
            value
        ))),
    }
}

fn action_to_str(action: Action) -> &'static str {
    match action {
        Action::Escape => "ESCAPE",
        Action::Investigate => "INVESTIGATE",
        Action::Flee => "FLEE",
        Action::Attack => "ATTACK",
    }
}

fn action_from_str(value: &str) -> Result<Action, StatsDbError> {
    match value {
        "ESCAPE" => Ok(Action::Escape),
        "INVESTIGATE" => Ok(Action::Investigate),
        "FLEE" => Ok(Action::Flee),
        "ATTACK" => Ok(Action::Attack),
        _ => Err(StatsDbError::InvalidData(format!(
            "unknown action {}",
            value
        ))),
    }
}

/// Persistent action-frequency statistics and story outcome tallies.
pub struct StatsDb {
    conn: Connection,
}

impl StatsDb {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StatsDbError> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StatsDbError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StatsDbError> {
        let db = Self { conn };
        db.conn.execute_batch(STATS_DB_SCHEMA)?;
        db.ensure_stats_meta()?;
        db.seed_rows()?;
        Ok(db)
    }

    fn ensure_stats_meta(&self) -> Result<(), StatsDbError> {
        let version: Option<i64> = self
            .conn
            .query_row(
                "SELECT schema_version FROM stats_meta WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        match version {
            None => {
                self.conn.execute(
                    "INSERT INTO stats_meta (id, schema_version) VALUES (1, ?1)",
                    params![STATS_SCHEMA_VERSION],
                )?;
                Ok(())
            }
            Some(STATS_SCHEMA_VERSION) => Ok(()),
            Some(other) => Err(StatsDbError::InvalidData(format!(
                "unsupported stats schema version {}",
                other
            ))),
        }
    }

    fn seed_rows(&self) -> Result<(), StatsDbError> {
        for faction in Faction::ALL {
            for action in Action::ALL {
                self.conn.execute(
                    "INSERT OR IGNORE INTO action_likelihood (faction, action, times_used, percentage)
                     VALUES (?1, ?2, 0, 0)",
                    params![faction_to_str(faction), action_to_str(action)],
                )?;
            }
            self.conn.execute(
                "INSERT OR IGNORE INTO story_outcomes (winner, times_won) VALUES (?1, 0)",
                params![faction_to_str(faction)],
            )?;
        }
        Ok(())
    }

    /// Count one realized action and refresh the faction's frequencies.
    pub fn record_action(&mut self, action: Action, faction: Faction) -> Result<(), StatsDbError> {
        let faction_key = faction_to_str(faction);
        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE action_likelihood SET times_used = times_used + 1
             WHERE faction = ?1 AND action = ?2",
            params![faction_key, action_to_str(action)],
        )?;
        let total: i64 = tx.query_row(
            "SELECT COALESCE(SUM(times_used), 0) FROM action_likelihood WHERE faction = ?1",
            params![faction_key],
            |row| row.get(0),
        )?;
        if total > 0 {
            tx.execute(
                "UPDATE action_likelihood SET percentage = CAST(times_used AS REAL) / ?2
                 WHERE faction = ?1",
                params![faction_key, total as f64],
            )?;
        } else {
            tx.execute(
                "UPDATE action_likelihood SET percentage = 0 WHERE faction = ?1",
                params![faction_key],
            )?;
        }
        tx.commit()?;
        debug!(%faction, %action, total, "Action recorded");
        Ok(())
    }

    /// Stored frequency for `action` by `faction`; 0.0 when there is no row.
    pub fn action_weight(&self, action: Action, faction: Faction) -> Result<f64, StatsDbError> {
        let weight: Option<f64> = self
            .conn
            .query_row(
                "SELECT percentage FROM action_likelihood WHERE faction = ?1 AND action = ?2",
                params![faction_to_str(faction), action_to_str(action)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(weight.unwrap_or(0.0))
    }

    pub fn action_stats(&self, faction: Faction) -> Result<Vec<ActionStat>, StatsDbError> {
        let mut stmt = self.conn.prepare(
            "SELECT action, times_used, percentage FROM action_likelihood
             WHERE faction = ?1 ORDER BY action",
        )?;
        let rows = stmt.query_map(params![faction_to_str(faction)], |row| {
            let action: String = row.get(0)?;
            let times_used: i64 = row.get(1)?;
            let percentage: f64 = row.get(2)?;
            Ok((action, times_used, percentage))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (action, times_used, percentage) = row?;
            out.push(ActionStat {
                action: action_from_str(&action)?,
                times_used: times_used.max(0) as u64,
                percentage,
            });
        }
        Ok(out)
    }

    /// Snapshot every stored frequency for use during a search.
    pub fn load_weights(&self) -> Result<ActionWeights, StatsDbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT faction, action, percentage FROM action_likelihood")?;
        let rows = stmt.query_map([], |row| {
            let faction: String = row.get(0)?;
            let action: String = row.get(1)?;
            let percentage: f64 = row.get(2)?;
            Ok((faction, action, percentage))
        })?;

        let mut weights = ActionWeights::default();
        for row in rows {
            let (faction, action, percentage) = row?;
            weights.set(
                faction_from_str(&faction)?,
                action_from_str(&action)?,
                percentage,
            );
        }
        Ok(weights)
    }

    pub fn record_outcome(&mut self, winner: Faction) -> Result<(), StatsDbError> {
        self.conn.execute(
            "UPDATE story_outcomes SET times_won = times_won + 1 WHERE winner = ?1",
            params![faction_to_str(winner)],
        )?;
        Ok(())
    }

    pub fn outcomes(&self) -> Result<Vec<(Faction, u64)>, StatsDbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT winner, times_won FROM story_outcomes ORDER BY winner")?;
        let rows = stmt.query_map([], |row| {
            let winner: String = row.get(0)?;
            let times_won: i64 = row.get(1)?;
            Ok((winner, times_won))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (winner, times_won) = row?;
            out.push((faction_from_str(&winner)?, times_won.max(0) as u64));
        }
        Ok(out)
    }
}

impl WeightSource for StatsDb {
    fn weight(&self, action: Action, faction: Faction) -> Result<f64, WeightError> {
        self.action_weight(action, faction)
            .map_err(|err| WeightError::Unavailable(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight(db: &StatsDb, action: Action, faction: Faction) -> f64 {
        db.weight(action, faction).unwrap()
    }

    #[test]
    fn fresh_store_reads_zero_everywhere() {
        let db = StatsDb::open_in_memory().unwrap();
        for faction in Faction::ALL {
            for action in Action::ALL {
                assert_eq!(weight(&db, action, faction), 0.0);
            }
        }
        assert!(db.load_weights().unwrap().is_empty());
    }

    #[test]
    fn first_record_takes_the_whole_share() {
        let mut db = StatsDb::open_in_memory().unwrap();
        db.record_action(Action::Attack, Faction::Human).unwrap();

        assert_eq!(weight(&db, Action::Attack, Faction::Human), 1.0);
        for action in [Action::Escape, Action::Investigate, Action::Flee] {
            assert_eq!(weight(&db, action, Faction::Human), 0.0);
        }
        for action in Action::ALL {
            assert_eq!(weight(&db, action, Faction::Monster), 0.0);
        }
    }

    #[test]
    fn shares_are_recomputed_per_faction() {
        let mut db = StatsDb::open_in_memory().unwrap();
        db.record_action(Action::Attack, Faction::Human).unwrap();
        db.record_action(Action::Flee, Faction::Human).unwrap();
        db.record_action(Action::Flee, Faction::Human).unwrap();
        db.record_action(Action::Flee, Faction::Human).unwrap();
        db.record_action(Action::Investigate, Faction::Monster).unwrap();

        assert_eq!(weight(&db, Action::Attack, Faction::Human), 0.25);
        assert_eq!(weight(&db, Action::Flee, Faction::Human), 0.75);
        assert_eq!(weight(&db, Action::Investigate, Faction::Monster), 1.0);

        let snapshot = db.load_weights().unwrap();
        assert_eq!(snapshot.get(Faction::Human, Action::Flee), 0.75);
        assert_eq!(snapshot.get(Faction::Monster, Action::Investigate), 1.0);

        let stats = db.action_stats(Faction::Human).unwrap();
        let flee = stats.iter().find(|s| s.action == Action::Flee).unwrap();
        assert_eq!(flee.times_used, 3);
    }

    #[test]
    fn outcomes_accumulate() {
        let mut db = StatsDb::open_in_memory().unwrap();
        db.record_outcome(Faction::Monster).unwrap();
        db.record_outcome(Faction::Monster).unwrap();
        db.record_outcome(Faction::Human).unwrap();
        let outcomes = db.outcomes().unwrap();
        assert!(outcomes.contains(&(Faction::Monster, 2)));
        assert!(outcomes.contains(&(Faction::Human, 1)));
    }

    #[test]
    fn unknown_action_rows_are_invalid_data() {
        let db = StatsDb::open_in_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO action_likelihood (faction, action) VALUES ('HUMAN', 'DANCE')",
                [],
            )
            .unwrap();
        let err = db.load_weights().unwrap_err();
        assert!(matches!(err, StatsDbError::InvalidData(_)));
    }

    #[test]
    fn statistics_survive_reopening_the_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("outcomes.db");
        {
            let mut db = StatsDb::open(&path).unwrap();
            db.record_action(Action::Attack, Faction::Human).unwrap();
            db.record_action(Action::Flee, Faction::Human).unwrap();
            db.record_outcome(Faction::Human).unwrap();
        }

        let db = StatsDb::open(&path).unwrap();
        assert_eq!(weight(&db, Action::Attack, Faction::Human), 0.5);
        assert_eq!(weight(&db, Action::Flee, Faction::Human), 0.5);
        assert_eq!(weight(&db, Action::Attack, Faction::Monster), 0.0);
        assert!(db.outcomes().unwrap().contains(&(Faction::Human, 1)));
    }
}
