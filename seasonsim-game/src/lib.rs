//! Seasonsim Engine
//!
//! Deterministic league season simulation: schedules, game outcomes,
//! standings, conference tournaments and the national bracket.
//! This crate has no platform dependencies; storage and roster sources are
//! supplied by the caller through the traits below.

pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod national;
pub mod numbers;
pub mod outcome;
pub mod rng;
pub mod roster;
pub mod schedule;
pub mod season;
pub mod seed;
pub mod standings;
pub mod team;
pub mod tournament;
pub mod universe;

// Re-export commonly used types
pub use config::{ConfigError, SimConfig};
pub use error::SeasonError;
pub use game::Game;
pub use national::{
    NationalBracket, advance_bracket, advance_round, build_national_bracket, field_size,
    national_rankings, selection_metric,
};
pub use outcome::{GameOutcome, simulate_game, simulate_score, win_probability};
pub use rng::SeasonRng;
pub use roster::{RosterEntry, RosterError, parse_roster_json, synthetic_roster};
pub use schedule::{ScheduleMode, generate_schedule, round_robin_rotations};
pub use season::{simulate_season, simulate_week};
pub use seed::{derive_restore_seed, hash_phrase, pairing_hash};
pub use standings::{StandingsRow, compare_standing, rank, standings};
pub use team::{Team, TeamId, TeamStore};
pub use tournament::{ConferenceTournament, build_conference_tournaments};
pub use universe::{BracketState, Universe};

/// Source of roster rows for new universes.
/// Platform-specific implementations should provide this
pub trait RosterSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the league roster
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be read.
    fn load_roster(&self) -> Result<Vec<RosterEntry>, Self::Error>;
}

/// Trait for abstracting save/load of universes
pub trait UniverseStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save a universe
    ///
    /// # Errors
    ///
    /// Returns an error if the universe cannot be saved.
    fn save_universe(&self, save_name: &str, universe: &Universe) -> Result<(), Self::Error>;

    /// Load a universe as stored, before rehydration
    ///
    /// # Errors
    ///
    /// Returns an error if the universe cannot be loaded.
    fn load_universe(&self, save_name: &str) -> Result<Option<Universe>, Self::Error>;

    /// Delete a saved universe
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_universe(&self, save_name: &str) -> Result<(), Self::Error>;
}

/// Wires a roster source and a storage backend to universe creation.
pub struct SeasonEngine<R, S>
where
    R: RosterSource,
    S: UniverseStorage,
{
    roster_source: R,
    storage: S,
}

impl<R, S> SeasonEngine<R, S>
where
    R: RosterSource,
    S: UniverseStorage,
{
    pub const fn new(roster_source: R, storage: S) -> Self {
        Self {
            roster_source,
            storage,
        }
    }

    /// Create a fresh universe from the roster source.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be loaded.
    pub fn create_universe(&self, seed_phrase: &str) -> Result<Universe, R::Error> {
        let roster = self.roster_source.load_roster()?;
        let teams = roster.into_iter().map(RosterEntry::into_team).collect();
        Ok(Universe::new(teams, seed_phrase))
    }

    /// # Errors
    ///
    /// Returns an error if the universe cannot be saved.
    pub fn save(&self, save_name: &str, universe: &Universe) -> Result<(), S::Error> {
        self.storage.save_universe(save_name, universe)
    }

    /// Load a universe and restart its random stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be read or references unknown teams.
    pub fn load(&self, save_name: &str) -> Result<Option<Universe>, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        match self.storage.load_universe(save_name).map_err(Into::into)? {
            Some(universe) => Ok(Some(universe.rehydrate()?)),
            None => Ok(None),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    pub fn delete(&self, save_name: &str) -> Result<(), S::Error> {
        self.storage.delete_universe(save_name)
    }
}
