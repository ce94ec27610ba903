//! The aggregate root: roster, schedule, postseason, and the random stream.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::SimConfig;
use crate::constants::DEFAULT_YEAR;
use crate::error::SeasonError;
use crate::game::Game;
use crate::national::NationalBracket;
use crate::rng::SeasonRng;
use crate::schedule::ScheduleMode;
use crate::seed::{derive_restore_seed, hash_phrase};
use crate::team::{Team, TeamId, TeamStore};
use crate::tournament::ConferenceTournament;

/// Build status of the national bracket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "bracket", rename_all = "snake_case")]
pub enum BracketState {
    #[default]
    NotBuilt,
    Built(NationalBracket),
}

impl BracketState {
    #[must_use]
    pub const fn as_built(&self) -> Option<&NationalBracket> {
        match self {
            Self::NotBuilt => None,
            Self::Built(bracket) => Some(bracket),
        }
    }

    #[must_use]
    pub const fn is_built(&self) -> bool {
        matches!(self, Self::Built(_))
    }
}

/// One league's full season state.
///
/// All randomness for the universe's lifetime comes from its single stream,
/// so replaying the same operations from the same seed phrase reproduces
/// every score. The stream position is not persisted; see
/// [`Universe::rehydrate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub seed_phrase: String,
    pub seed: u32,
    pub year: u16,
    pub week: u16,
    #[serde(default)]
    pub config: SimConfig,
    pub teams: TeamStore,
    #[serde(default)]
    pub games: Vec<Game>,
    #[serde(default)]
    pub conf_tournaments: BTreeMap<String, ConferenceTournament>,
    #[serde(default)]
    pub bracket: BracketState,
    #[serde(skip)]
    pub(crate) rng: SeasonRng,
}

impl Universe {
    /// Create a universe with default configuration for the current season year.
    #[must_use]
    pub fn new(teams: Vec<Team>, seed_phrase: &str) -> Self {
        Self::build(teams, seed_phrase, DEFAULT_YEAR, SimConfig::default())
    }

    /// Create a universe with explicit season year and tuning.
    ///
    /// # Errors
    ///
    /// Returns [`SeasonError::Config`] when `config` fails validation.
    pub fn with_config(
        teams: Vec<Team>,
        seed_phrase: &str,
        year: u16,
        config: SimConfig,
    ) -> Result<Self, SeasonError> {
        config.validate()?;
        Ok(Self::build(teams, seed_phrase, year, config))
    }

    fn build(teams: Vec<Team>, seed_phrase: &str, year: u16, config: SimConfig) -> Self {
        let seed = hash_phrase(seed_phrase);
        let teams = TeamStore::from(teams);
        log::debug!(
            "universe '{seed_phrase}' (seed {seed:#010x}) created with {} teams",
            teams.len()
        );
        Self {
            seed_phrase: seed_phrase.to_string(),
            seed,
            year,
            week: 1,
            config,
            teams,
            games: Vec::new(),
            conf_tournaments: BTreeMap::new(),
            bracket: BracketState::NotBuilt,
            rng: SeasonRng::new(seed),
        }
    }

    /// Draws taken from the universe stream so far.
    #[must_use]
    pub const fn rng_draws(&self) -> u64 {
        self.rng.draws()
    }

    #[must_use]
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(id)
    }

    #[must_use]
    pub fn played_games(&self) -> usize {
        self.games.iter().filter(|game| game.played).count()
    }

    /// Last week number on the schedule, 0 when nothing is scheduled.
    #[must_use]
    pub fn final_week(&self) -> u16 {
        self.games.iter().map(|game| game.week).max().unwrap_or(0)
    }

    #[must_use]
    pub fn is_regular_season_complete(&self) -> bool {
        self.games.iter().all(|game| game.played)
    }

    /// Conference champions in label order; conferences without one are skipped.
    #[must_use]
    pub fn conference_champions(&self) -> Vec<(String, TeamId)> {
        self.conf_tournaments
            .iter()
            .filter_map(|(label, tournament)| tournament.champion.map(|id| (label.clone(), id)))
            .collect()
    }

    #[must_use]
    pub fn national_champion(&self) -> Option<TeamId> {
        self.bracket.as_built().and_then(|bracket| bracket.champion)
    }

    pub fn generate_schedule(&mut self, mode: ScheduleMode, non_conf_count: usize) {
        crate::schedule::generate_schedule(self, mode, non_conf_count);
    }

    /// # Errors
    ///
    /// See [`crate::season::simulate_season`].
    pub fn simulate_season(&mut self) -> Result<usize, SeasonError> {
        crate::season::simulate_season(self)
    }

    /// # Errors
    ///
    /// See [`crate::season::simulate_week`].
    pub fn simulate_week(&mut self) -> Result<usize, SeasonError> {
        crate::season::simulate_week(self)
    }

    /// # Errors
    ///
    /// See [`crate::tournament::build_conference_tournaments`].
    pub fn build_conference_tournaments(&mut self) -> Result<(), SeasonError> {
        crate::tournament::build_conference_tournaments(self)
    }

    /// # Errors
    ///
    /// See [`crate::national::build_national_bracket`].
    pub fn build_national_bracket(&mut self) -> Result<(), SeasonError> {
        crate::national::build_national_bracket(self)
    }

    /// # Errors
    ///
    /// See [`crate::national::advance_round`].
    pub fn advance_round(&mut self) -> Result<bool, SeasonError> {
        crate::national::advance_round(self)
    }

    /// # Errors
    ///
    /// See [`crate::national::advance_bracket`].
    pub fn advance_bracket(&mut self) -> Result<Option<TeamId>, SeasonError> {
        crate::national::advance_bracket(self)
    }

    /// Check that every scheduled and postseason game references a roster team.
    ///
    /// # Errors
    ///
    /// Returns [`SeasonError::UnknownTeam`] for the first dangling id.
    pub fn validate_references(&self) -> Result<(), SeasonError> {
        let tournament_games = self
            .conf_tournaments
            .values()
            .flat_map(|t| t.rounds.iter().flatten());
        let bracket_games = self
            .bracket
            .as_built()
            .into_iter()
            .flat_map(|b| b.rounds.iter().flatten());

        for game in self.games.iter().chain(tournament_games).chain(bracket_games) {
            self.teams.require(game.home)?;
            self.teams.require(game.away)?;
        }
        for tournament in self.conf_tournaments.values() {
            for &id in &tournament.seeds {
                self.teams.require(id)?;
            }
        }
        if let Some(bracket) = self.bracket.as_built() {
            for &id in &bracket.field {
                self.teams.require(id)?;
            }
        }
        Ok(())
    }

    /// Restart the random stream after a restore.
    ///
    /// The new stream is derived from the original seed and the season's
    /// progress, so two restores of the same save draw identical values, but
    /// they do not continue the pre-save sequence.
    ///
    /// # Errors
    ///
    /// Returns [`SeasonError::UnknownTeam`] if the restored data references a
    /// team outside the roster.
    pub fn rehydrate(mut self) -> Result<Self, SeasonError> {
        self.validate_references()?;
        let restore_seed =
            derive_restore_seed(self.seed, self.year, self.week, self.played_games());
        self.rng = SeasonRng::new(restore_seed);
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, SeasonError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a saved universe and rehydrate it.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON or dangling team references.
    pub fn from_json(json: &str) -> Result<Self, SeasonError> {
        let universe: Self = serde_json::from_str(json)?;
        universe.rehydrate()
    }
}
