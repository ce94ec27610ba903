//! Teams, their season records, and the id-indexed store that owns them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::SimConfig;
use crate::error::SeasonError;
use crate::numbers::record_diff;

pub type TeamId = u32;

/// A school in the league plus its accumulated season state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub school: String,
    pub nickname: String,
    /// `None` for independents.
    #[serde(default)]
    pub conference: Option<String>,
    pub rating: f64,
    #[serde(default)]
    pub wins: u16,
    #[serde(default)]
    pub losses: u16,
    #[serde(default)]
    pub conf_wins: u16,
    #[serde(default)]
    pub conf_losses: u16,
    /// Strength-of-schedule accumulator.
    #[serde(default)]
    pub sos: f64,
    /// Wins over opponents above the quality rating threshold.
    #[serde(default)]
    pub resume: u16,
    /// National bracket seed, when the team made the field.
    #[serde(default)]
    pub seed: Option<u8>,
}

impl Team {
    #[must_use]
    pub fn new(
        id: TeamId,
        school: impl Into<String>,
        nickname: impl Into<String>,
        conference: Option<String>,
        rating: f64,
    ) -> Self {
        Self {
            id,
            school: school.into(),
            nickname: nickname.into(),
            conference,
            rating,
            wins: 0,
            losses: 0,
            conf_wins: 0,
            conf_losses: 0,
            sos: 0.0,
            resume: 0,
            seed: None,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        if self.nickname.is_empty() {
            self.school.clone()
        } else {
            format!("{} {}", self.school, self.nickname)
        }
    }

    #[must_use]
    pub fn record_diff(&self) -> i32 {
        record_diff(self.wins, self.losses)
    }

    #[must_use]
    pub fn conf_record_diff(&self) -> i32 {
        record_diff(self.conf_wins, self.conf_losses)
    }

    #[must_use]
    pub fn in_conference(&self, conference: &str) -> bool {
        self.conference.as_deref() == Some(conference)
    }

    /// Whether both teams belong to the same named conference.
    #[must_use]
    pub fn shares_conference(&self, other: &Self) -> bool {
        matches!((&self.conference, &other.conference), (Some(a), Some(b)) if a == b)
    }

    fn reset_season(&mut self) {
        self.wins = 0;
        self.losses = 0;
        self.conf_wins = 0;
        self.conf_losses = 0;
        self.sos = 0.0;
        self.resume = 0;
        self.seed = None;
    }
}

/// Roster-ordered team storage with constant-time lookup by id.
///
/// This is the only place season records change: [`TeamStore::record_result`]
/// is called exclusively by the outcome model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Team>", into = "Vec<Team>")]
pub struct TeamStore {
    teams: Vec<Team>,
    index: HashMap<TeamId, usize>,
}

impl TeamStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a team; returns `false` and keeps the existing entry on a duplicate id.
    pub fn insert(&mut self, team: Team) -> bool {
        if self.index.contains_key(&team.id) {
            log::debug!("dropping duplicate team id {}", team.id);
            return false;
        }
        self.index.insert(team.id, self.teams.len());
        self.teams.push(team);
        true
    }

    #[must_use]
    pub fn get(&self, id: TeamId) -> Option<&Team> {
        self.index.get(&id).and_then(|&idx| self.teams.get(idx))
    }

    /// Lookup that treats a missing id as a broken roster invariant.
    ///
    /// # Errors
    ///
    /// Returns [`SeasonError::UnknownTeam`] when `id` is not in the roster.
    pub fn require(&self, id: TeamId) -> Result<&Team, SeasonError> {
        self.get(id).ok_or(SeasonError::UnknownTeam(id))
    }

    #[must_use]
    pub fn contains(&self, id: TeamId) -> bool {
        self.index.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Team> {
        self.teams.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.teams.iter().map(|team| team.id)
    }

    /// Distinct conference labels in sorted order.
    #[must_use]
    pub fn conferences(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .teams
            .iter()
            .filter_map(|team| team.conference.clone())
            .collect();
        labels.sort();
        labels.dedup();
        labels
    }

    /// Team ids of a conference in roster order.
    #[must_use]
    pub fn conference_members(&self, conference: &str) -> Vec<TeamId> {
        self.teams
            .iter()
            .filter(|team| team.in_conference(conference))
            .map(|team| team.id)
            .collect()
    }

    fn get_mut(&mut self, id: TeamId) -> Result<&mut Team, SeasonError> {
        let idx = *self.index.get(&id).ok_or(SeasonError::UnknownTeam(id))?;
        Ok(&mut self.teams[idx])
    }

    /// Apply a finished game to both teams' records.
    ///
    /// # Errors
    ///
    /// Returns [`SeasonError::UnknownTeam`] if either id is missing; no record
    /// is touched in that case.
    pub(crate) fn record_result(
        &mut self,
        winner: TeamId,
        loser: TeamId,
        conference_game: bool,
        cfg: &SimConfig,
    ) -> Result<(), SeasonError> {
        let winner_rating = self.require(winner)?.rating;
        let loser_rating = self.require(loser)?.rating;

        let w = self.get_mut(winner)?;
        w.wins = w.wins.saturating_add(1);
        if conference_game {
            w.conf_wins = w.conf_wins.saturating_add(1);
        }
        if loser_rating > cfg.quality_win_rating {
            w.resume = w.resume.saturating_add(1);
        }
        w.sos += loser_rating * cfg.sos_per_rating;

        let l = self.get_mut(loser)?;
        l.losses = l.losses.saturating_add(1);
        if conference_game {
            l.conf_losses = l.conf_losses.saturating_add(1);
        }
        l.sos += winner_rating * cfg.sos_per_rating;
        Ok(())
    }

    pub(crate) fn reset_season(&mut self) {
        self.teams.iter_mut().for_each(Team::reset_season);
    }

    /// Replace every team's seed annotation.
    pub(crate) fn assign_seeds(&mut self, field: &[TeamId]) {
        for team in &mut self.teams {
            team.seed = None;
        }
        for (position, id) in field.iter().enumerate() {
            if let Some(&idx) = self.index.get(id) {
                self.teams[idx].seed = u8::try_from(position + 1).ok();
            }
        }
    }
}

impl From<Vec<Team>> for TeamStore {
    fn from(teams: Vec<Team>) -> Self {
        let mut store = Self::new();
        for team in teams {
            store.insert(team);
        }
        store
    }
}

impl From<TeamStore> for Vec<Team> {
    fn from(store: TeamStore) -> Self {
        store.teams
    }
}
