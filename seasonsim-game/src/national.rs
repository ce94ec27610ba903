//! National championship selection, seeding, and bracket play.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::constants::{
    FIELD_SIZES, METRIC_RATING_WEIGHT, METRIC_RECORD_WEIGHT, METRIC_RESUME_WEIGHT,
    METRIC_SOS_WEIGHT,
};
use crate::error::SeasonError;
use crate::game::Game;
use crate::team::{Team, TeamId};
use crate::tournament::{pair_by_seed, play_round, sort_by_seed};
use crate::universe::{BracketState, Universe};

/// The national tournament: seeded field plus the rounds played so far.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NationalBracket {
    /// Selected teams in seed order; `field[0]` is the top seed.
    pub field: Vec<TeamId>,
    /// Conference champions that received automatic bids.
    pub auto_bids: Vec<TeamId>,
    pub rounds: Vec<Vec<Game>>,
    pub champion: Option<TeamId>,
}

impl NationalBracket {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.champion.is_some() || self.field.is_empty()
    }

    /// Rounds a full run of this field takes.
    #[must_use]
    pub fn total_rounds(&self) -> usize {
        let mut size = self.field.len();
        let mut rounds = 0;
        while size > 1 {
            size /= 2;
            rounds += 1;
        }
        rounds
    }

    /// Seed (1-based) of a team in the field.
    #[must_use]
    pub fn seed_of(&self, id: TeamId) -> Option<usize> {
        self.field.iter().position(|&f| f == id).map(|pos| pos + 1)
    }
}

/// Selection and seeding score.
#[must_use]
pub fn selection_metric(team: &Team) -> f64 {
    team.rating * METRIC_RATING_WEIGHT
        + team.sos * METRIC_SOS_WEIGHT
        + f64::from(team.resume) * METRIC_RESUME_WEIGHT
        + f64::from(team.record_diff()) * METRIC_RECORD_WEIGHT
}

fn compare_metric(a: &Team, b: &Team) -> Ordering {
    selection_metric(b)
        .total_cmp(&selection_metric(a))
        .then_with(|| a.id.cmp(&b.id))
}

/// Largest allowed field not exceeding `team_count`; 0 below the smallest size.
#[must_use]
pub fn field_size(team_count: usize) -> usize {
    FIELD_SIZES
        .iter()
        .copied()
        .find(|&size| size <= team_count)
        .unwrap_or(0)
}

/// Every team ordered by selection metric, best first.
#[must_use]
pub fn national_rankings(universe: &Universe) -> Vec<(TeamId, f64)> {
    let mut teams: Vec<&Team> = universe.teams.iter().collect();
    teams.sort_by(|a, b| compare_metric(a, b));
    teams
        .into_iter()
        .map(|team| (team.id, selection_metric(team)))
        .collect()
}

fn select_field(universe: &Universe, size: usize) -> (Vec<TeamId>, Vec<TeamId>) {
    let auto_bids: Vec<TeamId> = universe
        .conference_champions()
        .into_iter()
        .map(|(_, id)| id)
        .take(size)
        .collect();

    let mut chosen: HashSet<TeamId> = auto_bids.iter().copied().collect();
    let mut field: Vec<&Team> = auto_bids
        .iter()
        .filter_map(|&id| universe.teams.get(id))
        .collect();

    let mut at_large: Vec<&Team> = universe
        .teams
        .iter()
        .filter(|team| !chosen.contains(&team.id))
        .collect();
    at_large.sort_by(|a, b| compare_metric(a, b));
    for team in at_large {
        if field.len() >= size {
            break;
        }
        chosen.insert(team.id);
        field.push(team);
    }

    field.sort_by(|a, b| compare_metric(a, b));
    (field.into_iter().map(|team| team.id).collect(), auto_bids)
}

fn tournaments_ready(universe: &Universe) -> bool {
    universe.conf_tournaments.len() == universe.teams.conferences().len()
        && universe.is_regular_season_complete()
}

/// Select and seed the national field, then play round one.
///
/// A no-op when conference tournaments have not been built or the bracket
/// already exists. Leagues smaller than the smallest field get a built but
/// empty bracket.
///
/// # Errors
///
/// Returns [`SeasonError::UnknownTeam`] if a champion or pairing references a
/// missing team.
pub fn build_national_bracket(universe: &mut Universe) -> Result<(), SeasonError> {
    if universe.bracket.is_built() {
        log::debug!("national bracket already built; skipping");
        return Ok(());
    }
    if !tournaments_ready(universe) {
        log::warn!("conference tournaments not built; national bracket skipped");
        return Ok(());
    }

    let size = field_size(universe.teams.len());
    let (field, auto_bids) = select_field(universe, size);
    for &id in &field {
        universe.teams.require(id)?;
    }
    universe.teams.assign_seeds(&field);

    let mut bracket = NationalBracket {
        field,
        auto_bids,
        rounds: Vec::new(),
        champion: None,
    };
    if !bracket.field.is_empty() {
        let (pairs, _) = pair_by_seed(&bracket.field);
        let (games, winners) = play_round(
            &pairs,
            universe.week,
            &mut universe.teams,
            &mut universe.rng,
            &universe.config,
        )?;
        bracket.rounds.push(games);
        if let [champion] = winners.as_slice() {
            bracket.champion = Some(*champion);
        }
    }
    log::debug!(
        "national bracket built: field {}, {} auto bids",
        bracket.field.len(),
        bracket.auto_bids.len()
    );
    universe.bracket = BracketState::Built(bracket);
    Ok(())
}

/// Generate and play the next national round.
///
/// Returns `Ok(false)` when there is nothing to play: the bracket is not built,
/// is empty, or already has a champion.
///
/// # Errors
///
/// Returns [`SeasonError::UnknownTeam`] if a pairing references a missing team.
pub fn advance_round(universe: &mut Universe) -> Result<bool, SeasonError> {
    let BracketState::Built(bracket) = &mut universe.bracket else {
        return Ok(false);
    };
    if bracket.is_complete() {
        return Ok(false);
    }
    let Some(last) = bracket.rounds.last() else {
        return Ok(false);
    };

    let seed_order: HashMap<TeamId, usize> = bracket
        .field
        .iter()
        .enumerate()
        .map(|(pos, &id)| (id, pos))
        .collect();
    let mut remaining: Vec<TeamId> = last.iter().filter_map(Game::winner).collect();
    sort_by_seed(&mut remaining, &seed_order);

    let week = last
        .first()
        .map_or(universe.week, |game| game.week.saturating_add(1));
    let (pairs, _) = pair_by_seed(&remaining);
    let (games, winners) = play_round(
        &pairs,
        week,
        &mut universe.teams,
        &mut universe.rng,
        &universe.config,
    )?;
    bracket.rounds.push(games);
    if let [champion] = winners.as_slice() {
        bracket.champion = Some(*champion);
        log::debug!("national champion: team {champion}");
    }
    Ok(true)
}

/// Play national rounds until a champion emerges.
///
/// Safe to call repeatedly; returns the champion, if any.
///
/// # Errors
///
/// Returns [`SeasonError::UnknownTeam`] if a pairing references a missing team.
pub fn advance_bracket(universe: &mut Universe) -> Result<Option<TeamId>, SeasonError> {
    while advance_round(universe)? {}
    Ok(universe.national_champion())
}
