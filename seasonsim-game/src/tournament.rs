//! Conference tournaments: single elimination seeded from standings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::SimConfig;
use crate::error::SeasonError;
use crate::game::Game;
use crate::outcome::simulate_game;
use crate::rng::SeasonRng;
use crate::standings::rank;
use crate::team::{TeamId, TeamStore};
use crate::universe::Universe;

/// A conference's postseason bracket.
///
/// `seeds` is the standings order at build time. A one-team conference has
/// that team as champion with no rounds; an empty one has no champion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConferenceTournament {
    pub conference: String,
    pub seeds: Vec<TeamId>,
    pub rounds: Vec<Vec<Game>>,
    pub champion: Option<TeamId>,
}

impl ConferenceTournament {
    /// Total games played across all rounds.
    #[must_use]
    pub fn game_count(&self) -> usize {
        self.rounds.iter().map(Vec::len).sum()
    }
}

/// Pair the best remaining seed with the worst.
///
/// `remaining` must be in seed order. With an odd count the top seed sits
/// out and is returned as the bye.
pub(crate) fn pair_by_seed(remaining: &[TeamId]) -> (Vec<(TeamId, TeamId)>, Option<TeamId>) {
    let (bye, rest) = match remaining.split_first() {
        Some((&top, rest)) if remaining.len() % 2 == 1 => (Some(top), rest),
        _ => (None, remaining),
    };
    let n = rest.len();
    let pairs = (0..n / 2).map(|i| (rest[i], rest[n - 1 - i])).collect();
    (pairs, bye)
}

/// Simulate one round of neutral-site pairings and return the games plus winners.
pub(crate) fn play_round(
    pairs: &[(TeamId, TeamId)],
    week: u16,
    teams: &mut TeamStore,
    rng: &mut SeasonRng,
    cfg: &SimConfig,
) -> Result<(Vec<Game>, Vec<TeamId>), SeasonError> {
    let mut games = Vec::with_capacity(pairs.len());
    let mut winners = Vec::with_capacity(pairs.len());
    for &(high, low) in pairs {
        let mut game = Game::neutral(high, low, week);
        if let Some(outcome) = simulate_game(&mut game, teams, rng, cfg)? {
            winners.push(outcome.winner);
        }
        games.push(game);
    }
    Ok((games, winners))
}

/// Reorder `ids` by their position in `seed_order`.
pub(crate) fn sort_by_seed(ids: &mut [TeamId], seed_order: &HashMap<TeamId, usize>) {
    ids.sort_by_key(|id| seed_order.get(id).copied().unwrap_or(usize::MAX));
}

fn run_tournament(
    conference: &str,
    seeds: Vec<TeamId>,
    start_week: u16,
    teams: &mut TeamStore,
    rng: &mut SeasonRng,
    cfg: &SimConfig,
) -> Result<ConferenceTournament, SeasonError> {
    let seed_order: HashMap<TeamId, usize> =
        seeds.iter().enumerate().map(|(pos, &id)| (id, pos)).collect();
    let mut remaining = seeds.clone();
    let mut rounds = Vec::new();
    let mut week = start_week;

    while remaining.len() > 1 {
        let (pairs, bye) = pair_by_seed(&remaining);
        let (games, mut winners) = play_round(&pairs, week, teams, rng, cfg)?;
        winners.extend(bye);
        sort_by_seed(&mut winners, &seed_order);
        rounds.push(games);
        remaining = winners;
        week = week.saturating_add(1);
    }

    let champion = remaining.first().copied();
    log::debug!(
        "{conference} tournament: {} seeds, {} rounds, champion {:?}",
        seeds.len(),
        rounds.len(),
        champion
    );
    Ok(ConferenceTournament {
        conference: conference.to_string(),
        seeds,
        rounds,
        champion,
    })
}

/// Seed and play every conference tournament.
///
/// Tournaments run in parallel, one week per round, starting at the current
/// week or the week after the regular season, whichever is later. Afterwards
/// the week counter sits past the longest tournament.
///
/// A no-op while regular-season games remain unplayed, and once tournaments
/// already exist for this season.
///
/// # Errors
///
/// Returns [`SeasonError::UnknownTeam`] if standings reference a missing team.
pub fn build_conference_tournaments(universe: &mut Universe) -> Result<(), SeasonError> {
    if !universe.conf_tournaments.is_empty() {
        log::debug!("conference tournaments already built; skipping");
        return Ok(());
    }
    if !universe.is_regular_season_complete() {
        log::warn!("regular season incomplete; conference tournaments not built");
        return Ok(());
    }

    let start_week = universe.week.max(universe.final_week().saturating_add(1));
    let mut longest = 0;
    for conference in universe.teams.conferences() {
        let seeds: Vec<TeamId> = rank(universe, &conference).iter().map(|t| t.id).collect();
        let tournament = run_tournament(
            &conference,
            seeds,
            start_week,
            &mut universe.teams,
            &mut universe.rng,
            &universe.config,
        )?;
        longest = longest.max(tournament.rounds.len());
        universe.conf_tournaments.insert(conference, tournament);
    }
    let rounds = u16::try_from(longest).unwrap_or(u16::MAX);
    universe.week = start_week.saturating_add(rounds);
    Ok(())
}
