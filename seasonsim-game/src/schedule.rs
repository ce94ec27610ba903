//! Season schedule generation.
//!
//! Non-conference games fill the opening weeks, each in the first week both
//! sides are free; conference round robins follow, with every conference
//! playing its rotations in parallel.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::constants::NON_CONF_ATTEMPT_FACTOR;
use crate::game::Game;
use crate::numbers::draw_to_index;
use crate::rng::SeasonRng;
use crate::seed::pairing_hash;
use crate::team::{TeamId, TeamStore};
use crate::universe::{BracketState, Universe};

/// How many times each conference pairing is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleMode {
    #[default]
    Single,
    Double,
}

impl ScheduleMode {
    const fn passes(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Double => 2,
        }
    }
}

impl std::str::FromStr for ScheduleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "double" => Ok(Self::Double),
            other => Err(format!("unknown schedule mode '{other}'")),
        }
    }
}

/// Replace the universe's schedule and reset the season to week 1.
///
/// Team records, conference tournaments and the national bracket are
/// cleared since they no longer describe the new schedule.
pub fn generate_schedule(universe: &mut Universe, mode: ScheduleMode, non_conf_count: usize) {
    universe.teams.reset_season();
    universe.conf_tournaments.clear();
    universe.bracket = BracketState::NotBuilt;

    let mut games = non_conference_games(
        &universe.teams,
        universe.year,
        non_conf_count,
        &mut universe.rng,
    );
    let non_conf_total = games.len();
    let week_offset = games.iter().map(|game| game.week).max().unwrap_or(0);

    for conference in universe.teams.conferences() {
        let members = universe.teams.conference_members(&conference);
        games.extend(conference_games(&conference, &members, mode, week_offset));
    }

    games.sort_by_key(|game| game.week);
    log::debug!(
        "scheduled {} games ({} non-conference) for {} teams, mode {:?}",
        games.len(),
        non_conf_total,
        universe.teams.len(),
        mode
    );

    universe.games = games;
    universe.week = 1;
}

/// Circle-method rotations over `ids`; each rotation is one week of pairings.
///
/// An odd count is padded with a bye, so one team sits out each rotation.
/// Home and away alternate with the parity of the rotation index.
#[must_use]
pub fn round_robin_rotations(ids: &[TeamId]) -> Vec<Vec<(TeamId, TeamId)>> {
    let mut slots: Vec<Option<TeamId>> = ids.iter().copied().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }
    let n = slots.len();
    if n < 2 {
        return Vec::new();
    }

    let mut rotations = Vec::with_capacity(n - 1);
    for round in 0..n - 1 {
        let mut pairs = Vec::with_capacity(n / 2);
        for i in 0..n / 2 {
            if let (Some(a), Some(b)) = (slots[i], slots[n - 1 - i]) {
                pairs.push(if round % 2 == 0 { (a, b) } else { (b, a) });
            }
        }
        rotations.push(pairs);
        slots[1..].rotate_right(1);
    }
    rotations
}

fn conference_games(
    conference: &str,
    members: &[TeamId],
    mode: ScheduleMode,
    week_offset: u16,
) -> Vec<Game> {
    let rotations = round_robin_rotations(members);
    let mut games = Vec::new();
    let mut slot = week_offset;

    for pass in 0..mode.passes() {
        for rotation in &rotations {
            slot = slot.saturating_add(1);
            for &(home, away) in rotation {
                let (home, away) = if pass % 2 == 0 {
                    (home, away)
                } else {
                    (away, home)
                };
                games.push(Game::conference_game(home, away, conference, slot));
            }
        }
    }
    games
}

fn pair_key(a: TeamId, b: TeamId) -> (TeamId, TeamId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Rejection-sampled non-conference pairings.
///
/// Each team tries to reach `target` non-conference games within
/// `target * NON_CONF_ATTEMPT_FACTOR` draws; a thin pool leaves it short.
/// Opponents already at `target` are rejected, so no team exceeds it.
fn non_conference_games(
    teams: &TeamStore,
    year: u16,
    target: usize,
    rng: &mut SeasonRng,
) -> Vec<Game> {
    let ids: Vec<TeamId> = teams.ids().collect();
    let positions: HashMap<TeamId, usize> =
        ids.iter().enumerate().map(|(pos, &id)| (id, pos)).collect();
    let max_attempts = target.saturating_mul(NON_CONF_ATTEMPT_FACTOR);
    let mut counts: HashMap<TeamId, usize> = HashMap::new();
    let mut scheduled: HashSet<(TeamId, TeamId)> = HashSet::new();
    let mut booked: HashSet<(TeamId, u16)> = HashSet::new();
    let mut games = Vec::new();

    for team in teams.iter() {
        let mut attempts = 0;
        while counts.get(&team.id).copied().unwrap_or(0) < target && attempts < max_attempts {
            attempts += 1;
            let opponent_id = ids[draw_to_index(rng.next_f64(), ids.len())];
            if opponent_id == team.id {
                continue;
            }
            let Some(opponent) = teams.get(opponent_id) else {
                continue;
            };
            if team.shares_conference(opponent) {
                continue;
            }
            if counts.get(&opponent_id).copied().unwrap_or(0) >= target {
                continue;
            }
            if !scheduled.insert(pair_key(team.id, opponent_id)) {
                continue;
            }

            let index = pairing_index(&positions, ids.len(), team.id, opponent_id);
            let (home, away) = if pairing_hash(team.id, opponent_id, year, index) & 1 == 0 {
                (team.id, opponent_id)
            } else {
                (opponent_id, team.id)
            };

            let week = first_open_week(&booked, team.id, opponent_id);
            booked.insert((team.id, week));
            booked.insert((opponent_id, week));
            *counts.entry(team.id).or_insert(0) += 1;
            *counts.entry(opponent_id).or_insert(0) += 1;
            games.push(Game::new(home, away, week));
        }

        let filled = counts.get(&team.id).copied().unwrap_or(0);
        if filled < target {
            log::debug!(
                "team {} under-filled: {filled}/{target} non-conference games",
                team.id
            );
        }
    }
    games
}

/// Slot of the pair in the roster-ordered pair grid; depends only on the roster.
fn pairing_index(positions: &HashMap<TeamId, usize>, len: usize, a: TeamId, b: TeamId) -> usize {
    let pa = positions.get(&a).copied().unwrap_or(0);
    let pb = positions.get(&b).copied().unwrap_or(0);
    pa.min(pb) * len + pa.max(pb)
}

fn first_open_week(booked: &HashSet<(TeamId, u16)>, a: TeamId, b: TeamId) -> u16 {
    (1..u16::MAX)
        .find(|&week| !booked.contains(&(a, week)) && !booked.contains(&(b, week)))
        .unwrap_or(u16::MAX)
}
