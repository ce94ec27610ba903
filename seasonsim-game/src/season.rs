//! Regular-season play.

use crate::error::SeasonError;
use crate::outcome::simulate_game;
use crate::universe::Universe;

/// Play every unplayed game in schedule order.
///
/// Returns the number of games played by this call; already-played games are
/// skipped, so a second call returns 0 and draws nothing. The week counter
/// is left alone.
///
/// # Errors
///
/// Returns [`SeasonError::UnknownTeam`] if a scheduled game references a team
/// missing from the roster.
pub fn simulate_season(universe: &mut Universe) -> Result<usize, SeasonError> {
    let mut played = 0;
    for game in &mut universe.games {
        let outcome =
            simulate_game(game, &mut universe.teams, &mut universe.rng, &universe.config)?;
        if outcome.is_some() {
            played += 1;
        }
    }
    log::debug!("season simulated: {played} games played");
    Ok(played)
}

/// Play the unplayed games of the current week, then move to the next week.
///
/// Once past the final scheduled week this returns 0 without advancing.
///
/// # Errors
///
/// Returns [`SeasonError::UnknownTeam`] if a scheduled game references a team
/// missing from the roster.
pub fn simulate_week(universe: &mut Universe) -> Result<usize, SeasonError> {
    if universe.week > universe.final_week() {
        return Ok(0);
    }
    let week = universe.week;
    let mut played = 0;
    for game in universe.games.iter_mut().filter(|game| game.week == week) {
        let outcome =
            simulate_game(game, &mut universe.teams, &mut universe.rng, &universe.config)?;
        if outcome.is_some() {
            played += 1;
        }
    }
    universe.week = week.saturating_add(1);
    log::debug!("week {week}: {played} games played");
    Ok(played)
}
