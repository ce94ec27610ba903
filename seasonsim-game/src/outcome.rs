//! Outcome model: ratings in, probabilities and final scores out.

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::error::SeasonError;
use crate::game::Game;
use crate::numbers::round_f64_to_score;
use crate::rng::SeasonRng;
use crate::team::{TeamId, TeamStore};

/// Result summary returned when a game is actually played.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub winner: TeamId,
    pub loser: TeamId,
    pub home_score: u16,
    pub away_score: u16,
    /// Pre-game home win probability.
    pub home_win_prob: f64,
}

/// Probability that the home side wins.
///
/// Logistic in `home + home_advantage - away`; exactly 0.5 at zero
/// differential and strictly inside (0, 1) for finite inputs.
#[must_use]
pub fn win_probability(
    home_rating: f64,
    away_rating: f64,
    home_advantage: f64,
    steepness: f64,
) -> f64 {
    let diff = home_rating + home_advantage - away_rating;
    1.0 / (1.0 + (-steepness * diff).exp())
}

/// Raw score from the mean of three unit draws, floored at `floor`.
pub fn simulate_score(baseline: f64, spread: f64, floor: u16, rng: &mut SeasonRng) -> u16 {
    round_f64_to_score(raw_score(baseline, spread, rng), floor)
}

fn raw_score(baseline: f64, spread: f64, rng: &mut SeasonRng) -> f64 {
    let mean = (rng.next_f64() + rng.next_f64() + rng.next_f64()) / 3.0;
    baseline + (mean - 0.5) * 2.0 * spread
}

/// Play `game` and write the result into the team store.
///
/// Returns `Ok(None)` when the game was already played; nothing is drawn or
/// mutated in that case.
///
/// # Errors
///
/// Returns [`SeasonError::UnknownTeam`] when either side is missing from the
/// roster. The game stays unplayed.
pub fn simulate_game(
    game: &mut Game,
    teams: &mut TeamStore,
    rng: &mut SeasonRng,
    cfg: &SimConfig,
) -> Result<Option<GameOutcome>, SeasonError> {
    if game.played {
        return Ok(None);
    }

    let home_rating = teams.require(game.home)?.rating;
    let away_rating = teams.require(game.away)?.rating;
    let advantage = if game.neutral { 0.0 } else { cfg.home_advantage };
    let p_home = win_probability(home_rating, away_rating, advantage, cfg.logistic_steepness);

    let raw_home = raw_score(cfg.score_baseline, cfg.score_spread, rng);
    let raw_away = raw_score(cfg.score_baseline, cfg.score_spread, rng);
    let margin = (p_home - 0.5) * cfg.margin_scale;
    let mut home_score = round_f64_to_score(raw_home + margin / 2.0, cfg.score_floor);
    let mut away_score = round_f64_to_score(raw_away - margin / 2.0, cfg.score_floor);

    if home_score == away_score {
        break_tie(&mut home_score, &mut away_score, rng.coin());
    }

    game.played = true;
    game.home_score = home_score;
    game.away_score = away_score;

    let (winner, loser) = if home_score > away_score {
        (game.home, game.away)
    } else {
        (game.away, game.home)
    };
    teams.record_result(winner, loser, game.conference.is_some(), cfg)?;

    Ok(Some(GameOutcome {
        winner,
        loser,
        home_score,
        away_score,
        home_win_prob: p_home,
    }))
}

/// Nudge the chosen side ahead by one point; at the top of the range the
/// other side drops instead.
fn break_tie(home_score: &mut u16, away_score: &mut u16, home_wins: bool) {
    let (winner, loser) = if home_wins {
        (home_score, away_score)
    } else {
        (away_score, home_score)
    };
    match winner.checked_add(1) {
        Some(score) => *winner = score,
        None => *loser = loser.saturating_sub(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{HOME_ADVANTAGE, LOGISTIC_STEEPNESS};
    use crate::team::Team;

    fn pair(home_rating: f64, away_rating: f64) -> TeamStore {
        TeamStore::from(vec![
            Team::new(1, "Home", "H", Some("C".into()), home_rating),
            Team::new(2, "Away", "A", Some("C".into()), away_rating),
        ])
    }

    #[test]
    fn equal_ratings_are_a_coin_flip() {
        let p = win_probability(70.0, 70.0, 0.0, LOGISTIC_STEEPNESS);
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn probability_is_monotone_and_symmetric() {
        let lo = win_probability(60.0, 70.0, 0.0, LOGISTIC_STEEPNESS);
        let mid = win_probability(65.0, 70.0, 0.0, LOGISTIC_STEEPNESS);
        let hi = win_probability(80.0, 70.0, 0.0, LOGISTIC_STEEPNESS);
        assert!(lo < mid && mid < hi);
        let reverse = win_probability(70.0, 80.0, 0.0, LOGISTIC_STEEPNESS);
        assert!((hi + reverse - 1.0).abs() < 1e-12);
    }

    #[test]
    fn heavy_home_favorite_exceeds_ninety_five_percent() {
        let p = win_probability(90.0, 30.0, HOME_ADVANTAGE, LOGISTIC_STEEPNESS);
        assert!(p > 0.95 && p < 1.0, "got {p}");
    }

    #[test]
    fn heavy_favorite_wins_nine_hundred_of_a_thousand() {
        let cfg = SimConfig::default();
        let mut favorite_wins = 0;
        for seed in 0..1000_u32 {
            let mut teams = pair(90.0, 30.0);
            let mut rng = SeasonRng::new(seed);
            let mut game = Game::new(1, 2, 1);
            let outcome = simulate_game(&mut game, &mut teams, &mut rng, &cfg)
                .unwrap()
                .expect("fresh game is played");
            if outcome.winner == 1 {
                favorite_wins += 1;
            }
        }
        assert!(favorite_wins >= 900, "favorite won only {favorite_wins}");
    }

    #[test]
    fn simulate_game_is_idempotent() {
        let cfg = SimConfig::default();
        let mut teams = pair(70.0, 72.0);
        let mut rng = SeasonRng::new(11);
        let mut game = Game::conference_game(1, 2, "C", 1);

        assert!(simulate_game(&mut game, &mut teams, &mut rng, &cfg).unwrap().is_some());
        let snapshot = (game.clone(), teams.clone(), rng.draws());

        assert!(simulate_game(&mut game, &mut teams, &mut rng, &cfg).unwrap().is_none());
        assert_eq!(snapshot, (game, teams, rng.draws()));
    }

    #[test]
    fn games_never_end_tied() {
        let cfg = SimConfig::default();
        let mut teams = pair(70.0, 70.0);
        let mut rng = SeasonRng::new(5);
        for _ in 0..2000 {
            let mut game = Game::neutral(1, 2, 1);
            simulate_game(&mut game, &mut teams, &mut rng, &cfg).unwrap();
            assert!(game.played);
            assert_ne!(game.home_score, game.away_score);
            assert!(game.home_score >= cfg.score_floor && game.away_score >= cfg.score_floor);
        }
        let home = teams.get(1).unwrap();
        assert_eq!(u32::from(home.wins) + u32::from(home.losses), 2000);
    }

    #[test]
    fn conference_label_drives_conference_record() {
        let cfg = SimConfig::default();
        let mut teams = pair(70.0, 70.0);
        let mut rng = SeasonRng::new(3);
        let mut game = Game::new(1, 2, 1);
        simulate_game(&mut game, &mut teams, &mut rng, &cfg).unwrap();
        let total_conf: u16 = teams.iter().map(|t| t.conf_wins + t.conf_losses).sum();
        assert_eq!(total_conf, 0);
    }

    #[test]
    fn unknown_team_leaves_game_unplayed() {
        let cfg = SimConfig::default();
        let mut teams = pair(70.0, 70.0);
        let mut rng = SeasonRng::new(3);
        let mut game = Game::new(1, 42, 1);
        let err = simulate_game(&mut game, &mut teams, &mut rng, &cfg).unwrap_err();
        assert!(matches!(err, SeasonError::UnknownTeam(42)));
        assert!(!game.played);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn simulate_score_respects_floor_and_bounds() {
        let mut rng = SeasonRng::new(8);
        for _ in 0..500 {
            let score = simulate_score(70.0, 20.0, 40, &mut rng);
            assert!((50..=90).contains(&score));
        }
        assert_eq!(simulate_score(10.0, 5.0, 40, &mut rng), 40);
    }

    #[test]
    fn saturated_tie_still_has_a_winner() {
        let (mut home, mut away) = (u16::MAX, u16::MAX);
        break_tie(&mut home, &mut away, true);
        assert_eq!((home, away), (u16::MAX, u16::MAX - 1));

        let (mut home, mut away) = (u16::MAX, u16::MAX);
        break_tie(&mut home, &mut away, false);
        assert_eq!((home, away), (u16::MAX - 1, u16::MAX));

        let (mut home, mut away) = (60, 60);
        break_tie(&mut home, &mut away, false);
        assert_eq!((home, away), (60, 61));
    }

    #[test]
    fn unvalidated_huge_scores_do_not_overflow() {
        let cfg = SimConfig {
            score_baseline: 1e6,
            score_spread: 0.0,
            ..SimConfig::default()
        };
        let mut teams = pair(70.0, 70.0);
        let mut rng = SeasonRng::new(21);
        let mut game = Game::neutral(1, 2, 1);
        let outcome = simulate_game(&mut game, &mut teams, &mut rng, &cfg)
            .unwrap()
            .expect("fresh game is played");
        assert_ne!(outcome.home_score, outcome.away_score);
        assert_eq!(outcome.home_score.max(outcome.away_score), u16::MAX);
    }
}
