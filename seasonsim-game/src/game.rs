use serde::{Deserialize, Serialize};

use crate::team::TeamId;

/// A scheduled or completed game.
///
/// Once `played` is set the game is never simulated again, and its scores
/// always differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub home: TeamId,
    pub away: TeamId,
    /// Conference label for league games; `None` for non-conference and postseason.
    #[serde(default)]
    pub conference: Option<String>,
    pub week: u16,
    #[serde(default)]
    pub neutral: bool,
    #[serde(default)]
    pub played: bool,
    #[serde(default)]
    pub home_score: u16,
    #[serde(default)]
    pub away_score: u16,
}

impl Game {
    #[must_use]
    pub const fn new(home: TeamId, away: TeamId, week: u16) -> Self {
        Self {
            home,
            away,
            conference: None,
            week,
            neutral: false,
            played: false,
            home_score: 0,
            away_score: 0,
        }
    }

    #[must_use]
    pub fn conference_game(home: TeamId, away: TeamId, conference: &str, week: u16) -> Self {
        Self {
            conference: Some(conference.to_string()),
            ..Self::new(home, away, week)
        }
    }

    /// Neutral-site postseason game.
    #[must_use]
    pub const fn neutral(home: TeamId, away: TeamId, week: u16) -> Self {
        let mut game = Self::new(home, away, week);
        game.neutral = true;
        game
    }

    #[must_use]
    pub fn involves(&self, id: TeamId) -> bool {
        self.home == id || self.away == id
    }

    /// Winning team id once played.
    #[must_use]
    pub fn winner(&self) -> Option<TeamId> {
        if !self.played {
            return None;
        }
        Some(if self.home_score > self.away_score {
            self.home
        } else {
            self.away
        })
    }

    /// Losing team id once played.
    #[must_use]
    pub fn loser(&self) -> Option<TeamId> {
        let winner = self.winner()?;
        Some(if winner == self.home {
            self.away
        } else {
            self.home
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unplayed_game_has_no_winner() {
        let game = Game::new(1, 2, 1);
        assert_eq!(game.winner(), None);
        assert_eq!(game.loser(), None);
    }

    #[test]
    fn winner_follows_scores() {
        let mut game = Game::neutral(1, 2, 5);
        game.played = true;
        game.home_score = 61;
        game.away_score = 64;
        assert_eq!(game.winner(), Some(2));
        assert_eq!(game.loser(), Some(1));
        assert!(game.involves(1) && !game.involves(3));
    }

    #[test]
    fn missing_optional_fields_deserialize() {
        let game: Game = serde_json::from_str(r#"{"home":1,"away":2,"week":3}"#).unwrap();
        assert_eq!(game, Game::new(1, 2, 3));
    }
}
