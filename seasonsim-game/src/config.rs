//! Tunable simulation parameters.
//!
//! A universe carries its own `SimConfig` so saved universes replay with the
//! parameters they were created with.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;

/// Errors raised when simulation configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be greater than zero (got {value:.3})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default = "SimConfig::default_steepness")]
    pub logistic_steepness: f64,
    #[serde(default = "SimConfig::default_home_advantage")]
    pub home_advantage: f64,
    #[serde(default = "SimConfig::default_score_baseline")]
    pub score_baseline: f64,
    #[serde(default = "SimConfig::default_score_spread")]
    pub score_spread: f64,
    #[serde(default = "SimConfig::default_score_floor")]
    pub score_floor: u16,
    #[serde(default = "SimConfig::default_margin_scale")]
    pub margin_scale: f64,
    /// Loser rating above which a win counts toward the winner's resume.
    #[serde(default = "SimConfig::default_quality_win_rating")]
    pub quality_win_rating: f64,
    #[serde(default = "SimConfig::default_sos_per_rating")]
    pub sos_per_rating: f64,
}

impl SimConfig {
    const fn default_steepness() -> f64 {
        constants::LOGISTIC_STEEPNESS
    }

    const fn default_home_advantage() -> f64 {
        constants::HOME_ADVANTAGE
    }

    const fn default_score_baseline() -> f64 {
        constants::SCORE_BASELINE
    }

    const fn default_score_spread() -> f64 {
        constants::SCORE_SPREAD
    }

    const fn default_score_floor() -> u16 {
        constants::SCORE_FLOOR
    }

    const fn default_margin_scale() -> f64 {
        constants::MARGIN_SCALE
    }

    const fn default_quality_win_rating() -> f64 {
        constants::QUALITY_WIN_RATING
    }

    const fn default_sos_per_rating() -> f64 {
        constants::SOS_PER_RATING
    }

    /// Check that every parameter keeps the outcome model well defined.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("logistic_steepness", self.logistic_steepness)?;
        positive("score_baseline", self.score_baseline)?;
        in_range(
            "score_baseline",
            self.score_baseline,
            0.0,
            constants::SCORE_CEILING,
        )?;
        in_range(
            "score_floor",
            f64::from(self.score_floor),
            0.0,
            constants::SCORE_CEILING,
        )?;
        in_range("home_advantage", self.home_advantage, 0.0, 20.0)?;
        in_range("score_spread", self.score_spread, 0.0, self.score_baseline)?;
        in_range("margin_scale", self.margin_scale, 0.0, 100.0)?;
        in_range(
            "quality_win_rating",
            self.quality_win_rating,
            constants::RATING_MIN,
            constants::RATING_MAX,
        )?;
        in_range("sos_per_rating", self.sos_per_rating, 0.0, 1.0)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            logistic_steepness: Self::default_steepness(),
            home_advantage: Self::default_home_advantage(),
            score_baseline: Self::default_score_baseline(),
            score_spread: Self::default_score_spread(),
            score_floor: Self::default_score_floor(),
            margin_scale: Self::default_margin_scale(),
            quality_win_rating: Self::default_quality_win_rating(),
            sos_per_rating: Self::default_sos_per_rating(),
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::RangeViolation {
            field,
            min,
            max,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: SimConfig = serde_json::from_str(r#"{"home_advantage": 5.0}"#).unwrap();
        assert!((cfg.home_advantage - 5.0).abs() < f64::EPSILON);
        assert_eq!(cfg.score_floor, constants::SCORE_FLOOR);
    }

    #[test]
    fn rejects_non_positive_steepness() {
        let cfg = SimConfig {
            logistic_steepness: 0.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NotPositive {
                field: "logistic_steepness",
                ..
            })
        ));
    }

    #[test]
    fn rejects_spread_wider_than_baseline() {
        let cfg = SimConfig {
            score_spread: 500.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::RangeViolation {
                field: "score_spread",
                ..
            })
        ));
    }

    #[test]
    fn rejects_runaway_baseline_and_floor() {
        let cfg = SimConfig {
            score_baseline: 1e6,
            score_spread: 0.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::RangeViolation {
                field: "score_baseline",
                ..
            })
        ));

        let cfg = SimConfig {
            score_floor: u16::MAX,
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::RangeViolation {
                field: "score_floor",
                ..
            })
        ));
    }
}
