//! Centralized tuning constants for the Seasonsim engine.
//!
//! These values define the deterministic math for the core simulation and
//! seed the defaults of [`crate::config::SimConfig`].

// Outcome model --------------------------------------------------------------
pub const LOGISTIC_STEEPNESS: f64 = 0.08;
pub const HOME_ADVANTAGE: f64 = 3.0;
pub const SCORE_BASELINE: f64 = 70.0;
pub const SCORE_SPREAD: f64 = 20.0;
pub const SCORE_FLOOR: u16 = 40;
/// Upper bound on configured baselines and floors.
pub const SCORE_CEILING: f64 = 250.0;
/// Point swing applied across both scores per unit of win-probability edge.
pub const MARGIN_SCALE: f64 = 40.0;

// Season metrics -------------------------------------------------------------
pub const QUALITY_WIN_RATING: f64 = 75.0;
pub const SOS_PER_RATING: f64 = 0.01;

// Roster bounds --------------------------------------------------------------
pub const RATING_MIN: f64 = 30.0;
pub const RATING_MAX: f64 = 95.0;

// Scheduling -----------------------------------------------------------------
pub const NON_CONF_ATTEMPT_FACTOR: usize = 20;
pub const DEFAULT_NON_CONF_GAMES: usize = 4;

// National selection ---------------------------------------------------------
pub const METRIC_RATING_WEIGHT: f64 = 0.6;
pub const METRIC_SOS_WEIGHT: f64 = 0.3;
pub const METRIC_RESUME_WEIGHT: f64 = 4.0;
pub const METRIC_RECORD_WEIGHT: f64 = 0.5;
/// Allowed national field sizes, largest first.
pub const FIELD_SIZES: [usize; 4] = [64, 32, 16, 8];

// Seasons --------------------------------------------------------------------
pub const DEFAULT_YEAR: u16 = 2025;

// Seed derivation domains ----------------------------------------------------
pub(crate) const RESTORE_DOMAIN: &[u8] = b"seasonsim-restore";
pub(crate) const PAIRING_DOMAIN: u64 = 0x5EA5_0A11_C0DE_0001;
