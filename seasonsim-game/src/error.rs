use thiserror::Error;

use crate::config::ConfigError;
use crate::team::TeamId;

/// Hard failures of the season engine.
///
/// Imbalanced data (odd conferences, thin pools) never produces an error;
/// these variants signal broken invariants or unusable input.
#[derive(Debug, Error)]
pub enum SeasonError {
    #[error("team {0} is not part of this universe")]
    UnknownTeam(TeamId),
    #[error("invalid simulation config: {0}")]
    Config(#[from] ConfigError),
    #[error("universe JSON could not be parsed: {0}")]
    Json(#[from] serde_json::Error),
}
