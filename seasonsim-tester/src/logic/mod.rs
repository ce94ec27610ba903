pub mod reports;
pub mod season_runner;
pub mod seeds;
pub mod tester;

pub use season_runner::{SeasonExpectation, SeasonPlan, SeasonRunner, SeasonSummary};
pub use seeds::{SeedInfo, resolve_seed_inputs};
pub use tester::*;
