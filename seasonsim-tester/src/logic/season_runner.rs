use anyhow::{Context, Result};
use seasonsim_game::{Game, RosterEntry, ScheduleMode, Team, Universe};
use std::sync::Arc;

/// Check run against a finished season.
pub type SeasonExpectation = fn(&SeasonSummary) -> Result<()>;

/// Declarative plan for running one seeded season.
#[derive(Debug, Clone)]
pub struct SeasonPlan {
    pub mode: ScheduleMode,
    pub non_conf: usize,
    /// Save and restore after this many weeks.
    pub restore_after_weeks: Option<u16>,
    /// Run the season a second time from scratch and compare.
    pub replay: bool,
    pub expectations: Vec<SeasonExpectation>,
}

impl SeasonPlan {
    #[must_use]
    pub const fn new(mode: ScheduleMode, non_conf: usize) -> Self {
        Self {
            mode,
            non_conf,
            restore_after_weeks: None,
            replay: false,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_restore_after(mut self, weeks: u16) -> Self {
        self.restore_after_weeks = Some(weeks);
        self
    }

    #[must_use]
    pub const fn with_replay(mut self) -> Self {
        self.replay = true;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: SeasonExpectation) -> Self {
        self.expectations.push(expectation);
        self
    }
}

/// Outcome of a save and two independent restores.
#[derive(Debug, Clone)]
pub struct RestoreCheck {
    pub week: u16,
    /// Re-serializing the restored universe gives the saved JSON back.
    pub json_roundtrip: bool,
    /// Two restores of the same save finish the season identically.
    pub restores_agree: bool,
}

#[derive(Debug, Clone)]
pub struct SeasonSummary {
    pub phrase: String,
    pub universe: Universe,
    pub replay_matches: Option<bool>,
    pub restore: Option<RestoreCheck>,
}

impl SeasonSummary {
    /// Every game of the season: schedule, conference tournaments, national bracket.
    pub fn all_games(&self) -> impl Iterator<Item = &Game> {
        let tournaments = self
            .universe
            .conf_tournaments
            .values()
            .flat_map(|t| t.rounds.iter().flatten());
        let bracket = self
            .universe
            .bracket
            .as_built()
            .into_iter()
            .flat_map(|b| b.rounds.iter().flatten());
        self.universe.games.iter().chain(tournaments).chain(bracket)
    }

    #[must_use]
    pub fn champion_name(&self) -> String {
        self.universe
            .national_champion()
            .and_then(|id| self.universe.team(id))
            .map_or_else(|| "none".to_string(), Team::display_name)
    }
}

/// Drives the engine through seeded seasons over a fixed roster.
#[derive(Debug, Clone)]
pub struct SeasonRunner {
    roster: Arc<Vec<RosterEntry>>,
    verbose: bool,
}

impl SeasonRunner {
    #[must_use]
    pub const fn new(roster: Arc<Vec<RosterEntry>>, verbose: bool) -> Self {
        Self { roster, verbose }
    }

    #[must_use]
    pub fn team_count(&self) -> usize {
        self.roster.len()
    }

    fn fresh_universe(&self, plan: &SeasonPlan, phrase: &str) -> Universe {
        let teams = self.roster.iter().cloned().map(RosterEntry::into_team).collect();
        let mut universe = Universe::new(teams, phrase);
        universe.generate_schedule(plan.mode, plan.non_conf);
        universe
    }

    /// Run a plan for one seed phrase.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine reports a broken roster reference or a
    /// save cannot be restored.
    pub fn run_plan(&self, plan: &SeasonPlan, phrase: &str) -> Result<SeasonSummary> {
        let (universe, restore) = self.play(plan, phrase)?;

        let replay_matches = if plan.replay {
            let (replay, _) = self.play(plan, phrase)?;
            Some(replay.to_json()? == universe.to_json()?)
        } else {
            None
        };

        if self.verbose {
            log::info!(
                "{phrase}: {} teams, {} games, {} draws, week {}",
                self.team_count(),
                universe.played_games(),
                universe.rng_draws(),
                universe.week
            );
        }

        Ok(SeasonSummary {
            phrase: phrase.to_string(),
            universe,
            replay_matches,
            restore,
        })
    }

    fn play(&self, plan: &SeasonPlan, phrase: &str) -> Result<(Universe, Option<RestoreCheck>)> {
        let mut universe = self.fresh_universe(plan, phrase);
        let restore = match plan.restore_after_weeks {
            Some(weeks) => {
                let (restored, check) = Self::save_and_restore(universe, weeks)?;
                universe = restored;
                Some(check)
            }
            None => None,
        };
        finish_season(&mut universe)?;
        Ok((universe, restore))
    }

    fn save_and_restore(mut universe: Universe, weeks: u16) -> Result<(Universe, RestoreCheck)> {
        for _ in 0..weeks {
            universe.simulate_week()?;
        }
        let saved = universe.to_json().context("saving universe")?;
        let restored = Universe::from_json(&saved).context("restoring universe")?;
        let json_roundtrip = restored.to_json()? == saved;

        let mut first = restored.clone();
        let mut second = Universe::from_json(&saved).context("restoring universe twice")?;
        finish_season(&mut first)?;
        finish_season(&mut second)?;
        let restores_agree = first.to_json()? == second.to_json()?;

        let check = RestoreCheck {
            week: universe.week,
            json_roundtrip,
            restores_agree,
        };
        Ok((restored, check))
    }
}

fn finish_season(universe: &mut Universe) -> Result<()> {
    universe.simulate_season()?;
    universe.build_conference_tournaments()?;
    universe.build_national_bracket()?;
    universe.advance_bracket()?;
    Ok(())
}
