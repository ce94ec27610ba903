use anyhow::{Result, ensure};
use seasonsim_game::{ScheduleMode, field_size};
use std::collections::HashMap;

use crate::logic::{SeasonExpectation, SeasonPlan, SeasonSummary};

/// A named plan with its checks.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SeasonPlan,
}

impl TestScenario {
    #[must_use]
    pub fn season(name: impl Into<String>, plan: SeasonPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

const SCENARIOS: [(&str, &str); 4] = [
    (
        "full-season",
        "Schedule through national champion; round robins and field size",
    ),
    ("determinism", "Two runs from one phrase serialize identically"),
    ("no-ties", "Every played game has a winner and floored scores"),
    ("save-restore", "Mid-season save restores exactly and reseeds consistently"),
];

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS.to_vec()
}

pub fn scenario_keys() -> Vec<String> {
    SCENARIOS.iter().map(|(key, _)| (*key).to_string()).collect()
}

fn champion_expectation(summary: &SeasonSummary) -> Result<()> {
    let universe = &summary.universe;
    ensure!(
        universe.is_regular_season_complete(),
        "regular season left {} games unplayed",
        universe.games.len() - universe.played_games()
    );
    let expected = field_size(universe.teams.len());
    let bracket = universe
        .bracket
        .as_built()
        .ok_or_else(|| anyhow::anyhow!("national bracket was never built"))?;
    ensure!(
        bracket.field.len() == expected,
        "field has {} teams, expected {expected}",
        bracket.field.len()
    );
    if expected > 0 {
        ensure!(
            universe.national_champion().is_some(),
            "bracket finished without a champion"
        );
        ensure!(
            bracket.rounds.len() == bracket.total_rounds(),
            "bracket played {} of {} rounds",
            bracket.rounds.len(),
            bracket.total_rounds()
        );
    }
    Ok(())
}

fn round_robin_expectation(summary: &SeasonSummary, meetings: usize) -> Result<()> {
    let universe = &summary.universe;
    let mut pairs: HashMap<(u32, u32), usize> = HashMap::new();
    for game in universe.games.iter().filter(|g| g.conference.is_some()) {
        let key = (game.home.min(game.away), game.home.max(game.away));
        *pairs.entry(key).or_default() += 1;
    }
    for conference in universe.teams.conferences() {
        let members = universe.teams.conference_members(&conference);
        for (i, &a) in members.iter().enumerate() {
            for &b in &members[i + 1..] {
                let played = pairs.get(&(a.min(b), a.max(b))).copied().unwrap_or(0);
                ensure!(
                    played == meetings,
                    "{conference}: teams {a} and {b} met {played} times, expected {meetings}"
                );
            }
        }
    }
    Ok(())
}

fn single_round_robin(summary: &SeasonSummary) -> Result<()> {
    round_robin_expectation(summary, 1)
}

fn double_round_robin(summary: &SeasonSummary) -> Result<()> {
    round_robin_expectation(summary, 2)
}

fn replay_expectation(summary: &SeasonSummary) -> Result<()> {
    ensure!(
        summary.replay_matches == Some(true),
        "replaying '{}' produced a different season",
        summary.phrase
    );
    Ok(())
}

fn no_ties_expectation(summary: &SeasonSummary) -> Result<()> {
    for game in summary.all_games() {
        ensure!(game.played, "week {} game {} v {} never played", game.week, game.home, game.away);
        ensure!(
            game.home_score != game.away_score,
            "week {} game {} v {} tied at {}",
            game.week,
            game.home,
            game.away,
            game.home_score
        );
        ensure!(
            game.home_score >= 40 && game.away_score >= 40,
            "week {} game {} v {} scored below the floor",
            game.week,
            game.home,
            game.away
        );
    }
    Ok(())
}

fn restore_expectation(summary: &SeasonSummary) -> Result<()> {
    let check = summary
        .restore
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("no restore was attempted"))?;
    ensure!(check.json_roundtrip, "restored universe did not re-serialize to the save");
    ensure!(
        check.restores_agree,
        "two restores at week {} finished differently",
        check.week
    );
    Ok(())
}

/// Build a scenario from its key on top of the CLI's league settings.
pub fn get_scenario(name: &str, base: &SeasonPlan) -> Option<TestScenario> {
    let plan = base.clone();
    let scenario = match name.to_lowercase().as_str() {
        "full-season" | "full" => {
            let round_robin: SeasonExpectation = match plan.mode {
                ScheduleMode::Single => single_round_robin,
                ScheduleMode::Double => double_round_robin,
            };
            TestScenario::season(
                "Full Season",
                plan.with_expectation(champion_expectation)
                    .with_expectation(round_robin),
            )
        }
        "determinism" => TestScenario::season(
            "Determinism",
            plan.with_replay().with_expectation(replay_expectation),
        ),
        "no-ties" => TestScenario::season("No Ties", plan.with_expectation(no_ties_expectation)),
        "save-restore" => TestScenario::season(
            "Save Restore",
            plan.with_restore_after(2)
                .with_expectation(restore_expectation)
                .with_expectation(champion_expectation),
        ),
        _ => return None,
    };
    Some(scenario)
}
