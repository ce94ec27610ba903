//! Conference standings.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::team::{Team, TeamId};
use crate::universe::Universe;

/// One line of a standings table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub rank: usize,
    pub team_id: TeamId,
    pub name: String,
    pub conf_wins: u16,
    pub conf_losses: u16,
    pub wins: u16,
    pub losses: u16,
    pub rating: f64,
    pub sos: f64,
}

/// Standings order: conference differential, overall differential,
/// rating plus SOS, then team id ascending for full ties.
#[must_use]
pub fn compare_standing(a: &Team, b: &Team) -> Ordering {
    b.conf_record_diff()
        .cmp(&a.conf_record_diff())
        .then_with(|| b.record_diff().cmp(&a.record_diff()))
        .then_with(|| (b.rating + b.sos).total_cmp(&(a.rating + a.sos)))
        .then_with(|| a.id.cmp(&b.id))
}

/// Teams of `conference`, best first. Unknown conferences rank nobody.
#[must_use]
pub fn rank<'a>(universe: &'a Universe, conference: &str) -> Vec<&'a Team> {
    let mut teams: Vec<&Team> = universe
        .teams
        .iter()
        .filter(|team| team.in_conference(conference))
        .collect();
    teams.sort_by(|a, b| compare_standing(a, b));
    teams
}

/// Full standings tables for every conference, keyed by label.
#[must_use]
pub fn standings(universe: &Universe) -> BTreeMap<String, Vec<StandingsRow>> {
    universe
        .teams
        .conferences()
        .into_iter()
        .map(|conference| {
            let rows = rank(universe, &conference)
                .into_iter()
                .enumerate()
                .map(|(idx, team)| StandingsRow {
                    rank: idx + 1,
                    team_id: team.id,
                    name: team.display_name(),
                    conf_wins: team.conf_wins,
                    conf_losses: team.conf_losses,
                    wins: team.wins,
                    losses: team.losses,
                    rating: team.rating,
                    sos: team.sos,
                })
                .collect();
            (conference, rows)
        })
        .collect()
}
