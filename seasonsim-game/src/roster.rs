//! Roster rows from external sources, and a deterministic generated league.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{RATING_MAX, RATING_MIN};
use crate::numbers::draw_to_index;
use crate::rng::SeasonRng;
use crate::seed::hash_phrase;
use crate::team::{Team, TeamId};

const DEFAULT_RATING: f64 = 60.0;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("roster JSON could not be parsed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("roster JSON must be an array of team rows")]
    NotAnArray,
}

/// A validated roster row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: TeamId,
    pub school: String,
    #[serde(default)]
    pub nickname: String,
    pub conference: Option<String>,
    pub rating: f64,
}

impl RosterEntry {
    #[must_use]
    pub fn into_team(self) -> Team {
        Team::new(
            self.id,
            self.school,
            self.nickname,
            self.conference,
            self.rating.clamp(RATING_MIN, RATING_MAX),
        )
    }
}

/// Raw row as it arrives from a file or feed; anything may be missing.
#[derive(Debug, Default, Deserialize)]
struct RawRow {
    #[serde(default)]
    id: Option<TeamId>,
    #[serde(default)]
    school: Option<String>,
    #[serde(default)]
    nickname: Option<String>,
    #[serde(default)]
    conference: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse roster rows, silently dropping the ones that cannot become teams.
///
/// A row needs a school and a conference. Missing ratings default to the
/// league middle, out-of-range ratings are clamped, and rows without an id
/// are numbered after the largest id present.
///
/// # Errors
///
/// Fails only when the document itself is not a JSON array.
pub fn parse_roster_json(json: &str) -> Result<Vec<RosterEntry>, RosterError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Array(rows) = value else {
        return Err(RosterError::NotAnArray);
    };

    let mut kept: Vec<(Option<TeamId>, RosterEntry)> = Vec::with_capacity(rows.len());
    for (line, row) in rows.into_iter().enumerate() {
        let raw: RawRow = match serde_json::from_value(row) {
            Ok(raw) => raw,
            Err(err) => {
                log::debug!("roster row {line} dropped: {err}");
                continue;
            }
        };
        let (Some(school), Some(conference)) = (non_blank(raw.school), non_blank(raw.conference))
        else {
            log::debug!("roster row {line} dropped: missing school or conference");
            continue;
        };
        let rating = raw
            .rating
            .filter(|r| r.is_finite())
            .unwrap_or(DEFAULT_RATING)
            .clamp(RATING_MIN, RATING_MAX);
        kept.push((
            raw.id,
            RosterEntry {
                id: raw.id.unwrap_or_default(),
                school,
                nickname: non_blank(raw.nickname).unwrap_or_default(),
                conference: Some(conference),
                rating,
            },
        ));
    }

    let mut next_id = kept
        .iter()
        .filter_map(|(id, _)| *id)
        .max()
        .unwrap_or(0);
    Ok(kept
        .into_iter()
        .map(|(id, mut entry)| {
            if id.is_none() {
                next_id = next_id.saturating_add(1);
                entry.id = next_id;
            }
            entry
        })
        .collect())
}

const PLACES: [&str; 24] = [
    "Ashford", "Bramble", "Cedar Falls", "Dunmore", "Eastbrook", "Fairhaven", "Glenwood",
    "Harlow", "Ironton", "Juniper", "Kestrel Bay", "Lakemont", "Millbrook", "Northgate",
    "Oakridge", "Pinecrest", "Quarry Hill", "Riverton", "Stonebridge", "Timberline",
    "Union City", "Valewood", "Westfield", "Yorkshire",
];

const NICKNAMES: [&str; 16] = [
    "Owls", "Foxes", "Hawks", "Otters", "Bison", "Comets", "Rangers", "Herons", "Badgers",
    "Pilots", "Wolves", "Stags", "Miners", "Falcons", "Ravens", "Lynx",
];

const CONFERENCES: [&str; 12] = [
    "Atlantic", "Big Plains", "Coastal", "Desert", "Great Lakes", "Heartland", "Mountain",
    "North Star", "Pacific", "Piedmont", "River Valley", "Summit",
];

/// Deterministic generated league for demos and testing.
///
/// Ratings are uniform across the allowed range. Names repeat once the
/// place list is exhausted, with a numeric suffix to keep them distinct.
#[must_use]
pub fn synthetic_roster(
    conferences: usize,
    per_conference: usize,
    seed_phrase: &str,
) -> Vec<RosterEntry> {
    let mut rng = SeasonRng::new(hash_phrase(seed_phrase));
    let mut entries = Vec::with_capacity(conferences * per_conference);
    let mut next_id: TeamId = 1;

    for c in 0..conferences {
        let conference = if c < CONFERENCES.len() {
            CONFERENCES[c].to_string()
        } else {
            format!("{} {}", CONFERENCES[c % CONFERENCES.len()], c / CONFERENCES.len() + 1)
        };
        for _ in 0..per_conference {
            let n = entries.len();
            let place = PLACES[n % PLACES.len()];
            let school = if n < PLACES.len() {
                place.to_string()
            } else {
                format!("{place} {}", n / PLACES.len() + 1)
            };
            let nickname = NICKNAMES[draw_to_index(rng.next_f64(), NICKNAMES.len())];
            let rating = RATING_MIN + rng.next_f64() * (RATING_MAX - RATING_MIN);
            entries.push(RosterEntry {
                id: next_id,
                school,
                nickname: nickname.to_string(),
                conference: Some(conference.clone()),
                rating: (rating * 10.0).round() / 10.0,
            });
            next_id = next_id.saturating_add(1);
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_rows_are_dropped_not_fatal() {
        let json = r#"[
            {"id": 1, "school": "Ashford", "nickname": "Owls", "conference": "East", "rating": 80},
            {"id": 2, "school": "", "conference": "East", "rating": 70},
            {"id": 3, "school": "Bramble", "rating": 70},
            {"id": "four", "school": "Cedar", "conference": "East"},
            "not even an object",
            {"school": "Dunmore", "conference": "West", "rating": 120},
            {"id": 9, "school": "Eastbrook", "conference": "West"}
        ]"#;
        let entries = parse_roster_json(json).unwrap();
        let schools: Vec<&str> = entries.iter().map(|e| e.school.as_str()).collect();
        assert_eq!(schools, vec!["Ashford", "Dunmore", "Eastbrook"]);

        let dunmore = &entries[1];
        assert_eq!(dunmore.id, 10, "numbered after the largest id");
        assert!((dunmore.rating - RATING_MAX).abs() < f64::EPSILON);
        assert!((entries[2].rating - DEFAULT_RATING).abs() < f64::EPSILON);
    }

    #[test]
    fn non_array_document_is_an_error() {
        assert!(matches!(
            parse_roster_json(r#"{"teams": []}"#),
            Err(RosterError::NotAnArray)
        ));
        assert!(matches!(parse_roster_json("nope"), Err(RosterError::Json(_))));
    }

    #[test]
    fn synthetic_roster_is_deterministic() {
        let a = synthetic_roster(4, 6, "demo");
        let b = synthetic_roster(4, 6, "demo");
        assert_eq!(a, b);
        assert_eq!(a.len(), 24);
        assert_ne!(a, synthetic_roster(4, 6, "other"));
        assert!(a.iter().all(|e| (RATING_MIN..=RATING_MAX).contains(&e.rating)));
        let mut ids: Vec<TeamId> = a.iter().map(|e| e.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 24);
    }

    #[test]
    fn synthetic_roster_handles_large_leagues() {
        let entries = synthetic_roster(14, 5, "big");
        let mut schools: Vec<&str> = entries.iter().map(|e| e.school.as_str()).collect();
        schools.sort_unstable();
        schools.dedup();
        assert_eq!(schools.len(), 70);
        let conferences: std::collections::BTreeSet<_> =
            entries.iter().filter_map(|e| e.conference.clone()).collect();
        assert_eq!(conferences.len(), 14);
    }

    #[test]
    fn into_team_clamps_rating() {
        let entry = RosterEntry {
            id: 1,
            school: "Low".into(),
            nickname: String::new(),
            conference: None,
            rating: 5.0,
        };
        let team = entry.into_team();
        assert!((team.rating - RATING_MIN).abs() < f64::EPSILON);
        assert_eq!(team.display_name(), "Low");
    }
}
