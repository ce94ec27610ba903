use anyhow::{Context, Result};
use seasonsim_game::{RosterEntry, parse_roster_json, synthetic_roster};
use std::{fs, path::Path};

/// Phrase used when no roster file is given.
pub const SYNTHETIC_LEAGUE_PHRASE: &str = "seasonsim-league";

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Read a roster file, or generate a league when no path is given.
pub fn load_roster(
    path: Option<&Path>,
    conferences: usize,
    per_conference: usize,
) -> Result<Vec<RosterEntry>> {
    let Some(path) = path else {
        return Ok(synthetic_roster(
            conferences,
            per_conference,
            SYNTHETIC_LEAGUE_PHRASE,
        ));
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading roster {}", path.display()))?;
    let entries = parse_roster_json(&json)
        .with_context(|| format!("parsing roster {}", path.display()))?;
    anyhow::ensure!(!entries.is_empty(), "roster {} has no usable teams", path.display());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" alpha, ,beta,  gamma ");
        assert_eq!(parts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn missing_path_generates_a_league() {
        let entries = load_roster(None, 3, 4).unwrap();
        assert_eq!(entries.len(), 12);
    }

    #[test]
    fn roster_file_is_parsed() {
        let path = std::env::temp_dir().join(format!(
            "seasonsim-roster-{}.json",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        fs::write(
            &path,
            r#"[{"id": 1, "school": "Ashford", "conference": "East", "rating": 70},
                {"id": 2, "school": "Bramble", "rating": 60}]"#,
        )
        .unwrap();
        let entries = load_roster(Some(&path), 0, 0).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].school, "Ashford");
    }

    #[test]
    fn unreadable_roster_reports_the_path() {
        let err = load_roster(Some(Path::new("/no/such/roster.json")), 0, 0).unwrap_err();
        assert!(format!("{err:#}").contains("/no/such/roster.json"));
    }
}
