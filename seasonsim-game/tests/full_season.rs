use std::collections::HashSet;

use seasonsim_game::{
    BracketState, Game, ScheduleMode, Team, TeamId, Universe, field_size, parse_roster_json,
    synthetic_roster,
};

fn sample_roster() -> Vec<Team> {
    parse_roster_json(include_str!("../data/sample_roster.json"))
        .unwrap()
        .into_iter()
        .map(|entry| entry.into_team())
        .collect()
}

fn run_pipeline(teams: Vec<Team>, phrase: &str, mode: ScheduleMode) -> Universe {
    let mut universe = Universe::new(teams, phrase);
    universe.generate_schedule(mode, 3);
    universe.simulate_season().unwrap();
    universe.build_conference_tournaments().unwrap();
    universe.build_national_bracket().unwrap();
    universe.advance_bracket().unwrap();
    universe
}

fn every_game(universe: &Universe) -> impl Iterator<Item = &Game> {
    let tournaments = universe
        .conf_tournaments
        .values()
        .flat_map(|t| t.rounds.iter().flatten());
    let bracket = universe
        .bracket
        .as_built()
        .into_iter()
        .flat_map(|b| b.rounds.iter().flatten());
    universe.games.iter().chain(tournaments).chain(bracket)
}

#[test]
fn sample_roster_drops_incomplete_rows() {
    let teams = sample_roster();
    assert_eq!(teams.len(), 20);
    assert!(teams.iter().all(|t| t.conference.is_some()));
    assert!(teams.iter().all(|t| !t.school.is_empty()));
}

#[test]
fn same_phrase_replays_the_whole_season() {
    let a = run_pipeline(sample_roster(), "replay-2025", ScheduleMode::Single);
    let b = run_pipeline(sample_roster(), "replay-2025", ScheduleMode::Single);
    assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
    assert_eq!(a.national_champion(), b.national_champion());
    assert_eq!(a.conference_champions(), b.conference_champions());
    assert_eq!(a.rng_draws(), b.rng_draws());
    assert!(a.national_champion().is_some());

    let c = run_pipeline(sample_roster(), "replay-2026", ScheduleMode::Single);
    let scores = |u: &Universe| -> Vec<(u16, u16)> {
        u.games.iter().map(|g| (g.home_score, g.away_score)).collect()
    };
    assert_ne!(scores(&a), scores(&c));
}

#[test]
fn no_game_ends_tied() {
    for phrase in ["ties-a", "ties-b", "ties-c"] {
        let universe = run_pipeline(sample_roster(), phrase, ScheduleMode::Double);
        for game in every_game(&universe) {
            assert!(game.played);
            assert_ne!(game.home_score, game.away_score);
            assert!(game.home_score >= 40 && game.away_score >= 40);
        }
    }
}

#[test]
fn twenty_team_league_fills_a_sixteen_team_bracket() {
    let universe = run_pipeline(sample_roster(), "sixteen", ScheduleMode::Single);
    let BracketState::Built(bracket) = &universe.bracket else {
        panic!("bracket should be built");
    };
    assert_eq!(bracket.field.len(), 16);
    assert_eq!(bracket.auto_bids.len(), 4);
    for id in &bracket.auto_bids {
        assert!(bracket.field.contains(id));
    }
    let sizes: Vec<usize> = bracket.rounds.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![8, 4, 2, 1]);
    assert_eq!(bracket.champion, bracket.rounds[3][0].winner());

    let field: HashSet<TeamId> = bracket.field.iter().copied().collect();
    for team in universe.teams.iter() {
        assert_eq!(team.seed.is_some(), field.contains(&team.id), "team {}", team.id);
    }
}

#[test]
fn seventy_team_league_takes_sixty_four() {
    let teams: Vec<Team> = synthetic_roster(14, 5, "seventy")
        .into_iter()
        .map(|entry| entry.into_team())
        .collect();
    assert_eq!(field_size(teams.len()), 64);

    let universe = run_pipeline(teams, "seventy", ScheduleMode::Single);
    let bracket = universe.bracket.as_built().unwrap();
    assert_eq!(bracket.field.len(), 64);
    assert_eq!(bracket.rounds.len(), 6);
    assert_eq!(bracket.auto_bids.len(), 14);
    assert!(universe.national_champion().is_some());
}

#[test]
fn restored_universe_finishes_the_season() {
    let mut universe = Universe::new(sample_roster(), "mid-season");
    universe.generate_schedule(ScheduleMode::Single, 3);
    for _ in 0..3 {
        universe.simulate_week().unwrap();
    }
    let json = universe.to_json().unwrap();

    let finish = |json: &str| {
        let mut restored = Universe::from_json(json).unwrap();
        assert_eq!(restored.week, 4);
        restored.simulate_season().unwrap();
        restored.build_conference_tournaments().unwrap();
        restored.build_national_bracket().unwrap();
        restored.advance_bracket().unwrap();
        restored
    };
    let first = finish(&json);
    let second = finish(&json);
    assert!(first.is_regular_season_complete());
    assert_eq!(first.national_champion(), second.national_champion());
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());

    let before: Vec<&Game> = universe.games.iter().filter(|g| g.played).collect();
    for game in before {
        assert!(first.games.contains(game), "played games survive the restore");
    }
}

#[test]
fn heavy_favorite_wins_across_distinct_seeds() {
    let mut home_wins = 0;
    for i in 0..1000 {
        let teams = vec![
            Team::new(1, "Giant", "Kings", Some("A".into()), 90.0),
            Team::new(2, "Minnow", "Pups", Some("B".into()), 30.0),
        ];
        let mut universe = Universe::new(teams, &format!("favorite-{i}"));
        universe.games.push(Game::new(1, 2, 1));
        universe.simulate_season().unwrap();
        if universe.games[0].winner() == Some(1) {
            home_wins += 1;
        }
    }
    assert!(home_wins >= 900, "home favorite won only {home_wins} of 1000");
}

#[test]
fn out_of_order_calls_are_no_ops() {
    let mut universe = Universe::new(sample_roster(), "order");
    universe.build_national_bracket().unwrap();
    assert!(!universe.bracket.is_built());
    assert_eq!(universe.advance_bracket().unwrap(), None);

    universe.generate_schedule(ScheduleMode::Single, 2);
    let draws = universe.rng_draws();
    universe.build_conference_tournaments().unwrap();
    assert!(universe.conf_tournaments.is_empty());
    universe.build_national_bracket().unwrap();
    assert!(!universe.bracket.is_built());
    assert_eq!(universe.rng_draws(), draws);
}
