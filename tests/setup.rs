//! Integration tests for tournament creation and start.

mod common;

use common::entries;
use team_chess_tournament::logic::DEFAULT_BOARDS;
use team_chess_tournament::{
    can_complete_round, create_tournament, start_tournament, GameResult, MatchLabel, Stage,
    TeamEntry, TournamentError, TournamentFormat,
};

#[test]
fn four_team_knockout_has_placeholder_bracket() {
    let t = create_tournament("Cup", TournamentFormat::GroupKnockout, entries(4, 4)).unwrap();
    assert_eq!(t.stage, Stage::NotYetStarted);
    assert_eq!(t.total_group_stage_rounds, 1);
    assert_eq!(t.total_rounds, 3);
    assert_eq!(t.rounds.len(), 3);

    let groups: Vec<u8> = t.teams.iter().map(|team| team.group).collect();
    assert_eq!(groups, vec![1, 1, 2, 2]);

    let first = t.round(1).unwrap();
    assert_eq!(first.stage, Stage::Group);
    assert_eq!(first.matches.len(), 2);
    for m in &first.matches {
        assert_eq!(m.label, MatchLabel::Group);
        assert_eq!(m.games.len(), 4);
        let boards: Vec<u32> = m.games.iter().map(|g| g.board_number).collect();
        assert_eq!(boards, vec![1, 2, 3, 4]);
    }

    let semi = t.round(2).unwrap();
    assert_eq!(semi.stage, Stage::SemiFinal);
    let labels: Vec<MatchLabel> = semi.matches.iter().map(|m| m.label).collect();
    assert_eq!(labels, vec![MatchLabel::SF1, MatchLabel::SF2]);
    assert!(semi.matches.iter().all(|m| !m.is_resolved() && m.games.is_empty()));

    let last = t.round(3).unwrap();
    assert_eq!(last.stage, Stage::Final);
    let labels: Vec<MatchLabel> = last.matches.iter().map(|m| m.label).collect();
    assert_eq!(labels, vec![MatchLabel::Final, MatchLabel::ThirdPlace]);
    assert!(last.matches.iter().all(|m| !m.is_resolved()));
}

#[test]
fn round_robin_has_no_knockout_rounds() {
    let t = create_tournament("League", TournamentFormat::RoundRobin, entries(5, 2)).unwrap();
    assert_eq!(t.total_group_stage_rounds, 5);
    assert_eq!(t.total_rounds, 5);
    assert!(t.matches().all(|m| m.label == MatchLabel::Group));
    assert_eq!(t.matches().count(), 10);
}

#[test]
fn board_pairing_follows_roster_order() {
    let t = create_tournament("League", TournamentFormat::RoundRobin, entries(2, 3)).unwrap();
    let m = &t.round(1).unwrap().matches[0];
    let white = t.team(m.white_team.unwrap()).unwrap();
    let black = t.team(m.black_team.unwrap()).unwrap();
    for (idx, game) in m.games.iter().enumerate() {
        assert_eq!(game.white_player, white.players[idx].id);
        assert_eq!(game.black_player, black.players[idx].id);
    }
}

#[test]
fn uneven_rosters_use_the_shorter_one() {
    let teams = vec![
        TeamEntry::new("Rooks", &["R1", "R2", "R3", "R4"]),
        TeamEntry::new("Knights", &["K1", "K2"]),
    ];
    let t = create_tournament("Match", TournamentFormat::RoundRobin, teams).unwrap();
    assert_eq!(t.round(1).unwrap().matches[0].games.len(), 2);
}

#[test]
fn blank_player_names_get_a_default() {
    let teams = vec![
        TeamEntry::new("Rooks", &["Anna", "  "]),
        TeamEntry::new("Knights", &["K1", "K2"]),
    ];
    let t = create_tournament("Match", TournamentFormat::RoundRobin, teams).unwrap();
    let names: Vec<&str> = t.teams[0].players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Anna", "Player 2 of Rooks"]);
    assert!(t.players().all(|p| p.manual_tiebreak.is_none()));
    assert!(t.teams.iter().all(|team| team.manual_tiebreak.is_none()));
}

#[test]
fn teams_without_players_get_default_boards() {
    let teams = vec![TeamEntry::new("Rooks", &[]), TeamEntry::new("Knights", &[])];
    let mut t = create_tournament("Match", TournamentFormat::RoundRobin, teams).unwrap();
    let names: Vec<&str> = t.teams[0].players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Player 1 of Rooks",
            "Player 2 of Rooks",
            "Player 3 of Rooks",
            "Player 4 of Rooks"
        ]
    );
    assert_eq!(t.teams[1].players.len(), DEFAULT_BOARDS);

    start_tournament(&mut t).unwrap();
    let match_id = t.round(1).unwrap().matches[0].id;
    assert_eq!(t.find_match(match_id).unwrap().games.len(), DEFAULT_BOARDS);
    common::play(&mut t, match_id, &[GameResult::WhiteWin; DEFAULT_BOARDS]);
    assert!(can_complete_round(&t, 1).can_complete);
}

#[test]
fn duplicate_team_names_are_rejected() {
    let teams = vec![
        TeamEntry::new("Rooks", &["R1"]),
        TeamEntry::new(" rooks ", &["R2"]),
    ];
    assert!(matches!(
        create_tournament("Match", TournamentFormat::RoundRobin, teams),
        Err(TournamentError::DuplicateTeamName(name)) if name == "rooks"
    ));
}

#[test]
fn empty_team_name_is_rejected() {
    let teams = vec![TeamEntry::new("Rooks", &["R1"]), TeamEntry::new("", &["R2"])];
    assert!(matches!(
        create_tournament("Match", TournamentFormat::RoundRobin, teams),
        Err(TournamentError::EmptyTeamName)
    ));
}

#[test]
fn invalid_field_sizes_are_rejected() {
    assert!(matches!(
        create_tournament("Cup", TournamentFormat::GroupKnockout, entries(5, 2)),
        Err(TournamentError::OddTeamCount(5))
    ));
    assert!(matches!(
        create_tournament("League", TournamentFormat::RoundRobin, entries(1, 2)),
        Err(TournamentError::NotEnoughTeams { .. })
    ));
    assert!(matches!(
        create_tournament("Swiss", TournamentFormat::Swiss, entries(4, 2)),
        Err(TournamentError::UnsupportedFormat(_))
    ));
}

#[test]
fn start_moves_to_group_stage_once() {
    let mut t = create_tournament("Cup", TournamentFormat::GroupKnockout, entries(4, 2)).unwrap();
    assert_eq!(t.current_round, 0);
    start_tournament(&mut t).unwrap();
    assert_eq!(t.stage, Stage::Group);
    assert_eq!(t.current_round, 1);
    assert!(matches!(
        start_tournament(&mut t),
        Err(TournamentError::AlreadyStarted)
    ));
}
