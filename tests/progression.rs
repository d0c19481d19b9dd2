//! Integration tests for round completion and stage progression.

mod common;

use common::{knockout_id, play, play_between, player_id, sides, started, team_id};
use team_chess_tournament::{
    can_complete_round, complete_round, create_tournament, final_podium, record_tiebreaker,
    ErrorKind, GameResult, MatchLabel, Stage, TiebreakerResult, TournamentError,
    TournamentFormat,
};
use GameResult::{BlackWin, Draw, WhiteWin};

#[test]
fn out_of_order_completion_changes_nothing() {
    let mut t = started(TournamentFormat::RoundRobin, 4, 2);
    let before = serde_json::to_vec(&t).unwrap();

    let outcome = complete_round(&mut t, 2).unwrap();
    assert!(!outcome.completed);
    assert_eq!(outcome.reason.as_deref(), Some("Cannot complete not current round."));
    assert_eq!(serde_json::to_vec(&t).unwrap(), before);

    let outcome = complete_round(&mut t, 1).unwrap();
    assert!(!outcome.completed);
    assert_eq!(
        outcome.reason.as_deref(),
        Some("All matches must be completed. Currently 0/2 matches finished.")
    );
    assert_eq!(serde_json::to_vec(&t).unwrap(), before);
}

#[test]
fn round_check_reasons() {
    let mut t =
        create_tournament("League", TournamentFormat::RoundRobin, common::entries(2, 1)).unwrap();
    assert_eq!(can_complete_round(&t, 7).reason, "Round not found.");
    assert_eq!(can_complete_round(&t, 1).reason, "Tournament not started.");

    team_chess_tournament::start_tournament(&mut t).unwrap();
    let match_id = t.round(1).unwrap().matches[0].id;
    let check = can_complete_round(&t, 1);
    assert!(!check.can_complete);
    assert_eq!((check.completed_matches, check.total_matches), (0, 1));

    play(&mut t, match_id, &[WhiteWin]);
    let check = can_complete_round(&t, 1);
    assert!(check.can_complete);
    assert_eq!(check.reason, "");

    assert_eq!(complete_round(&mut t, 1).unwrap().stage, Stage::Completed);
    assert_eq!(can_complete_round(&t, 1).reason, "Tournament already completed.");
}

#[test]
fn tied_group_blocks_until_manual_tiebreak() {
    let mut t = started(TournamentFormat::GroupKnockout, 4, 4);
    play_between(&mut t, "A", "B", &[WhiteWin, WhiteWin, BlackWin, BlackWin]);
    play_between(&mut t, "D", "C", &[WhiteWin; 4]);

    let outcome = complete_round(&mut t, 1).unwrap();
    assert!(outcome.completed);
    assert_eq!(outcome.stage, Stage::Group);
    assert!(outcome.reason.is_some());
    assert!(!t.group_standings_validated);
    assert_eq!(t.current_round, 1);
    assert!(t.round(1).unwrap().is_completed);
    assert!(!t.knockout_match(MatchLabel::SF1).unwrap().is_resolved());

    // Retrying without a decision keeps blocking.
    assert_eq!(complete_round(&mut t, 1).unwrap().stage, Stage::Group);

    t.set_team_manual_tiebreak(team_id(&t, "B"), Some(1)).unwrap();
    t.set_team_manual_tiebreak(team_id(&t, "A"), Some(2)).unwrap();
    let outcome = complete_round(&mut t, 1).unwrap();
    assert_eq!(outcome.stage, Stage::SemiFinal);
    assert_eq!(outcome.reason, None);
    assert!(t.group_standings_validated);
    assert_eq!(t.current_round, 2);

    let sf1 = knockout_id(&t, MatchLabel::SF1);
    let sf2 = knockout_id(&t, MatchLabel::SF2);
    assert_eq!(sides(&t, sf1), ("B".to_string(), "C".to_string()));
    assert_eq!(sides(&t, sf2), ("D".to_string(), "A".to_string()));
}

/// Group stage: A beats B 3-1, D beats C 4-0, so SF1 = A vs C and SF2 = D vs B.
fn play_group_stage(t: &mut team_chess_tournament::Tournament) {
    play_between(t, "A", "B", &[WhiteWin, WhiteWin, WhiteWin, BlackWin]);
    play_between(t, "D", "C", &[WhiteWin; 4]);
    assert_eq!(complete_round(t, 1).unwrap().stage, Stage::SemiFinal);
}

#[test]
fn semi_final_results_fill_final_and_third_place() {
    let mut t = started(TournamentFormat::GroupKnockout, 4, 4);
    play_group_stage(&mut t);

    let sf1 = knockout_id(&t, MatchLabel::SF1);
    let sf2 = knockout_id(&t, MatchLabel::SF2);
    assert_eq!(sides(&t, sf1), ("A".to_string(), "C".to_string()));
    assert_eq!(sides(&t, sf2), ("D".to_string(), "B".to_string()));
    play(&mut t, sf1, &[WhiteWin, WhiteWin, WhiteWin, BlackWin]);
    play(&mut t, sf2, &[WhiteWin, WhiteWin, BlackWin, BlackWin]);

    let blocked = complete_round(&mut t, 2).unwrap();
    assert!(!blocked.completed);
    assert_eq!(t.stage, Stage::SemiFinal);

    record_tiebreaker(&mut t, sf2, TiebreakerResult::BlackWin).unwrap();
    let outcome = complete_round(&mut t, 2).unwrap();
    assert!(outcome.completed);
    assert_eq!(outcome.stage, Stage::Final);
    assert_eq!(t.current_round, 3);

    let final_match = knockout_id(&t, MatchLabel::Final);
    let third_place = knockout_id(&t, MatchLabel::ThirdPlace);
    assert_eq!(sides(&t, final_match), ("A".to_string(), "B".to_string()));
    assert_eq!(sides(&t, third_place), ("C".to_string(), "D".to_string()));
    assert_eq!(t.find_match(final_match).unwrap().games.len(), 4);
    assert_eq!(t.find_match(third_place).unwrap().games.len(), 4);
}

#[test]
fn bracket_error_aborts_round_completion() {
    let mut t = started(TournamentFormat::GroupKnockout, 4, 4);
    play_group_stage(&mut t);
    let sf1 = knockout_id(&t, MatchLabel::SF1);
    let sf2 = knockout_id(&t, MatchLabel::SF2);
    play(&mut t, sf1, &[WhiteWin, WhiteWin, WhiteWin, BlackWin]);
    play(&mut t, sf2, &[WhiteWin; 4]);
    t.round_mut(3)
        .unwrap()
        .matches
        .retain(|m| m.label != MatchLabel::Final);
    let before = serde_json::to_vec(&t).unwrap();

    let err = complete_round(&mut t, 2).unwrap_err();
    assert!(matches!(
        err,
        TournamentError::MissingKnockoutMatch(MatchLabel::Final)
    ));
    assert_eq!(err.kind(), ErrorKind::Consistency);
    assert_eq!(serde_json::to_vec(&t).unwrap(), before);
    assert_eq!(t.stage, Stage::SemiFinal);
    assert!(!t.round(2).unwrap().is_completed);
}

#[test]
fn group_without_runner_up_cannot_fill_semi_finals() {
    let mut t = started(TournamentFormat::GroupKnockout, 4, 2);
    play_between(&mut t, "A", "B", &[WhiteWin, WhiteWin]);
    play_between(&mut t, "D", "C", &[WhiteWin, WhiteWin]);
    let c = team_id(&t, "C");
    t.teams.retain(|team| team.id != c);
    let before = serde_json::to_vec(&t).unwrap();

    let err = complete_round(&mut t, 1).unwrap_err();
    assert!(matches!(
        err,
        TournamentError::InsufficientQualifiers { group: 2, found: 1 }
    ));
    assert_eq!(err.kind(), ErrorKind::Consistency);
    assert_eq!(serde_json::to_vec(&t).unwrap(), before);
}

#[test]
fn knockout_tournament_runs_to_completion() {
    let mut t = started(TournamentFormat::GroupKnockout, 4, 4);
    play_group_stage(&mut t);
    let sf1 = knockout_id(&t, MatchLabel::SF1);
    let sf2 = knockout_id(&t, MatchLabel::SF2);
    play(&mut t, sf1, &[WhiteWin, WhiteWin, WhiteWin, BlackWin]);
    play(&mut t, sf2, &[WhiteWin, WhiteWin, BlackWin, BlackWin]);
    record_tiebreaker(&mut t, sf2, TiebreakerResult::BlackWin).unwrap();
    complete_round(&mut t, 2).unwrap();

    assert!(matches!(final_podium(&t), Err(TournamentError::NotCompleted)));

    let final_match = knockout_id(&t, MatchLabel::Final);
    let third_place = knockout_id(&t, MatchLabel::ThirdPlace);
    play(&mut t, final_match, &[WhiteWin, Draw, Draw, Draw]);
    play(&mut t, third_place, &[Draw, Draw, BlackWin, BlackWin]);

    let outcome = complete_round(&mut t, 3).unwrap();
    assert!(outcome.completed);
    assert_eq!(outcome.stage, Stage::Completed);
    assert!(t.best_players_validated);
    assert_eq!(t.current_round, 3);

    let podium = final_podium(&t).unwrap();
    let names: Vec<&str> = podium.places.iter().map(|p| p.team_name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "D"]);
    let best = podium.best_player.unwrap();
    assert_eq!(best.player_id, player_id(&t, "A1"));
    assert_eq!(best.stats.points, 3.0);
}

#[test]
fn round_robin_waits_for_best_player_decision() {
    let mut t = started(TournamentFormat::RoundRobin, 3, 2);
    for round in 1..=3 {
        assert_eq!(t.current_round, round);
        let ids: Vec<_> = t.round(round).unwrap().matches.iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), 1);
        let (white, black) = sides(&t, ids[0]);
        let winner = white.min(black.clone());
        let results = if winner == black { [BlackWin; 2] } else { [WhiteWin; 2] };
        play(&mut t, ids[0], &results);
        let outcome = complete_round(&mut t, round).unwrap();
        assert!(outcome.completed);
        if round < 3 {
            assert_eq!(outcome.stage, Stage::Group);
        }
    }

    // A's two players both won every game: tied at the top.
    assert_eq!(t.stage, Stage::Group);
    assert!(t.group_standings_validated);
    assert!(!t.best_players_validated);
    assert_eq!(t.current_round, 3);

    t.set_player_manual_tiebreak(player_id(&t, "A1"), Some(1)).unwrap();
    t.set_player_manual_tiebreak(player_id(&t, "A2"), Some(2)).unwrap();
    let outcome = complete_round(&mut t, 3).unwrap();
    assert_eq!(outcome.stage, Stage::Completed);

    let podium = final_podium(&t).unwrap();
    let names: Vec<&str> = podium.places.iter().map(|p| p.team_name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!(podium.best_player.unwrap().player_name, "A1");
}

#[test]
fn stage_transitions_follow_the_table() {
    use TournamentFormat::{GroupKnockout, RoundRobin};
    assert!(Stage::NotYetStarted.can_advance_to(Stage::Group, RoundRobin));
    assert!(Stage::Group.can_advance_to(Stage::SemiFinal, GroupKnockout));
    assert!(!Stage::Group.can_advance_to(Stage::SemiFinal, RoundRobin));
    assert!(Stage::Group.can_advance_to(Stage::Completed, RoundRobin));
    assert!(!Stage::Group.can_advance_to(Stage::Completed, GroupKnockout));
    assert!(!Stage::Completed.can_advance_to(Stage::Group, RoundRobin));

    let mut t = started(RoundRobin, 2, 1);
    assert!(matches!(
        t.advance_stage(Stage::Final),
        Err(TournamentError::InvalidTransition { from: Stage::Group, to: Stage::Final })
    ));
}
