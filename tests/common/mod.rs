//! Shared helpers for the integration tests.
#![allow(dead_code)]

use team_chess_tournament::{
    create_tournament, record_game_result, start_tournament, GameResult, MatchId, MatchLabel,
    TeamEntry, TeamId, Tournament, TournamentFormat,
};

/// Teams "A", "B", ... each with `boards` players named "A1", "A2", ...
pub fn entries(teams: usize, boards: usize) -> Vec<TeamEntry> {
    (0..teams)
        .map(|i| {
            let name = ((b'A' + i as u8) as char).to_string();
            TeamEntry {
                players: (1..=boards).map(|b| format!("{name}{b}")).collect(),
                name,
            }
        })
        .collect()
}

pub fn started(format: TournamentFormat, teams: usize, boards: usize) -> Tournament {
    let mut t = create_tournament("Club Championship", format, entries(teams, boards)).unwrap();
    start_tournament(&mut t).unwrap();
    t
}

pub fn team_id(t: &Tournament, name: &str) -> TeamId {
    t.teams.iter().find(|team| team.name == name).unwrap().id
}

pub fn player_id(t: &Tournament, name: &str) -> team_chess_tournament::PlayerId {
    t.players().find(|p| p.name == name).unwrap().id
}

/// Enter every board of a match, results given from the white team's side.
pub fn play(t: &mut Tournament, match_id: MatchId, results: &[GameResult]) {
    for (board, &result) in (1u32..).zip(results) {
        record_game_result(t, match_id, board, result).unwrap();
    }
}

/// The match between two teams, whichever side plays white.
pub fn match_between(t: &Tournament, a: &str, b: &str) -> MatchId {
    let (a, b) = (team_id(t, a), team_id(t, b));
    t.matches()
        .find(|m| m.involves(a) && m.involves(b))
        .unwrap()
        .id
}

/// Enter a match with results given from `a`'s side, flipping them if `a` has black.
pub fn play_between(t: &mut Tournament, a: &str, b: &str, results_for_a: &[GameResult]) {
    let match_id = match_between(t, a, b);
    let a_is_white = t.find_match(match_id).unwrap().white_team == Some(team_id(t, a));
    let results: Vec<GameResult> = results_for_a
        .iter()
        .map(|r| if a_is_white { *r } else { r.flipped() })
        .collect();
    play(t, match_id, &results);
}

pub fn knockout_id(t: &Tournament, label: MatchLabel) -> MatchId {
    t.knockout_match(label).unwrap().id
}

/// `(white, black)` team names of a match.
pub fn sides(t: &Tournament, match_id: MatchId) -> (String, String) {
    let m = t.find_match(match_id).unwrap();
    let name = |id: Option<TeamId>| t.team(id.unwrap()).unwrap().name.clone();
    (name(m.white_team), name(m.black_team))
}
