//! Result entry: board results, tiebreakers, color and player swaps, recalculation.

use crate::logic::rankings::recalculate_player_stats;
use crate::logic::standings::recalculate_standings;
use crate::models::{
    GameResult, MatchId, MatchResult, PlayerId, Stage, TiebreakerResult, Tournament,
    TournamentError,
};
use std::mem;

/// Set the result of one board, then recalculate its round.
///
/// `Pending` clears a previously entered result.
pub fn record_game_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    board_number: u32,
    result: GameResult,
) -> Result<(), TournamentError> {
    let round_number = editable_round(tournament, match_id)?;
    let game = tournament
        .find_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?
        .games
        .iter_mut()
        .find(|g| g.board_number == board_number)
        .ok_or(TournamentError::GameNotFound {
            match_id,
            board_number,
        })?;
    game.set_result(result);
    recalculate_round(tournament, round_number)
}

/// Rebuild every match of the round from its boards, then all aggregates.
pub fn recalculate_round(
    tournament: &mut Tournament,
    round_number: u32,
) -> Result<(), TournamentError> {
    let round = tournament
        .round_mut(round_number)
        .ok_or(TournamentError::RoundNotFound(round_number))?;
    for m in &mut round.matches {
        m.refresh_from_games();
    }
    log::debug!("Round {} of tournament {} recalculated", round_number, tournament.id);
    recalculate_tournament(tournament);
    Ok(())
}

/// Team standings and player rankings from scratch.
pub fn recalculate_tournament(tournament: &mut Tournament) {
    recalculate_standings(tournament);
    recalculate_player_stats(tournament);
}

/// Decide (or reopen with `Pending`) the tiebreaker of a level knockout match.
pub fn record_tiebreaker(
    tournament: &mut Tournament,
    match_id: MatchId,
    result: TiebreakerResult,
) -> Result<(), TournamentError> {
    let round_number = editable_round(tournament, match_id)?;
    let m = tournament
        .find_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if m.result != MatchResult::Tiebreaker || m.tiebreaker == TiebreakerResult::NoTiebreaker {
        return Err(TournamentError::NoTiebreaker);
    }
    if result == TiebreakerResult::NoTiebreaker {
        return Err(TournamentError::InvalidResult(
            "tiebreaker must be white_win, black_win or pending".to_string(),
        ));
    }
    m.tiebreaker = result;
    recalculate_round(tournament, round_number)
}

/// Swap the teams of a knockout match, together with the colors on every board.
///
/// Entered results follow the players, so a white win becomes a black win.
pub fn swap_colors(tournament: &mut Tournament, match_id: MatchId) -> Result<(), TournamentError> {
    let round_number = editable_round(tournament, match_id)?;
    let m = tournament
        .find_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if !m.label.is_knockout() || !m.is_resolved() || m.games.is_empty() {
        return Err(TournamentError::CannotSwapColors);
    }

    mem::swap(&mut m.white_team, &mut m.black_team);
    m.tiebreaker = match m.tiebreaker {
        TiebreakerResult::WhiteWin => TiebreakerResult::BlackWin,
        TiebreakerResult::BlackWin => TiebreakerResult::WhiteWin,
        other => other,
    };
    for game in &mut m.games {
        mem::swap(&mut game.white_player, &mut game.black_player);
        let flipped = game.result.flipped();
        game.set_result(flipped);
    }
    log::info!("Colors swapped in {:?} match {}", m.label, match_id);
    recalculate_round(tournament, round_number)
}

/// Exchange two players of the same team between the boards of a match.
///
/// A player not seated in the match (a reserve) simply takes the other one's board.
pub fn swap_players(
    tournament: &mut Tournament,
    match_id: MatchId,
    first: PlayerId,
    second: PlayerId,
) -> Result<(), TournamentError> {
    if first == second {
        return Err(TournamentError::SamePlayer);
    }
    let round_number = editable_round(tournament, match_id)?;
    let first_team = tournament
        .player(first)
        .ok_or(TournamentError::PlayerNotFound(first))?
        .team_id;
    let second_team = tournament
        .player(second)
        .ok_or(TournamentError::PlayerNotFound(second))?
        .team_id;

    let m = tournament
        .find_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if first_team != second_team || !m.involves(first_team) {
        return Err(TournamentError::PlayersNotTeammates);
    }

    let swap = |seat: &mut PlayerId| {
        if *seat == first {
            *seat = second;
        } else if *seat == second {
            *seat = first;
        }
    };
    for game in &mut m.games {
        swap(&mut game.white_player);
        swap(&mut game.black_player);
    }
    recalculate_round(tournament, round_number)
}

/// Round number of the match, provided results can still be entered there.
fn editable_round(tournament: &Tournament, match_id: MatchId) -> Result<u32, TournamentError> {
    if tournament.stage == Stage::NotYetStarted {
        return Err(TournamentError::NotStarted);
    }
    let round_number = tournament
        .round_number_of(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    match tournament.round(round_number) {
        Some(round) if round.is_completed => {
            Err(TournamentError::RoundAlreadyCompleted(round_number))
        }
        _ => Ok(round_number),
    }
}
