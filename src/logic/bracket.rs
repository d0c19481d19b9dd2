//! Knockout bracket: semi-final and final rounds built as placeholders at creation,
//! filled in with real teams when the tournament reaches each stage.

use crate::logic::schedule::BracketSkeleton;
use crate::logic::standings::get_standings;
use crate::models::{
    Game, Match, MatchLabel, PlayerId, Round, Stage, TeamId, Tournament, TournamentError,
};

/// Append the semi-final and final rounds after the group stage, all slots unresolved.
pub fn append_knockout_rounds(tournament: &mut Tournament, skeleton: &BracketSkeleton) {
    let semi_number = tournament.total_group_stage_rounds + 1;
    let mut semi = Round::new(semi_number, Stage::SemiFinal);
    semi.matches = skeleton
        .semi_final
        .iter()
        .map(|&label| Match::placeholder(semi.id, label))
        .collect();

    let mut last = Round::new(semi_number + 1, Stage::Final);
    last.matches = skeleton
        .final_round
        .iter()
        .map(|&label| Match::placeholder(last.id, label))
        .collect();

    tournament.rounds.push(semi);
    tournament.rounds.push(last);
}

/// One game per board, pairing both rosters in stored order (shorter roster wins).
pub fn pair_boards(white_roster: &[PlayerId], black_roster: &[PlayerId]) -> Vec<Game> {
    (1u32..)
        .zip(white_roster.iter().zip(black_roster))
        .map(|(board, (&white, &black))| Game::new(board, white, black))
        .collect()
}

/// Fill SF1 and SF2 from the group standings.
///
/// SF1 is group 1 winner vs group 2 runner-up, SF2 is group 2 winner vs group 1
/// runner-up. Does nothing when both semi-finals already have their teams.
pub fn resolve_semi_finals(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let sf1 = knockout_slot(tournament, MatchLabel::SF1)?;
    let sf2 = knockout_slot(tournament, MatchLabel::SF2)?;
    if sf1.is_resolved() && sf2.is_resolved() {
        log::debug!("Semi-finals of tournament {} already resolved", tournament.id);
        return Ok(());
    }

    let standings = get_standings(tournament, None);
    let top_two = |group: u8| -> Result<(TeamId, TeamId), TournamentError> {
        let entries = standings.groups.get(&group).map(Vec::as_slice).unwrap_or_default();
        match entries {
            [first, second, ..] => Ok((first.team_id, second.team_id)),
            _ => Err(TournamentError::InsufficientQualifiers {
                group,
                found: entries.len(),
            }),
        }
    };
    let (g1_first, g1_second) = top_two(1)?;
    let (g2_first, g2_second) = top_two(2)?;

    assign_teams(tournament, MatchLabel::SF1, g1_first, g2_second)?;
    assign_teams(tournament, MatchLabel::SF2, g2_first, g1_second)?;
    log::info!("Semi-finals of tournament {} resolved", tournament.id);
    Ok(())
}

/// Fill the final (semi-final winners) and the 3rd place match (semi-final losers).
///
/// Both semi-finals must be decided; a level semi-final counts only once its
/// tiebreaker has a winner. Does nothing when both matches already have their teams.
pub fn resolve_finals(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let final_match = knockout_slot(tournament, MatchLabel::Final)?;
    let third_place = knockout_slot(tournament, MatchLabel::ThirdPlace)?;
    if final_match.is_resolved() && third_place.is_resolved() {
        log::debug!("Final round of tournament {} already resolved", tournament.id);
        return Ok(());
    }

    let (w1, l1) = decided(tournament, MatchLabel::SF1)?;
    let (w2, l2) = decided(tournament, MatchLabel::SF2)?;

    assign_teams(tournament, MatchLabel::Final, w1, w2)?;
    assign_teams(tournament, MatchLabel::ThirdPlace, l1, l2)?;
    log::info!("Final round of tournament {} resolved", tournament.id);
    Ok(())
}

fn knockout_slot(tournament: &Tournament, label: MatchLabel) -> Result<&Match, TournamentError> {
    tournament
        .knockout_match(label)
        .ok_or(TournamentError::MissingKnockoutMatch(label))
}

fn decided(
    tournament: &Tournament,
    label: MatchLabel,
) -> Result<(TeamId, TeamId), TournamentError> {
    knockout_slot(tournament, label)?
        .winner_and_loser()
        .ok_or(TournamentError::UndecidedMatch(label))
}

/// Write both team references and create the boards if the match has none yet.
fn assign_teams(
    tournament: &mut Tournament,
    label: MatchLabel,
    white: TeamId,
    black: TeamId,
) -> Result<(), TournamentError> {
    let white_roster = tournament
        .team(white)
        .ok_or(TournamentError::TeamNotFound(white))?
        .roster();
    let black_roster = tournament
        .team(black)
        .ok_or(TournamentError::TeamNotFound(black))?
        .roster();

    let slot = tournament
        .knockout_match_mut(label)
        .ok_or(TournamentError::MissingKnockoutMatch(label))?;
    slot.white_team = Some(white);
    slot.black_team = Some(black);
    if slot.games.is_empty() {
        slot.games = pair_boards(&white_roster, &black_roster);
    }
    Ok(())
}
