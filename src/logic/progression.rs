//! Stage progression: round completion checks, validation gates, and the final podium.

use crate::logic::bracket::{resolve_finals, resolve_semi_finals};
use crate::logic::rankings::{get_player_rankings, PlayerRankingEntry};
use crate::logic::results::recalculate_tournament;
use crate::logic::standings::get_standings;
use crate::models::{MatchLabel, Stage, TeamId, Tournament, TournamentError, TournamentFormat};
use serde::Serialize;

/// Whether a round may be completed now, and why not.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RoundCheck {
    pub can_complete: bool,
    pub reason: String,
    pub round_number: u32,
    pub total_matches: usize,
    pub completed_matches: usize,
}

impl RoundCheck {
    fn rejected(round_number: u32, reason: impl Into<String>) -> Self {
        Self {
            can_complete: false,
            reason: reason.into(),
            round_number,
            total_matches: 0,
            completed_matches: 0,
        }
    }
}

/// Outcome of [`complete_round`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RoundCompletion {
    pub completed: bool,
    /// Set when the round was rejected or a validation gate blocked progress.
    pub reason: Option<String>,
    pub stage: Stage,
}

pub fn can_complete_round(tournament: &Tournament, round_number: u32) -> RoundCheck {
    let Some(round) = tournament.round(round_number) else {
        return RoundCheck::rejected(round_number, "Round not found.");
    };
    if tournament.stage == Stage::NotYetStarted {
        return RoundCheck::rejected(round_number, "Tournament not started.");
    }
    if tournament.stage == Stage::Completed {
        return RoundCheck::rejected(round_number, "Tournament already completed.");
    }
    if round_number != tournament.current_round {
        return RoundCheck::rejected(round_number, "Cannot complete not current round.");
    }

    let total_matches = round.matches.len();
    let completed_matches = round.completed_matches();
    if completed_matches < total_matches {
        return RoundCheck {
            can_complete: false,
            reason: format!(
                "All matches must be completed. Currently {}/{} matches finished.",
                completed_matches, total_matches
            ),
            round_number,
            total_matches,
            completed_matches,
        };
    }
    RoundCheck {
        can_complete: true,
        reason: String::new(),
        round_number,
        total_matches,
        completed_matches,
    }
}

/// Complete the current round and move the tournament forward.
///
/// A rejected check is returned as `completed: false` with nothing changed. A
/// validation gate that is not met (unresolved ties) keeps the round current:
/// the round is stored as completed, `reason` says what blocks, and calling
/// this again for the same round retries the gate. Errors leave the tournament
/// untouched.
pub fn complete_round(
    tournament: &mut Tournament,
    round_number: u32,
) -> Result<RoundCompletion, TournamentError> {
    let check = can_complete_round(tournament, round_number);
    if !check.can_complete {
        log::warn!(
            "Round {} of tournament {} not completed: {}",
            round_number,
            tournament.id,
            check.reason
        );
        return Ok(RoundCompletion {
            completed: false,
            reason: Some(check.reason),
            stage: tournament.stage,
        });
    }

    let mut next = tournament.clone();
    let reason = advance(&mut next, round_number)?;
    if let Some(reason) = &reason {
        log::warn!("Tournament {} blocked after round {}: {}", next.id, round_number, reason);
    }
    *tournament = next;
    Ok(RoundCompletion {
        completed: true,
        reason,
        stage: tournament.stage,
    })
}

fn advance(t: &mut Tournament, round_number: u32) -> Result<Option<String>, TournamentError> {
    t.round_mut(round_number)
        .ok_or(TournamentError::RoundNotFound(round_number))?
        .mark_completed();
    recalculate_tournament(t);

    let group_rounds = t.total_group_stage_rounds;
    let knockout = t.format == TournamentFormat::GroupKnockout;
    let mut blocked = None;

    if round_number == group_rounds {
        t.group_standings_validated = get_standings(t, None).ties.unresolved(t).is_empty();
        if !t.group_standings_validated {
            blocked = Some("Group standings have unresolved ties.".to_string());
        }
        if knockout {
            if t.group_standings_validated {
                resolve_semi_finals(t)?;
                t.advance_stage(Stage::SemiFinal)?;
                t.current_round += 1;
            }
        } else {
            t.best_players_validated = get_player_rankings(t).ties.unresolved(t).is_empty();
        }
    } else if knockout && round_number == group_rounds + 1 {
        resolve_finals(t)?;
        t.advance_stage(Stage::Final)?;
        t.current_round += 1;
    } else if knockout && round_number == group_rounds + 2 {
        t.best_players_validated = get_player_rankings(t).ties.unresolved(t).is_empty();
    } else {
        t.current_round += 1;
    }

    if round_number == t.total_rounds {
        if !t.best_players_validated && blocked.is_none() {
            blocked = Some("Best players ranking has unresolved ties.".to_string());
        }
        if t.group_standings_validated && t.best_players_validated {
            t.advance_stage(Stage::Completed)?;
            t.current_round = t.total_rounds;
        }
    }
    Ok(blocked)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PodiumPlace {
    pub place: u8,
    pub team_id: TeamId,
    pub team_name: String,
}

/// Final rankings of a completed tournament.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Podium {
    pub places: Vec<PodiumPlace>,
    pub best_player: Option<PlayerRankingEntry>,
}

/// Champion, runner-up and third place, plus the best player.
///
/// Group + knockout reads the Final and 3rd place matches; round robin takes
/// the top three of the standings.
pub fn final_podium(tournament: &Tournament) -> Result<Podium, TournamentError> {
    if tournament.stage != Stage::Completed {
        return Err(TournamentError::NotCompleted);
    }

    let teams: Vec<TeamId> = match tournament.format {
        TournamentFormat::GroupKnockout => {
            let decided = |label: MatchLabel| -> Result<(TeamId, TeamId), TournamentError> {
                tournament
                    .knockout_match(label)
                    .ok_or(TournamentError::MissingKnockoutMatch(label))?
                    .winner_and_loser()
                    .ok_or(TournamentError::UndecidedMatch(label))
            };
            let (champion, runner_up) = decided(MatchLabel::Final)?;
            let (third, _) = decided(MatchLabel::ThirdPlace)?;
            vec![champion, runner_up, third]
        }
        _ => get_standings(tournament, None)
            .groups
            .into_values()
            .flatten()
            .take(3)
            .map(|e| e.team_id)
            .collect(),
    };

    let places = (1u8..)
        .zip(teams)
        .map(|(place, team_id)| PodiumPlace {
            place,
            team_id,
            team_name: tournament
                .team(team_id)
                .map(|t| t.name.clone())
                .unwrap_or_default(),
        })
        .collect();
    let best_player = get_player_rankings(tournament).players.into_iter().next();
    Ok(Podium {
        places,
        best_player,
    })
}
