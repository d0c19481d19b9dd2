//! Setup phase: build the tournament with its full schedule, then start it.

use crate::logic::bracket::{append_knockout_rounds, pair_boards};
use crate::logic::schedule::generate_schedule;
use crate::models::{
    Match, Round, Stage, Team, TeamId, Tournament, TournamentError, TournamentFormat,
};
use serde::Deserialize;
use std::collections::HashSet;

/// Roster size given to a team submitted without players.
pub const DEFAULT_BOARDS: usize = 4;

/// A team as submitted at creation: its name and roster in board order.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TeamEntry {
    pub name: String,
    #[serde(default)]
    pub players: Vec<String>,
}

impl TeamEntry {
    pub fn new(name: impl Into<String>, players: &[&str]) -> Self {
        Self {
            name: name.into(),
            players: players.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Create a tournament in NotYetStarted with every group round generated and,
/// for group + knockout, the semi-final and final rounds as placeholders.
///
/// Teams go to groups by position (first half group 1). A team without players
/// gets [`DEFAULT_BOARDS`] default-named ones. Nothing is created if any entry
/// is invalid.
pub fn create_tournament(
    name: &str,
    format: TournamentFormat,
    entries: Vec<TeamEntry>,
) -> Result<Tournament, TournamentError> {
    validate_entries(&entries)?;

    let group_size = match format {
        TournamentFormat::GroupKnockout => entries.len().div_ceil(2),
        _ => entries.len(),
    };
    let mut tournament = Tournament::new(name.trim(), format);
    for (idx, entry) in entries.into_iter().enumerate() {
        let group = if idx < group_size { 1 } else { 2 };
        let team_name = entry.name.trim().to_string();
        let mut team = Team::new(team_name.clone(), group);
        let mut roster = entry.players;
        if roster.is_empty() {
            roster.resize(DEFAULT_BOARDS, String::new());
        }
        for (board, player) in (1..).zip(roster) {
            let player = player.trim();
            if player.is_empty() {
                team.add_player(format!("Player {} of {}", board, team_name));
            } else {
                team.add_player(player);
            }
        }
        tournament.teams.push(team);
    }

    let team_ids: Vec<TeamId> = tournament.teams.iter().map(|t| t.id).collect();
    let schedule = generate_schedule(&team_ids, format)?;

    for (round_number, pairings) in (1u32..).zip(&schedule.rounds) {
        let mut round = Round::new(round_number, Stage::Group);
        for pairing in pairings {
            let mut m = Match::group(round.id, pairing.group, pairing.white, pairing.black);
            let white = tournament
                .team(pairing.white)
                .ok_or(TournamentError::TeamNotFound(pairing.white))?
                .roster();
            let black = tournament
                .team(pairing.black)
                .ok_or(TournamentError::TeamNotFound(pairing.black))?
                .roster();
            m.games = pair_boards(&white, &black);
            round.matches.push(m);
        }
        tournament.rounds.push(round);
    }
    tournament.total_group_stage_rounds = schedule.rounds.len() as u32;

    if let Some(skeleton) = &schedule.bracket {
        append_knockout_rounds(&mut tournament, skeleton);
    }
    tournament.total_rounds = tournament.total_group_stage_rounds + format.knockout_rounds();

    log::info!(
        "Tournament {} ({:?}) created with {} teams and {} rounds",
        tournament.id,
        format,
        tournament.teams.len(),
        tournament.total_rounds
    );
    Ok(tournament)
}

/// Start the tournament: NotYetStarted -> Group, round 1 becomes current.
pub fn start_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.stage != Stage::NotYetStarted {
        return Err(TournamentError::AlreadyStarted);
    }
    if tournament.teams.len() < 2 {
        return Err(TournamentError::NotEnoughTeams {
            required: 2,
            actual: tournament.teams.len(),
        });
    }
    tournament.advance_stage(Stage::Group)?;
    tournament.current_round = 1;
    Ok(())
}

fn validate_entries(entries: &[TeamEntry]) -> Result<(), TournamentError> {
    let mut seen = HashSet::new();
    for entry in entries {
        let name = entry.name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyTeamName);
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(TournamentError::DuplicateTeamName(name.to_string()));
        }
    }
    Ok(())
}
