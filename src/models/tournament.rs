//! Tournament, Stage and TournamentError.

use crate::models::game::{Match, MatchId, MatchLabel};
use crate::models::player::{Player, PlayerId};
use crate::models::round::Round;
use crate::models::team::{Team, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Broad category of a [`TournamentError`], used by callers to pick a response.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Bad input: competitor count, format, names, result values.
    Validation,
    /// A referenced tournament, round, match, board, team or player does not exist.
    NotFound,
    /// The tournament is not in a state that allows the action.
    Precondition,
    /// Stored data does not support the requested bracket resolution.
    Consistency,
}

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    #[error("Need at least {required} teams (got {actual})")]
    NotEnoughTeams { required: usize, actual: usize },
    #[error("Group + knockout format requires an even number of teams (got {0})")]
    OddTeamCount(usize),
    #[error("Unsupported tournament format: {0:?}")]
    UnsupportedFormat(TournamentFormat),
    #[error("Team name must not be empty")]
    EmptyTeamName,
    /// Team names are unique within a tournament (case-insensitive).
    #[error("A team with this name already exists: {0}")]
    DuplicateTeamName(String),
    #[error("Invalid result for this action: {0}")]
    InvalidResult(String),
    #[error("Both players are the same")]
    SamePlayer,
    #[error("Players must belong to the same team of the match")]
    PlayersNotTeammates,

    #[error("Tournament not found")]
    TournamentNotFound(TournamentId),
    #[error("Round {0} not found")]
    RoundNotFound(u32),
    #[error("Match not found")]
    MatchNotFound(MatchId),
    #[error("Board {board_number} not found in match")]
    GameNotFound { match_id: MatchId, board_number: u32 },
    #[error("Team not found")]
    TeamNotFound(TeamId),
    #[error("Player not found")]
    PlayerNotFound(PlayerId),

    #[error("Tournament already started")]
    AlreadyStarted,
    #[error("Tournament not started")]
    NotStarted,
    #[error("Tournament is not completed")]
    NotCompleted,
    #[error("Round {0} is already completed")]
    RoundAlreadyCompleted(u32),
    #[error("Cannot move tournament from {from:?} to {to:?}")]
    InvalidTransition { from: Stage, to: Stage },
    #[error("This match has no tiebreaker")]
    NoTiebreaker,
    #[error("Colors can only be swapped for knockout matches with boards")]
    CannotSwapColors,

    #[error("Group {group} has {found} ranked team(s); two are needed to fill the semi-finals")]
    InsufficientQualifiers { group: u8, found: usize },
    #[error("Knockout match {0:?} is missing")]
    MissingKnockoutMatch(MatchLabel),
    #[error("Knockout match {0:?} has no winner yet")]
    UndecidedMatch(MatchLabel),
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        use TournamentError::*;
        match self {
            NotEnoughTeams { .. }
            | OddTeamCount(_)
            | UnsupportedFormat(_)
            | EmptyTeamName
            | DuplicateTeamName(_)
            | InvalidResult(_)
            | SamePlayer
            | PlayersNotTeammates => ErrorKind::Validation,
            TournamentNotFound(_)
            | RoundNotFound(_)
            | MatchNotFound(_)
            | GameNotFound { .. }
            | TeamNotFound(_)
            | PlayerNotFound(_) => ErrorKind::NotFound,
            AlreadyStarted
            | NotStarted
            | NotCompleted
            | RoundAlreadyCompleted(_)
            | InvalidTransition { .. }
            | NoTiebreaker
            | CannotSwapColors => ErrorKind::Precondition,
            InsufficientQualifiers { .. } | MissingKnockoutMatch(_) | UndecidedMatch(_) => {
                ErrorKind::Consistency
            }
        }
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// How teams are scheduled.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    /// Every team meets every other team once.
    #[default]
    RoundRobin,
    /// Two round-robin groups, then semi-finals, final and 3rd place match.
    GroupKnockout,
    /// Accepted as a value, rejected at creation.
    Swiss,
}

impl TournamentFormat {
    /// How many leading standings positions must be free of ties.
    pub fn tie_check_depth(self) -> usize {
        match self {
            TournamentFormat::GroupKnockout => 2,
            TournamentFormat::RoundRobin | TournamentFormat::Swiss => 3,
        }
    }

    /// Rounds appended after the group stage.
    pub fn knockout_rounds(self) -> u32 {
        match self {
            TournamentFormat::GroupKnockout => 2,
            TournamentFormat::RoundRobin | TournamentFormat::Swiss => 0,
        }
    }
}

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Schedule built, no round playable yet.
    #[default]
    NotYetStarted,
    Group,
    SemiFinal,
    Final,
    Completed,
}

impl Stage {
    /// The transition table. Anything not listed here is rejected.
    pub fn can_advance_to(self, next: Stage, format: TournamentFormat) -> bool {
        use Stage::*;
        matches!(
            (self, next, format),
            (NotYetStarted, Group, _)
                | (Group, SemiFinal, TournamentFormat::GroupKnockout)
                | (SemiFinal, Final, TournamentFormat::GroupKnockout)
                | (Final, Completed, TournamentFormat::GroupKnockout)
                | (Group, Completed, TournamentFormat::RoundRobin)
        )
    }
}

/// Full tournament state: teams with rosters, rounds with matches and boards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub format: TournamentFormat,
    pub stage: Stage,
    /// Next round eligible for completion (0 before the start).
    pub current_round: u32,
    pub total_rounds: u32,
    pub total_group_stage_rounds: u32,
    pub group_standings_validated: bool,
    pub best_players_validated: bool,
    pub created_at: DateTime<Utc>,
    pub teams: Vec<Team>,
    pub rounds: Vec<Round>,
}

impl Tournament {
    /// Create an empty tournament in NotYetStarted. The schedule is built by `create_tournament`.
    pub fn new(name: impl Into<String>, format: TournamentFormat) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            format,
            stage: Stage::NotYetStarted,
            current_round: 0,
            total_rounds: 0,
            total_group_stage_rounds: 0,
            group_standings_validated: false,
            best_players_validated: false,
            created_at: Utc::now(),
            teams: Vec::new(),
            rounds: Vec::new(),
        }
    }

    /// Move to `next` if the transition table allows it.
    pub fn advance_stage(&mut self, next: Stage) -> Result<(), TournamentError> {
        if !self.stage.can_advance_to(next, self.format) {
            return Err(TournamentError::InvalidTransition {
                from: self.stage,
                to: next,
            });
        }
        log::info!("Tournament {} moves from {:?} to {:?}", self.id, self.stage, next);
        self.stage = next;
        Ok(())
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == id)
    }

    /// Every player of every team, in roster order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.teams.iter().flat_map(|t| t.players.iter())
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.teams
            .iter_mut()
            .flat_map(|t| t.players.iter_mut())
            .find(|p| p.id == id)
    }

    pub fn round(&self, round_number: u32) -> Option<&Round> {
        self.rounds.iter().find(|r| r.round_number == round_number)
    }

    pub fn round_mut(&mut self, round_number: u32) -> Option<&mut Round> {
        self.rounds.iter_mut().find(|r| r.round_number == round_number)
    }

    /// Every match of every round, in schedule order.
    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.rounds.iter().flat_map(|r| r.matches.iter())
    }

    pub fn find_match(&self, id: MatchId) -> Option<&Match> {
        self.matches().find(|m| m.id == id)
    }

    pub fn find_match_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.rounds
            .iter_mut()
            .flat_map(|r| r.matches.iter_mut())
            .find(|m| m.id == id)
    }

    /// Round number of the round holding the given match.
    pub fn round_number_of(&self, match_id: MatchId) -> Option<u32> {
        self.rounds
            .iter()
            .find(|r| r.matches.iter().any(|m| m.id == match_id))
            .map(|r| r.round_number)
    }

    /// The single knockout match carrying `label`.
    pub fn knockout_match(&self, label: MatchLabel) -> Option<&Match> {
        self.matches().find(|m| m.label == label)
    }

    pub fn knockout_match_mut(&mut self, label: MatchLabel) -> Option<&mut Match> {
        self.rounds
            .iter_mut()
            .flat_map(|r| r.matches.iter_mut())
            .find(|m| m.label == label)
    }

    /// Set (or clear) a team's manual tiebreak value.
    pub fn set_team_manual_tiebreak(
        &mut self,
        team_id: TeamId,
        value: Option<i64>,
    ) -> Result<(), TournamentError> {
        let team = self
            .team_mut(team_id)
            .ok_or(TournamentError::TeamNotFound(team_id))?;
        team.manual_tiebreak = value;
        Ok(())
    }

    /// Set (or clear) a player's manual tiebreak value.
    pub fn set_player_manual_tiebreak(
        &mut self,
        player_id: PlayerId,
        value: Option<i64>,
    ) -> Result<(), TournamentError> {
        let player = self
            .player_mut(player_id)
            .ok_or(TournamentError::PlayerNotFound(player_id))?;
        player.manual_tiebreak = value;
        Ok(())
    }
}
