//! Match (team vs team), Game (one board), and their result types.

use crate::models::player::PlayerId;
use crate::models::round::RoundId;
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team match.
pub type MatchId = Uuid;

/// Unique identifier for a single board game.
pub type GameId = Uuid;

/// Which slot of the schedule a match fills.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum MatchLabel {
    #[serde(rename = "group")]
    Group,
    SF1,
    SF2,
    Final,
    #[serde(rename = "3rdPlace")]
    ThirdPlace,
}

impl MatchLabel {
    /// Knockout matches can never end in a draw.
    pub fn is_knockout(self) -> bool {
        self != MatchLabel::Group
    }
}

/// Outcome of a team match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    #[default]
    Pending,
    WhiteWin,
    BlackWin,
    Draw,
    /// Level knockout match; see `Match::tiebreaker` for the decision.
    Tiebreaker,
}

/// Decision of the supplementary procedure for a level knockout match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiebreakerResult {
    #[default]
    NoTiebreaker,
    Pending,
    WhiteWin,
    BlackWin,
}

/// Outcome of a single board.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    #[default]
    Pending,
    WhiteWin,
    BlackWin,
    Draw,
}

impl GameResult {
    /// Board score as (white, black).
    pub fn scores(self) -> (f64, f64) {
        match self {
            GameResult::Pending => (0.0, 0.0),
            GameResult::WhiteWin => (1.0, 0.0),
            GameResult::BlackWin => (0.0, 1.0),
            GameResult::Draw => (0.5, 0.5),
        }
    }

    pub fn is_decided(self) -> bool {
        self != GameResult::Pending
    }

    /// Same outcome seen from the other side of the board.
    pub fn flipped(self) -> Self {
        match self {
            GameResult::WhiteWin => GameResult::BlackWin,
            GameResult::BlackWin => GameResult::WhiteWin,
            other => other,
        }
    }
}

/// One board of a team match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    /// 1-based board number.
    pub board_number: u32,
    pub white_player: PlayerId,
    pub black_player: PlayerId,
    pub result: GameResult,
    pub white_score: f64,
    pub black_score: f64,
    pub is_completed: bool,
}

impl Game {
    pub fn new(board_number: u32, white_player: PlayerId, black_player: PlayerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            board_number,
            white_player,
            black_player,
            result: GameResult::Pending,
            white_score: 0.0,
            black_score: 0.0,
            is_completed: false,
        }
    }

    /// Record a board result; `Pending` clears it.
    pub fn set_result(&mut self, result: GameResult) {
        let (white, black) = result.scores();
        self.result = result;
        self.white_score = white;
        self.black_score = black;
        self.is_completed = result.is_decided();
    }
}

/// A team match: several boards played at once between two teams.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub round_id: RoundId,
    pub label: MatchLabel,
    /// Group number for group-stage matches, `None` for knockout matches.
    pub group: Option<u8>,
    /// `None` while the knockout slot is still a placeholder.
    pub white_team: Option<TeamId>,
    pub black_team: Option<TeamId>,
    pub white_score: f64,
    pub black_score: f64,
    pub result: MatchResult,
    pub tiebreaker: TiebreakerResult,
    pub is_completed: bool,
    pub games: Vec<Game>,
}

impl Match {
    /// A group-stage match between two known teams (boards are added by the caller).
    pub fn group(round_id: RoundId, group: u8, white_team: TeamId, black_team: TeamId) -> Self {
        Self {
            group: Some(group),
            white_team: Some(white_team),
            black_team: Some(black_team),
            ..Self::placeholder(round_id, MatchLabel::Group)
        }
    }

    /// A knockout slot whose teams are not known yet.
    pub fn placeholder(round_id: RoundId, label: MatchLabel) -> Self {
        Self {
            id: Uuid::new_v4(),
            round_id,
            label,
            group: None,
            white_team: None,
            black_team: None,
            white_score: 0.0,
            black_score: 0.0,
            result: MatchResult::Pending,
            tiebreaker: TiebreakerResult::NoTiebreaker,
            is_completed: false,
            games: Vec::new(),
        }
    }

    /// Both team references are set.
    pub fn is_resolved(&self) -> bool {
        self.white_team.is_some() && self.black_team.is_some()
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.white_team == Some(team) || self.black_team == Some(team)
    }

    /// `(winner, loser)` once the match is decided, including by tiebreaker.
    pub fn winner_and_loser(&self) -> Option<(TeamId, TeamId)> {
        if !self.is_completed {
            return None;
        }
        let (white, black) = (self.white_team?, self.black_team?);
        match (self.result, self.tiebreaker) {
            (MatchResult::WhiteWin, _) | (MatchResult::Tiebreaker, TiebreakerResult::WhiteWin) => {
                Some((white, black))
            }
            (MatchResult::BlackWin, _) | (MatchResult::Tiebreaker, TiebreakerResult::BlackWin) => {
                Some((black, white))
            }
            _ => None,
        }
    }

    /// Rebuild scores, result and completion from the boards.
    ///
    /// A match is complete once every board is decided, i.e. the score sum reaches
    /// the board count. A level knockout match stays open until its tiebreaker is
    /// decided. Matches without boards keep whatever was set on them.
    pub fn refresh_from_games(&mut self) {
        if self.games.is_empty() {
            return;
        }
        self.white_score = self.games.iter().map(|g| g.white_score).sum();
        self.black_score = self.games.iter().map(|g| g.black_score).sum();

        if !self.games.iter().all(|g| g.is_completed) {
            self.result = MatchResult::Pending;
            self.tiebreaker = TiebreakerResult::NoTiebreaker;
            self.is_completed = false;
            return;
        }

        if self.white_score > self.black_score {
            self.result = MatchResult::WhiteWin;
            self.tiebreaker = TiebreakerResult::NoTiebreaker;
            self.is_completed = true;
        } else if self.black_score > self.white_score {
            self.result = MatchResult::BlackWin;
            self.tiebreaker = TiebreakerResult::NoTiebreaker;
            self.is_completed = true;
        } else if self.label.is_knockout() {
            self.result = MatchResult::Tiebreaker;
            match self.tiebreaker {
                TiebreakerResult::WhiteWin | TiebreakerResult::BlackWin => self.is_completed = true,
                TiebreakerResult::NoTiebreaker | TiebreakerResult::Pending => {
                    self.tiebreaker = TiebreakerResult::Pending;
                    self.is_completed = false;
                }
            }
        } else {
            self.result = MatchResult::Draw;
            self.tiebreaker = TiebreakerResult::NoTiebreaker;
            self.is_completed = true;
        }
    }
}
