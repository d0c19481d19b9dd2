//! Team and TeamStats.

use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

/// Match points awarded for a won team match.
pub const WIN_MATCH_POINTS: f64 = 2.0;
/// Match points awarded to each side of a drawn team match.
pub const DRAW_MATCH_POINTS: f64 = 1.0;

/// Team aggregates over completed group-stage matches.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub match_points: f64,
    pub game_points: f64,
    pub sonneborn_berger: f64,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub matches_played: u32,
}

impl TeamStats {
    pub fn add_win(&mut self) {
        self.match_points += WIN_MATCH_POINTS;
        self.wins += 1;
        self.matches_played += 1;
    }

    pub fn add_draw(&mut self) {
        self.match_points += DRAW_MATCH_POINTS;
        self.draws += 1;
        self.matches_played += 1;
    }

    pub fn add_loss(&mut self) {
        self.losses += 1;
        self.matches_played += 1;
    }

    /// Same (match points, game points, Sonneborn-Berger) triple.
    pub fn is_level_with(&self, other: &TeamStats) -> bool {
        self.match_points == other.match_points
            && self.game_points == other.game_points
            && self.sonneborn_berger == other.sonneborn_berger
    }
}

/// A team and its roster. Roster order decides board order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// 1 or 2.
    pub group: u8,
    #[serde(flatten)]
    pub stats: TeamStats,
    /// Last-resort ranking key, assigned by an administrator to break a tie.
    pub manual_tiebreak: Option<i64>,
    pub players: Vec<Player>,
}

impl Team {
    pub fn new(name: impl Into<String>, group: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            group,
            stats: TeamStats::default(),
            manual_tiebreak: None,
            players: Vec::new(),
        }
    }

    /// Append a player to the end of the roster.
    pub fn add_player(&mut self, name: impl Into<String>) -> PlayerId {
        let player = Player::new(name, self.id);
        let id = player.id;
        self.players.push(player);
        id
    }

    /// Player ids in board order.
    pub fn roster(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    /// Ranking order: match points, game points, Sonneborn-Berger (all descending),
    /// then the manual tiebreak (ascending, unset last).
    pub fn ranking_cmp(&self, other: &Team) -> Ordering {
        other
            .stats
            .match_points
            .total_cmp(&self.stats.match_points)
            .then_with(|| other.stats.game_points.total_cmp(&self.stats.game_points))
            .then_with(|| {
                other
                    .stats
                    .sonneborn_berger
                    .total_cmp(&self.stats.sonneborn_berger)
            })
            .then_with(|| manual_tiebreak_cmp(self.manual_tiebreak, other.manual_tiebreak))
    }
}

/// Ascending, with unset values ranked after every set value.
pub(crate) fn manual_tiebreak_cmp(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// A tie is settled once both sides carry distinct manual tiebreak values.
pub(crate) fn manual_tiebreak_separates(a: Option<i64>, b: Option<i64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a != b)
}
