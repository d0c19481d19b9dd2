//! Player and PlayerStats data structures.

use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in games and lookups).
pub type PlayerId = Uuid;

/// Individual aggregates, rebuilt from decided games on every recalculation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub points: f64,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub games_played: u32,
}

impl PlayerStats {
    /// Record a won game (1 point).
    pub fn add_win(&mut self) {
        self.points += 1.0;
        self.wins += 1;
        self.games_played += 1;
    }

    /// Record a drawn game (half a point).
    pub fn add_draw(&mut self) {
        self.points += 0.5;
        self.draws += 1;
        self.games_played += 1;
    }

    /// Record a lost game.
    pub fn add_loss(&mut self) {
        self.losses += 1;
        self.games_played += 1;
    }
}

/// A player on a team roster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub team_id: TeamId,
    #[serde(flatten)]
    pub stats: PlayerStats,
    /// Last-resort ranking key, assigned by an administrator to break a tie.
    pub manual_tiebreak: Option<i64>,
}

impl Player {
    /// Create a new player on the given team. Aggregates start at zero.
    pub fn new(name: impl Into<String>, team_id: TeamId) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            team_id,
            stats: PlayerStats::default(),
            manual_tiebreak: None,
        }
    }
}
