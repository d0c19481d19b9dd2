//! Round: one numbered slot of the schedule holding its matches.

use crate::models::game::Match;
use crate::models::tournament::Stage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a round.
pub type RoundId = Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    /// 1-based, contiguous within a tournament.
    pub round_number: u32,
    /// Stage this round belongs to (group, semi_final or final).
    pub stage: Stage,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub matches: Vec<Match>,
}

impl Round {
    pub fn new(round_number: u32, stage: Stage) -> Self {
        Self {
            id: Uuid::new_v4(),
            round_number,
            stage,
            is_completed: false,
            completed_at: None,
            matches: Vec::new(),
        }
    }

    /// Number of matches already decided.
    pub fn completed_matches(&self) -> usize {
        self.matches.iter().filter(|m| m.is_completed).count()
    }

    /// Mark the round completed (keeps the first completion time).
    pub fn mark_completed(&mut self) {
        if !self.is_completed {
            self.is_completed = true;
            self.completed_at = Some(Utc::now());
        }
    }
}
