//! Individual player rankings ("best players") and leader-tie detection.

use crate::models::{
    manual_tiebreak_cmp, manual_tiebreak_separates, GameResult, Player, PlayerId, PlayerStats,
    TeamId, Tournament,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerRankingEntry {
    pub rank: usize,
    pub player_id: PlayerId,
    pub player_name: String,
    pub team_id: TeamId,
    pub team_name: String,
    #[serde(flatten)]
    pub stats: PlayerStats,
    pub manual_tiebreak: Option<i64>,
}

/// Leader -> players level with the leader on (points, wins).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PlayerTies(pub BTreeMap<PlayerId, Vec<PlayerId>>);

impl PlayerTies {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ties not yet settled by distinct manual tiebreak values on both sides.
    pub fn unresolved(&self, tournament: &Tournament) -> PlayerTies {
        let manual = |id: PlayerId| tournament.player(id).and_then(|p| p.manual_tiebreak);
        let open = self
            .0
            .iter()
            .filter_map(|(&leader, tied_with)| {
                let still_tied: Vec<PlayerId> = tied_with
                    .iter()
                    .copied()
                    .filter(|&other| !manual_tiebreak_separates(manual(leader), manual(other)))
                    .collect();
                (!still_tied.is_empty()).then_some((leader, still_tied))
            })
            .collect();
        PlayerTies(open)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerRankings {
    pub players: Vec<PlayerRankingEntry>,
    pub ties: PlayerTies,
}

/// Rebuild every player's aggregates from the decided boards of the tournament.
pub fn recalculate_player_stats(tournament: &mut Tournament) {
    let mut stats: HashMap<PlayerId, PlayerStats> = tournament
        .players()
        .map(|p| (p.id, PlayerStats::default()))
        .collect();

    let games = tournament
        .rounds
        .iter()
        .flat_map(|r| r.matches.iter())
        .flat_map(|m| m.games.iter());
    for game in games {
        if !game.result.is_decided() {
            continue;
        }
        if let Some(s) = stats.get_mut(&game.white_player) {
            match game.result {
                GameResult::WhiteWin => s.add_win(),
                GameResult::BlackWin => s.add_loss(),
                _ => s.add_draw(),
            }
        }
        if let Some(s) = stats.get_mut(&game.black_player) {
            match game.result {
                GameResult::WhiteWin => s.add_loss(),
                GameResult::BlackWin => s.add_win(),
                _ => s.add_draw(),
            }
        }
    }

    for player in tournament.teams.iter_mut().flat_map(|t| t.players.iter_mut()) {
        player.stats = stats.remove(&player.id).unwrap_or_default();
    }
    log::debug!("Player rankings recalculated for tournament {}", tournament.id);
}

/// Players ordered by points, then wins (descending), then manual tiebreak.
///
/// Only ties with the leader are reported: players after the leader are compared
/// with it until the first one that differs.
pub fn get_player_rankings(tournament: &Tournament) -> PlayerRankings {
    let mut players: Vec<&Player> = tournament.players().collect();
    players.sort_by(|a, b| {
        b.stats
            .points
            .total_cmp(&a.stats.points)
            .then_with(|| b.stats.wins.cmp(&a.stats.wins))
            .then_with(|| manual_tiebreak_cmp(a.manual_tiebreak, b.manual_tiebreak))
    });

    let mut ties = BTreeMap::new();
    if let Some((leader, rest)) = players.split_first() {
        let tied: Vec<PlayerId> = rest
            .iter()
            .take_while(|p| {
                p.stats.points == leader.stats.points && p.stats.wins == leader.stats.wins
            })
            .map(|p| p.id)
            .collect();
        if !tied.is_empty() {
            ties.insert(leader.id, tied);
        }
    }

    let team_names: HashMap<TeamId, &str> = tournament
        .teams
        .iter()
        .map(|t| (t.id, t.name.as_str()))
        .collect();
    let entries = players
        .iter()
        .enumerate()
        .map(|(idx, p)| PlayerRankingEntry {
            rank: idx + 1,
            player_id: p.id,
            player_name: p.name.clone(),
            team_id: p.team_id,
            team_name: team_names.get(&p.team_id).copied().unwrap_or_default().to_string(),
            stats: p.stats.clone(),
            manual_tiebreak: p.manual_tiebreak,
        })
        .collect();

    PlayerRankings {
        players: entries,
        ties: PlayerTies(ties),
    }
}
