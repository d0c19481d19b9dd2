//! Team standings: match points, game points, Sonneborn-Berger, and tie detection.

use crate::models::{
    manual_tiebreak_separates, MatchLabel, MatchResult, Team, TeamId, TeamStats, Tournament,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// One row of a group table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StandingsEntry {
    /// 1-based position within the group.
    pub rank: usize,
    pub team_id: TeamId,
    pub team_name: String,
    pub group: u8,
    #[serde(flatten)]
    pub stats: TeamStats,
    pub manual_tiebreak: Option<i64>,
}

/// Group -> (ranked team -> teams sharing its exact triple).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StandingsTies(pub BTreeMap<u8, BTreeMap<TeamId, Vec<TeamId>>>);

impl StandingsTies {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ties not yet settled by distinct manual tiebreak values on both sides.
    pub fn unresolved(&self, tournament: &Tournament) -> StandingsTies {
        let manual = |id: TeamId| tournament.team(id).and_then(|t| t.manual_tiebreak);
        let mut open = BTreeMap::new();
        for (&group, ties) in &self.0 {
            let mut group_open = BTreeMap::new();
            for (&team, tied_with) in ties {
                let still_tied: Vec<TeamId> = tied_with
                    .iter()
                    .copied()
                    .filter(|&other| !manual_tiebreak_separates(manual(team), manual(other)))
                    .collect();
                if !still_tied.is_empty() {
                    group_open.insert(team, still_tied);
                }
            }
            if !group_open.is_empty() {
                open.insert(group, group_open);
            }
        }
        StandingsTies(open)
    }
}

/// Ordered group tables plus the tie report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Standings {
    pub groups: BTreeMap<u8, Vec<StandingsEntry>>,
    pub ties: StandingsTies,
}

/// Rebuild every team's aggregates from the completed group-stage matches.
///
/// Everything is wiped and recomputed in one pass, so calling this any number of
/// times on the same matches gives the same result. Wins are worth 2 match
/// points, draws 1. Sonneborn-Berger adds the opponent's final match points for a
/// win and half of them for a draw.
pub fn recalculate_standings(tournament: &mut Tournament) {
    let mut stats: HashMap<TeamId, TeamStats> = tournament
        .teams
        .iter()
        .map(|t| (t.id, TeamStats::default()))
        .collect();
    let mut decided: Vec<(TeamId, TeamId, MatchResult)> = Vec::new();

    let group_matches = tournament
        .rounds
        .iter()
        .flat_map(|r| r.matches.iter())
        .filter(|m| m.label == MatchLabel::Group && m.is_completed);

    for m in group_matches {
        let (Some(white), Some(black)) = (m.white_team, m.black_team) else {
            continue;
        };
        if !stats.contains_key(&white) || !stats.contains_key(&black) {
            continue;
        }
        if !matches!(
            m.result,
            MatchResult::WhiteWin | MatchResult::BlackWin | MatchResult::Draw
        ) {
            continue;
        }
        for (team, game_points) in [(white, m.white_score), (black, m.black_score)] {
            if let Some(s) = stats.get_mut(&team) {
                s.game_points += game_points;
            }
        }
        if let Some(s) = stats.get_mut(&white) {
            match m.result {
                MatchResult::WhiteWin => s.add_win(),
                MatchResult::BlackWin => s.add_loss(),
                _ => s.add_draw(),
            }
        }
        if let Some(s) = stats.get_mut(&black) {
            match m.result {
                MatchResult::WhiteWin => s.add_loss(),
                MatchResult::BlackWin => s.add_win(),
                _ => s.add_draw(),
            }
        }
        decided.push((white, black, m.result));
    }

    let final_points: HashMap<TeamId, f64> =
        stats.iter().map(|(&id, s)| (id, s.match_points)).collect();
    for (white, black, result) in decided {
        let (white_share, black_share) = match result {
            MatchResult::WhiteWin => (final_points[&black], 0.0),
            MatchResult::BlackWin => (0.0, final_points[&white]),
            _ => (final_points[&black] / 2.0, final_points[&white] / 2.0),
        };
        if let Some(s) = stats.get_mut(&white) {
            s.sonneborn_berger += white_share;
        }
        if let Some(s) = stats.get_mut(&black) {
            s.sonneborn_berger += black_share;
        }
    }

    for team in &mut tournament.teams {
        team.stats = stats.remove(&team.id).unwrap_or_default();
    }
    log::debug!("Standings recalculated for tournament {}", tournament.id);
}

/// Ordered tables (optionally a single group) with the tie report.
///
/// Reads the stored aggregates; call [`recalculate_standings`] first if results
/// changed.
pub fn get_standings(tournament: &Tournament, group: Option<u8>) -> Standings {
    let depth = tournament.format.tie_check_depth();
    let mut by_group: BTreeMap<u8, Vec<&Team>> = BTreeMap::new();
    for team in &tournament.teams {
        if group.map_or(true, |g| g == team.group) {
            by_group.entry(team.group).or_default().push(team);
        }
    }

    let mut groups = BTreeMap::new();
    let mut ties = BTreeMap::new();
    for (g, mut teams) in by_group {
        teams.sort_by(|a, b| a.ranking_cmp(b));
        let group_ties = detect_ties(&teams, depth);
        if !group_ties.is_empty() {
            ties.insert(g, group_ties);
        }
        let entries = teams
            .iter()
            .enumerate()
            .map(|(idx, t)| StandingsEntry {
                rank: idx + 1,
                team_id: t.id,
                team_name: t.name.clone(),
                group: t.group,
                stats: t.stats.clone(),
                manual_tiebreak: t.manual_tiebreak,
            })
            .collect();
        groups.insert(g, entries);
    }

    Standings {
        groups,
        ties: StandingsTies(ties),
    }
}

/// For each of the first `depth` ranked teams, every other team with the same triple.
fn detect_ties(ranked: &[&Team], depth: usize) -> BTreeMap<TeamId, Vec<TeamId>> {
    let mut ties = BTreeMap::new();
    for (i, team) in ranked.iter().take(depth).enumerate() {
        let tied_with: Vec<TeamId> = ranked
            .iter()
            .enumerate()
            .filter(|&(j, other)| j != i && team.stats.is_level_with(&other.stats))
            .map(|(_, other)| other.id)
            .collect();
        if !tied_with.is_empty() {
            ties.insert(team.id, tied_with);
        }
    }
    ties
}

#[derive(Serialize)]
struct CsvRow<'a> {
    group: u8,
    rank: usize,
    team: &'a str,
    matches_played: u32,
    wins: u32,
    draws: u32,
    losses: u32,
    match_points: f64,
    game_points: f64,
    sonneborn_berger: f64,
    manual_tiebreak: Option<i64>,
}

/// Standings as CSV, one row per team, groups in order.
pub fn standings_csv(standings: &Standings) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in standings.groups.values().flatten() {
        writer.serialize(CsvRow {
            group: entry.group,
            rank: entry.rank,
            team: &entry.team_name,
            matches_played: entry.stats.matches_played,
            wins: entry.stats.wins,
            draws: entry.stats.draws,
            losses: entry.stats.losses,
            match_points: entry.stats.match_points,
            game_points: entry.stats.game_points,
            sonneborn_berger: entry.stats.sonneborn_berger,
            manual_tiebreak: entry.manual_tiebreak,
        })?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
