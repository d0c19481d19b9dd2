//! Data structures for team chess tournaments: teams, players, rounds, matches, boards.

mod game;
mod player;
mod round;
mod team;
mod tournament;

pub use game::{Game, GameId, GameResult, Match, MatchId, MatchLabel, MatchResult, TiebreakerResult};
pub use player::{Player, PlayerId, PlayerStats};
pub use round::{Round, RoundId};
pub use team::{Team, TeamId, TeamStats, DRAW_MATCH_POINTS, WIN_MATCH_POINTS};
pub(crate) use team::{manual_tiebreak_cmp, manual_tiebreak_separates};
pub use tournament::{ErrorKind, Stage, Tournament, TournamentError, TournamentFormat, TournamentId};
