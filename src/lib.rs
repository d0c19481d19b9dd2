//! Team chess tournament organizer: library with models, business logic and storage.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    can_complete_round, complete_round, create_tournament, final_podium, generate_schedule,
    get_player_rankings, get_standings, record_game_result, record_tiebreaker, start_tournament,
    swap_colors, swap_players, TeamEntry,
};
pub use models::{
    ErrorKind, Game, GameResult, Match, MatchId, MatchLabel, MatchResult, Player, PlayerId, Round,
    Stage, Team, TeamId, TiebreakerResult, Tournament, TournamentError, TournamentFormat,
    TournamentId,
};
