//! Tournament business logic: scheduling, results, standings, rankings, progression.

mod bracket;
mod progression;
mod rankings;
mod results;
mod schedule;
mod setup;
mod standings;

pub use bracket::{append_knockout_rounds, pair_boards, resolve_finals, resolve_semi_finals};
pub use progression::{
    can_complete_round, complete_round, final_podium, Podium, PodiumPlace, RoundCheck,
    RoundCompletion,
};
pub use rankings::{
    get_player_rankings, recalculate_player_stats, PlayerRankingEntry, PlayerRankings, PlayerTies,
};
pub use results::{
    recalculate_round, recalculate_tournament, record_game_result, record_tiebreaker, swap_colors,
    swap_players,
};
pub use schedule::{
    generate_schedule, round_robin, BracketSkeleton, Pairing, Schedule, ScheduledPairing,
};
pub use setup::{create_tournament, start_tournament, TeamEntry, DEFAULT_BOARDS};
pub use standings::{
    get_standings, recalculate_standings, standings_csv, Standings, StandingsEntry, StandingsTies,
};
