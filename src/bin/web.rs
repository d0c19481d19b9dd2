//! JSON API over the tournament store.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, DATA_DIR.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use team_chess_tournament::config::ServerConfig;
use team_chess_tournament::logic::standings_csv;
use team_chess_tournament::store::{StoreError, TournamentStore};
use team_chess_tournament::{
    can_complete_round, complete_round, create_tournament, final_podium, get_player_rankings,
    get_standings, record_game_result, record_tiebreaker, start_tournament, swap_colors,
    swap_players, ErrorKind, GameResult, MatchId, PlayerId, TeamEntry, TeamId, TiebreakerResult,
    TournamentFormat, TournamentId,
};

type AppState = Data<TournamentStore>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    format: TournamentFormat,
    teams: Vec<TeamEntry>,
}

#[derive(Deserialize)]
struct GroupQuery {
    group: Option<u8>,
}

#[derive(Deserialize)]
struct GameResultBody {
    result: GameResult,
}

#[derive(Deserialize)]
struct TiebreakerBody {
    result: TiebreakerResult,
}

#[derive(Deserialize)]
struct SwapPlayersBody {
    first: PlayerId,
    second: PlayerId,
}

#[derive(Deserialize)]
struct ManualTiebreakBody {
    value: Option<i64>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct RoundPath {
    id: TournamentId,
    round: u32,
}

#[derive(Deserialize)]
struct MatchPath {
    id: TournamentId,
    match_id: MatchId,
}

#[derive(Deserialize)]
struct BoardPath {
    id: TournamentId,
    match_id: MatchId,
    board: u32,
}

#[derive(Deserialize)]
struct TeamPath {
    id: TournamentId,
    team_id: TeamId,
}

#[derive(Deserialize)]
struct PlayerPath {
    id: TournamentId,
    player_id: PlayerId,
}

/// NotFound -> 404, Consistency -> 409, other domain errors -> 400, storage -> 500.
fn error_response(e: StoreError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match &e {
        StoreError::NotFound(_) => HttpResponse::NotFound().json(body),
        StoreError::Tournament(err) => match err.kind() {
            ErrorKind::NotFound => HttpResponse::NotFound().json(body),
            ErrorKind::Consistency => HttpResponse::Conflict().json(body),
            ErrorKind::Validation | ErrorKind::Precondition => {
                HttpResponse::BadRequest().json(body)
            }
        },
        StoreError::Io(_) | StoreError::Json(_) | StoreError::Poisoned => {
            log::error!("Store failure: {}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn respond<T: serde::Serialize>(result: Result<T, StoreError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "team-chess-tournament",
    })
}

/// Create a tournament with its full schedule (stage not_yet_started).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let result = create_tournament(&body.name, body.format, body.teams)
        .map_err(StoreError::from)
        .and_then(|t| state.insert(t.clone()).map(|()| t));
    respond(result)
}

#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    respond(state.list())
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.get(path.id))
}

/// Delete a tournament with everything it owns.
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.delete(path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(e),
    }
}

/// Start the tournament (not_yet_started -> group).
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.update(path.id, |t| {
        start_tournament(t)?;
        Ok(t.clone())
    }))
}

/// Group tables with tie report; `?group=N` limits to one group.
#[get("/api/tournaments/{id}/standings")]
async fn api_standings(
    state: AppState,
    path: Path<TournamentPath>,
    query: Query<GroupQuery>,
) -> HttpResponse {
    respond(state.get(path.id).map(|t| get_standings(&t, query.group)))
}

#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let tournament = match state.get(path.id) {
        Ok(t) => t,
        Err(e) => return error_response(e),
    };
    match standings_csv(&get_standings(&tournament, None)) {
        Ok(csv) => HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(csv),
        Err(e) => HttpResponse::InternalServerError()
            .json(serde_json::json!({ "error": e.to_string() })),
    }
}

#[get("/api/tournaments/{id}/best-players")]
async fn api_best_players(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.get(path.id).map(|t| get_player_rankings(&t)))
}

#[get("/api/tournaments/{id}/rounds/{round}/can-complete")]
async fn api_can_complete_round(state: AppState, path: Path<RoundPath>) -> HttpResponse {
    respond(state.get(path.id).map(|t| can_complete_round(&t, path.round)))
}

#[post("/api/tournaments/{id}/rounds/{round}/complete")]
async fn api_complete_round(state: AppState, path: Path<RoundPath>) -> HttpResponse {
    respond(state.update(path.id, |t| complete_round(t, path.round)))
}

/// Enter (or clear with "pending") one board result.
#[put("/api/tournaments/{id}/matches/{match_id}/boards/{board}/result")]
async fn api_board_result(
    state: AppState,
    path: Path<BoardPath>,
    body: Json<GameResultBody>,
) -> HttpResponse {
    respond(state.update(path.id, |t| {
        record_game_result(t, path.match_id, path.board, body.result)?;
        Ok(t.clone())
    }))
}

#[put("/api/tournaments/{id}/matches/{match_id}/tiebreaker")]
async fn api_tiebreaker(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<TiebreakerBody>,
) -> HttpResponse {
    respond(state.update(path.id, |t| {
        record_tiebreaker(t, path.match_id, body.result)?;
        Ok(t.clone())
    }))
}

#[post("/api/tournaments/{id}/matches/{match_id}/swap-colors")]
async fn api_swap_colors(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    respond(state.update(path.id, |t| {
        swap_colors(t, path.match_id)?;
        Ok(t.clone())
    }))
}

#[post("/api/tournaments/{id}/matches/{match_id}/swap-players")]
async fn api_swap_players(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<SwapPlayersBody>,
) -> HttpResponse {
    respond(state.update(path.id, |t| {
        swap_players(t, path.match_id, body.first, body.second)?;
        Ok(t.clone())
    }))
}

#[put("/api/tournaments/{id}/teams/{team_id}/tiebreak")]
async fn api_team_tiebreak(
    state: AppState,
    path: Path<TeamPath>,
    body: Json<ManualTiebreakBody>,
) -> HttpResponse {
    respond(state.update(path.id, |t| {
        t.set_team_manual_tiebreak(path.team_id, body.value)?;
        Ok(get_standings(t, None))
    }))
}

#[put("/api/tournaments/{id}/players/{player_id}/tiebreak")]
async fn api_player_tiebreak(
    state: AppState,
    path: Path<PlayerPath>,
    body: Json<ManualTiebreakBody>,
) -> HttpResponse {
    respond(state.update(path.id, |t| {
        t.set_player_manual_tiebreak(path.player_id, body.value)?;
        Ok(get_player_rankings(t))
    }))
}

#[get("/api/tournaments/{id}/final-rankings")]
async fn api_final_rankings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(
        state
            .get(path.id)
            .and_then(|t| final_podium(&t).map_err(StoreError::from)),
    )
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    let store = TournamentStore::open(&config.data_dir)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let state = Data::new(store);

    log::info!("Starting server at http://{}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_list_tournaments)
            .service(api_standings_csv)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_start_tournament)
            .service(api_standings)
            .service(api_best_players)
            .service(api_can_complete_round)
            .service(api_complete_round)
            .service(api_board_result)
            .service(api_tiebreaker)
            .service(api_swap_colors)
            .service(api_swap_players)
            .service(api_team_tiebreak)
            .service(api_player_tiebreak)
            .service(api_final_rankings)
    })
    .bind(config.bind_address())?
    .run()
    .await
}
