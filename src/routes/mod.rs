use actix_files as fs;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use log::info;
use thiserror::Error;

use crate::game::rules::{apply_move, MoveError};
use crate::models::{
    ErrorResponse, GameStateEnvelope, GameUpdate, ListGamesResponse, MessageResponse, MoveRequest,
};
use crate::state::AppState;

/// Errors surfaced by the HTTP surface. Validation failures map to 400,
/// unknown game ids to 404; the body is always `{ "error": "..." }`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Game not found")]
    GameNotFound,
    #[error(transparent)]
    InvalidMove(#[from] MoveError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::GameNotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidMove(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

/// `POST /api/newgame` — create a game under a fresh id.
pub async fn new_game(app_state: web::Data<AppState>) -> impl Responder {
    let (game_id, state) = app_state.create_game();
    info!("Created new game {}", game_id);
    HttpResponse::Ok().json(GameUpdate { game_id, state })
}

/// `GET /api/game/{gameId}` — fetch a game by its id.
pub async fn get_game(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let game_id = path.into_inner();
    let games = app_state.games.lock().unwrap();
    let game_state = games.get(&game_id).cloned().ok_or(ApiError::GameNotFound)?;
    Ok(HttpResponse::Ok().json(GameStateEnvelope { game_state }))
}

/// `POST /api/move/{gameId}` — apply a move and return the updated state.
pub async fn make_move(
    path: web::Path<String>,
    body: web::Json<MoveRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let game_id = path.into_inner();
    let mut games = app_state.games.lock().unwrap();
    let state = games.get(&game_id).ok_or(ApiError::GameNotFound)?;

    let updated = apply_move(state, body.index)?;
    games.insert(game_id.clone(), updated.clone());

    info!("Applied move {} to game {}", body.index, game_id);
    Ok(HttpResponse::Ok().json(GameUpdate {
        game_id,
        state: updated,
    }))
}

/// `GET /api/listgames` — ids of games that are still joinable: not
/// deleted, not already won.
pub async fn list_games(app_state: web::Data<AppState>) -> impl Responder {
    let games = app_state.games.lock().unwrap();
    let games: Vec<String> = games
        .iter()
        .filter(|(_, state)| !state.in_active && state.winning_positions.is_none())
        .map(|(game_id, _)| game_id.clone())
        .collect();
    HttpResponse::Ok().json(ListGamesResponse { games })
}

/// `DELETE /api/game/{gameId}` — soft-delete: the entry is marked inactive
/// so the lobby stops listing it, but direct fetches still resolve.
pub async fn delete_game(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let game_id = path.into_inner();
    let mut games = app_state.games.lock().unwrap();
    let state = games.get_mut(&game_id).ok_or(ApiError::GameNotFound)?;
    state.in_active = true;

    info!("Marked game {} inactive", game_id);
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Game deleted".to_string(),
    }))
}

/// HTTP handler for the index page
pub async fn index() -> actix_web::Result<fs::NamedFile> {
    Ok(fs::NamedFile::open_async("./static/index.html").await?)
}

/// Configure the HTTP routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(web::resource("/newgame").route(web::post().to(new_game)))
            .service(
                web::resource("/game/{game_id}")
                    .route(web::get().to(get_game))
                    .route(web::delete().to(delete_game)),
            )
            .service(web::resource("/move/{game_id}").route(web::post().to(make_move)))
            .service(web::resource("/listgames").route(web::get().to(list_games)))
            .service(
                web::resource("/ws/game/{game_id}")
                    .route(web::get().to(crate::websocket::ws_index)),
            ),
    )
    .service(web::resource("/").route(web::get().to(index)))
    .service(fs::Files::new("/static", "./static"));
}
