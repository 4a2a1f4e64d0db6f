// src/handlers/game.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::game::{
        CreateGameRequest, CreateGameResponse, GameSummary, GameUpdate, UpdateGameRequest,
    },
    services::game_service::GameService,
};

/// Creates a new game owned by `userId`, waiting for a second player.
#[utoipa::path(
    post,
    path = "/game",
    tag = "games",
    request_body = CreateGameRequest,
    responses(
        (status = 201, description = "Game created", body = CreateGameResponse),
        (status = 400, description = "userId is missing"),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    security(("bearer" = []))
)]
pub async fn create_game(
    State(games): State<GameService>,
    Json(payload): Json<CreateGameRequest>,
) -> Result<impl IntoResponse, AppError> {
    let game = games.create_game(payload.user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateGameResponse { game_id: game.id }),
    ))
}

/// Applies a lifecycle action (`join`, `start`, `startQuiz`, `finish`) to a game.
///
/// `startQuiz` answers with `{ game, quizData }`, every other action with the game.
#[utoipa::path(
    patch,
    path = "/game/{action}/{gameId}",
    tag = "games",
    params(
        ("action" = String, Path, description = "join | start | startQuiz | finish"),
        ("gameId" = i64, Path, description = "Game identifier"),
    ),
    request_body = UpdateGameRequest,
    responses(
        (status = 200, description = "Updated game", body = GameUpdate),
        (status = 400, description = "Missing parameter, missing score or unknown action"),
        (status = 404, description = "Game not found"),
        (status = 409, description = "Game full, not pending or already finished"),
        (status = 422, description = "No quiz data available"),
    ),
    security(("bearer" = []))
)]
pub async fn update_game(
    State(games): State<GameService>,
    Path((action, game_id)): Path<(String, String)>,
    Json(payload): Json<UpdateGameRequest>,
) -> Result<impl IntoResponse, AppError> {
    let action = Some(action.as_str()).filter(|a| !a.is_empty());
    let game_id = game_id.parse::<i64>().ok();

    let update = games.update_game(action, game_id, payload).await?;

    Ok(Json(update))
}

/// Lists every game with the names of its players and winner.
#[utoipa::path(
    get,
    path = "/games",
    tag = "games",
    responses(
        (status = 200, description = "Game history", body = Vec<GameSummary>),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    security(("bearer" = []))
)]
pub async fn list_games(State(games): State<GameService>) -> Result<impl IntoResponse, AppError> {
    let list = games.list_games().await?;
    Ok(Json(list))
}
