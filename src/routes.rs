// src/routes.rs

use axum::{
    Router,
    http::Method,
    middleware,
    routing::{get, patch, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    docs::ApiDoc,
    handlers::{self, auth, game, ws},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, games, realtime, docs).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (store, services, session coordinator).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Protected game routes
    let game_routes = Router::new()
        .route("/game", post(game::create_game))
        .route("/game/{action}/{gameId}", patch(game::update_game))
        .route("/games", get(game::list_games))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/", get(handlers::index))
        .route("/ws", get(ws::ws_handler))
        .nest("/api/auth", auth_routes)
        .merge(game_routes)
        .merge(SwaggerUi::new("/documentation").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
