// src/docs.rs

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

/// Aggregated OpenAPI document served at `/documentation`.
#[derive(OpenApi)]
#[openapi(
    info(title = "Quiz Duel API", description = "Two-player quiz games over HTTP and WebSocket"),
    paths(
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::game::create_game,
        crate::handlers::game::update_game,
        crate::handlers::game::list_games,
        crate::handlers::ws::ws_handler,
    ),
    components(
        schemas(
            crate::models::user::User,
            crate::models::user::CreateUserRequest,
            crate::models::user::LoginRequest,
            crate::models::user::LoginResponse,
            crate::models::game::GameState,
            crate::models::game::GameRecord,
            crate::models::game::GameSummary,
            crate::models::game::UserRef,
            crate::models::game::CreateGameRequest,
            crate::models::game::CreateGameResponse,
            crate::models::game::UpdateGameRequest,
            crate::models::game::GameUpdate,
            crate::models::quiz::QuizTopic,
            crate::models::quiz::PublicQuestion,
            crate::models::quiz::PublicQuiz,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "games", description = "Game lifecycle"),
        (name = "realtime", description = "Live quiz channel"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
