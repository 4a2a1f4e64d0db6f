// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    services::{game_service::GameService, quiz_selector::QuizSelector},
    session::SessionCoordinator,
    store::GameStore,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GameStore>,
    pub games: GameService,
    pub sessions: Arc<SessionCoordinator>,
    pub config: Config,
}

impl AppState {
    /// Wires the services and the session coordinator around a single store.
    pub fn new(store: Arc<dyn GameStore>, config: Config) -> Self {
        let games = GameService::new(store.clone(), QuizSelector::new(store.clone()));
        let sessions = Arc::new(SessionCoordinator::new(games.clone()));
        Self {
            store,
            games,
            sessions,
            config,
        }
    }
}

impl FromRef<AppState> for Arc<dyn GameStore> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for GameService {
    fn from_ref(state: &AppState) -> Self {
        state.games.clone()
    }
}

impl FromRef<AppState> for Arc<SessionCoordinator> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
