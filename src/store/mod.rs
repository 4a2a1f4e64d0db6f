// src/store/mod.rs

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    game::{GameRecord, GameSummary},
    quiz::{QuizQuestion, QuizTopic},
    user::User,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors surfaced by a [`GameStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A unique constraint rejected the write.
    #[error("{0}")]
    Duplicate(String),
    /// A stored row could not be mapped back to a model.
    #[error("corrupt row: {0}")]
    Corrupt(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence contract consumed by the game services and the session coordinator.
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Insert a `pending` game created by `creator`.
    async fn create_game(&self, creator: i64) -> StoreResult<GameRecord>;
    async fn find_game(&self, id: i64) -> StoreResult<Option<GameRecord>>;
    /// Persist every mutable column of `game`. Returns the stored record.
    async fn save_game(&self, game: &GameRecord) -> StoreResult<GameRecord>;
    /// All games, newest first, with player and winner names attached.
    async fn list_games(&self) -> StoreResult<Vec<GameSummary>>;

    async fn list_topics(&self) -> StoreResult<Vec<QuizTopic>>;
    async fn list_questions(&self, topic_id: i64) -> StoreResult<Vec<QuizQuestion>>;

    /// Insert a user; fails with [`StoreError::Duplicate`] when the name is taken.
    async fn create_user(&self, username: &str, password_hash: &str) -> StoreResult<User>;
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
}
