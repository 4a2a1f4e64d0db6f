// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{
    game::{GameRecord, GameRow, GameSummary, GameSummaryRow},
    quiz::{QuizQuestion, QuizTopic},
    user::User,
};

use super::{GameStore, StoreError, StoreResult};

const GAME_COLUMNS: &str =
    "id, creator, player2, state, winner, winner_score, created_at, updated_at";

/// PostgreSQL-backed [`GameStore`].
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn to_record(row: GameRow) -> StoreResult<GameRecord> {
    GameRecord::try_from(row).map_err(StoreError::Corrupt)
}

#[async_trait]
impl GameStore for PgStore {
    async fn create_game(&self, creator: i64) -> StoreResult<GameRecord> {
        let row = sqlx::query_as::<_, GameRow>(&format!(
            "INSERT INTO games (creator, state) VALUES ($1, 'pending') RETURNING {}",
            GAME_COLUMNS
        ))
        .bind(creator)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create game: {:?}", e);
            StoreError::from(e)
        })?;

        to_record(row)
    }

    async fn find_game(&self, id: i64) -> StoreResult<Option<GameRecord>> {
        let row = sqlx::query_as::<_, GameRow>(&format!(
            "SELECT {} FROM games WHERE id = $1",
            GAME_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(to_record).transpose()
    }

    async fn save_game(&self, game: &GameRecord) -> StoreResult<GameRecord> {
        let row = sqlx::query_as::<_, GameRow>(&format!(
            r#"
            UPDATE games
            SET player2 = $2, state = $3, winner = $4, winner_score = $5,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING {}
            "#,
            GAME_COLUMNS
        ))
        .bind(game.id)
        .bind(game.player2)
        .bind(game.state.as_str())
        .bind(game.winner)
        .bind(game.winner_score)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(game_id = game.id, "Failed to save game: {:?}", e);
            StoreError::from(e)
        })?
        .ok_or_else(|| StoreError::Corrupt(format!("game {} vanished during save", game.id)))?;

        to_record(row)
    }

    async fn list_games(&self) -> StoreResult<Vec<GameSummary>> {
        let rows = sqlx::query_as::<_, GameSummaryRow>(
            r#"
            SELECT
                g.id, g.creator, g.player2, g.state, g.winner, g.winner_score,
                g.created_at, g.updated_at,
                p1.username AS player1_name,
                p2.username AS player2_name,
                w.username AS winner_name
            FROM games g
            LEFT JOIN users p1 ON p1.id = g.creator
            LEFT JOIN users p2 ON p2.id = g.player2
            LEFT JOIN users w ON w.id = g.winner
            ORDER BY g.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| GameSummary::try_from(row).map_err(StoreError::Corrupt))
            .collect()
    }

    async fn list_topics(&self) -> StoreResult<Vec<QuizTopic>> {
        let topics = sqlx::query_as::<_, QuizTopic>(
            "SELECT id, name, description FROM quiz_topics ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(topics)
    }

    async fn list_questions(&self, topic_id: i64) -> StoreResult<Vec<QuizQuestion>> {
        let questions = sqlx::query_as::<_, QuizQuestion>(
            r#"
            SELECT id, topic_id, question, answer_a, answer_b, answer_c, answer_d, correct_answer
            FROM quiz_questions
            WHERE topic_id = $1
            "#,
        )
        .bind(topic_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password)
            VALUES ($1, $2)
            RETURNING id, username, password, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StoreError::Duplicate(format!("Username '{}' already exists", username))
            }
            other => {
                tracing::error!("Failed to register user: {:?}", other);
                StoreError::from(other)
            }
        })
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
