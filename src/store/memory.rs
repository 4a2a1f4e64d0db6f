// src/store/memory.rs

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::{
    game::{GameRecord, GameState, GameSummary, UserRef},
    quiz::{QuizQuestion, QuizTopic},
    user::User,
};

use super::{GameStore, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    games: Vec<GameRecord>,
    topics: Vec<QuizTopic>,
    questions: Vec<QuizQuestion>,
}

/// In-process [`GameStore`] used by tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `save_game` fail with [`StoreError::Unavailable`].
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub async fn add_topic(&self, name: &str, description: Option<&str>) -> QuizTopic {
        let mut tables = self.tables.write().await;
        let topic = QuizTopic {
            id: tables.topics.len() as i64 + 1,
            name: name.to_string(),
            description: description.map(str::to_string),
        };
        tables.topics.push(topic.clone());
        topic
    }

    /// Add a question whose options are derived from `text`.
    pub async fn add_question(
        &self,
        topic_id: i64,
        text: &str,
        correct_answer: &str,
    ) -> QuizQuestion {
        let mut tables = self.tables.write().await;
        let question = QuizQuestion {
            id: tables.questions.len() as i64 + 1,
            topic_id,
            question: text.to_string(),
            answer_a: format!("{} (A)", text),
            answer_b: format!("{} (B)", text),
            answer_c: format!("{} (C)", text),
            answer_d: format!("{} (D)", text),
            correct_answer: correct_answer.to_string(),
        };
        tables.questions.push(question.clone());
        question
    }
}

fn user_ref(users: &[User], id: Option<i64>) -> Option<UserRef> {
    let id = id?;
    users.iter().find(|u| u.id == id).map(|u| UserRef {
        id: u.id,
        username: u.username.clone(),
    })
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn create_game(&self, creator: i64) -> StoreResult<GameRecord> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let game = GameRecord {
            id: tables.games.len() as i64 + 1,
            creator,
            player2: None,
            state: GameState::Pending,
            winner: None,
            winner_score: None,
            created_at: now,
            updated_at: now,
        };
        tables.games.push(game.clone());
        Ok(game)
    }

    async fn find_game(&self, id: i64) -> StoreResult<Option<GameRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.games.iter().find(|g| g.id == id).cloned())
    }

    async fn save_game(&self, game: &GameRecord) -> StoreResult<GameRecord> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        let mut tables = self.tables.write().await;
        let stored = tables
            .games
            .iter_mut()
            .find(|g| g.id == game.id)
            .ok_or_else(|| StoreError::Corrupt(format!("game {} vanished during save", game.id)))?;
        *stored = GameRecord {
            updated_at: Utc::now(),
            ..game.clone()
        };
        Ok(stored.clone())
    }

    async fn list_games(&self) -> StoreResult<Vec<GameSummary>> {
        let tables = self.tables.read().await;
        Ok(tables
            .games
            .iter()
            .rev()
            .map(|game| GameSummary {
                player1: user_ref(&tables.users, Some(game.creator)),
                player2_user: user_ref(&tables.users, game.player2),
                win_player: user_ref(&tables.users, game.winner),
                game: game.clone(),
            })
            .collect())
    }

    async fn list_topics(&self) -> StoreResult<Vec<QuizTopic>> {
        Ok(self.tables.read().await.topics.clone())
    }

    async fn list_questions(&self, topic_id: i64) -> StoreResult<Vec<QuizQuestion>> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .iter()
            .filter(|q| q.topic_id == topic_id)
            .cloned()
            .collect())
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == username) {
            return Err(StoreError::Duplicate(format!(
                "Username '{}' already exists",
                username
            )));
        }
        let user = User {
            id: tables.users.len() as i64 + 1,
            username: username.to_string(),
            password: password_hash.to_string(),
            created_at: Some(Utc::now()),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }
}
