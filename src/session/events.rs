// src/session/events.rs

use serde::{Deserialize, Serialize};

use crate::{
    models::quiz::{PublicQuestion, QuizTopic},
    session::room::{Player, QuizView, Scores},
};

/// Messages accepted from players over the real-time channel.
///
/// Frames look like `{"event": "joinGame", "data": {"gameId": 1, "user": {...}}}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    #[serde(rename_all = "camelCase")]
    JoinGame { game_id: i64, user: Player },
    #[serde(rename_all = "camelCase")]
    GetGameState { game_id: i64 },
    #[serde(rename_all = "camelCase")]
    StartQuiz { game_id: i64 },
    #[serde(rename_all = "camelCase")]
    SubmitAnswer {
        game_id: i64,
        answer: String,
        user_id: i64,
    },
}

impl ClientEvent {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Messages pushed to players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    UpdatePlayers {
        players: Vec<Player>,
    },
    GameState {
        players: Vec<Player>,
        quiz: Option<QuizView>,
        scores: Scores,
    },
    QuizStarted {
        topic: QuizTopic,
        question: PublicQuestion,
    },
    QuizError {
        error: String,
    },
    NextQuestion {
        question: PublicQuestion,
    },
    AnswerResult {
        scores: Scores,
    },
    QuizEnded {
        scores: Scores,
    },
}

impl ServerEvent {
    /// Event name as seen on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::UpdatePlayers { .. } => "updatePlayers",
            ServerEvent::GameState { .. } => "gameState",
            ServerEvent::QuizStarted { .. } => "quizStarted",
            ServerEvent::QuizError { .. } => "quizError",
            ServerEvent::NextQuestion { .. } => "nextQuestion",
            ServerEvent::AnswerResult { .. } => "answerResult",
            ServerEvent::QuizEnded { .. } => "quizEnded",
        }
    }
}
