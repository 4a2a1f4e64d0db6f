// src/models/game.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::quiz::PublicQuiz;

/// Lifecycle of a game record: `pending -> playing -> finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    Pending,
    Playing,
    Finished,
}

impl GameState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameState::Pending => "pending",
            GameState::Playing => "playing",
            GameState::Finished => "finished",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(GameState::Pending),
            "playing" => Ok(GameState::Playing),
            "finished" => Ok(GameState::Finished),
            other => Err(format!("unknown game state '{}'", other)),
        }
    }
}

/// A game as stored in the 'games' table.
/// The creator is player one; `player2` is filled by the `join` action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: i64,
    pub creator: i64,
    pub player2: Option<i64>,
    pub state: GameState,
    pub winner: Option<i64>,
    pub winner_score: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw row of the 'games' table; `state` is kept as text in the database.
#[derive(Debug, FromRow)]
pub struct GameRow {
    pub id: i64,
    pub creator: i64,
    pub player2: Option<i64>,
    pub state: String,
    pub winner: Option<i64>,
    pub winner_score: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<GameRow> for GameRecord {
    type Error = String;

    fn try_from(row: GameRow) -> Result<Self, Self::Error> {
        Ok(GameRecord {
            id: row.id,
            creator: row.creator,
            player2: row.player2,
            state: row.state.parse()?,
            winner: row.winner,
            winner_score: row.winner_score,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Public identity of a user attached to a game listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserRef {
    pub id: i64,
    pub username: String,
}

/// Game record joined with the display names of its players and winner.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    #[serde(flatten)]
    pub game: GameRecord,
    pub player1: Option<UserRef>,
    #[serde(rename = "player2User")]
    pub player2_user: Option<UserRef>,
    pub win_player: Option<UserRef>,
}

/// Flat row returned by the game listing query.
#[derive(Debug, FromRow)]
pub struct GameSummaryRow {
    #[sqlx(flatten)]
    pub game: GameRow,
    pub player1_name: Option<String>,
    pub player2_name: Option<String>,
    pub winner_name: Option<String>,
}

impl TryFrom<GameSummaryRow> for GameSummary {
    type Error = String;

    fn try_from(row: GameSummaryRow) -> Result<Self, Self::Error> {
        let game = GameRecord::try_from(row.game)?;
        let player1 = row.player1_name.map(|username| UserRef {
            id: game.creator,
            username,
        });
        let player2_user = game
            .player2
            .zip(row.player2_name)
            .map(|(id, username)| UserRef { id, username });
        let win_player = game
            .winner
            .zip(row.winner_name)
            .map(|(id, username)| UserRef { id, username });
        Ok(GameSummary {
            game,
            player1,
            player2_user,
            win_player,
        })
    }
}

/// DTO for `POST /game`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub user_id: Option<i64>,
}

/// Response of `POST /game`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameResponse {
    pub game_id: i64,
}

/// DTO for `PATCH /game/{action}/{gameId}`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGameRequest {
    pub user_id: Option<i64>,
    pub score: Option<i64>,
    pub winner: Option<i64>,
}

/// Result of a lifecycle action. `startQuiz` also carries the drawn quiz.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum GameUpdate {
    Game(GameRecord),
    #[serde(rename_all = "camelCase")]
    WithQuiz {
        game: GameRecord,
        quiz_data: PublicQuiz,
    },
}

impl GameUpdate {
    pub fn game(&self) -> &GameRecord {
        match self {
            GameUpdate::Game(game) => game,
            GameUpdate::WithQuiz { game, .. } => game,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_state_parse() {
        assert_eq!("pending".parse::<GameState>(), Ok(GameState::Pending));
        assert_eq!("finished".parse::<GameState>(), Ok(GameState::Finished));
        assert!("Playing".parse::<GameState>().is_err());
    }

    #[test]
    fn test_game_state_serializes_lowercase() {
        let json = serde_json::to_value(GameState::Playing).unwrap();
        assert_eq!(json, serde_json::json!("playing"));
    }
}
