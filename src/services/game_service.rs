// src/services/game_service.rs

use std::{str::FromStr, sync::Arc};

use crate::{
    error::GameError,
    models::{
        game::{GameRecord, GameState, GameSummary, GameUpdate, UpdateGameRequest},
        quiz::PublicQuiz,
    },
    services::quiz_selector::QuizSelector,
    store::GameStore,
};

/// Actions accepted by `PATCH /game/{action}/{gameId}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    Join,
    Start,
    StartQuiz,
    Finish,
}

impl FromStr for GameAction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "join" => Ok(GameAction::Join),
            "start" => Ok(GameAction::Start),
            "startQuiz" => Ok(GameAction::StartQuiz),
            "finish" => Ok(GameAction::Finish),
            other => Err(GameError::UnknownAction(other.to_string())),
        }
    }
}

/// Game record lifecycle: creation, state transitions and result persistence.
#[derive(Clone)]
pub struct GameService {
    store: Arc<dyn GameStore>,
    selector: QuizSelector,
}

impl GameService {
    pub fn new(store: Arc<dyn GameStore>, selector: QuizSelector) -> Self {
        Self { store, selector }
    }

    pub fn selector(&self) -> &QuizSelector {
        &self.selector
    }

    /// Creates a `pending` game owned by `user_id`.
    pub async fn create_game(&self, user_id: Option<i64>) -> Result<GameRecord, GameError> {
        let user_id = user_id.ok_or(GameError::MissingParameter("userId"))?;
        let game = self.store.create_game(user_id).await?;
        tracing::info!(game_id = game.id, user_id, "game created");
        Ok(game)
    }

    /// Applies `action` to the game `game_id`.
    ///
    /// Validation order: missing parameters, unknown game, finished game, then
    /// the action itself. Nothing is saved when any step fails.
    pub async fn update_game(
        &self,
        action: Option<&str>,
        game_id: Option<i64>,
        req: UpdateGameRequest,
    ) -> Result<GameUpdate, GameError> {
        let action = action.ok_or(GameError::MissingParameter("action"))?;
        let game_id = game_id.ok_or(GameError::MissingParameter("gameId"))?;
        let user_id = req.user_id.ok_or(GameError::MissingParameter("userId"))?;

        let mut game = self
            .store
            .find_game(game_id)
            .await?
            .ok_or(GameError::GameNotFound(game_id))?;

        if game.state == GameState::Finished {
            return Err(GameError::GameAlreadyFinished);
        }

        let mut quiz = None;
        match action.parse::<GameAction>()? {
            GameAction::Join => {
                if game.player2.is_some() {
                    return Err(GameError::GameAlreadyFull);
                }
                if game.state != GameState::Pending {
                    return Err(GameError::GameNotPending);
                }
                game.player2 = Some(user_id);
            }
            GameAction::Start => {
                game.state = GameState::Playing;
            }
            GameAction::StartQuiz => {
                // Draw first so a failed selection leaves the record untouched.
                quiz = Some(self.selector.select_quiz(game_id).await?);
                game.state = GameState::Playing;
            }
            GameAction::Finish => {
                let score = req.score.ok_or(GameError::MissingScore)?;
                game.state = GameState::Finished;
                game.winner = req.winner;
                game.winner_score = Some(score);
            }
        }

        let game = self.store.save_game(&game).await?;
        tracing::info!(game_id, user_id, action, state = %game.state, "game updated");

        Ok(match quiz {
            Some(selected) => GameUpdate::WithQuiz {
                game,
                quiz_data: PublicQuiz::from(&selected),
            },
            None => GameUpdate::Game(game),
        })
    }

    /// Records the outcome of a live quiz through the `finish` transition.
    pub async fn record_outcome(
        &self,
        game_id: i64,
        winner: i64,
        score: i64,
    ) -> Result<GameRecord, GameError> {
        let update = self
            .update_game(
                Some("finish"),
                Some(game_id),
                UpdateGameRequest {
                    user_id: Some(winner),
                    score: Some(score),
                    winner: Some(winner),
                },
            )
            .await?;

        Ok(update.game().clone())
    }

    pub async fn list_games(&self) -> Result<Vec<GameSummary>, GameError> {
        Ok(self.store.list_games().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    async fn service_with_quiz(questions: usize) -> (GameService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        if questions > 0 {
            let topic = store.add_topic("Geography", Some("Maps and capitals")).await;
            for i in 0..questions {
                store.add_question(topic.id, &format!("Q{}", i), "B").await;
            }
        }
        let selector = QuizSelector::new(store.clone());
        (GameService::new(store.clone(), selector), store)
    }

    fn req(user_id: i64) -> UpdateGameRequest {
        UpdateGameRequest {
            user_id: Some(user_id),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!("join".parse::<GameAction>().unwrap(), GameAction::Join);
        assert_eq!("startQuiz".parse::<GameAction>().unwrap(), GameAction::StartQuiz);
        assert!(matches!(
            "startquiz".parse::<GameAction>(),
            Err(GameError::UnknownAction(_))
        ));
    }

    #[tokio::test]
    async fn test_create_requires_user() {
        let (service, _) = service_with_quiz(0).await;
        let err = service.create_game(None).await.unwrap_err();
        assert!(matches!(err, GameError::MissingParameter("userId")));

        let game = service.create_game(Some(1)).await.unwrap();
        assert_eq!(game.creator, 1);
        assert_eq!(game.state, GameState::Pending);
    }

    #[tokio::test]
    async fn test_missing_parameters_checked_first() {
        let (service, _) = service_with_quiz(0).await;

        let err = service
            .update_game(None, Some(1), req(1))
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::MissingParameter("action")));

        let err = service
            .update_game(Some("join"), None, req(1))
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::MissingParameter("gameId")));

        // Unknown game id, but the missing user is reported before any lookup.
        let err = service
            .update_game(Some("join"), Some(99), UpdateGameRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::MissingParameter("userId")));
    }

    #[tokio::test]
    async fn test_unknown_game() {
        let (service, _) = service_with_quiz(0).await;
        let err = service
            .update_game(Some("join"), Some(42), req(2))
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::GameNotFound(42)));
    }

    #[tokio::test]
    async fn test_join_then_full() {
        let (service, _) = service_with_quiz(0).await;
        let game = service.create_game(Some(1)).await.unwrap();

        let joined = service
            .update_game(Some("join"), Some(game.id), req(2))
            .await
            .unwrap();
        assert_eq!(joined.game().player2, Some(2));
        assert_eq!(joined.game().state, GameState::Pending);

        let err = service
            .update_game(Some("join"), Some(game.id), req(3))
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::GameAlreadyFull));
    }

    #[tokio::test]
    async fn test_join_rejected_once_playing() {
        let (service, _) = service_with_quiz(0).await;
        let game = service.create_game(Some(1)).await.unwrap();
        service
            .update_game(Some("start"), Some(game.id), req(1))
            .await
            .unwrap();

        let err = service
            .update_game(Some("join"), Some(game.id), req(2))
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::GameNotPending));
    }

    #[tokio::test]
    async fn test_unknown_action() {
        let (service, _) = service_with_quiz(0).await;
        let game = service.create_game(Some(1)).await.unwrap();
        let err = service
            .update_game(Some("surrender"), Some(game.id), req(1))
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::UnknownAction(a) if a == "surrender"));
    }

    #[tokio::test]
    async fn test_start_quiz_returns_quiz_and_plays() {
        let (service, _) = service_with_quiz(12).await;
        let game = service.create_game(Some(1)).await.unwrap();

        let update = service
            .update_game(Some("startQuiz"), Some(game.id), req(1))
            .await
            .unwrap();
        match update {
            GameUpdate::WithQuiz { game, quiz_data } => {
                assert_eq!(game.state, GameState::Playing);
                assert_eq!(quiz_data.topic.name, "Geography");
                assert_eq!(quiz_data.questions.len(), 10);
                let first = serde_json::to_value(&quiz_data.questions[0]).unwrap();
                assert!(first.get("correctAnswer").is_none());
            }
            other => panic!("expected quiz payload, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_start_quiz_failure_keeps_state() {
        let (service, store) = service_with_quiz(0).await;
        let game = service.create_game(Some(1)).await.unwrap();

        let err = service
            .update_game(Some("startQuiz"), Some(game.id), req(1))
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::NoTopicsAvailable));

        let stored = store.find_game(game.id).await.unwrap().unwrap();
        assert_eq!(stored.state, GameState::Pending);
    }

    #[tokio::test]
    async fn test_finish_without_score_is_rejected() {
        let (service, store) = service_with_quiz(0).await;
        let game = service.create_game(Some(1)).await.unwrap();
        service
            .update_game(Some("start"), Some(game.id), req(1))
            .await
            .unwrap();

        let err = service
            .update_game(
                Some("finish"),
                Some(game.id),
                UpdateGameRequest {
                    user_id: Some(1),
                    score: None,
                    winner: Some(1),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::MissingScore));

        let stored = store.find_game(game.id).await.unwrap().unwrap();
        assert_eq!(stored.state, GameState::Playing);
        assert_eq!(stored.winner, None);
    }

    #[tokio::test]
    async fn test_finished_game_rejects_every_action() {
        let (service, store) = service_with_quiz(12).await;
        let game = service.create_game(Some(1)).await.unwrap();
        service.record_outcome(game.id, 1, 7).await.unwrap();
        let before = store.find_game(game.id).await.unwrap().unwrap();
        assert_eq!(before.state, GameState::Finished);

        for action in ["join", "start", "startQuiz", "finish", "bogus"] {
            // `finish` without a score would be MissingScore on a live game.
            let err = service
                .update_game(Some(action), Some(game.id), req(2))
                .await
                .unwrap_err();
            assert!(
                matches!(err, GameError::GameAlreadyFinished),
                "{} returned {:?}",
                action,
                err
            );
        }

        let after = store.find_game(game.id).await.unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_record_outcome_sets_winner() {
        let (service, _) = service_with_quiz(0).await;
        let game = service.create_game(Some(1)).await.unwrap();

        let finished = service.record_outcome(game.id, 2, 9).await.unwrap();
        assert_eq!(finished.state, GameState::Finished);
        assert_eq!(finished.winner, Some(2));
        assert_eq!(finished.winner_score, Some(9));
    }

    #[tokio::test]
    async fn test_save_failure_is_persistence_error() {
        let (service, store) = service_with_quiz(0).await;
        let game = service.create_game(Some(1)).await.unwrap();
        store.set_fail_saves(true);

        let err = service
            .update_game(Some("start"), Some(game.id), req(1))
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::Persistence(_)));
    }
}
