// src/services/quiz_selector.rs

use std::sync::Arc;

use rand::seq::{IndexedRandom, SliceRandom};

use crate::{
    config::QUIZ_QUESTION_COUNT,
    error::GameError,
    models::quiz::SelectedQuiz,
    store::GameStore,
};

/// Draws a random topic and up to [`QUIZ_QUESTION_COUNT`] shuffled questions from it.
#[derive(Clone)]
pub struct QuizSelector {
    store: Arc<dyn GameStore>,
}

impl QuizSelector {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self { store }
    }

    /// Picks a topic uniformly at random, then at most ten of its questions in random order.
    ///
    /// A topic with fewer questions yields all of them; a topic without any
    /// question is rejected since the round could not show a first question.
    pub async fn select_quiz(&self, game_id: i64) -> Result<SelectedQuiz, GameError> {
        let topics = self.store.list_topics().await?;
        let topic = topics
            .choose(&mut rand::rng())
            .cloned()
            .ok_or(GameError::NoTopicsAvailable)?;

        let mut questions = self.store.list_questions(topic.id).await?;
        if questions.is_empty() {
            return Err(GameError::NoQuestionsAvailable(topic.name));
        }
        questions.shuffle(&mut rand::rng());
        questions.truncate(QUIZ_QUESTION_COUNT);

        tracing::debug!(
            game_id,
            topic = %topic.name,
            count = questions.len(),
            "quiz selected"
        );

        Ok(SelectedQuiz { topic, questions })
    }
}
