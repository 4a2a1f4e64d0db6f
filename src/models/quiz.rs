// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Represents the 'quiz_topics' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizTopic {
    pub id: i64,

    /// Unique topic name (e.g. "Geography").
    pub name: String,

    pub description: Option<String>,
}

/// Represents the 'quiz_questions' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: i64,
    pub topic_id: i64,
    pub question: String,
    pub answer_a: String,
    pub answer_b: String,
    pub answer_c: String,
    pub answer_d: String,

    /// Label of the correct option: "A", "B", "C" or "D".
    pub correct_answer: String,
}

impl QuizQuestion {
    /// Exact, case-sensitive comparison against the correct option label.
    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct_answer
    }
}

/// DTO for sending a question to players (excludes the correct answer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: i64,
    pub topic_id: i64,
    pub question: String,
    pub answer_a: String,
    pub answer_b: String,
    pub answer_c: String,
    pub answer_d: String,
}

impl From<&QuizQuestion> for PublicQuestion {
    fn from(q: &QuizQuestion) -> Self {
        PublicQuestion {
            id: q.id,
            topic_id: q.topic_id,
            question: q.question.clone(),
            answer_a: q.answer_a.clone(),
            answer_b: q.answer_b.clone(),
            answer_c: q.answer_c.clone(),
            answer_d: q.answer_d.clone(),
        }
    }
}

/// A topic with the questions drawn for one quiz round.
#[derive(Debug, Clone)]
pub struct SelectedQuiz {
    pub topic: QuizTopic,
    pub questions: Vec<QuizQuestion>,
}

/// Quiz payload handed to clients; questions carry no correct answer.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PublicQuiz {
    pub topic: QuizTopic,
    pub questions: Vec<PublicQuestion>,
}

impl From<&SelectedQuiz> for PublicQuiz {
    fn from(quiz: &SelectedQuiz) -> Self {
        PublicQuiz {
            topic: quiz.topic.clone(),
            questions: quiz.questions.iter().map(PublicQuestion::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_quiz_hides_correct_answer() {
        let quiz = SelectedQuiz {
            topic: QuizTopic {
                id: 1,
                name: "Geography".to_string(),
                description: None,
            },
            questions: vec![QuizQuestion {
                id: 4,
                topic_id: 1,
                question: "Capital of Peru?".to_string(),
                answer_a: "Quito".to_string(),
                answer_b: "Lima".to_string(),
                answer_c: "Bogota".to_string(),
                answer_d: "La Paz".to_string(),
                correct_answer: "B".to_string(),
            }],
        };

        let public = PublicQuiz::from(&quiz);
        let json = serde_json::to_value(&public).unwrap();

        assert_eq!(json["topic"]["name"], "Geography");
        assert_eq!(json["questions"][0]["answerB"], "Lima");
        assert!(json["questions"][0].get("correctAnswer").is_none());
    }
}
