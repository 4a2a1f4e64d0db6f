// src/session/room.rs

use std::time::{Duration, Instant};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::quiz::{PublicQuestion, QuizQuestion, QuizTopic, SelectedQuiz};

/// A player present in a game room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub username: String,
}

/// Scores keyed by user id, in the order players first answered.
pub type Scores = IndexMap<i64, u32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoomPhase {
    Lobby,
    QuizInProgress,
    QuizEnded,
}

/// Quiz currently being played in a room.
#[derive(Debug, Clone)]
pub struct ActiveQuiz {
    pub topic: QuizTopic,
    pub questions: Vec<QuizQuestion>,
    pub current_question_index: usize,
}

impl ActiveQuiz {
    pub fn current_question(&self) -> &QuizQuestion {
        &self.questions[self.current_question_index]
    }
}

/// Player-facing view of an [`ActiveQuiz`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizView {
    pub topic: QuizTopic,
    pub question: PublicQuestion,
    pub current_question_index: usize,
    pub total_questions: usize,
}

impl From<&ActiveQuiz> for QuizView {
    fn from(quiz: &ActiveQuiz) -> Self {
        QuizView {
            topic: quiz.topic.clone(),
            question: PublicQuestion::from(quiz.current_question()),
            current_question_index: quiz.current_question_index,
            total_questions: quiz.questions.len(),
        }
    }
}

/// Serializable copy of a room, sent with `gameState`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub players: Vec<Player>,
    pub quiz: Option<QuizView>,
    pub scores: Scores,
}

/// Winner of a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Standing {
    pub user_id: i64,
    pub score: u32,
}

/// What a recorded answer led to.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerStep {
    /// The quiz moved on to this question.
    Next(PublicQuestion),
    /// That was the last question.
    Finished(Option<Standing>),
}

/// Transient state of one game room.
#[derive(Debug)]
pub struct RoomState {
    players: Vec<Player>,
    quiz: Option<ActiveQuiz>,
    scores: Scores,
    phase: RoomPhase,
    last_activity: Instant,
}

impl Default for RoomState {
    fn default() -> Self {
        Self {
            players: Vec::new(),
            quiz: None,
            scores: Scores::new(),
            phase: RoomPhase::Lobby,
            last_activity: Instant::now(),
        }
    }
}

impl RoomState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn scores(&self) -> &Scores {
        &self.scores
    }

    pub fn phase(&self) -> RoomPhase {
        self.phase
    }

    pub fn quiz(&self) -> Option<&ActiveQuiz> {
        self.quiz.as_ref()
    }

    pub fn idle_for(&self) -> Duration {
        self.last_activity.elapsed()
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Adds `player` unless a player with the same id is already present.
    pub fn add_player(&mut self, player: Player) -> bool {
        self.touch();
        if self.players.iter().any(|p| p.id == player.id) {
            return false;
        }
        self.players.push(player);
        true
    }

    /// Installs a freshly drawn quiz at its first question and clears the scores.
    ///
    /// Returns `None` (and leaves the room untouched) if the quiz has no question.
    pub fn begin_quiz(&mut self, selected: SelectedQuiz) -> Option<PublicQuestion> {
        let first = PublicQuestion::from(selected.questions.first()?);
        self.touch();
        self.quiz = Some(ActiveQuiz {
            topic: selected.topic,
            questions: selected.questions,
            current_question_index: 0,
        });
        self.scores.clear();
        self.phase = RoomPhase::QuizInProgress;
        Some(first)
    }

    /// Scores `answer` against the current question and advances the quiz.
    ///
    /// Returns `None` when no quiz is in progress; the answer is then dropped.
    pub fn record_answer(&mut self, user_id: i64, answer: &str) -> Option<AnswerStep> {
        if self.phase != RoomPhase::QuizInProgress {
            return None;
        }
        let quiz = self.quiz.as_mut()?;
        self.last_activity = Instant::now();

        let correct = quiz.current_question().is_correct(answer);
        let score = self.scores.entry(user_id).or_insert(0);
        if correct {
            *score += 1;
        }

        if quiz.current_question_index + 1 < quiz.questions.len() {
            quiz.current_question_index += 1;
            return Some(AnswerStep::Next(PublicQuestion::from(quiz.current_question())));
        }

        self.quiz = None;
        self.phase = RoomPhase::QuizEnded;
        Some(AnswerStep::Finished(self.leader()))
    }

    /// First player, in scores order, holding the strictly highest score.
    pub fn leader(&self) -> Option<Standing> {
        let mut best: Option<Standing> = None;
        for (&user_id, &score) in &self.scores {
            if best.is_none_or(|b| score > b.score) {
                best = Some(Standing { user_id, score });
            }
        }
        best
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            players: self.players.clone(),
            quiz: self.quiz.as_ref().map(QuizView::from),
            scores: self.scores.clone(),
        }
    }
}
