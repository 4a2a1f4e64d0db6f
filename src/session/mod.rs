// src/session/mod.rs

//! Live quiz sessions: per-game rooms, the quiz state machine, and event fan-out.

pub mod events;
pub mod hub;
pub mod room;

use std::{sync::Arc, time::Duration};

use dashmap::DashMap;
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, error, info, warn};

use crate::services::game_service::GameService;

use self::{
    events::{ClientEvent, ServerEvent},
    hub::{ConnectionId, RoomHub},
    room::{AnswerStep, Player, RoomPhase, RoomSnapshot, RoomState, Standing},
};

/// What happened to a submitted answer.
#[derive(Debug)]
pub enum AnswerOutcome {
    /// No room or no quiz in progress.
    Ignored,
    /// The next question was broadcast.
    Advanced,
    /// The last question was answered. `persist` resolves once the result write finished.
    Ended {
        winner: Option<Standing>,
        persist: Option<JoinHandle<()>>,
    },
}

/// Owns every live room and drives the quiz for each of them.
///
/// Each room sits behind its own mutex, so work on one game never waits on another.
pub struct SessionCoordinator {
    rooms: DashMap<i64, Arc<Mutex<RoomState>>>,
    hub: RoomHub,
    games: GameService,
}

impl SessionCoordinator {
    pub fn new(games: GameService) -> Self {
        Self {
            rooms: DashMap::new(),
            hub: RoomHub::new(),
            games,
        }
    }

    pub fn hub(&self) -> &RoomHub {
        &self.hub
    }

    /// Get-or-create the room of `game_id`.
    fn room(&self, game_id: i64) -> Arc<Mutex<RoomState>> {
        self.rooms.entry(game_id).or_default().value().clone()
    }

    fn existing_room(&self, game_id: i64) -> Option<Arc<Mutex<RoomState>>> {
        self.rooms.get(&game_id).map(|r| r.value().clone())
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Dispatches one inbound real-time event.
    pub async fn handle_event(&self, connection: ConnectionId, event: ClientEvent) {
        match event {
            ClientEvent::JoinGame { game_id, user } => self.join(connection, game_id, user).await,
            ClientEvent::GetGameState { game_id } => self.query_state(connection, game_id).await,
            ClientEvent::StartQuiz { game_id } => self.start_quiz(connection, game_id).await,
            ClientEvent::SubmitAnswer {
                game_id,
                answer,
                user_id,
            } => {
                self.submit_answer(game_id, user_id, &answer).await;
            }
        }
    }

    /// Adds `player` to the room (once per id), subscribes the connection, and
    /// broadcasts the player list.
    pub async fn join(&self, connection: ConnectionId, game_id: i64, player: Player) {
        let handle = self.room(game_id);
        let mut room = handle.lock().await;

        let user_id = player.id;
        if room.add_player(player) {
            info!(game_id, user_id, "player joined room");
        }
        self.hub.subscribe(connection, game_id);

        self.hub.broadcast(
            game_id,
            ServerEvent::UpdatePlayers {
                players: room.players().to_vec(),
            },
        );
    }

    /// Current state of a room; unknown games read as an empty room without creating one.
    pub async fn snapshot(&self, game_id: i64) -> RoomSnapshot {
        let Some(handle) = self.existing_room(game_id) else {
            return RoomSnapshot::default();
        };
        let room = handle.lock().await;
        room.snapshot()
    }

    /// Sends the room state to the requesting connection only.
    pub async fn query_state(&self, connection: ConnectionId, game_id: i64) {
        let RoomSnapshot {
            players,
            quiz,
            scores,
        } = self.snapshot(game_id).await;
        self.hub.send_to(
            connection,
            ServerEvent::GameState {
                players,
                quiz,
                scores,
            },
        );
    }

    /// Draws a quiz and starts it in the room. Failures go back to the requester only.
    ///
    /// A room that is already running a quiz refuses to start another one.
    pub async fn start_quiz(&self, connection: ConnectionId, game_id: i64) {
        if self.quiz_running(game_id).await {
            self.refuse_restart(connection, game_id);
            return;
        }

        let selected = match self.games.selector().select_quiz(game_id).await {
            Ok(selected) => selected,
            Err(err) => {
                warn!(game_id, error = %err, "failed to start quiz");
                self.hub.send_to(
                    connection,
                    ServerEvent::QuizError {
                        error: err.to_string(),
                    },
                );
                return;
            }
        };

        let handle = self.room(game_id);
        let mut room = handle.lock().await;
        // Another start may have won the race while the quiz was being drawn.
        if room.phase() == RoomPhase::QuizInProgress {
            self.refuse_restart(connection, game_id);
            return;
        }
        let topic = selected.topic.clone();
        let count = selected.questions.len();

        match room.begin_quiz(selected) {
            Some(question) => {
                info!(game_id, topic = %topic.name, count, "quiz started");
                self.hub
                    .broadcast(game_id, ServerEvent::QuizStarted { topic, question });
            }
            None => {
                self.hub.send_to(
                    connection,
                    ServerEvent::QuizError {
                        error: format!("topic '{}' has no questions", topic.name),
                    },
                );
            }
        }
    }

    async fn quiz_running(&self, game_id: i64) -> bool {
        let Some(handle) = self.existing_room(game_id) else {
            return false;
        };
        let phase = handle.lock().await.phase();
        phase == RoomPhase::QuizInProgress
    }

    fn refuse_restart(&self, connection: ConnectionId, game_id: i64) {
        debug!(game_id, "start requested while a quiz is running");
        self.hub.send_to(
            connection,
            ServerEvent::QuizError {
                error: "a quiz is already in progress".to_string(),
            },
        );
    }

    /// Scores an answer, then advances to the next question or closes the round.
    ///
    /// Answers for unknown rooms or rooms without a running quiz are dropped silently.
    pub async fn submit_answer(&self, game_id: i64, user_id: i64, answer: &str) -> AnswerOutcome {
        let Some(handle) = self.existing_room(game_id) else {
            debug!(game_id, user_id, "answer for unknown room ignored");
            return AnswerOutcome::Ignored;
        };
        let mut room = handle.lock().await;

        let Some(step) = room.record_answer(user_id, answer) else {
            debug!(game_id, user_id, "answer outside of a running quiz ignored");
            return AnswerOutcome::Ignored;
        };

        self.hub.broadcast(
            game_id,
            ServerEvent::AnswerResult {
                scores: room.scores().clone(),
            },
        );

        match step {
            AnswerStep::Next(question) => {
                self.hub
                    .broadcast(game_id, ServerEvent::NextQuestion { question });
                AnswerOutcome::Advanced
            }
            AnswerStep::Finished(winner) => {
                let persist = winner.map(|standing| self.persist_outcome(game_id, standing));
                info!(game_id, winner = ?winner, "quiz ended");
                self.hub.broadcast(
                    game_id,
                    ServerEvent::QuizEnded {
                        scores: room.scores().clone(),
                    },
                );
                AnswerOutcome::Ended { winner, persist }
            }
        }
    }

    /// Writes the round result in the background; failures are only logged.
    fn persist_outcome(&self, game_id: i64, winner: Standing) -> JoinHandle<()> {
        let games = self.games.clone();
        tokio::spawn(async move {
            match games
                .record_outcome(game_id, winner.user_id, i64::from(winner.score))
                .await
            {
                Ok(_) => info!(game_id, winner = winner.user_id, "game result saved"),
                Err(err) => error!(game_id, error = %err, "failed to save game result"),
            }
        })
    }

    /// Drops the connection from every room. Players stay listed so a client can rejoin.
    pub fn disconnect(&self, connection: ConnectionId) {
        self.hub.disconnect(connection);
        debug!(%connection, "connection left");
    }

    /// Removes the room of `game_id`. Returns whether it existed.
    pub fn evict(&self, game_id: i64) -> bool {
        self.hub.close_room(game_id);
        self.rooms.remove(&game_id).is_some()
    }

    /// Removes rooms without activity for at least `max_idle`.
    ///
    /// Busy rooms and rooms with a quiz still waiting for answers are kept.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut evicted = Vec::new();
        self.rooms.retain(|game_id, room| match room.try_lock() {
            Ok(state)
                if state.phase() != RoomPhase::QuizInProgress
                    && state.idle_for() >= max_idle =>
            {
                evicted.push(*game_id);
                false
            }
            _ => true,
        });
        for game_id in &evicted {
            self.hub.close_room(*game_id);
        }
        if !evicted.is_empty() {
            info!(count = evicted.len(), "evicted idle rooms");
        }
        evicted.len()
    }
}

/// Periodically evicts rooms idle for longer than `max_idle`.
pub fn spawn_idle_sweeper(
    coordinator: Arc<SessionCoordinator>,
    max_idle: Duration,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            coordinator.evict_idle(max_idle);
        }
    })
}
