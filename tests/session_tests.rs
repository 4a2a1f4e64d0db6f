// tests/session_tests.rs

use std::{sync::Arc, time::Duration};

use futures::{SinkExt, StreamExt};
use quiz_duel::{
    config::Config,
    models::game::{GameState, UpdateGameRequest},
    routes,
    session::{
        AnswerOutcome,
        events::ServerEvent,
        room::{Player, Standing},
    },
    state::AppState,
    store::{GameStore, MemoryStore},
};
use serde_json::{Value, json};
use tokio_tungstenite::{connect_async, tungstenite::Message};

fn test_config() -> Config {
    Config {
        database_url: "memory".to_string(),
        jwt_secret: "session_test_secret".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        port: 0,
        room_idle_timeout: 3600,
    }
}

/// Store with a "Geography" topic of ten questions whose answer is always "B".
async fn geography_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    let topic = store.add_topic("Geography", Some("Capitals of the world")).await;
    for i in 0..10 {
        store.add_question(topic.id, &format!("Capital #{}", i), "B").await;
    }
    store
}

#[tokio::test]
async fn full_quiz_round_is_persisted() {
    let store = geography_store().await;
    let state = AppState::new(store.clone(), test_config());

    let u1 = store.create_user("u1", "hash").await.unwrap();
    let u2 = store.create_user("u2", "hash").await.unwrap();

    // Lifecycle side: create and join
    let game = state.games.create_game(Some(u1.id)).await.unwrap();
    state
        .games
        .update_game(
            Some("join"),
            Some(game.id),
            UpdateGameRequest {
                user_id: Some(u2.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Live side
    let sessions = state.sessions.clone();
    let (c1, mut rx1) = sessions.hub().connect();
    let (c2, mut rx2) = sessions.hub().connect();
    sessions
        .join(c1, game.id, Player { id: u1.id, username: "u1".into() })
        .await;
    sessions
        .join(c2, game.id, Player { id: u2.id, username: "u2".into() })
        .await;
    sessions.start_quiz(c1, game.id).await;

    let mut outcome = AnswerOutcome::Ignored;
    for _ in 0..10 {
        outcome = sessions.submit_answer(game.id, u1.id, "B").await;
    }

    let AnswerOutcome::Ended { winner, persist } = outcome else {
        panic!("quiz should be over, got {:?}", outcome);
    };
    assert_eq!(
        winner,
        Some(Standing {
            user_id: u1.id,
            score: 10
        })
    );
    persist.expect("a result write").await.unwrap();

    let stored = store.find_game(game.id).await.unwrap().unwrap();
    assert_eq!(stored.state, GameState::Finished);
    assert_eq!(stored.winner, Some(u1.id));
    assert_eq!(stored.winner_score, Some(10));

    // u2 never answered, so it has no score entry
    let snapshot = sessions.snapshot(game.id).await;
    assert_eq!(snapshot.scores.len(), 1);
    assert_eq!(snapshot.scores.get(&u1.id), Some(&10));
    assert!(snapshot.quiz.is_none());

    // Both players saw the same stream, ending with quizEnded
    let mut seen = Vec::new();
    while let Ok(event) = rx2.try_recv() {
        seen.push(event);
    }
    let mut seen_by_u1 = 0;
    while rx1.try_recv().is_ok() {
        seen_by_u1 += 1;
    }
    // u1 additionally saw its own join broadcast
    assert_eq!(seen.len() + 1, seen_by_u1);
    match seen.last() {
        Some(ServerEvent::QuizEnded { scores }) => assert_eq!(scores.get(&u1.id), Some(&10)),
        other => panic!("expected quizEnded, got {:?}", other),
    }
    match &seen[1] {
        ServerEvent::QuizStarted { topic, question } => {
            assert_eq!(topic.name, "Geography");
            let raw = serde_json::to_value(question).unwrap();
            assert!(raw.get("correctAnswer").is_none());
        }
        other => panic!("expected quizStarted, got {:?}", other),
    }
}

async fn next_json<S>(ws: &mut S) -> Value
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("socket closed")
            .expect("socket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

#[tokio::test]
async fn websocket_join_and_state() {
    let store = geography_store().await;
    let app = routes::create_router(AppState::new(store, test_config()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let url = format!("ws://127.0.0.1:{}/ws", port);
    let (mut ws, _) = connect_async(url.as_str()).await.expect("ws connect");

    ws.send(Message::Text(
        json!({"event": "joinGame", "data": {"gameId": 1, "user": {"id": 7, "username": "eowyn"}}})
            .to_string(),
    ))
    .await
    .unwrap();

    let update = next_json(&mut ws).await;
    assert_eq!(update["event"], "updatePlayers");
    assert_eq!(update["data"]["players"][0]["username"], "eowyn");

    ws.send(Message::Text(
        json!({"event": "startQuiz", "data": {"gameId": 1}}).to_string(),
    ))
    .await
    .unwrap();

    let started = next_json(&mut ws).await;
    assert_eq!(started["event"], "quizStarted");
    assert_eq!(started["data"]["topic"]["name"], "Geography");
    assert!(started["data"]["question"].get("correctAnswer").is_none());

    ws.send(Message::Text(
        json!({"event": "submitAnswer", "data": {"gameId": 1, "answer": "B", "userId": 7}})
            .to_string(),
    ))
    .await
    .unwrap();

    let result = next_json(&mut ws).await;
    assert_eq!(result["event"], "answerResult");
    assert_eq!(result["data"]["scores"]["7"], 1);
    let next = next_json(&mut ws).await;
    assert_eq!(next["event"], "nextQuestion");

    ws.send(Message::Text(
        json!({"event": "getGameState", "data": {"gameId": 1}}).to_string(),
    ))
    .await
    .unwrap();

    let state = next_json(&mut ws).await;
    assert_eq!(state["event"], "gameState");
    assert_eq!(state["data"]["quiz"]["currentQuestionIndex"], 1);
    assert_eq!(state["data"]["players"].as_array().unwrap().len(), 1);
}
