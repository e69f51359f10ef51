use super::*;
use crate::state::test_helpers::{dummy_stroke, subscribe_canvas, subscribe_note};
use tokio::time::{Duration, timeout};

fn stroke_message() -> CanvasServerMessage {
    CanvasServerMessage::stroke(dummy_stroke())
}

async fn recv_canvas(rx: &mut mpsc::Receiver<CanvasServerMessage>) -> CanvasServerMessage {
    timeout(Duration::from_millis(500), rx.recv())
        .await
        .expect("broadcast receive timed out")
        .expect("broadcast channel closed unexpectedly")
}

async fn assert_no_canvas_message(rx: &mut mpsc::Receiver<CanvasServerMessage>) {
    assert!(
        timeout(Duration::from_millis(80), rx.recv()).await.is_err(),
        "expected no broadcast message"
    );
}

#[tokio::test]
async fn ensure_room_creates_once() {
    let state = AppState::new();
    ensure_room(&state, "r1").await;
    ensure_room(&state, "r1").await;

    let rooms = state.rooms.read().await;
    assert_eq!(rooms.len(), 1);
    assert!(rooms.contains_key("r1"));
}

#[tokio::test]
async fn concurrent_creation_converges_on_one_room() {
    let state = AppState::new();
    let mut handles = Vec::new();
    for _ in 0..8 {
        let state = state.clone();
        handles.push(tokio::spawn(async move { ensure_room(&state, "same").await }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
    assert_eq!(state.rooms.read().await.len(), 1);
}

#[tokio::test]
async fn join_and_part_track_subscribers() {
    let state = AppState::new();
    let client_id = Uuid::new_v4();
    let _rx = subscribe_canvas(&state, "r", client_id, 8).await;

    assert_eq!(state.rooms.read().await["r"].canvas_clients.len(), 1);

    part_canvas(&state, "r", client_id).await;
    assert!(state.rooms.read().await["r"].canvas_clients.is_empty());

    // Parting an unknown room or client is a no-op.
    part_canvas(&state, "nowhere", client_id).await;
    part_note(&state, "r", client_id).await;
}

#[tokio::test]
async fn join_note_returns_current_content() {
    let state = AppState::new();
    crate::services::note::update(&state, "r", "hello".into()).await;

    let (tx, _rx) = mpsc::channel(8);
    let content = join_note(&state, "r", Uuid::new_v4(), tx).await;
    assert_eq!(content, "hello");
}

#[tokio::test]
async fn broadcast_excludes_origin() {
    let state = AppState::new();
    let origin = Uuid::new_v4();
    let peer = Uuid::new_v4();
    let mut origin_rx = subscribe_canvas(&state, "r", origin, 8).await;
    let mut peer_rx = subscribe_canvas(&state, "r", peer, 8).await;

    broadcast_canvas(&state, "r", &stroke_message(), Some(origin)).await;

    let received = recv_canvas(&mut peer_rx).await;
    assert_eq!(received, stroke_message());
    assert_no_canvas_message(&mut origin_rx).await;
}

#[tokio::test]
async fn broadcast_never_crosses_rooms() {
    let state = AppState::new();
    let mut r1_rx = subscribe_canvas(&state, "r1", Uuid::new_v4(), 8).await;
    let mut r2_rx = subscribe_canvas(&state, "r2", Uuid::new_v4(), 8).await;

    broadcast_canvas(&state, "r1", &stroke_message(), None).await;

    recv_canvas(&mut r1_rx).await;
    assert_no_canvas_message(&mut r2_rx).await;
}

#[tokio::test]
async fn broadcast_never_crosses_surfaces() {
    let state = AppState::new();
    let mut canvas_rx = subscribe_canvas(&state, "r", Uuid::new_v4(), 8).await;
    let mut note_rx = subscribe_note(&state, "r", Uuid::new_v4(), 8).await;

    broadcast_note(&state, "r", &NoteServerMessage::Update { content: "x".into() }, None).await;

    assert!(
        timeout(Duration::from_millis(200), note_rx.recv()).await.is_ok(),
        "note subscriber should receive the update"
    );
    assert_no_canvas_message(&mut canvas_rx).await;
}

#[tokio::test]
async fn full_queue_drops_without_stalling_others() {
    let state = AppState::new();
    let slow = Uuid::new_v4();
    let fast = Uuid::new_v4();
    // Capacity 1: the slow subscriber overflows on the second message.
    let mut slow_rx = subscribe_canvas(&state, "r", slow, 1).await;
    let mut fast_rx = subscribe_canvas(&state, "r", fast, 8).await;

    broadcast_canvas(&state, "r", &stroke_message(), None).await;
    broadcast_canvas(&state, "r", &stroke_message(), None).await;

    recv_canvas(&mut fast_rx).await;
    recv_canvas(&mut fast_rx).await;
    recv_canvas(&mut slow_rx).await;
    assert_no_canvas_message(&mut slow_rx).await;
}

#[tokio::test]
async fn dropped_subscriber_does_not_break_broadcast() {
    let state = AppState::new();
    let gone = Uuid::new_v4();
    let alive = Uuid::new_v4();
    let gone_rx = subscribe_canvas(&state, "r", gone, 8).await;
    let mut alive_rx = subscribe_canvas(&state, "r", alive, 8).await;
    drop(gone_rx);

    broadcast_canvas(&state, "r", &stroke_message(), None).await;

    recv_canvas(&mut alive_rx).await;
}

#[tokio::test]
async fn broadcast_to_unknown_room_is_a_noop() {
    let state = AppState::new();
    broadcast_canvas(&state, "nowhere", &stroke_message(), None).await;
    broadcast_note(&state, "nowhere", &NoteServerMessage::Init { content: String::new() }, None).await;
    // Broadcast must not lazily create rooms.
    assert!(state.rooms.read().await.is_empty());
}
