//! Integration tests for the room registry and room actors.

use std::sync::Arc;
use std::time::Duration;

use parlor_game::GameConfig;
use parlor_protocol::{CharacterId, ClientEvent, ConnectionId, RoomId, ServerEvent};
use parlor_room::{EventSender, RegistryError, RoomRegistry};
use tokio::sync::mpsc;

// =========================================================================
// Helpers
// =========================================================================

fn cid(id: u64) -> ConnectionId {
    ConnectionId(id)
}

fn rid(id: &str) -> RoomId {
    RoomId(id.to_owned())
}

fn ch(id: u32) -> CharacterId {
    CharacterId(id)
}

/// An outbound channel whose receiver is dropped immediately.
fn dummy_sender() -> EventSender {
    mpsc::unbounded_channel().0
}

/// An outbound channel whose receiver is kept so tests can inspect
/// what the room sent to this connection.
fn capture() -> (EventSender, mpsc::UnboundedReceiver<ServerEvent>) {
    mpsc::unbounded_channel()
}

/// Collects everything currently buffered for a connection.
fn drain(rx: &mut mpsc::UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Waits until the room actor has processed every command queued so
/// far. Info goes through the same channel as actions, so the awaited
/// reply implies everything before it was handled.
async fn sync(registry: &RoomRegistry, room: &RoomId) {
    registry.room_info(room).await.unwrap();
}

fn registry() -> RoomRegistry {
    RoomRegistry::new(GameConfig::default())
}

// =========================================================================
// Creating and joining rooms
// =========================================================================

#[tokio::test]
async fn test_create_room_registers_it() {
    let reg = registry();

    reg.create_room(cid(1), rid("R1"), "pw".into(), dummy_sender())
        .await
        .unwrap();

    assert_eq!(reg.room_count(), 1);
    assert_eq!(reg.connection_room(cid(1)), Some(rid("R1")));
}

#[tokio::test]
async fn test_create_room_duplicate_id_rejected() {
    let reg = registry();
    reg.create_room(cid(1), rid("R1"), "pw".into(), dummy_sender())
        .await
        .unwrap();

    let result = reg
        .create_room(cid(2), rid("R1"), "other".into(), dummy_sender())
        .await;

    assert!(matches!(result, Err(RegistryError::AlreadyExists(_))));
    assert_eq!(reg.room_count(), 1);
}

#[tokio::test]
async fn test_create_room_while_in_a_room_rejected() {
    let reg = registry();
    reg.create_room(cid(1), rid("R1"), "pw".into(), dummy_sender())
        .await
        .unwrap();

    let result = reg
        .create_room(cid(1), rid("R2"), "pw".into(), dummy_sender())
        .await;

    assert!(matches!(result, Err(RegistryError::AlreadyInRoom(_))));
}

#[tokio::test]
async fn test_join_room_not_found() {
    let reg = registry();

    let result = reg
        .join_room(cid(1), rid("nope"), "pw".into(), dummy_sender())
        .await;

    assert!(matches!(result, Err(RegistryError::NotFound(_))));
}

#[tokio::test]
async fn test_join_room_wrong_password() {
    let reg = registry();
    reg.create_room(cid(1), rid("R1"), "secret".into(), dummy_sender())
        .await
        .unwrap();

    let result = reg
        .join_room(cid(2), rid("R1"), "wrong".into(), dummy_sender())
        .await;

    assert!(result.is_err());
    assert_eq!(reg.connection_room(cid(2)), None);
}

#[tokio::test]
async fn test_join_room_sends_snapshot_to_joiner_only() {
    let reg = registry();
    let (creator_tx, mut creator_rx) = capture();
    reg.create_room(cid(1), rid("R1"), "pw".into(), creator_tx)
        .await
        .unwrap();
    drain(&mut creator_rx);

    let (joiner_tx, mut joiner_rx) = capture();
    reg.join_room(cid(2), rid("R1"), "pw".into(), joiner_tx)
        .await
        .unwrap();
    sync(&reg, &rid("R1")).await;

    let joiner_events = drain(&mut joiner_rx);
    assert!(matches!(
        joiner_events.as_slice(),
        [ServerEvent::RoomJoined { game_started: false, .. }]
    ));
    assert!(drain(&mut creator_rx).is_empty(), "joins are silent to others");
}

#[tokio::test]
async fn test_join_room_one_room_at_a_time() {
    let reg = registry();
    reg.create_room(cid(1), rid("R1"), "pw".into(), dummy_sender())
        .await
        .unwrap();
    reg.create_room(cid(2), rid("R2"), "pw".into(), dummy_sender())
        .await
        .unwrap();

    let result = reg
        .join_room(cid(2), rid("R1"), "pw".into(), dummy_sender())
        .await;

    assert!(matches!(result, Err(RegistryError::AlreadyInRoom(_))));
    assert_eq!(reg.connection_room(cid(2)), Some(rid("R2")));
}

// =========================================================================
// Routing actions
// =========================================================================

#[tokio::test]
async fn test_route_not_in_room() {
    let reg = registry();

    let result = reg
        .route(cid(1), ClientEvent::SelectCharacter { char_id: ch(1) })
        .await;

    assert!(matches!(result, Err(RegistryError::NotInRoom(_))));
}

#[tokio::test]
async fn test_select_character_broadcasts_roster() {
    let reg = registry();
    let (tx1, mut rx1) = capture();
    let (tx2, mut rx2) = capture();
    reg.create_room(cid(1), rid("R1"), "pw".into(), tx1)
        .await
        .unwrap();
    reg.join_room(cid(2), rid("R1"), "pw".into(), tx2)
        .await
        .unwrap();
    drain(&mut rx1);
    drain(&mut rx2);

    reg.route(cid(1), ClientEvent::SelectCharacter { char_id: ch(3) })
        .await
        .unwrap();
    sync(&reg, &rid("R1")).await;

    for rx in [&mut rx1, &mut rx2] {
        let events = drain(rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, ServerEvent::UpdatePlayers { players } if players.len() == 1)));
        assert!(events
            .iter()
            .any(|e| matches!(e, ServerEvent::TakenChars { chars } if chars == &vec![ch(3)])));
    }
}

#[tokio::test]
async fn test_rejected_action_errors_only_the_sender() {
    let reg = registry();
    let (tx1, mut rx1) = capture();
    let (tx2, mut rx2) = capture();
    reg.create_room(cid(1), rid("R1"), "pw".into(), tx1)
        .await
        .unwrap();
    reg.join_room(cid(2), rid("R1"), "pw".into(), tx2)
        .await
        .unwrap();
    reg.route(cid(1), ClientEvent::SelectCharacter { char_id: ch(3) })
        .await
        .unwrap();
    sync(&reg, &rid("R1")).await;
    drain(&mut rx1);
    drain(&mut rx2);

    // Character 3 is taken by connection 1.
    reg.route(cid(2), ClientEvent::SelectCharacter { char_id: ch(3) })
        .await
        .unwrap();
    sync(&reg, &rid("R1")).await;

    let events = drain(&mut rx2);
    assert!(matches!(events.as_slice(), [ServerEvent::Error { .. }]));
    assert!(drain(&mut rx1).is_empty());
}

#[tokio::test]
async fn test_start_game_broadcasts_to_all_members() {
    let reg = registry();
    let (tx1, mut rx1) = capture();
    let (tx2, mut rx2) = capture();
    let (tx3, mut rx3) = capture();
    reg.create_room(cid(1), rid("R1"), "pw".into(), tx1)
        .await
        .unwrap();
    reg.join_room(cid(2), rid("R1"), "pw".into(), tx2)
        .await
        .unwrap();
    reg.join_room(cid(3), rid("R1"), "pw".into(), tx3)
        .await
        .unwrap();
    reg.route(cid(1), ClientEvent::SelectCharacter { char_id: ch(1) })
        .await
        .unwrap();
    reg.route(cid(2), ClientEvent::SelectCharacter { char_id: ch(2) })
        .await
        .unwrap();
    sync(&reg, &rid("R1")).await;
    drain(&mut rx1);
    drain(&mut rx2);
    drain(&mut rx3);

    // Connection 3 never picked a character but may still start.
    reg.route(cid(3), ClientEvent::StartGame).await.unwrap();
    sync(&reg, &rid("R1")).await;

    for rx in [&mut rx1, &mut rx2, &mut rx3] {
        let events = drain(rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, ServerEvent::GameStarted { player_order, .. } if player_order.len() == 2)));
    }
}

#[tokio::test]
async fn test_busy_room_does_not_stall_other_rooms() {
    let reg = Arc::new(registry());
    reg.create_room(cid(1), rid("busy"), "pw".into(), dummy_sender())
        .await
        .unwrap();

    // Keep the busy room's actor saturated with expensive rolls.
    let flooder = {
        let reg = Arc::clone(&reg);
        tokio::spawn(async move {
            for _ in 0..200 {
                let _ = reg
                    .route(cid(1), ClientEvent::RollDice { dice_count: 100_000 })
                    .await;
            }
        })
    };

    // Other rooms must stay responsive while "busy" churns.
    let calm = tokio::time::timeout(Duration::from_secs(5), async {
        reg.create_room(cid(2), rid("calm"), "pw".into(), dummy_sender())
            .await
            .unwrap();
        reg.join_room(cid(3), rid("calm"), "pw".into(), dummy_sender())
            .await
            .unwrap();
        reg.route(cid(2), ClientEvent::SelectCharacter { char_id: ch(1) })
            .await
            .unwrap();
        reg.room_info(&rid("calm")).await.unwrap()
    })
    .await
    .expect("a busy room must not block operations on other rooms");

    assert_eq!(calm.connections, 2);
    flooder.abort();
}

// =========================================================================
// Disconnects and room destruction
// =========================================================================

#[tokio::test]
async fn test_disconnect_unknown_connection_is_noop() {
    let reg = registry();
    reg.disconnect(cid(99)).await;
    assert_eq!(reg.room_count(), 0);
}

#[tokio::test]
async fn test_disconnect_last_connection_destroys_room() {
    let reg = registry();
    reg.create_room(cid(1), rid("R1"), "pw".into(), dummy_sender())
        .await
        .unwrap();

    reg.disconnect(cid(1)).await;

    assert_eq!(reg.room_count(), 0);
    assert_eq!(reg.connection_room(cid(1)), None);
    assert!(matches!(
        reg.room_info(&rid("R1")).await,
        Err(RegistryError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_disconnect_keeps_room_while_members_remain() {
    let reg = registry();
    reg.create_room(cid(1), rid("R1"), "pw".into(), dummy_sender())
        .await
        .unwrap();
    reg.join_room(cid(2), rid("R1"), "pw".into(), dummy_sender())
        .await
        .unwrap();

    reg.disconnect(cid(1)).await;

    assert_eq!(reg.room_count(), 1);
    assert_eq!(reg.connection_room(cid(2)), Some(rid("R1")));
    let info = reg.room_info(&rid("R1")).await.unwrap();
    assert_eq!(info.connections, 1);
}

#[tokio::test]
async fn test_disconnect_of_player_updates_remaining_members() {
    let reg = registry();
    let (tx1, _rx1) = capture();
    let (tx2, mut rx2) = capture();
    reg.create_room(cid(1), rid("R1"), "pw".into(), tx1)
        .await
        .unwrap();
    reg.join_room(cid(2), rid("R1"), "pw".into(), tx2)
        .await
        .unwrap();
    reg.route(cid(1), ClientEvent::SelectCharacter { char_id: ch(1) })
        .await
        .unwrap();
    reg.route(cid(2), ClientEvent::SelectCharacter { char_id: ch(2) })
        .await
        .unwrap();
    sync(&reg, &rid("R1")).await;
    drain(&mut rx2);

    reg.disconnect(cid(1)).await;
    sync(&reg, &rid("R1")).await;

    let events = drain(&mut rx2);
    assert!(events
        .iter()
        .any(|e| matches!(e, ServerEvent::UpdatePlayers { players } if players.len() == 1)));
    assert!(events
        .iter()
        .any(|e| matches!(e, ServerEvent::TakenChars { chars } if chars == &vec![ch(2)])));
}

#[tokio::test]
async fn test_disconnect_mid_game_below_minimum_resets() {
    let reg = registry();
    let (tx1, _rx1) = capture();
    let (tx2, mut rx2) = capture();
    reg.create_room(cid(1), rid("R1"), "pw".into(), tx1)
        .await
        .unwrap();
    reg.join_room(cid(2), rid("R1"), "pw".into(), tx2)
        .await
        .unwrap();
    reg.route(cid(1), ClientEvent::SelectCharacter { char_id: ch(1) })
        .await
        .unwrap();
    reg.route(cid(2), ClientEvent::SelectCharacter { char_id: ch(2) })
        .await
        .unwrap();
    reg.route(cid(1), ClientEvent::StartGame).await.unwrap();
    sync(&reg, &rid("R1")).await;
    drain(&mut rx2);

    reg.disconnect(cid(1)).await;
    sync(&reg, &rid("R1")).await;

    let events = drain(&mut rx2);
    assert!(events
        .iter()
        .any(|e| matches!(e, ServerEvent::GameReset { .. })));
    let info = reg.room_info(&rid("R1")).await.unwrap();
    assert_eq!(info.players, 1);
}

// =========================================================================
// Room info
// =========================================================================

#[tokio::test]
async fn test_room_info_reflects_membership_and_players() {
    let reg = registry();
    reg.create_room(cid(1), rid("R1"), "pw".into(), dummy_sender())
        .await
        .unwrap();
    reg.join_room(cid(2), rid("R1"), "pw".into(), dummy_sender())
        .await
        .unwrap();
    reg.route(cid(1), ClientEvent::SelectCharacter { char_id: ch(1) })
        .await
        .unwrap();

    let info = reg.room_info(&rid("R1")).await.unwrap();

    assert_eq!(info.room_id, rid("R1"));
    assert_eq!(info.connections, 2);
    assert_eq!(info.players, 1);
    assert_eq!(info.deck_remaining, parlor_game::catalog_size());
}
