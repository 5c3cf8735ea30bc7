//! Drives a real server over WebSocket.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use collect_arena::game::spawner::SpawnConfig;
use collect_arena::network::ServerMessage;
use collect_arena::{DeterministicRng, GameServer, GameWorld, ServerConfig, WorldHandle};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_server() -> (Arc<GameServer>, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (world, _task) = WorldHandle::spawn(GameWorld::new(
        DeterministicRng::new(7),
        SpawnConfig::default(),
    ));
    let server = Arc::new(GameServer::new(ServerConfig::default(), world));

    let serving = server.clone();
    tokio::spawn(async move { serving.serve(listener).await });

    (server, format!("ws://{}", addr))
}

async fn connect(url: &str) -> Client {
    let (ws, _) = connect_async(url).await.unwrap();
    ws
}

async fn send(client: &mut Client, value: serde_json::Value) {
    client.send(Message::Text(value.to_string())).await.unwrap();
}

async fn recv(client: &mut Client) -> ServerMessage {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .unwrap();
        if let Message::Text(text) = frame {
            return ServerMessage::from_json(&text).unwrap();
        }
    }
}

/// Skip messages until one matches.
async fn recv_until<F>(client: &mut Client, mut pred: F) -> ServerMessage
where
    F: FnMut(&ServerMessage) -> bool,
{
    loop {
        let msg = recv(client).await;
        if pred(&msg) {
            return msg;
        }
    }
}

#[tokio::test]
async fn test_join_move_collect_leave() {
    let (server, url) = start_server().await;

    // First player joins just above the seed collectible at (200, 200)
    let mut a = connect(&url).await;
    send(&mut a, json!({"event": "playerJoin", "data": {"x": 200, "y": 170, "meta": {"name": "ada"}}})).await;

    let a_id = match recv(&mut a).await {
        ServerMessage::WorldState(snapshot) => {
            assert_eq!(snapshot.players.len(), 1);
            assert_eq!(snapshot.collectibles.len(), 1);
            assert_eq!(snapshot.collectibles[0].value, 5);
            assert_eq!(snapshot.players[0].meta["name"], "ada");
            snapshot.players[0].id
        }
        other => panic!("expected worldState, got {:?}", other),
    };

    // Moving down 20 lands within pickup range
    send(&mut a, json!({"event": "move", "data": {"direction": "down", "amount": 20}})).await;
    match recv(&mut a).await {
        ServerMessage::Collected(c) => {
            assert_eq!(c.collector_id, a_id);
            assert_eq!(c.new_score, 5);
        }
        other => panic!("expected collected, got {:?}", other),
    }
    match recv(&mut a).await {
        ServerMessage::CollectibleSpawned(item) => assert_eq!(item.value, 1),
        other => panic!("expected collectibleSpawned, got {:?}", other),
    }
    match recv(&mut a).await {
        ServerMessage::PlayerMoved(m) => {
            assert_eq!(m.id, a_id);
            assert_eq!((m.x, m.y), (200.0, 190.0));
            assert_eq!(m.score, 5);
            assert_eq!(m.rank, "Rank: 1/1");
        }
        other => panic!("expected playerMoved, got {:?}", other),
    }

    // Second player joins with defaults
    let mut b = connect(&url).await;
    send(&mut b, json!({"event": "playerJoin", "data": {}})).await;
    let b_id = match recv(&mut b).await {
        ServerMessage::WorldState(snapshot) => {
            assert_eq!(snapshot.players.len(), 2);
            let me = snapshot.players.iter().find(|p| p.id != a_id).unwrap();
            assert_eq!((me.x, me.y, me.score), (50.0, 50.0, 0));
            me.id
        }
        other => panic!("expected worldState, got {:?}", other),
    };
    match recv(&mut a).await {
        ServerMessage::PlayerJoined(p) => assert_eq!(p.id, b_id),
        other => panic!("expected playerJoined, got {:?}", other),
    }

    // Garbage is dropped without a reply
    b.send(Message::Text("not json".into())).await.unwrap();
    send(&mut b, json!({"event": "move", "data": {"direction": "sideways", "amount": 5}})).await;

    send(&mut b, json!({"event": "move", "data": {"direction": "up", "amount": 9999}})).await;
    let moved = recv_until(&mut b, |m| matches!(m, ServerMessage::PlayerMoved(_))).await;
    match moved {
        ServerMessage::PlayerMoved(m) => {
            assert_eq!(m.id, b_id);
            assert_eq!(m.y, 0.0);
            if m.score == 0 {
                assert_eq!(m.rank, "Rank: 2/2");
            }
        }
        _ => unreachable!(),
    }
    // The mover's update reaches the other player too
    recv_until(&mut a, |m| matches!(m, ServerMessage::PlayerMoved(p) if p.id == b_id)).await;

    let stats = server.world().stats().await.unwrap();
    assert_eq!(stats.joins, 2);
    assert_eq!(stats.malformed_messages, 1);
    assert_eq!(stats.rejected_direction, 1);

    // Leaving is announced to whoever remains
    b.close(None).await.unwrap();
    recv_until(&mut a, |m| matches!(m, ServerMessage::PlayerLeft(l) if l.id == b_id)).await;

    server.shutdown();
}

#[tokio::test]
async fn test_disconnect_without_join_is_silent() {
    let (server, url) = start_server().await;

    let mut a = connect(&url).await;
    send(&mut a, json!({"event": "playerJoin", "data": {}})).await;
    assert!(matches!(recv(&mut a).await, ServerMessage::WorldState(_)));

    let mut lurker = connect(&url).await;
    lurker.close(None).await.unwrap();

    // Let the close reach the world task before probing
    tokio::time::sleep(Duration::from_millis(100)).await;
    let stats = server.world().stats().await.unwrap();
    assert_eq!(stats.departures, 0);

    let quiet = tokio::time::timeout(Duration::from_millis(200), a.next()).await;
    assert!(quiet.is_err(), "unexpected frame: {:?}", quiet);

    server.shutdown();
}
