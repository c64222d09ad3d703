// End-to-end lifecycle tests against an in-process WebSocket server.

use futures_util::SinkExt;
use rs_paperstream::{
    cli::Args,
    client::PaperStreamClient,
    client_state::{shared_state, ConnectionState, SharedClientState},
    config::Config,
    events::{create_event_channel, ClientEvent, EventReceiver},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{accept_async, tungstenite::Message, WebSocketStream};

fn test_args(port: u16) -> Args {
    Args {
        url: format!("ws://127.0.0.1:{}", port),
        path: "/ws/paper-stream".into(),
        token: None,
        buffer_cap: 30,
        log_level: "info".into(),
        json_logs: false,
        metrics: false,
        metrics_port: 9090,
        reconnect_delay_ms: 1,
        max_reconnect_delay_ms: 5,
        max_reconnects: 1,
        format: "minimal".into(),
        no_color: true,
        quiet: true,
        max_trades: 0,
    }
}

fn spawn_client(
    port: u16,
) -> (
    tokio::task::JoinHandle<anyhow::Result<()>>,
    SharedClientState,
    EventReceiver,
) {
    let config = Arc::new(Config::from_args(&test_args(port)).unwrap());
    let (event_sender, event_receiver) = create_event_channel();
    let state = shared_state(config.buffer.capacity);
    let mut client = PaperStreamClient::new(config, event_sender, Arc::clone(&state));
    let handle = tokio::spawn(async move { client.run().await });
    (handle, state, event_receiver)
}

fn trade_frame(symbol: &str, price: f64) -> Message {
    Message::Text(format!(
        r#"{{"type":"trade","payload":{{"symbol":"{}","side":"buy","quantity":1,"price":{},"pnl":0.5}}}}"#,
        symbol, price
    ))
}

async fn accept(listener: &TcpListener) -> WebSocketStream<TcpStream> {
    let (stream, _) = listener.accept().await.unwrap();
    accept_async(stream).await.unwrap()
}

#[tokio::test]
async fn open_three_trades_then_close() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let (client_task, state, mut events) = spawn_client(port);

    let mut server = accept(&listener).await;
    server.send(trade_frame("AAPL", 1.0)).await.unwrap();
    server.send(trade_frame("MSFT", 2.0)).await.unwrap();
    server.send(trade_frame("NVDA", 3.0)).await.unwrap();
    server.close(None).await.unwrap();
    drop(server);
    drop(listener);

    // One reconnect attempt against the dead listener, then give-up.
    let result = tokio::time::timeout(Duration::from_secs(5), client_task)
        .await
        .expect("client should give up promptly")
        .unwrap();
    assert!(result.is_err(), "expected MaxReconnectsExceeded");

    {
        let state = state.lock().await;
        assert_eq!(state.connection, ConnectionState::Closed);
        assert_eq!(state.connection.status_label(), "Reconnecting");

        let symbols: Vec<String> = state.buffer.iter().map(|t| t.symbol.clone()).collect();
        assert_eq!(symbols, vec!["NVDA", "MSFT", "AAPL"], "newest first");
    }

    // A server close is not a clean exit: it must drive the reconnect policy.
    let mut saw_disconnected = false;
    let mut saw_reconnecting = false;
    let mut saw_gave_up = false;
    while let Some(event) = events.recv().await {
        match event {
            ClientEvent::Disconnected => saw_disconnected = true,
            ClientEvent::Reconnecting { attempt, .. } => {
                assert!(attempt >= 1);
                saw_reconnecting = true;
            }
            ClientEvent::GaveUp { attempts } => {
                assert_eq!(attempts, 2);
                saw_gave_up = true;
            }
            _ => {}
        }
    }
    assert!(saw_disconnected);
    assert!(saw_reconnecting);
    assert!(saw_gave_up);
}

#[tokio::test]
async fn malformed_and_unknown_frames_do_not_disturb_the_stream() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let (client_task, state, _events) = spawn_client(port);

    let mut server = accept(&listener).await;
    server
        .send(Message::Text("this is not json".into()))
        .await
        .unwrap();
    server
        .send(Message::Text(
            r#"{"type":"heartbeat","payload":{}}"#.into(),
        ))
        .await
        .unwrap();
    server.send(trade_frame("SPY", 500.0)).await.unwrap();

    // Wait until the trade lands, then verify the junk frames left no trace.
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            {
                let state = state.lock().await;
                if !state.buffer.is_empty() {
                    break;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("trade should arrive");

    {
        let state = state.lock().await;
        assert_eq!(state.connection, ConnectionState::Open);
        assert_eq!(state.buffer.len(), 1);
        assert_eq!(state.buffer.iter().next().unwrap().symbol, "SPY");
        assert_eq!(
            state
                .malformed_frames
                .load(std::sync::atomic::Ordering::Relaxed),
            1
        );
        assert_eq!(
            state
                .ignored_envelopes
                .load(std::sync::atomic::Ordering::Relaxed),
            1
        );
    }

    client_task.abort();
    let _ = client_task.await;
}

#[tokio::test]
async fn teardown_stops_buffer_mutation() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let (client_task, state, _events) = spawn_client(port);

    let mut server = accept(&listener).await;
    server.send(trade_frame("AAPL", 1.0)).await.unwrap();

    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            {
                let state = state.lock().await;
                if !state.buffer.is_empty() {
                    break;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("first trade should arrive");

    // Tear the client down, then keep sending from the server side.
    client_task.abort();
    let _ = client_task.await;

    for i in 0..5 {
        // Sends may fail once the peer is gone; only the buffer matters.
        let _ = server.send(trade_frame("GHOST", i as f64)).await;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    let state = state.lock().await;
    assert_eq!(state.buffer.len(), 1);
    assert_eq!(state.buffer.iter().next().unwrap().symbol, "AAPL");
}
