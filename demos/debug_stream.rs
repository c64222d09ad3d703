// Minimal connection probe: dumps the first frames from a paper-trading
// stream without the buffer/UI machinery. Useful when debugging a backend.

use futures_util::StreamExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base = std::env::var("PAPERSTREAM_WS_URL")
        .unwrap_or_else(|_| "ws://127.0.0.1:8000".to_string());
    let url = format!("{}/ws/paper-stream", base.trim_end_matches('/'));

    println!("Connecting to {} ...", url);
    let (ws_stream, response) = connect_async(&url).await?;
    println!("Connected (HTTP {})", response.status());

    let (_write, mut read) = ws_stream.split();

    let mut message_count = 0;
    while let Some(message) = read.next().await {
        match message? {
            Message::Text(text) => {
                message_count += 1;
                println!("Frame #{}: {}", message_count, text);

                if let Ok(json) = serde_json::from_str::<serde_json::Value>(&text) {
                    println!("{}", serde_json::to_string_pretty(&json)?);
                }

                if message_count >= 10 {
                    println!("Stopping after {} frames", message_count);
                    break;
                }
            }
            Message::Binary(data) => println!("Binary frame: {} bytes", data.len()),
            Message::Close(frame) => {
                println!("Close frame: {:?}", frame);
                break;
            }
            _ => {}
        }
    }

    Ok(())
}
