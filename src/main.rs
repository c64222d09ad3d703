use anyhow::Result;
use clap::Parser;
use rs_paperstream::{
    cli::Args,
    client::PaperStreamClient,
    client_state::shared_state,
    config::Config,
    events::create_event_channel,
    formatter::OutputFormat,
    monitoring::setup_metrics,
    tracing_setup::setup_tracing,
    ui::{UiController, UiOptions},
};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_tracing(&args.log_level, args.json_logs)?;

    info!(
        "Starting paper-trading stream client v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = Arc::new(Config::from_args(&args)?);

    if config.metrics.enabled {
        setup_metrics(config.metrics.port).await?;
        info!("Metrics server started on port {}", config.metrics.port);
    }

    let started_at = tokio::time::Instant::now();
    let (event_sender, event_receiver) = create_event_channel();
    let state = shared_state(config.buffer.capacity);

    let mut client = PaperStreamClient::new(Arc::clone(&config), event_sender, Arc::clone(&state));
    let client_task = tokio::spawn(async move { client.run().await });

    let mut ui = UiController::new(
        event_receiver,
        OutputFormat::from(args.format.as_str()),
        UiOptions {
            colored: !args.no_color,
            quiet: args.quiet,
            max_trades: args.max_trades,
        },
    );

    // The UI returns when the event channel drains (client done) or when the
    // configured max-trades threshold is hit.
    ui.run().await;

    // Tear the connection down; the socket is owned by the client task, so
    // nothing can touch the buffer after this.
    client_task.abort();
    let run_result = client_task.await;

    let health = {
        let uptime = chrono::Duration::from_std(started_at.elapsed())
            .unwrap_or_else(|_| chrono::Duration::zero());
        let state = state.lock().await;
        state.health_status(uptime)
    };
    info!("Final stream status: {}", health.to_json());

    match run_result {
        Ok(Ok(())) => info!("Client stopped successfully"),
        Ok(Err(e)) => {
            error!("WebSocket client error: {}", e);
            return Err(e);
        }
        Err(e) if e.is_cancelled() => info!("Client stopped"),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
