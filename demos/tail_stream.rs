//! Tail the backend event stream into bounded view state.
//!
//! Reads `TRADEDESK_*` from the environment (or `.env`), connects, and prints
//! one log line per event plus an equity summary every few seconds.
//!
//! ```bash
//! RUST_LOG=tradedesk_sync=debug cargo run --example tail_stream --features native
//! ```

use std::time::Duration;

use tracing_subscriber::EnvFilter;
use tradedesk_sync::prelude::*;

#[tokio::main]
async fn main() -> Result<(), SdkError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let client = DeskClient::from_env()?;
    let channel = std::env::var("TRADEDESK_CHANNEL").ok();

    let mut ws = client.ws_native();
    let mut events = ws.subscribe();
    ws.connect(channel.as_deref()).await?;
    println!("Connecting to {}", client.ws_config().url);

    let mut logs = LogTail::default();
    let mut tape = TradeTape::default();
    let mut orders = OpenOrders::default();
    let mut equity = EquityCurve::default();
    let mut dashboard = DashboardState::new();
    let mut summary = tokio::time::interval(Duration::from_secs(5));

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                client.running().apply(&event);
                logs.apply(&event);
                tape.apply(&event);
                orders.apply(&event);
                equity.apply(&event);
                dashboard.apply(&event);
                if let Some(line) = logs.lines().next() {
                    println!("[{}] {}", line.kind, line.text);
                }
            }
            _ = summary.tick() => {
                let state = ws.connection_state();
                match equity.stats() {
                    Some(s) => println!(
                        "-- {} | running={} open={} trades={} equity={} dd={}% maxdd={}%",
                        state, client.running().get(), orders.len(), tape.len(),
                        s.now, s.drawdown_pct.round_dp(2), s.max_drawdown_pct.round_dp(2)
                    ),
                    None => println!(
                        "-- {} | running={} open={} trades={}",
                        state, client.running().get(), orders.len(), tape.len()
                    ),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    ws.close().await;
    Ok(())
}
