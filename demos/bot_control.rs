//! Drive the bot through the REST command gateway.
//!
//! ```bash
//! cargo run --example bot_control --features native -- status
//! cargo run --example bot_control --features native -- start
//! cargo run --example bot_control --features native -- cmd x
//! ```

use tracing_subscriber::EnvFilter;
use tradedesk_sync::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let client = match DeskClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{}", e.user_message());
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&client, &args).await {
        if e.is_feature_unavailable() {
            println!("Not available on this backend yet");
            return;
        }
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(client: &DeskClient, args: &[String]) -> Result<(), SdkError> {
    let action = args.first().map(String::as_str).unwrap_or("status");
    match action {
        "status" => {
            let status = client.bot().status().await?;
            println!("running={} symbol={}", status.running, status.symbol.unwrap_or_default());
            let risk = client.risk().status().await?;
            println!("risk blocked={} reason={}", risk.is_blocked(), risk.reason.unwrap_or_default());
        }
        "start" => {
            let status = client.bot().start().await?;
            println!("running={}", status.running);
        }
        "stop" => {
            let status = client.bot().stop().await?;
            println!("running={}", status.running);
        }
        "cmd" => {
            let command = args
                .get(1)
                .ok_or_else(|| SdkError::Validation("usage: cmd <command> [save]".into()))?;
            let save = args.get(2).is_some_and(|s| s == "save");
            let status = client.bot().cmd(command, save).await?;
            println!("running={}", status.running);
        }
        "scan" => {
            let result = client.scanner().scan(None).await?;
            for pair in result.top.iter().take(10) {
                println!("{:<12} score={:.3} spread_bps={:.1}", pair.symbol, pair.score, pair.spread_bps);
            }
        }
        "history" => {
            let stats = client.history().stats().await?;
            println!("orders={} trades={}", stats.orders, stats.trades);
            println!("export: {}", client.history().export_url(HistoryKind::Trades).await);
        }
        other => {
            return Err(SdkError::Validation(format!("unknown action: {}", other)));
        }
    }
    Ok(())
}
