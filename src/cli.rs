//! CLI command implementations.

use crate::chat::{ChatBackend, OpenAiChat};
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::rest::{self, AppState};
use crate::snapshot::{Origin, Snapshot};
use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

/// `serve`: run the HTTP server with a best-effort cache warm-up.
pub async fn serve(config: EngineConfig, port: u16) -> Result<()> {
    let engine = Arc::new(Engine::new(config));

    let chat = OpenAiChat::from_env().map(|c| Arc::new(c) as Arc<dyn ChatBackend>);
    if chat.is_none() {
        warn!("OPENAI_API_KEY not set; /chat will serve canned replies");
    }

    // Warm both caches in the background; failure is logged, non-fatal.
    let warm = Arc::clone(&engine);
    tokio::spawn(async move { warm.prefetch().await });

    rest::start(port, Arc::new(AppState::new(engine, chat))).await
}

/// `schedule`: fetch and print the schedule once.
pub async fn schedule(config: EngineConfig, branch: Option<&str>, json: bool) -> Result<()> {
    let engine = Engine::new(config);
    let snap = engine.get_schedule(branch).await;
    print_snapshot(&snap, json)
}

/// `prices`: fetch and print the price list once.
pub async fn prices(config: EngineConfig, json: bool) -> Result<()> {
    let engine = Engine::new(config);
    let snap = engine.get_prices().await;
    print_snapshot(&snap, json)
}

fn print_snapshot(snap: &Snapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snap)?);
        return Ok(());
    }

    if snap.meta.origin == Origin::Fallback {
        println!("(данные из резервной копии — сайт недоступен)\n");
    }
    if snap.sections.is_empty() {
        println!("Ничего не найдено.");
    }
    for section in &snap.sections {
        println!("{}:", section.name);
        for entry in &section.entries {
            println!("  {entry}");
        }
        println!();
    }
    Ok(())
}
