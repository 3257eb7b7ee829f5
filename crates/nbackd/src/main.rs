//! N-back Daemon - hosts one dual n-back session engine
//!
//! The daemon owns the engine and everything the engine deliberately does not:
//! - the wall clock (a frame loop feeding elapsed time)
//! - persistent storage (`store.json` in the OS data dir)
//! - sound (cues are logged)
//! - a JSON-lines TCP control channel for UI clients
//!
//! Storage locations:
//! - Linux: ~/.local/share/nback/
//! - Windows: %APPDATA%\nback\
//! - MacOS: ~/Library/Application Support/nback/

use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{error, info, warn};

mod config;
mod paths;
mod protocol;
mod sound;
mod store;

use config::DaemonConfig;
use nback::SessionEngine;
use paths::AppPaths;
use protocol::{dispatch, Request, Response};
use sound::CueLogger;
use store::FileStore;

type Engine = SessionEngine<FileStore, CueLogger>;

fn wall_clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

async fn handle_client(
    stream: TcpStream,
    engine: Arc<RwLock<Engine>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => {
                let mut e = engine.write().await;
                dispatch(&mut e, request)
            }
            Err(e) => Response::error(format!("Invalid request: {}", e)),
        };

        writer
            .write_all(serde_json::to_string(&response)?.as_bytes())
            .await?;
        writer.write_all(b"\n").await?;
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Setup application paths
    let paths = AppPaths::new()?;
    info!("Persistence initialized ({:?})", paths.data_dir());

    let mut config = match DaemonConfig::load(&paths.config_file()) {
        Ok(c) => c,
        Err(e) => {
            warn!("Could not load config: {}", e);
            info!("Starting with default config");
            DaemonConfig::default()
        }
    };
    config.apply_env(|k| std::env::var(k).ok());
    if config.engine.seed.is_none() {
        config.engine.seed = Some(wall_clock_seed());
    }
    let config = config.sanitized();

    let store = FileStore::open(paths.store_file());
    let engine = SessionEngine::new(config.engine.clone(), store, CueLogger::new());
    info!(
        "Engine ready (n={}, interval={}s, best score {})",
        config.engine.n_back,
        config.engine.default_interval_secs,
        engine.high_score().score
    );
    let engine = Arc::new(RwLock::new(engine));

    // Nothing to flush on Ctrl-C: every store write is already on disk.
    let engine_clone = Arc::clone(&engine);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let e = engine_clone.read().await;
            info!(
                "Ctrl-C: shutting down ({} cues played, best score {})",
                e.player().played(),
                e.high_score().score
            );
            std::process::exit(0);
        }
    });

    // Start IPC server
    let listener = TcpListener::bind(&config.listen_addr).await?;
    info!("N-back daemon listening on {}", config.listen_addr);

    // Frame loop: feed measured elapsed time so slow frames never lose turns.
    let engine_clone = Arc::clone(&engine);
    let frame = Duration::from_millis(config.frame_ms);
    tokio::spawn(async move {
        let mut last = Instant::now();
        loop {
            tokio::time::sleep(frame).await;

            let now = Instant::now();
            let elapsed = now.duration_since(last);
            last = now;

            let mut e = engine_clone.write().await;
            e.advance(elapsed);
        }
    });

    // Accept client connections
    loop {
        let (stream, addr) = listener.accept().await?;
        info!("Client connected: {}", addr);
        let engine_clone = Arc::clone(&engine);

        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, engine_clone).await {
                error!("Client handler error: {}", e);
            }
        });
    }
}
