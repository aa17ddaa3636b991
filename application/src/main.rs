use std::{
    io,
    sync::{Arc, OnceLock},
};

use application::{Args, Config, Console, Router};
use client::{
    cache::Cache, session::SessionStore, storage::FileStorage,
    transport::HttpTransport, Api,
};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .init();

    _ = start().await;
}

async fn start() -> Result<(), ()> {
    let Args { config } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let Config {
        api,
        cache,
        storage,
        log,
    } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let session = Arc::new(SessionStore::new(Box::new(FileStorage::new(
        storage.dir,
    ))));
    let cache = Arc::new(Cache::new(cache.into()));

    let transport =
        HttpTransport::new(&api.into(), Arc::clone(&session), Arc::clone(&cache))
            .map_err(|e| {
                log::error!("failed to initialize HTTP transport: {e}");
            })?;
    let api = Api::new(transport, Arc::clone(&session), cache);

    if session.is_authenticated() {
        log::info!("resuming persisted session");
    }

    let mut console = Console::new(api, Router::new(session));
    console
        .run(io::stdin().lock(), io::stdout())
        .await
        .map_err(|e| {
            log::error!("console failed: {e}");
        })
}
