use std::net::SocketAddr;

use anyhow::Context;
use serde_json::json;

use crate::api::create_router;
use crate::config::{Config, ServeConfig};
use crate::db::Db;
use crate::error::NerveError;
use crate::output;

pub fn run(serve: ServeConfig, config: &Config) -> i32 {
    let addrs = match serve.addrs() {
        Ok(addrs) => addrs,
        Err(e) => return super::exit_code(Err(e), config.json_output),
    };
    let db = match Db::open(&config.db_path) {
        Ok(db) => db,
        Err(e) => return super::exit_code(Err(e), config.json_output),
    };

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")
        .and_then(|rt| rt.block_on(serve_forever(db, addrs)));

    match result {
        Ok(()) => {
            if config.json_output {
                output::json::print_success(json!({ "stopped": true }));
            }
            0
        }
        Err(e) => super::exit_code(Err(NerveError::internal(format!("{e:#}"))), config.json_output),
    }
}

async fn serve_forever(db: Db, addrs: Vec<SocketAddr>) -> anyhow::Result<()> {
    let app = create_router(db);
    let listener = tokio::net::TcpListener::bind(addrs.as_slice())
        .await
        .with_context(|| format!("failed to bind {addrs:?}"))?;
    let addr = listener.local_addr().context("listener has no local address")?;

    tracing::info!(%addr, version = crate::VERSION, "nerve API listening");
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("nerve API shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
