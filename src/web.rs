//! Thin HTTP wrapper: `POST /simulate` takes the orchestrator input
//! contract as JSON and returns the timeline. Status codes and transport
//! concerns stop here; the core stays synchronous underneath.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;

use crate::config::SimConfig;
use crate::sim::{self, RunRequest, Timeline};

pub struct WebServerConfig {
    pub config: SimConfig,
    pub host: String,
    pub port: u16,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

pub async fn run(server: WebServerConfig) -> Result<()> {
    let state = Arc::new(server.config);
    let router = Router::new()
        .route("/simulate", post(simulate))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", server.host, server.port).parse()?;
    log::info!("canopysim listening on http://{addr} (Ctrl+C to stop)");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    log::info!("shutting down");
}

async fn simulate(
    State(config): State<Arc<SimConfig>>,
    Json(request): Json<RunRequest>,
) -> Result<Json<Timeline>, (StatusCode, Json<ErrorBody>)> {
    // Geometry loading and the day loop are synchronous and can take a
    // while; keep them off the async worker threads.
    let result = tokio::task::spawn_blocking(move || sim::run(&config, &request))
        .await
        .map_err(|err| internal(format!("simulation task failed: {err}")))?;

    match result {
        Ok(timeline) => Ok(Json(timeline)),
        Err(err @ sim::SimError::NoPlants) => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorBody {
                error: err.to_string(),
            }),
        )),
        Err(err) => Err(internal(format!("{err:#}"))),
    }
}

fn internal(error: String) -> (StatusCode, Json<ErrorBody>) {
    log::error!("{error}");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody { error }))
}
