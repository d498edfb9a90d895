//! Stand-in storage service for local runs of the gateway.
//!
//! Serves dummy data on `/data` and a state document on `/status` and `/state`.

use std::net::SocketAddr;

use axum::{extract::State, routing::get, Json, Router};
use clap::Parser;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "storage-stub")]
#[command(about = "Dummy storage service answering /data and /status", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "0.0.0.0:5000")]
    bind: SocketAddr,

    /// Value reported in the `state` field; anything but OK reads as unhealthy.
    #[arg(long, default_value = "OK")]
    state: String,
}

#[derive(Clone)]
struct StubState {
    state: String,
}

async fn data() -> Json<Value> {
    Json(json!({ "message": "Hello, this is dummy data from the Storage Service" }))
}

async fn state(State(stub): State<StubState>) -> Json<Value> {
    Json(json!({ "state": stub.state }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storage_stub=info".into()),
        )
        .init();

    let args = Args::parse();
    let app = Router::new()
        .route("/data", get(data))
        .route("/status", get(state))
        .route("/state", get(state))
        .with_state(StubState { state: args.state.clone() });

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    tracing::info!(address = %listener.local_addr()?, state = %args.state, "Storage stub listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
