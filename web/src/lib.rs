use log::info;
use tokio::net::TcpListener;

pub use error::{Error, Result};
pub use service::AppState;

pub(crate) mod controller;
pub(crate) mod error;
pub(crate) mod extractors;
pub(crate) mod params;
pub mod router;

/// Binds the configured interface/port and serves the API router until shutdown.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = app_state.config.port;

    let listener = TcpListener::bind(format!("{interface}:{port}")).await?;
    info!("Server starting... listening for connections on http://{interface}:{port}");

    axum::serve(listener, router::define_routes(app_state)).await
}
