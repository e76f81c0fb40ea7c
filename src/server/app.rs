use crate::error::{Error, Result};
use crate::server::routes::{preflight, save, static_file};
use crate::state::site::Site;
use axum::routing::post;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub site: Arc<Site>,
    /// Held for the whole read-merge-write of one save
    pub save_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(site: Site) -> Self {
        AppState {
            site: Arc::new(site),
            save_lock: Arc::new(Mutex::new(())),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        // other methods on the save path are served like any missing file
        .route(
            "/api/save",
            post(save).options(preflight).fallback(static_file),
        )
        .fallback(static_file)
        .with_state(state)
}

/// Serve `site` on `addr` until Ctrl-C
pub async fn serve(site: Site, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| Error::Bind { addr, source })?;
    info!(root = %site.root().display(), "serving on http://{addr}");

    axum::serve(listener, router(AppState::new(site)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Error::Serve)?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("could not listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}
