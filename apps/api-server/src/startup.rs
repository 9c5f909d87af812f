//! Server lifecycle - explicit start and stop around the store connection.

use std::io;
use std::net::{SocketAddr, TcpListener};

use actix_rt::task::JoinHandle;
use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use crate::config::AppConfig;
use crate::handlers;
use crate::middleware::error::json_config;
use crate::state::{AppState, StateError};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("HTTP server failed: {0}")]
    Server(#[source] io::Error),

    #[error("HTTP server task aborted: {0}")]
    Aborted(String),
}

/// Register shared state, extractor configuration and routes.
pub fn configure_app(state: web::Data<AppState>) -> impl Fn(&mut web::ServiceConfig) + Clone {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(state.clone()).app_data(json_config());
        handlers::configure_routes(cfg);
    }
}

/// A bound, serving HTTP listener together with the store it serves.
///
/// Dropping it without calling [`RunningServer::close`] leaves the listener
/// running until the runtime shuts down.
pub struct RunningServer {
    local_addr: SocketAddr,
    handle: ServerHandle,
    task: JoinHandle<io::Result<()>>,
    state: AppState,
}

/// Open the store described by `config`, bind the listener and start serving.
///
/// Requests are only accepted once this returns.
pub async fn run_server(config: &AppConfig) -> Result<RunningServer, StartupError> {
    let state = AppState::new(config.database.as_ref()).await?;
    serve(config, state)
}

/// Start serving an already built state.
pub fn serve(config: &AppConfig, state: AppState) -> Result<RunningServer, StartupError> {
    let addr = format!("{}:{}", config.host, config.port);
    let bind_error = |source: io::Error| StartupError::Bind {
        addr: addr.clone(),
        source,
    };

    let listener = TcpListener::bind(&addr).map_err(bind_error)?;
    let local_addr = listener.local_addr().map_err(bind_error)?;

    let data = web::Data::new(state.clone());
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .configure(configure_app(data.clone()))
    })
    .listen(listener)
    .map_err(bind_error)?
    .disable_signals()
    .run();

    let handle = server.handle();
    let task = actix_rt::spawn(server);

    tracing::info!("Scribe API listening on {}", local_addr);

    Ok(RunningServer {
        local_addr,
        handle,
        task,
        state,
    })
}

impl RunningServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Base URL, e.g. `http://127.0.0.1:8080`.
    pub fn url(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    /// The state served by this listener; lets callers inspect the store directly.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Stop accepting connections, drain in-flight requests and release the store.
    pub async fn close(self) -> Result<(), StartupError> {
        tracing::info!("Stopping HTTP server on {}...", self.local_addr);

        self.handle.stop(true).await;
        self.task
            .await
            .map_err(|e| StartupError::Aborted(e.to_string()))?
            .map_err(StartupError::Server)?;

        drop(self.state);
        tracing::info!("HTTP server stopped");

        Ok(())
    }
}
