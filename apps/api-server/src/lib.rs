//! # Scribe API Server
//!
//! actix-web front end for the blog post store.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod startup;
pub mod state;
pub mod telemetry;

pub use config::AppConfig;
pub use startup::{RunningServer, StartupError, run_server};
pub use state::AppState;
