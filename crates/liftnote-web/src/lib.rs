//! HTTP API for liftnote.
//!
//! This crate exposes the workout parser over HTTP:
//!
//! - `POST /api/parse` turns workout text into exercise records.
//! - `GET /api/status` reports liveness and the configured model.

pub mod api;
pub mod server;
pub mod state;

pub use server::WebServer;
pub use state::AppState;

/// Port used when neither `--port` nor `PORT` is given.
pub const DEFAULT_PORT: u16 = 4000;

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// The address to bind the HTTP server to.
    pub bind_addr: String,
    /// The port to listen on.
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".into(),
            port: DEFAULT_PORT,
        }
    }
}
