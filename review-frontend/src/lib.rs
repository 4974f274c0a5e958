pub mod commands;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod middleware;
pub mod modal;
pub mod models;
pub mod services;
pub mod session;
pub mod startup;
pub mod utils;

use config::Settings;
use session::SessionRegistry;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state: configuration and the live client sessions.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.backend.timeout_seconds))
            .build()?;
        let settings = Arc::new(settings);

        Ok(Self {
            sessions: Arc::new(SessionRegistry::new(settings.clone(), http)),
            settings,
        })
    }
}
