use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::ws::contentsync::{ContentSync, DiscardContentSync};
use crate::ws::session::SessionManager;

/// Shared state handed to every request and websocket connection
pub struct AppState {
    pub config: Config,
    /// Single writer for all signaling state. Handlers run to completion
    /// while holding it.
    pub session: Mutex<SessionManager>,
    pub content_sync: Arc<dyn ContentSync>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config) -> Arc<Self> {
        Self::with_content_sync(config, Arc::new(DiscardContentSync))
    }

    pub fn with_content_sync(config: Config, content_sync: Arc<dyn ContentSync>) -> Arc<Self> {
        Arc::new(Self {
            config,
            session: Mutex::new(SessionManager::new()),
            content_sync,
            started_at: Utc::now(),
        })
    }
}
