//! Application configuration options

use std::time::Duration;

use crate::workers::poller;

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Lifecycle configuration
    pub lifecycle: LifecycleOptions,

    /// Backend API base URL
    pub backend_base_url: String,

    /// Request timeout, transport default when `None`
    pub request_timeout: Option<Duration>,

    /// Poller worker options
    pub poller: poller::Options,
}

impl AppOptions {
    /// Repository shown on the panel
    pub fn repo(&self) -> &str {
        &self.poller.repo
    }
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            lifecycle: LifecycleOptions::default(),
            backend_base_url: "http://localhost:7722/deploy".to_string(),
            request_timeout: None,
            poller: poller::Options::default(),
        }
    }
}

/// Lifecycle options for the console
#[derive(Debug, Clone)]
pub struct LifecycleOptions {
    /// Maximum delay for graceful shutdown
    pub max_shutdown_delay: Duration,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self {
            max_shutdown_delay: Duration::from_secs(10),
        }
    }
}
