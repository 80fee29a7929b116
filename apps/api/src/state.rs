use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::cv::session::WizardSession;
use crate::layout::PageConfig;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one wizard session this local service holds.
    pub session: Arc<Mutex<WizardSession>>,
    pub config: Config,
    /// Page geometry and body font used by the PDF export.
    pub page_config: PageConfig,
}

impl AppState {
    pub fn new(config: Config, page_config: PageConfig) -> Self {
        AppState {
            session: Arc::new(Mutex::new(WizardSession::new())),
            config,
            page_config,
        }
    }
}
