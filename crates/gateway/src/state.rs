use std::sync::Arc;

use aun_domain::config::Config;
use aun_providers::LlmProvider;

use crate::runtime::SessionRegistry;

/// Shared application state handed to every CLI command.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub provider: Arc<dyn LlmProvider>,
    pub registry: Arc<SessionRegistry>,
}
