//! AppState construction shared by the `run` and `chat` commands.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use aun_domain::config::{Config, ConfigSeverity};
use aun_providers::{LlmProvider, OpenAiCompatProvider};

use crate::runtime::{SessionRegistry, SessionServices};
use crate::state::AppState;

/// Validate config, build the LLM provider and return a fully-wired
/// [`AppState`].
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    let error_count = issues
        .iter()
        .filter(|i| i.severity == ConfigSeverity::Error)
        .count();
    if error_count > 0 {
        anyhow::bail!("config validation failed with {error_count} error(s)");
    }

    // ── LLM provider ─────────────────────────────────────────────────
    let provider = OpenAiCompatProvider::from_config(
        &config.llm.provider,
        Duration::from_millis(config.llm.timeout_ms),
    )
    .with_context(|| format!("initializing LLM provider '{}'", config.llm.provider.id))?;
    tracing::info!(
        provider = %config.llm.provider.id,
        model = %config.llm.provider.default_model,
        "LLM provider ready"
    );

    Ok(build_with_provider(config, Arc::new(provider)))
}

/// Wire the session runtime around an already-constructed provider.
pub fn build_with_provider(config: Arc<Config>, provider: Arc<dyn LlmProvider>) -> AppState {
    let services = Arc::new(SessionServices::from_config(&config, Arc::clone(&provider)));
    let registry = Arc::new(SessionRegistry::from_config(&config.sessions, services));
    tracing::info!(
        max_sessions = config.sessions.max_sessions,
        window_size = config.sessions.window_size,
        eviction = config.sessions.eviction.as_str(),
        "session registry ready"
    );

    AppState {
        config,
        provider,
        registry,
    }
}
