mod agent;
mod llm;
mod observability;
mod policy;
mod sessions;

pub use agent::*;
pub use llm::*;
pub use observability::*;
pub use policy::*;
pub use sessions::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.sessions.window_size == 0 {
            errors.push(ConfigError::error(
                "sessions.window_size",
                "window_size must be greater than 0",
            ));
        }
        if self.sessions.max_sessions == 0 {
            errors.push(ConfigError::error(
                "sessions.max_sessions",
                "max_sessions must be greater than 0",
            ));
        }

        if self.llm.provider.base_url.is_empty() {
            errors.push(ConfigError::error(
                "llm.provider.base_url",
                "provider base_url must not be empty",
            ));
        }
        if self.llm.provider.auth.env.is_none() && self.llm.provider.auth.key.is_none() {
            errors.push(ConfigError::warning(
                "llm.provider.auth",
                "neither 'env' nor 'key' is set; requests will fail to authenticate",
            ));
        }

        if self.agent.max_tool_loops == 0 {
            errors.push(ConfigError::error(
                "agent.max_tool_loops",
                "max_tool_loops must be greater than 0",
            ));
        }
        for name in &self.agent.enabled_tools {
            if !BUILTIN_TOOL_NAMES.contains(&name.as_str()) {
                errors.push(ConfigError::warning(
                    "agent.enabled_tools",
                    format!("unknown tool '{name}' will be ignored"),
                ));
            }
        }

        for (i, rule) in self.policy.intent_rules.iter().enumerate() {
            if rule.keywords.is_empty() {
                errors.push(ConfigError::error(
                    format!("policy.intent_rules[{i}].keywords"),
                    format!("rule for '{}' has no keywords", rule.intent),
                ));
            }
        }
        if !self.policy.state_instruction.contains("{state}") {
            errors.push(ConfigError::error(
                "policy.state_instruction",
                "template must contain the {state} placeholder",
            ));
        }
        if self.policy.denylist.is_empty() {
            errors.push(ConfigError::warning(
                "policy.denylist",
                "content filter is empty; no turn will be redirected",
            ));
        }

        errors
    }
}
