use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Completion service
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// HTTP timeout for a single completion request.
    #[serde(default = "d_timeout_ms")]
    pub timeout_ms: u64,
    /// Sampling temperature sent with every request.
    #[serde(default = "d_temperature")]
    pub temperature: f32,
    /// Maximum tokens in a response. `None` lets the provider choose.
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            timeout_ms: d_timeout_ms(),
            temperature: d_temperature(),
            max_tokens: None,
            provider: ProviderConfig::default(),
        }
    }
}

/// An OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "d_provider_id")]
    pub id: String,
    #[serde(default = "d_base_url")]
    pub base_url: String,
    #[serde(default = "d_default_model")]
    pub default_model: String,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            id: d_provider_id(),
            base_url: d_base_url(),
            default_model: d_default_model(),
            auth: AuthConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Header name (default: `Authorization`).
    #[serde(default)]
    pub header: Option<String>,
    /// Value prefix (default: `Bearer `).
    #[serde(default)]
    pub prefix: Option<String>,
    /// Environment variable holding the key.
    #[serde(default)]
    pub env: Option<String>,
    /// Plaintext key. Prefer `env`.
    #[serde(default)]
    pub key: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            header: None,
            prefix: None,
            env: Some("OPENROUTER_API_KEY".into()),
            key: None,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_timeout_ms() -> u64 {
    60_000
}
fn d_temperature() -> f32 {
    0.3
}
fn d_provider_id() -> String {
    "openrouter".into()
}
fn d_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}
fn d_default_model() -> String {
    "deepseek/deepseek-chat".into()
}
