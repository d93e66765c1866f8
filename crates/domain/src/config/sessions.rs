use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session registry & memory window
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    /// Upper bound on live sessions held by the registry.
    #[serde(default = "d_max_sessions")]
    pub max_sessions: usize,

    /// Non-system messages retained per session.  The system preamble is
    /// pinned and does not count against this.
    #[serde(default = "d_window_size")]
    pub window_size: usize,

    /// What the registry does when a new key arrives at capacity.
    #[serde(default)]
    pub eviction: EvictionPolicy,

    /// Upper bound on the reply-generation step of a turn.  Expiry is
    /// treated as an upstream failure.
    #[serde(default = "d_turn_timeout_ms")]
    pub turn_timeout_ms: u64,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            max_sessions: d_max_sessions(),
            window_size: d_window_size(),
            eviction: EvictionPolicy::default(),
            turn_timeout_ms: d_turn_timeout_ms(),
        }
    }
}

/// Registry behaviour on overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Drop every live session, then insert the new one.
    #[default]
    ClearAll,
    /// Drop only the session that was used least recently.
    LeastRecent,
}

impl EvictionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionPolicy::ClearAll => "clear_all",
            EvictionPolicy::LeastRecent => "least_recent",
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_max_sessions() -> usize {
    500
}
fn d_window_size() -> usize {
    12
}
fn d_turn_timeout_ms() -> u64 {
    90_000
}
