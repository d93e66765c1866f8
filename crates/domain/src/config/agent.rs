use serde::{Deserialize, Serialize};

/// Names of the tools the agent loop can offer to the model.
pub const BUILTIN_TOOL_NAMES: [&str; 3] =
    ["generate_session_id", "breathing_exercise", "schedule_session"];

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tool-augmented agent
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Tool-call rounds before the loop forces a text-only answer.
    #[serde(default = "d_max_tool_loops")]
    pub max_tool_loops: usize,

    /// Tools offered to the model.  Unknown names are ignored.
    #[serde(default = "d_enabled_tools")]
    pub enabled_tools: Vec<String>,

    /// `days_from_now` used by `schedule_session` when the model omits it.
    #[serde(default = "d_booking_days")]
    pub default_booking_days: i64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tool_loops: d_max_tool_loops(),
            enabled_tools: d_enabled_tools(),
            default_booking_days: d_booking_days(),
        }
    }
}

fn d_max_tool_loops() -> usize {
    8
}
fn d_enabled_tools() -> Vec<String> {
    BUILTIN_TOOL_NAMES.iter().map(|s| (*s).to_owned()).collect()
}
fn d_booking_days() -> i64 {
    1
}
