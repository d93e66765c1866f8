use serde::Serialize;

/// Structured trace events emitted across all Aun crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    SessionCreated {
        session_key: String,
        live_sessions: usize,
    },
    SessionsEvicted {
        policy: String,
        evicted: usize,
        trigger_key: String,
    },
    TurnFiltered {
        session_key: String,
    },
    IntentClassified {
        session_key: String,
        intent: String,
        state: String,
    },
    LlmRequest {
        provider: String,
        model: String,
        tools_offered: usize,
        duration_ms: u64,
        prompt_tokens: Option<u32>,
        completion_tokens: Option<u32>,
    },
    ToolInvoked {
        tool_name: String,
        call_id: String,
        is_error: bool,
    },
    AgentFinished {
        iterations: usize,
        tools_invoked: Vec<String>,
        budget_exhausted: bool,
    },
    UpstreamFailure {
        session_key: String,
        strategy: String,
        error: String,
    },
    MemoryTrimmed {
        session_key: String,
        dropped: usize,
        retained: usize,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "aun_event");
    }
}
