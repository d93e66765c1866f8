//! Tool registry: builds the definitions offered to the model and
//! dispatches tool calls to the built-in handlers.

use serde::Deserialize;
use serde_json::Value;

use aun_domain::config::AgentConfig;
use aun_domain::error::{Error, Result};
use aun_domain::tool::{ToolCall, ToolDefinition};
use aun_domain::trace::TraceEvent;

use crate::builtin;

/// Result of a single tool invocation, fed back to the model verbatim.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub content: String,
    pub is_error: bool,
}

#[derive(Debug, Deserialize)]
struct ScheduleArgs {
    name: String,
    #[serde(default)]
    days_from_now: Option<i64>,
}

/// The set of tools enabled for the agent loop.
pub struct ToolRegistry {
    enabled: Vec<String>,
    default_booking_days: i64,
}

impl ToolRegistry {
    pub fn new(enabled: &[String], default_booking_days: i64) -> Self {
        let enabled: Vec<String> = enabled
            .iter()
            .filter(|name| {
                let known = all_definitions().iter().any(|d| &d.name == *name);
                if !known {
                    tracing::warn!(tool = %name, "ignoring unknown tool in enabled_tools");
                }
                known
            })
            .cloned()
            .collect();
        Self {
            enabled,
            default_booking_days,
        }
    }

    pub fn from_config(cfg: &AgentConfig) -> Self {
        Self::new(&cfg.enabled_tools, cfg.default_booking_days)
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.iter().any(|n| n == name)
    }

    /// Definitions for every enabled tool, in a stable order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        all_definitions()
            .into_iter()
            .filter(|d| self.is_enabled(&d.name))
            .collect()
    }

    /// Execute one tool call.  Failures become error outputs rather than
    /// propagating, so the model can see and recover from them.
    pub fn dispatch(&self, call: &ToolCall) -> ToolOutput {
        let output = match self.execute(call) {
            Ok(content) => ToolOutput {
                content,
                is_error: false,
            },
            Err(e) => {
                tracing::warn!(tool = %call.tool_name, error = %e, "tool call failed");
                ToolOutput {
                    content: e.to_string(),
                    is_error: true,
                }
            }
        };

        TraceEvent::ToolInvoked {
            tool_name: call.tool_name.clone(),
            call_id: call.call_id.clone(),
            is_error: output.is_error,
        }
        .emit();

        output
    }

    fn execute(&self, call: &ToolCall) -> Result<String> {
        if !self.is_enabled(&call.tool_name) {
            return Err(Error::Tool {
                tool: call.tool_name.clone(),
                message: "unknown or disabled tool".into(),
            });
        }

        match call.tool_name.as_str() {
            "generate_session_id" => Ok(builtin::generate_session_id()),
            "breathing_exercise" => Ok(builtin::breathing_exercise().to_owned()),
            "schedule_session" => {
                let args: ScheduleArgs =
                    serde_json::from_value(call.arguments.clone()).map_err(|e| Error::Tool {
                        tool: call.tool_name.clone(),
                        message: format!("invalid arguments: {e}"),
                    })?;
                let days = args.days_from_now.unwrap_or(self.default_booking_days);
                let booking = builtin::schedule_session(&args.name, days, chrono::Utc::now())
                    .ok_or_else(|| Error::Tool {
                        tool: call.tool_name.clone(),
                        message: "days_from_now out of range".into(),
                    })?;
                Ok(serde_json::to_string(&booking)?)
            }
            other => Err(Error::Tool {
                tool: other.to_owned(),
                message: "no handler".into(),
            }),
        }
    }
}

fn all_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "generate_session_id".into(),
            description: "Generate a secure session ID.".into(),
            parameters: empty_object_schema(),
        },
        ToolDefinition {
            name: "breathing_exercise".into(),
            description: "Guide the user through a short breathing exercise.".into(),
            parameters: empty_object_schema(),
        },
        ToolDefinition {
            name: "schedule_session".into(),
            description: "Simulate scheduling a therapy session for the user.".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Client name" },
                    "days_from_now": {
                        "type": "integer",
                        "description": "Days from today (default 1)"
                    }
                },
                "required": ["name"]
            }),
        },
    ]
}

fn empty_object_schema() -> Value {
    serde_json::json!({ "type": "object", "properties": {} })
}
