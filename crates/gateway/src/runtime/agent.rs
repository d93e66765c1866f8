//! Tool-augmented agent loop.
//!
//! Calls the model with tool definitions attached, executes any tool calls
//! it returns, feeds the results back, and repeats until the model answers
//! in plain text.  When the round budget runs out, one last call is made
//! with no tools so the model has to answer.

use aun_domain::error::Result;
use aun_domain::tool::Message;
use aun_domain::trace::TraceEvent;
use aun_providers::{ChatRequest, LlmProvider};
use aun_tools::ToolRegistry;

use super::dispatch::GenerationParams;

#[derive(Debug, Clone)]
pub struct AgentOutcome {
    pub content: String,
    /// Tool names in the order they were executed.
    pub tools_invoked: Vec<String>,
    /// Number of model calls made.
    pub iterations: usize,
}

pub async fn run_agent_loop(
    provider: &dyn LlmProvider,
    tools: &ToolRegistry,
    messages: Vec<Message>,
    params: &GenerationParams,
) -> Result<AgentOutcome> {
    let mut req = ChatRequest {
        messages,
        tools: tools.definitions(),
        temperature: params.temperature,
        max_tokens: params.max_tokens,
        model: None,
    };
    let mut tools_invoked = Vec::new();

    for loop_idx in 0..params.max_tool_loops {
        tracing::debug!(loop_idx, "tool loop iteration");
        let resp = provider.chat(&req).await?;

        if resp.tool_calls.is_empty() {
            return Ok(finish(resp.content, tools_invoked, loop_idx + 1, false));
        }

        req.messages
            .push(Message::assistant_tool_calls(&resp.content, &resp.tool_calls));
        for call in &resp.tool_calls {
            let output = tools.dispatch(call);
            tools_invoked.push(call.tool_name.clone());
            req.messages.push(Message::tool_result(
                call.call_id.clone(),
                output.content,
                output.is_error,
            ));
        }
    }

    tracing::warn!(
        max_tool_loops = params.max_tool_loops,
        "tool loop budget exhausted, forcing a text answer"
    );
    req.tools.clear();
    let resp = provider.chat(&req).await?;
    Ok(finish(
        resp.content,
        tools_invoked,
        params.max_tool_loops + 1,
        true,
    ))
}

fn finish(
    content: String,
    tools_invoked: Vec<String>,
    iterations: usize,
    budget_exhausted: bool,
) -> AgentOutcome {
    TraceEvent::AgentFinished {
        iterations,
        tools_invoked: tools_invoked.clone(),
        budget_exhausted,
    }
    .emit();
    AgentOutcome {
        content,
        tools_invoked,
        iterations,
    }
}
