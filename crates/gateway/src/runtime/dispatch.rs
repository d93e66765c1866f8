//! Reply strategy selection and invocation.
//!
//! Education and Casual turns get a plain completion over the memory
//! window.  Support and Booking turns go through the tool-augmented agent
//! loop with a synthetic state instruction appended to a *copy* of the
//! window; the instruction never reaches the session's own memory.

use std::sync::Arc;

use serde::Serialize;

use aun_domain::conversation::{DiscourseState, Intent};
use aun_domain::error::Result;
use aun_domain::tool::Message;
use aun_providers::{ChatRequest, LlmProvider};
use aun_sessions::MemoryWindow;
use aun_tools::ToolRegistry;

use super::agent::run_agent_loop;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyStrategy {
    Direct,
    ToolAugmented,
}

impl ReplyStrategy {
    pub fn for_intent(intent: Intent) -> Self {
        match intent {
            Intent::Education | Intent::Casual => ReplyStrategy::Direct,
            Intent::Support | Intent::Booking => ReplyStrategy::ToolAugmented,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyStrategy::Direct => "direct",
            ReplyStrategy::ToolAugmented => "tool_augmented",
        }
    }
}

/// Sampling and loop limits applied to every request.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub max_tool_loops: usize,
}

/// Generated text plus what it took to produce it.
#[derive(Debug, Clone)]
pub struct Reply {
    pub content: String,
    pub strategy: ReplyStrategy,
    /// Tool names in call order; always empty for direct replies.
    pub tools_invoked: Vec<String>,
}

pub struct ReplyDispatcher {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    params: GenerationParams,
    state_instruction: String,
}

impl ReplyDispatcher {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        params: GenerationParams,
        state_instruction: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            tools,
            params,
            state_instruction: state_instruction.into(),
        }
    }

    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    pub async fn generate(
        &self,
        intent: Intent,
        window: &MemoryWindow,
        state: DiscourseState,
    ) -> Result<Reply> {
        let strategy = ReplyStrategy::for_intent(intent);
        let mut messages = window.to_messages();

        match strategy {
            ReplyStrategy::Direct => {
                let req = ChatRequest {
                    messages,
                    tools: Vec::new(),
                    temperature: self.params.temperature,
                    max_tokens: self.params.max_tokens,
                    model: None,
                };
                let resp = self.provider.chat(&req).await?;
                Ok(Reply {
                    content: resp.content,
                    strategy,
                    tools_invoked: Vec::new(),
                })
            }
            ReplyStrategy::ToolAugmented => {
                messages.push(Message::system(self.instruction_for(state)));
                let outcome =
                    run_agent_loop(self.provider.as_ref(), &self.tools, messages, &self.params)
                        .await?;
                Ok(Reply {
                    content: outcome.content,
                    strategy,
                    tools_invoked: outcome.tools_invoked,
                })
            }
        }
    }

    fn instruction_for(&self, state: DiscourseState) -> String {
        self.state_instruction.replace("{state}", state.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_table() {
        assert_eq!(ReplyStrategy::for_intent(Intent::Education), ReplyStrategy::Direct);
        assert_eq!(ReplyStrategy::for_intent(Intent::Casual), ReplyStrategy::Direct);
        assert_eq!(ReplyStrategy::for_intent(Intent::Support), ReplyStrategy::ToolAugmented);
        assert_eq!(ReplyStrategy::for_intent(Intent::Booking), ReplyStrategy::ToolAugmented);
    }

    #[test]
    fn strategy_serializes_snake_case() {
        let json = serde_json::to_string(&ReplyStrategy::ToolAugmented).unwrap();
        assert_eq!(json, "\"tool_augmented\"");
    }
}
