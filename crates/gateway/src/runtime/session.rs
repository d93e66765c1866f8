//! The per-key conversation state machine.
//!
//! A turn runs Filter → Classifier → state update → Dispatcher → memory
//! append + trim.  The whole sequence after filtering holds the session's
//! own lock, so concurrent turns on one key are applied one at a time and
//! never interleave their appends.  Different sessions share nothing
//! mutable.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::Instrument;

use aun_domain::config::Config;
use aun_domain::conversation::{DiscourseState, Intent};
use aun_domain::error::Error;
use aun_domain::trace::TraceEvent;
use aun_providers::LlmProvider;
use aun_sessions::{ContentFilter, IntentClassifier, MemoryWindow, WindowMessage};
use aun_tools::ToolRegistry;

use super::dispatch::{GenerationParams, ReplyDispatcher, ReplyStrategy};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Shared services
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Everything a session needs that is identical across sessions.
pub struct SessionServices {
    pub filter: ContentFilter,
    pub classifier: IntentClassifier,
    pub dispatcher: ReplyDispatcher,
    pub system_prompt: String,
    pub window_size: usize,
    pub redirect_message: String,
    pub transient_error_message: String,
    pub agent_error_message: String,
    pub turn_timeout: Duration,
}

impl SessionServices {
    pub fn from_config(config: &Config, provider: Arc<dyn LlmProvider>) -> Self {
        let policy = &config.policy;
        let tools = Arc::new(ToolRegistry::from_config(&config.agent));
        let params = GenerationParams {
            temperature: Some(config.llm.temperature),
            max_tokens: config.llm.max_tokens,
            max_tool_loops: config.agent.max_tool_loops,
        };

        Self {
            filter: ContentFilter::new(&policy.denylist),
            classifier: IntentClassifier::from_config(&policy.intent_rules),
            dispatcher: ReplyDispatcher::new(provider, tools, params, policy.state_instruction.clone()),
            system_prompt: policy.system_prompt.clone(),
            window_size: config.sessions.window_size,
            redirect_message: policy.redirect_message.clone(),
            transient_error_message: policy.transient_error_message.clone(),
            agent_error_message: policy.agent_error_message.clone(),
            turn_timeout: Duration::from_millis(config.sessions.turn_timeout_ms),
        }
    }

    fn error_message_for(&self, strategy: ReplyStrategy) -> &str {
        match strategy {
            ReplyStrategy::Direct => &self.transient_error_message,
            ReplyStrategy::ToolAugmented => &self.agent_error_message,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Turn results
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// What a single turn produced.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub reply: String,
    /// `None` when the content filter redirected the turn.
    pub intent: Option<Intent>,
    pub strategy: Option<ReplyStrategy>,
    pub tools_invoked: Vec<String>,
    pub filtered: bool,
    /// The reply is the fixed transient-error text.
    pub upstream_failed: bool,
}

impl TurnOutcome {
    fn redirected(reply: String) -> Self {
        Self {
            reply,
            intent: None,
            strategy: None,
            tools_invoked: Vec::new(),
            filtered: true,
            upstream_failed: false,
        }
    }
}

/// A point-in-time copy of a session's state and memory.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub key: String,
    pub state: DiscourseState,
    pub messages: Vec<WindowMessage>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ConversationSession
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

struct SessionInner {
    window: MemoryWindow,
    state: DiscourseState,
}

pub struct ConversationSession {
    key: String,
    services: Arc<SessionServices>,
    inner: Mutex<SessionInner>,
}

impl ConversationSession {
    pub fn new(key: impl Into<String>, services: Arc<SessionServices>) -> Self {
        let window = MemoryWindow::new(services.system_prompt.clone(), services.window_size);
        Self {
            key: key.into(),
            services,
            inner: Mutex::new(SessionInner {
                window,
                state: DiscourseState::Neutral,
            }),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Run one turn and return the text shown to the user.
    pub async fn turn(&self, input: &str) -> String {
        self.turn_with_outcome(input).await.reply
    }

    /// Run one turn and report how the reply was produced.
    pub async fn turn_with_outcome(&self, input: &str) -> TurnOutcome {
        let span = tracing::info_span!("turn", session_key = %self.key);
        self.run_turn(input).instrument(span).await
    }

    async fn run_turn(&self, input: &str) -> TurnOutcome {
        let services = &self.services;

        if services.filter.is_prohibited(input) {
            tracing::info!("turn redirected by content filter");
            TraceEvent::TurnFiltered {
                session_key: self.key.clone(),
            }
            .emit();
            return TurnOutcome::redirected(services.redirect_message.clone());
        }

        let mut inner = self.inner.lock().await;

        inner.window.push_user(input);

        let intent = services.classifier.classify(input);
        inner.state = DiscourseState::from(intent);
        let strategy = ReplyStrategy::for_intent(intent);
        TraceEvent::IntentClassified {
            session_key: self.key.clone(),
            intent: intent.to_string(),
            state: inner.state.to_string(),
        }
        .emit();

        let generated = tokio::time::timeout(
            services.turn_timeout,
            services.dispatcher.generate(intent, &inner.window, inner.state),
        )
        .await
        .unwrap_or_else(|_| {
            Err(Error::Timeout(format!(
                "reply generation exceeded {} ms",
                services.turn_timeout.as_millis()
            )))
        });

        let (reply, tools_invoked, upstream_failed) = match generated {
            Ok(reply) => {
                if !reply.tools_invoked.is_empty() {
                    tracing::info!(tools = ?reply.tools_invoked, "agent used tools");
                }
                (reply.content, reply.tools_invoked, false)
            }
            Err(e) => {
                if e.is_upstream() {
                    tracing::warn!(strategy = strategy.as_str(), error = %e, "reply generation failed");
                } else {
                    tracing::error!(strategy = strategy.as_str(), error = %e, "unexpected reply failure");
                }
                TraceEvent::UpstreamFailure {
                    session_key: self.key.clone(),
                    strategy: strategy.as_str().to_owned(),
                    error: e.to_string(),
                }
                .emit();
                (services.error_message_for(strategy).to_owned(), Vec::new(), true)
            }
        };

        inner.window.push_assistant(reply.clone());
        let dropped = inner.window.trim();
        if dropped > 0 {
            TraceEvent::MemoryTrimmed {
                session_key: self.key.clone(),
                dropped,
                retained: inner.window.history_len(),
            }
            .emit();
        }

        TurnOutcome {
            reply,
            intent: Some(intent),
            strategy: Some(strategy),
            tools_invoked,
            filtered: false,
            upstream_failed,
        }
    }

    /// Current discourse state.  Waits for any in-flight turn.
    pub async fn state(&self) -> DiscourseState {
        self.inner.lock().await.state
    }

    /// Copy of the state and memory window.  Waits for any in-flight turn.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner.lock().await;
        SessionSnapshot {
            key: self.key.clone(),
            state: inner.state,
            messages: inner.window.messages().to_vec(),
        }
    }
}
