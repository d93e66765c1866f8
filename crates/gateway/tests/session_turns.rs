//! End-to-end turns through the registry and session state machine, with a
//! scripted completion service standing in for the network.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use aun_domain::config::{Config, EvictionPolicy};
use aun_domain::conversation::{DiscourseState, Intent};
use aun_domain::error::{Error, Result};
use aun_domain::tool::{Role, ToolCall};
use aun_gateway::bootstrap::build_with_provider;
use aun_gateway::runtime::ReplyStrategy;
use aun_gateway::state::AppState;
use aun_providers::{ChatRequest, ChatResponse, LlmProvider};

// ── Mock completion service ──────────────────────────────────────────

#[derive(Default)]
struct MockProvider {
    script: Mutex<VecDeque<Result<ChatResponse>>>,
    requests: Mutex<Vec<ChatRequest>>,
    delay: Duration,
}

impl MockProvider {
    fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    fn push(&self, resp: Result<ChatResponse>) {
        self.script.lock().push_back(resp);
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

fn text(content: &str) -> ChatResponse {
    ChatResponse {
        content: content.into(),
        tool_calls: Vec::new(),
        usage: None,
        model: "mock".into(),
        finish_reason: Some("stop".into()),
    }
}

fn calls(calls: Vec<ToolCall>) -> ChatResponse {
    ChatResponse {
        content: String::new(),
        tool_calls: calls,
        usage: None,
        model: "mock".into(),
        finish_reason: Some("tool_calls".into()),
    }
}

#[async_trait::async_trait]
impl LlmProvider for MockProvider {
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().push(req.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let scripted = self.script.lock().pop_front();
        match scripted {
            Some(resp) => resp,
            None => {
                let last_user = req
                    .messages
                    .iter()
                    .rev()
                    .find(|m| m.role == Role::User)
                    .and_then(|m| m.content.text())
                    .unwrap_or_default();
                Ok(text(&format!("re:{last_user}")))
            }
        }
    }

    fn provider_id(&self) -> &str {
        "mock"
    }

    fn default_model(&self) -> &str {
        "mock"
    }
}

fn app(config: Config, provider: Arc<MockProvider>) -> AppState {
    build_with_provider(Arc::new(config), provider)
}

fn default_app() -> (AppState, Arc<MockProvider>) {
    let provider = Arc::new(MockProvider::default());
    (app(Config::default(), provider.clone()), provider)
}

// ── Content filter ───────────────────────────────────────────────────

#[tokio::test]
async fn filtered_turn_returns_redirect_and_leaves_memory_untouched() {
    let (state, provider) = default_app();
    let session = state.registry.get_or_create("u1");

    let outcome = session.turn_with_outcome("I want PORN please").await;

    assert!(outcome.filtered);
    assert_eq!(outcome.reply, state.config.policy.redirect_message);
    assert_eq!(outcome.intent, None);
    assert!(provider.requests().is_empty());

    let snap = session.snapshot().await;
    assert_eq!(snap.messages.len(), 1);
    assert_eq!(snap.state, DiscourseState::Neutral);
}

#[tokio::test]
async fn filtered_turn_keeps_previous_state() {
    let (state, _provider) = default_app();
    let session = state.registry.get_or_create("u1");

    session.turn("أنا متوتر جداً").await;
    assert_eq!(session.state().await, DiscourseState::Support);

    session.turn("خمور").await;
    assert_eq!(session.state().await, DiscourseState::Support);
}

// ── Memory window ────────────────────────────────────────────────────

#[tokio::test]
async fn window_grows_by_two_and_stays_bounded() {
    let mut config = Config::default();
    config.sessions.window_size = 4;
    let provider = Arc::new(MockProvider::default());
    let state = app(config, provider);
    let session = state.registry.get_or_create("u1");

    let mut prev = 0;
    for i in 0..5 {
        session.turn(&format!("مرحبا {i}")).await;
        let snap = session.snapshot().await;
        let history = snap.messages.len() - 1;
        assert_eq!(history, (prev + 2).min(4));
        assert_eq!(snap.messages[0].role, Role::System);
        assert_eq!(snap.messages[0].content, state.config.policy.system_prompt);
        prev = history;
    }

    let snap = session.snapshot().await;
    assert_eq!(snap.messages[1].content, "مرحبا 3");
    assert_eq!(snap.messages[4].content, "re:مرحبا 4");
}

#[tokio::test]
async fn sessions_do_not_share_memory() {
    let (state, _provider) = default_app();
    let a = state.registry.get_or_create("a");
    let b = state.registry.get_or_create("b");

    a.turn("مرحبا").await;

    assert_eq!(a.snapshot().await.messages.len(), 3);
    assert_eq!(b.snapshot().await.messages.len(), 1);
}

// ── Registry ─────────────────────────────────────────────────────────

#[tokio::test]
async fn get_or_create_is_idempotent() {
    let (state, _provider) = default_app();
    let first = state.registry.get_or_create("k");
    first.turn("مرحبا").await;

    let again = state.registry.get_or_create("k");
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(again.snapshot().await.messages.len(), 3);
    assert_eq!(state.registry.len(), 1);
}

#[tokio::test]
async fn overflow_clears_all_sessions() {
    let mut config = Config::default();
    config.sessions.max_sessions = 3;
    config.sessions.eviction = EvictionPolicy::ClearAll;
    let state = app(config, Arc::new(MockProvider::default()));

    for key in ["a", "b", "c"] {
        state.registry.get_or_create(key).turn("مرحبا").await;
    }
    assert_eq!(state.registry.len(), 3);

    state.registry.get_or_create("d");
    assert_eq!(state.registry.len(), 1);

    // An evicted key starts over with a fresh window.
    let a = state.registry.get_or_create("a");
    assert_eq!(a.snapshot().await.messages.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_get_or_create_respects_capacity() {
    let mut config = Config::default();
    config.sessions.max_sessions = 3;
    let state = app(config, Arc::new(MockProvider::default()));

    let tasks: Vec<_> = (0..16)
        .map(|t| {
            let registry = state.registry.clone();
            tokio::spawn(async move {
                for i in 0..25 {
                    let key = format!("t{t}-{i}");
                    let session = registry.get_or_create(&key);
                    assert_eq!(session.key(), key);
                    assert!(registry.len() <= registry.max_sessions());
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    assert!(state.registry.len() <= 3);
}

// ── Intent routing ───────────────────────────────────────────────────

#[tokio::test]
async fn education_turn_uses_direct_completion() {
    let (state, provider) = default_app();
    let session = state.registry.get_or_create("u1");

    let outcome = session.turn_with_outcome("اشرح لي معنى الصبر").await;

    assert_eq!(outcome.intent, Some(Intent::Education));
    assert_eq!(outcome.strategy, Some(ReplyStrategy::Direct));
    assert!(outcome.tools_invoked.is_empty());
    assert_eq!(session.state().await, DiscourseState::Education);

    let reqs = provider.requests();
    assert_eq!(reqs.len(), 1);
    assert!(reqs[0].tools.is_empty());
    // Preamble plus the new user message.
    assert_eq!(reqs[0].messages.len(), 2);
}

#[tokio::test]
async fn casual_turn_resets_state_to_neutral() {
    let (state, _provider) = default_app();
    let session = state.registry.get_or_create("u1");

    session.turn("أشعر بالقلق").await;
    assert_eq!(session.state().await, DiscourseState::Support);

    let outcome = session.turn_with_outcome("شكراً لك").await;
    assert_eq!(outcome.intent, Some(Intent::Casual));
    assert_eq!(session.state().await, DiscourseState::Neutral);
}

#[tokio::test]
async fn support_turn_appends_instruction_to_a_copy_only() {
    let (state, provider) = default_app();
    let session = state.registry.get_or_create("u1");

    let outcome = session.turn_with_outcome("أنا حزين اليوم").await;
    assert_eq!(outcome.strategy, Some(ReplyStrategy::ToolAugmented));

    let reqs = provider.requests();
    assert_eq!(reqs.len(), 1);
    assert!(!reqs[0].tools.is_empty());
    let last = reqs[0].messages.last().unwrap();
    assert_eq!(last.role, Role::System);
    assert!(last.content.extract_all_text().contains("support"));

    let snap = session.snapshot().await;
    let system_count = snap.messages.iter().filter(|m| m.role == Role::System).count();
    assert_eq!(system_count, 1);
    assert_eq!(snap.messages.len(), 3);
}

#[tokio::test]
async fn booking_turn_runs_tools_and_remembers_only_the_answer() {
    let (state, provider) = default_app();
    provider.push(Ok(calls(vec![ToolCall {
        call_id: "c1".into(),
        tool_name: "schedule_session".into(),
        arguments: serde_json::json!({ "name": "سارة" }),
    }])));
    provider.push(Ok(text("تم حجز جلستك")));
    let session = state.registry.get_or_create("u1");

    let outcome = session.turn_with_outcome("أريد أن احجز موعد").await;

    assert_eq!(outcome.intent, Some(Intent::Booking));
    assert_eq!(outcome.reply, "تم حجز جلستك");
    assert_eq!(outcome.tools_invoked, vec!["schedule_session".to_string()]);

    let reqs = provider.requests();
    assert_eq!(reqs.len(), 2);
    let tool_msg = reqs[1].messages.last().unwrap();
    assert_eq!(tool_msg.role, Role::Tool);

    let snap = session.snapshot().await;
    assert_eq!(snap.state, DiscourseState::Booking);
    assert_eq!(snap.messages.len(), 3);
    assert_eq!(snap.messages[2].content, "تم حجز جلستك");
}

// ── Failures ─────────────────────────────────────────────────────────

#[tokio::test]
async fn direct_failure_appends_transient_error_text() {
    let (state, provider) = default_app();
    provider.push(Err(Error::Http("connection refused".into())));
    let session = state.registry.get_or_create("u1");

    let outcome = session.turn_with_outcome("مرحبا").await;

    assert!(outcome.upstream_failed);
    assert_eq!(outcome.reply, state.config.policy.transient_error_message);
    let snap = session.snapshot().await;
    assert_eq!(snap.messages.len(), 3);
    assert_eq!(snap.messages[2].content, state.config.policy.transient_error_message);
}

#[tokio::test]
async fn agent_failure_uses_agent_error_text() {
    let (state, provider) = default_app();
    provider.push(Err(Error::Provider {
        provider: "mock".into(),
        message: "503".into(),
    }));
    let session = state.registry.get_or_create("u1");

    let outcome = session.turn_with_outcome("أنا قلق").await;

    assert!(outcome.upstream_failed);
    assert_eq!(outcome.reply, state.config.policy.agent_error_message);
    assert_eq!(session.state().await, DiscourseState::Support);
}

#[tokio::test]
async fn slow_completion_times_out_with_error_text() {
    let mut config = Config::default();
    config.sessions.turn_timeout_ms = 50;
    let provider = Arc::new(MockProvider::with_delay(Duration::from_secs(5)));
    let state = app(config, provider);
    let session = state.registry.get_or_create("u1");

    let outcome = session.turn_with_outcome("مرحبا").await;

    assert!(outcome.upstream_failed);
    assert_eq!(outcome.reply, state.config.policy.transient_error_message);
    assert_eq!(session.snapshot().await.messages.len(), 3);
}

// ── Concurrency ──────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_turns_on_one_session_do_not_interleave() {
    let provider = Arc::new(MockProvider::with_delay(Duration::from_millis(30)));
    let state = app(Config::default(), provider.clone());
    let session = state.registry.get_or_create("shared");

    let a = {
        let session = session.clone();
        tokio::spawn(async move { session.turn("مرحبا أ").await })
    };
    let b = {
        let session = session.clone();
        tokio::spawn(async move { session.turn("مرحبا ب").await })
    };
    let (ra, rb) = (a.await.unwrap(), b.await.unwrap());
    assert_eq!(ra, "re:مرحبا أ");
    assert_eq!(rb, "re:مرحبا ب");

    let snap = session.snapshot().await;
    assert_eq!(snap.messages.len(), 5);
    for pair in snap.messages[1..].chunks(2) {
        assert_eq!(pair[0].role, Role::User);
        assert_eq!(pair[1].content, format!("re:{}", pair[0].content));
    }

    // The second call saw the first turn's reply already in memory.
    let reqs = provider.requests();
    assert_eq!(reqs.len(), 2);
    assert_eq!(reqs[1].messages.len(), 4);
}
