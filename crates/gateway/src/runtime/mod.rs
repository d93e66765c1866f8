//! Conversation runtime: reply strategies, the agent loop, the per-key
//! session state machine, and the registry that owns live sessions.

pub mod agent;
pub mod dispatch;
pub mod registry;
pub mod session;

pub use dispatch::{Reply, ReplyDispatcher, ReplyStrategy};
pub use registry::SessionRegistry;
pub use session::{ConversationSession, SessionServices, SessionSnapshot, TurnOutcome};
