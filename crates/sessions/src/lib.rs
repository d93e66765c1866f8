//! Per-turn building blocks of a conversation session.
//!
//! The content filter and intent classifier are pure functions over the raw
//! input text; the memory window is the bounded, ordered history a session
//! owns and sends to the completion service.

pub mod filter;
pub mod intent;
pub mod window;

pub use filter::ContentFilter;
pub use intent::{IntentClassifier, IntentRule, INTENT_PRIORITY};
pub use window::{MemoryWindow, WindowMessage};
