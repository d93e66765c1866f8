//! Bounded conversation memory with a pinned system preamble.
//!
//! Index 0 always holds the single system message.  Everything after it is
//! history in append order; [`MemoryWindow::trim`] discards the oldest
//! history first until at most `capacity` messages remain.

use serde::Serialize;

use aun_domain::tool::{Message, Role};

/// One remembered message.  Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowMessage {
    pub role: Role,
    pub content: String,
    /// Monotonic per-window sequence number; the preamble is 0.
    pub sequence: u64,
}

impl WindowMessage {
    pub fn to_message(&self) -> Message {
        match self.role {
            Role::System => Message::system(self.content.clone()),
            Role::Assistant => Message::assistant(self.content.clone()),
            _ => Message::user(self.content.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemoryWindow {
    messages: Vec<WindowMessage>,
    capacity: usize,
    next_sequence: u64,
}

impl MemoryWindow {
    pub fn new(system_prompt: impl Into<String>, capacity: usize) -> Self {
        let system = WindowMessage {
            role: Role::System,
            content: system_prompt.into(),
            sequence: 0,
        };
        Self {
            messages: vec![system],
            capacity,
            next_sequence: 1,
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> u64 {
        self.push(Role::User, content.into())
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) -> u64 {
        self.push(Role::Assistant, content.into())
    }

    fn push(&mut self, role: Role, content: String) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.messages.push(WindowMessage {
            role,
            content,
            sequence,
        });
        sequence
    }

    /// Drop the oldest history until at most `capacity` messages follow the
    /// preamble.  Returns how many were dropped.
    pub fn trim(&mut self) -> usize {
        let excess = self.history_len().saturating_sub(self.capacity);
        if excess > 0 {
            self.messages.drain(1..1 + excess);
        }
        excess
    }

    pub fn system(&self) -> &WindowMessage {
        &self.messages[0]
    }

    /// Preamble followed by history.
    pub fn messages(&self) -> &[WindowMessage] {
        &self.messages
    }

    /// History only (everything after the preamble).
    pub fn history(&self) -> &[WindowMessage] {
        &self.messages[1..]
    }

    pub fn history_len(&self) -> usize {
        self.messages.len() - 1
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// An owned copy in the completion-service message format.  Callers may
    /// extend it freely; the window itself is never affected.
    pub fn to_messages(&self) -> Vec<Message> {
        self.messages.iter().map(WindowMessage::to_message).collect()
    }
}
