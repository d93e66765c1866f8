//! Conversation vocabulary shared by the classifier, the session state
//! machine, and configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The classified purpose of a single user turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Education,
    Support,
    Booking,
    Casual,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Education => "education",
            Intent::Support => "support",
            Intent::Booking => "booking",
            Intent::Casual => "casual",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A session's current conversational mode, derived from the latest intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscourseState {
    #[default]
    Neutral,
    Support,
    Education,
    Booking,
}

impl DiscourseState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscourseState::Neutral => "neutral",
            DiscourseState::Support => "support",
            DiscourseState::Education => "education",
            DiscourseState::Booking => "booking",
        }
    }
}

impl From<Intent> for DiscourseState {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::Education => DiscourseState::Education,
            Intent::Support => DiscourseState::Support,
            Intent::Booking => DiscourseState::Booking,
            Intent::Casual => DiscourseState::Neutral,
        }
    }
}

impl fmt::Display for DiscourseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
