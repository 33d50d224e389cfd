//! Per-session chat transcript.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Who produced a chat turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChatRole {
    /// The person using the tool.
    User,
    /// The chat-completion service.
    Assistant,
}

impl ChatRole {
    /// Prefix used when rendering a transcript.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Assistant => "Bot",
        }
    }
}

/// One entry in a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Speaker.
    pub role: ChatRole,
    /// What was said.
    pub text: String,
}

/// Append-only list of chat turns; [`Self::clear`] is the only removal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatHistory {
    turns: Vec<ChatTurn>,
}

impl ChatHistory {
    /// Creates an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Appends a turn.
    pub fn append_turn(&mut self, role: ChatRole, text: impl Into<String>) {
        self.turns.push(ChatTurn {
            role,
            text: text.into(),
        });
    }

    /// Drops every turn.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Turns in insertion order.
    #[must_use]
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Number of turns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether there are no turns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Role-prefixed transcript, one turn per line.
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = String::new();
        for turn in &self.turns {
            let _ = writeln!(output, "{}: {}", turn.role.label(), turn.text);
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let mut history = ChatHistory::new();
        history.append_turn(ChatRole::User, "How do I save energy?");
        history.append_turn(ChatRole::Assistant, "Switch to LEDs.");
        history.append_turn(ChatRole::User, "Thanks");

        let roles: Vec<ChatRole> = history.turns().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![ChatRole::User, ChatRole::Assistant, ChatRole::User]
        );
    }

    #[test]
    fn renders_role_prefixes() {
        let mut history = ChatHistory::new();
        history.append_turn(ChatRole::User, "hi");
        history.append_turn(ChatRole::Assistant, "hello");
        assert_eq!(history.render(), "You: hi\nBot: hello\n");
    }

    #[test]
    fn clear_empties_history() {
        let mut history = ChatHistory::new();
        history.append_turn(ChatRole::User, "hi");
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.render(), "");
    }
}
