//! Conversation domain entities

use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered conversation history (Entity).
///
/// Turns are strictly appended in the order operations complete. The one
/// exception is [`replace_last_assistant`](Self::replace_last_assistant),
/// which rewrites the content of the trailing assistant turn while a
/// streaming response accumulates.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// Replace the content of the last message if it is an assistant turn.
    ///
    /// Returns false (and leaves the history untouched) otherwise.
    pub fn replace_last_assistant(&mut self, content: impl Into<String>) -> bool {
        match self.messages.last_mut() {
            Some(last) if last.role == Role::Assistant => {
                last.content = content.into();
                true
            }
            _ => false,
        }
    }

    /// Clear all turns. No persistence survives a reset.
    pub fn reset(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let mut conv = Conversation::new();
        conv.push_user("hello");
        conv.push_assistant("hi there");
        conv.push_user("how are you?");

        assert_eq!(conv.len(), 3);
        assert_eq!(conv.messages()[0].role, Role::User);
        assert_eq!(conv.messages()[1].role, Role::Assistant);
        assert_eq!(conv.messages()[2].content, "how are you?");
    }

    #[test]
    fn test_replace_last_assistant() {
        let mut conv = Conversation::new();
        conv.push_user("hello");
        conv.push_assistant("partial");

        assert!(conv.replace_last_assistant("partial response, complete"));
        assert_eq!(conv.messages()[1].content, "partial response, complete");
        assert_eq!(conv.len(), 2);
    }

    #[test]
    fn test_replace_last_assistant_refuses_user_turn() {
        let mut conv = Conversation::new();
        conv.push_assistant("done");
        conv.push_user("next question");

        assert!(!conv.replace_last_assistant("overwritten"));
        assert_eq!(conv.messages()[1].content, "next question");
    }

    #[test]
    fn test_reset_clears_history() {
        let mut conv = Conversation::new();
        conv.push_user("hello");
        conv.push_assistant("hi");
        conv.reset();

        assert!(conv.is_empty());
    }
}
