use crate::llm::{Message, Role};
use crate::tokenizer::Tokenizer;

/// Append-only, ordered conversation log.
///
/// A developer message may only ever sit at index 0. Messages are never
/// reordered, trimmed or removed individually; [`clear`](Self::clear) is the
/// only way to shrink the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a history from persisted messages, rejecting sequences that
    /// break role discipline.
    pub fn from_messages(messages: Vec<Message>) -> Result<Self, String> {
        if let Some(pos) = messages
            .iter()
            .skip(1)
            .position(|m| m.role == Role::Developer)
        {
            return Err(format!(
                "developer message at position {} (only allowed first)",
                pos + 1
            ));
        }
        Ok(Self { messages })
    }

    /// Append the priming message. Only takes effect on an empty history;
    /// returns whether it was added.
    pub fn add_developer_message(&mut self, content: impl Into<String>) -> bool {
        if !self.messages.is_empty() {
            return false;
        }
        self.messages.push(Message::developer(content));
        true
    }

    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn add_assistant_message(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// All messages in append order, developer priming first when present.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn has_developer_message(&self) -> bool {
        self.messages
            .first()
            .is_some_and(|m| m.role == Role::Developer)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn estimate_tokens<T: Tokenizer + ?Sized>(&self, tokenizer: &T) -> usize {
        self.messages
            .iter()
            .map(|m| tokenizer.count_tokens(&m.content))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_developer_only_on_empty() {
        let mut history = ConversationHistory::new();
        assert!(history.add_developer_message("prime"));
        assert!(!history.add_developer_message("again"));
        assert_eq!(history.len(), 1);
        assert!(history.has_developer_message());
    }

    #[test]
    fn test_developer_refused_after_user() {
        let mut history = ConversationHistory::new();
        history.add_user_message("hi");
        assert!(!history.add_developer_message("prime"));
        assert!(!history.has_developer_message());
    }

    #[test]
    fn test_from_messages_rejects_late_developer() {
        let messages = vec![Message::user("a"), Message::developer("b")];
        let err = ConversationHistory::from_messages(messages).unwrap_err();
        assert!(err.contains("position 1"));
    }

    #[test]
    fn test_from_messages_accepts_leading_developer() {
        let messages = vec![Message::developer("p"), Message::user("a")];
        let history = ConversationHistory::from_messages(messages.clone()).unwrap();
        assert_eq!(history.messages(), messages.as_slice());
    }
}
