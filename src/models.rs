//! Wire types for the chat-completion payloads.
//!
//! These structs match the OpenAI-compatible chat-completion JSON shapes.
//! Requests serialize borrowed data (no copies on the hot path); responses
//! deserialize with every step of the `choices[0].message.content` path
//! individually optional, so a structurally valid but content-less reply
//! stays distinguishable from a document the codec rejected.

use serde::{Deserialize, Serialize};

/// Role attached to the outbound message.
pub const ROLE_USER: &str = "user";
/// Role the remote attaches to reply messages.
pub const ROLE_ASSISTANT: &str = "assistant";

/// Request payload for one chat-completion exchange.
///
/// Serializes to:
///
/// ```text
/// {"model":"<model>","messages":[{"role":"user","content":"<prompt>"}]}
/// ```
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
}

impl<'a> ChatRequest<'a> {
    /// Build a single-turn request: exactly one user message.
    pub fn single_turn(model: &'a str, prompt: &'a str) -> Self {
        Self {
            model,
            messages: vec![ChatMessage {
                role: ROLE_USER,
                content: prompt,
            }],
        }
    }
}

/// One entry of the `messages` array.
#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

/// Response payload for one chat-completion exchange.
///
/// Unknown fields (`id`, `object`, `usage`, ...) are ignored. A missing
/// `choices` array deserializes as empty rather than failing.
#[derive(Debug, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// One entry of the `choices` array.
#[derive(Debug, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ReplyMessage>,
}

/// The assistant message inside a choice. `content` may be absent or
/// null in degenerate but structurally valid replies.
#[derive(Debug, Deserialize)]
pub struct ReplyMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_turn_request_shape() {
        let request = ChatRequest::single_turn("gpt-3.5-turbo", "What is Rust?");
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"model":"gpt-3.5-turbo","messages":[{"role":"user","content":"What is Rust?"}]}"#
        );
    }

    #[test]
    fn test_reply_deserializes_with_extra_fields() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [{"message": {"role": "assistant", "content": "Hi!"}}],
            "usage": {"total_tokens": 9}
        }"#;
        let reply: ChatReply = serde_json::from_str(json).unwrap();
        let message = reply.choices[0].message.as_ref().unwrap();
        assert_eq!(message.role.as_deref(), Some(ROLE_ASSISTANT));
        assert_eq!(message.content.as_deref(), Some("Hi!"));
    }

    #[test]
    fn test_reply_tolerates_missing_choices() {
        let reply: ChatReply = serde_json::from_str("{}").unwrap();
        assert!(reply.choices.is_empty());
    }

    #[test]
    fn test_reply_tolerates_null_content() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let reply: ChatReply = serde_json::from_str(json).unwrap();
        assert!(reply.choices[0].message.as_ref().unwrap().content.is_none());
    }
}
