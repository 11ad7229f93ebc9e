//! Conversation messages
//!
//! A conversation is a list of [`Message`]s. Plain turns carry text; tool
//! round trips carry [`ContentBlock::ToolUse`] (assistant) and
//! [`ContentBlock::ToolResult`] (user) blocks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// Structured part of a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Text
    Text { text: String },

    /// Tool call requested by the assistant
    ToolUse {
        /// Call ID assigned by the model
        id: String,
        /// Tool name
        name: String,
        /// Arguments
        input: Value,
    },

    /// Output of a tool call, sent back as a user turn
    ToolResult {
        /// ID of the matching [`ContentBlock::ToolUse`]
        tool_use_id: String,
        /// Tool output, or the failure description
        content: String,
        /// Set when the tool failed
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        is_error: bool,
    },
}

/// Body of a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text
    Text(String),
    /// Ordered content blocks
    Blocks(Vec<ContentBlock>),
}

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the turn
    pub role: Role,

    /// Body of the turn
    pub content: MessageContent,
}

impl Message {
    /// User turn with plain text
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Assistant turn with plain text
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Assistant turn that requested tool calls
    ///
    /// Empty text is dropped so that pure tool-call turns carry only
    /// tool-use blocks.
    pub fn assistant_blocks(text: String, tool_uses: Vec<ContentBlock>) -> Self {
        let text = (!text.is_empty()).then_some(ContentBlock::Text { text });
        Self {
            role: Role::Assistant,
            content: MessageContent::Blocks(text.into_iter().chain(tool_uses).collect()),
        }
    }

    /// Successful tool output for call `tool_use_id`
    pub fn tool_result(tool_use_id: String, output: String) -> Self {
        Self::tool_output(tool_use_id, output, false)
    }

    /// Failed tool call `tool_use_id`
    pub fn tool_error(tool_use_id: String, error: String) -> Self {
        Self::tool_output(tool_use_id, error, true)
    }

    fn tool_output(tool_use_id: String, content: String, is_error: bool) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Blocks(vec![ContentBlock::ToolResult {
                tool_use_id,
                content,
                is_error,
            }]),
        }
    }

    /// Content blocks; empty for plain-text turns
    pub fn blocks(&self) -> &[ContentBlock] {
        match &self.content {
            MessageContent::Blocks(blocks) => blocks,
            MessageContent::Text(_) => &[],
        }
    }

    /// First text of the turn
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(text) => Some(text),
            MessageContent::Blocks(blocks) => blocks.iter().find_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            }),
        }
    }

    /// Tool calls requested in this turn
    pub fn tool_uses(&self) -> impl Iterator<Item = &ContentBlock> {
        self.blocks()
            .iter()
            .filter(|block| matches!(block, ContentBlock::ToolUse { .. }))
    }

    pub fn has_tool_uses(&self) -> bool {
        self.tool_uses().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_message() {
        let msg = Message::user("itchy skin");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text(), Some("itchy skin"));
        assert!(msg.blocks().is_empty());
    }

    #[test]
    fn test_tool_error_is_flagged() {
        let msg = Message::tool_error("call_1".to_string(), "Error: timeout".to_string());
        assert!(matches!(
            msg.blocks(),
            [ContentBlock::ToolResult { is_error: true, .. }]
        ));

        let json = serde_json::to_value(Message::tool_result("call_2".into(), "ok".into())).unwrap();
        assert!(json["content"][0].get("is_error").is_none());
    }

    #[test]
    fn test_assistant_blocks_drop_empty_text() {
        let tool_use = ContentBlock::ToolUse {
            id: "call_1".to_string(),
            name: "duckduckgo_search".to_string(),
            input: json!({"query": "nausea"}),
        };
        let msg = Message::assistant_blocks(String::new(), vec![tool_use]);
        assert_eq!(msg.text(), None);
        assert_eq!(msg.blocks().len(), 1);
        assert!(msg.has_tool_uses());

        let msg = Message::assistant_blocks("Checking".to_string(), vec![]);
        assert_eq!(msg.text(), Some("Checking"));
        assert!(!msg.has_tool_uses());
    }
}
