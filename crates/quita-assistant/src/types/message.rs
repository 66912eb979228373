use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A thread message reduced to plain text.
///
/// The backend delivers message content as a list of typed blocks; all
/// text-typed blocks are concatenated into a single string per message and
/// everything else is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub text: String,
}

impl Message {
    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }
}

// ============================================================================
// WIRE TYPES (Assistants API message objects)
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct MessageList {
    pub data: Vec<MessageObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageObject {
    pub role: MessageRole,
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentBlock {
    Text { text: TextContent },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TextContent {
    pub value: String,
}

impl MessageObject {
    pub(crate) fn into_message(self) -> Message {
        let mut text = String::new();
        for block in self.content {
            if let ContentBlock::Text { text: t } = block {
                text.push_str(&t.value);
            }
        }
        Message {
            role: self.role,
            text,
        }
    }
}
