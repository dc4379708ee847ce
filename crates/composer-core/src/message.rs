//! Conversation message types.
//!
//! Every step of the composer pipeline records an [`AgentMessage`]. Messages
//! are immutable once created and only ever appended to a history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageType {
    /// Message typed by the user.
    User,
    /// Message produced by one of the pipeline agents.
    Agent,
}

/// Which simulated agent produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AgentType {
    Conversation,
    Specification,
    CodeGeneration,
    Error,
}

/// Pipeline phase a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    Conversation,
    Specification,
    CodeGeneration,
}

/// Outcome marker attached to agent messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MessageStatus {
    InProgress,
    Completed,
    Error,
}

/// Optional annotations on an agent message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_type: Option<AgentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MessageStatus>,
}

/// A single message in the composer conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMessage {
    /// Unique message identifier (UUID format).
    pub id: String,
    /// Author kind.
    #[serde(rename = "type")]
    pub message_type: MessageType,
    /// Message body.
    pub content: String,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl AgentMessage {
    /// Creates a message typed by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            message_type: MessageType::User,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: None,
        }
    }

    /// Creates an agent message tagged with its producing agent, phase and status.
    pub fn agent(
        content: impl Into<String>,
        agent_type: AgentType,
        phase: Option<Phase>,
        status: MessageStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            message_type: MessageType::Agent,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: Some(MessageMetadata {
                agent_type: Some(agent_type),
                phase,
                status: Some(status),
            }),
        }
    }

    /// Returns the producing agent, if any.
    pub fn agent_type(&self) -> Option<AgentType> {
        self.metadata.as_ref().and_then(|m| m.agent_type)
    }

    /// Returns true if this message reports a failed pipeline run.
    pub fn is_error(&self) -> bool {
        self.metadata
            .as_ref()
            .is_some_and(|m| m.status == Some(MessageStatus::Error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_has_no_metadata() {
        let msg = AgentMessage::user("build a todo app");
        assert_eq!(msg.message_type, MessageType::User);
        assert!(msg.metadata.is_none());
        assert!(!msg.is_error());
    }

    #[test]
    fn test_agent_message_ids_are_unique() {
        let a = AgentMessage::agent("a", AgentType::Conversation, None, MessageStatus::Completed);
        let b = AgentMessage::agent("b", AgentType::Conversation, None, MessageStatus::Completed);
        assert_ne!(a.id, b.id);
        assert_eq!(a.agent_type(), Some(AgentType::Conversation));
    }

    #[test]
    fn test_serializes_with_type_field() {
        let msg = AgentMessage::agent(
            "oops",
            AgentType::Error,
            None,
            MessageStatus::Error,
        );
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "agent");
        assert_eq!(json["metadata"]["agent_type"], "error");
        assert!(msg.is_error());
    }
}
