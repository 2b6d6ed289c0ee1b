use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Distinguishes an explicit `null` (`Some(Value::Null)`) from a missing key (`None`).
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JoinDocumentMessage {
    pub document_id: String,
    pub username: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestAccessMessage {
    pub document_id: String,
    pub username: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApproveAccessMessage {
    pub document_id: String,
    /// Opaque payload handed to every pending requester.
    #[serde(default, deserialize_with = "deserialize_present", skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    pub username: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DenyAccessMessage {
    pub document_id: String,
    pub username: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReceivedMessage {
    JoinDocument(JoinDocumentMessage),
    RequestAccess(RequestAccessMessage),
    ApproveAccess(ApproveAccessMessage),
    DenyAccess(DenyAccessMessage),
    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NoticeMessage {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequestMessage {
    pub document_id: String,
    pub username: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AccessGrantedMessage {
    #[serde(default, deserialize_with = "deserialize_present", skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SendMessage {
    JoinedDocument(NoticeMessage),
    Error(NoticeMessage),
    AccessRequest(AccessRequestMessage),
    AccessRequested(NoticeMessage),
    AccessGranted(AccessGrantedMessage),
    AccessDenied(NoticeMessage),
}

impl SendMessage {
    pub fn joined(message: impl Into<String>) -> Self {
        SendMessage::JoinedDocument(NoticeMessage { message: message.into() })
    }

    pub fn error(message: impl Into<String>) -> Self {
        SendMessage::Error(NoticeMessage { message: message.into() })
    }

    pub fn access_requested(message: impl Into<String>) -> Self {
        SendMessage::AccessRequested(NoticeMessage { message: message.into() })
    }

    pub fn access_denied(message: impl Into<String>) -> Self {
        SendMessage::AccessDenied(NoticeMessage { message: message.into() })
    }
}
