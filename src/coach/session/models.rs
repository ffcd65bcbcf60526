//! 会话本地模型定义

use crate::coach::relationship::{PartnerProfile, Relationship, RelationshipType};
use crate::coach::serialization::deserialize_timestamp;
use crate::coach::session::types::SessionRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// 聊天消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: None,
        }
    }
}

/// 会话上下文
///
/// 只有同时带有关系类型和伴侣档案时才是 Partner，否则一律为 General
#[derive(Debug, Clone, PartialEq)]
pub enum SessionContext {
    General,
    Partner {
        relationship_type: RelationshipType,
        partner_profile: PartnerProfile,
    },
}

impl SessionContext {
    /// 由线上字段构造；关系类型为 "general" 或无法识别时视为通用上下文
    pub fn from_parts(
        relationship_type: Option<&str>,
        partner_profile: Option<PartnerProfile>,
    ) -> Self {
        let relationship_type = relationship_type.and_then(|t| t.parse::<RelationshipType>().ok());
        match (relationship_type, partner_profile) {
            (Some(relationship_type), Some(partner_profile)) => SessionContext::Partner {
                relationship_type,
                partner_profile,
            },
            _ => SessionContext::General,
        }
    }

    /// 对应线上的 `context_type` 字段
    pub fn context_type(&self) -> &'static str {
        match self {
            SessionContext::General => "general",
            SessionContext::Partner { .. } => "partner",
        }
    }

    pub fn is_partner(&self) -> bool {
        matches!(self, SessionContext::Partner { .. })
    }

    /// Partner 上下文转换为关系档案，供控制器设置当前聊天上下文
    pub fn to_relationship(&self, user_id: &str) -> Option<Relationship> {
        match self {
            SessionContext::General => None,
            SessionContext::Partner {
                relationship_type,
                partner_profile,
            } => Some(Relationship::from_snapshot(
                user_id,
                *relationship_type,
                partner_profile.clone(),
            )),
        }
    }
}

/// 会话列表项（列表接口不返回消息）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SessionRecord", into = "SessionRecord")]
pub struct SessionSummary {
    pub session_id: String,
    pub user_id: String,
    pub context: SessionContext,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<SessionRecord> for SessionSummary {
    fn from(r: SessionRecord) -> Self {
        Self {
            context: SessionContext::from_parts(r.relationship_type.as_deref(), r.partner_profile),
            session_id: r.session_id.unwrap_or_default(),
            user_id: r.user_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// 会话完整历史
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SessionRecord", into = "SessionRecord")]
pub struct SessionHistory {
    pub session_id: Option<String>,
    pub messages: Vec<Message>,
    pub context: SessionContext,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<SessionRecord> for SessionHistory {
    fn from(r: SessionRecord) -> Self {
        Self {
            context: SessionContext::from_parts(r.relationship_type.as_deref(), r.partner_profile),
            session_id: r.session_id,
            messages: r.messages,
            updated_at: r.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partner_context_requires_both_fields() {
        let profile = PartnerProfile {
            name: "Jordan".into(),
            ..Default::default()
        };
        assert!(SessionContext::from_parts(Some("romantic"), Some(profile.clone())).is_partner());
        assert!(!SessionContext::from_parts(None, Some(profile.clone())).is_partner());
        assert!(!SessionContext::from_parts(Some("general"), Some(profile)).is_partner());
        assert_eq!(
            SessionContext::from_parts(Some("family"), None),
            SessionContext::General
        );
    }

    #[test]
    fn session_summary_decodes_and_encodes_context_type() {
        let json = r#"{
            "session_id": "s-1",
            "user_id": "u-1",
            "relationship_type": "general",
            "context_type": "general",
            "partner_profile": null,
            "updated_at": "2024-05-02T10:00:00.000000"
        }"#;
        let summary: SessionSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.session_id, "s-1");
        assert_eq!(summary.context, SessionContext::General);

        let back = serde_json::to_value(&summary).unwrap();
        assert_eq!(back["context_type"], "general");
        assert!(back.get("partner_profile").is_none());
    }

    #[test]
    fn history_keeps_message_order() {
        let json = r#"{
            "messages": [
                {"role": "user", "content": "hi", "timestamp": "2024-05-02T10:00:00"},
                {"role": "assistant", "content": "hello"}
            ],
            "relationship_type": "friendship",
            "partner_profile": {"name": "Sam"}
        }"#;
        let history: SessionHistory = serde_json::from_str(json).unwrap();
        assert_eq!(history.messages.len(), 2);
        assert_eq!(history.messages[0].role, Role::User);
        assert!(history.messages[0].timestamp.is_some());
        assert_eq!(history.messages[1], Message::assistant("hello"));
        let rel = history.context.to_relationship("u-1").unwrap();
        assert_eq!(rel.relationship_type, RelationshipType::Friendship);
        assert_eq!(rel.partner_profile.name, "Sam");
    }
}
