//! 会话与聊天 API DTO

use crate::coach::relationship::PartnerProfile;
use crate::coach::serialization::{deserialize_timestamp, deserialize_vec_or_null};
use crate::coach::session::models::{Message, SessionContext, SessionHistory, SessionSummary};
use crate::coach::user::SelfAssessment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 未选择关系上下文时发送的关系类型
pub const GENERAL_RELATIONSHIP_TYPE: &str = "general";

/// 服务器返回的原始会话记录（列表与历史共用）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default, alias = "id", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<String>,
    #[serde(default)]
    pub context_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_profile: Option<PartnerProfile>,
    #[serde(
        default,
        deserialize_with = "deserialize_vec_or_null",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub messages: Vec<Message>,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    fn with_context(mut self, context: SessionContext) -> Self {
        self.context_type = Some(context.context_type().to_string());
        match context {
            SessionContext::General => {
                self.relationship_type = Some(GENERAL_RELATIONSHIP_TYPE.to_string());
                self.partner_profile = None;
            }
            SessionContext::Partner {
                relationship_type,
                partner_profile,
            } => {
                self.relationship_type = Some(relationship_type.as_str().to_string());
                self.partner_profile = Some(partner_profile);
            }
        }
        self
    }
}

impl From<SessionSummary> for SessionRecord {
    fn from(s: SessionSummary) -> Self {
        SessionRecord {
            session_id: Some(s.session_id),
            user_id: s.user_id,
            created_at: s.created_at,
            updated_at: s.updated_at,
            ..Default::default()
        }
        .with_context(s.context)
    }
}

impl From<SessionHistory> for SessionRecord {
    fn from(h: SessionHistory) -> Self {
        SessionRecord {
            session_id: h.session_id,
            messages: h.messages,
            updated_at: h.updated_at,
            ..Default::default()
        }
        .with_context(h.context)
    }
}

/// 会话列表响应
#[derive(Debug, Clone, Deserialize)]
pub struct SessionsResp {
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub sessions: Vec<SessionSummary>,
}

/// 聊天请求（POST /api/chat），缺省字段不出现在请求体中
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
    pub relationship_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_profile: Option<PartnerProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_assessment: Option<SelfAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// 聊天响应
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub response: String,
    #[serde(default)]
    pub tokens_used: Option<u32>,
}

/// 空对话时提供的快捷提问
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    CommunicationTips,
    DateIdeas,
    ConflictResolution,
}

impl QuickAction {
    pub fn prompt(&self) -> &'static str {
        match self {
            QuickAction::CommunicationTips => {
                "Can you give me some tips for better communication in my relationship?"
            }
            QuickAction::DateIdeas => "What are some creative date ideas for us?",
            QuickAction::ConflictResolution => "How can we resolve conflicts in a healthy way?",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_omits_absent_fields() {
        let req = ChatRequest {
            user_id: "u-1".into(),
            message: "hi".into(),
            relationship_type: GENERAL_RELATIONSHIP_TYPE.into(),
            partner_profile: None,
            self_assessment: None,
            session_id: None,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({"user_id": "u-1", "message": "hi", "relationship_type": "general"})
        );
    }

    #[test]
    fn sessions_response_tolerates_null_list() {
        let resp: SessionsResp = serde_json::from_str(r#"{"sessions": null}"#).unwrap();
        assert!(resp.sessions.is_empty());
    }
}
