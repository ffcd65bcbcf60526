//! 用户本地模型定义

use crate::coach::serialization::{deserialize_timestamp, deserialize_vec_or_null};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 自我评估（全部字段可选，未填写的字段不发送）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelfAssessment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub love_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication_style: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_vec_or_null",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub emotional_patterns: Vec<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_vec_or_null",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub strengths: Vec<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_vec_or_null",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub growth_areas: Vec<String>,
}

impl SelfAssessment {
    /// 是否一个字段都没有填写
    pub fn is_empty(&self) -> bool {
        self.personality_type.is_none()
            && self.love_language.is_none()
            && self.communication_style.is_none()
            && self.emotional_patterns.is_empty()
            && self.strengths.is_empty()
            && self.growth_areas.is_empty()
    }

    /// 空评估视为 None，保证请求体里不出现空对象
    pub fn into_option(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

/// 用户资料（服务器返回）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(alias = "id")]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_assessment: Option<SelfAssessment>,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// 聊天和建议请求中携带的自我评估，空评估不发送
    pub fn assessment(&self) -> Option<SelfAssessment> {
        self.self_assessment
            .clone()
            .and_then(SelfAssessment::into_option)
    }
}
