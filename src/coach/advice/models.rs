//! 建议本地模型定义

use crate::coach::relationship::PartnerProfile;
use crate::coach::serialization::{deserialize_timestamp, preview_text};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 列表预览的最大字符数
pub const PREVIEW_CHARS: usize = 100;

/// 建议主题（固定集合），服务器返回未知主题时保留原始字符串
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AdviceTopic {
    Communication,
    ConflictResolution,
    DateIdeas,
    GiftIdeas,
    TrustBuilding,
    LongDistance,
    FamilyDynamics,
    SelfGrowth,
    Other(String),
}

impl AdviceTopic {
    pub const ALL: [AdviceTopic; 8] = [
        AdviceTopic::Communication,
        AdviceTopic::ConflictResolution,
        AdviceTopic::DateIdeas,
        AdviceTopic::GiftIdeas,
        AdviceTopic::TrustBuilding,
        AdviceTopic::LongDistance,
        AdviceTopic::FamilyDynamics,
        AdviceTopic::SelfGrowth,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            AdviceTopic::Communication => "communication",
            AdviceTopic::ConflictResolution => "conflict_resolution",
            AdviceTopic::DateIdeas => "date_ideas",
            AdviceTopic::GiftIdeas => "gift_ideas",
            AdviceTopic::TrustBuilding => "trust_building",
            AdviceTopic::LongDistance => "long_distance",
            AdviceTopic::FamilyDynamics => "family_dynamics",
            AdviceTopic::SelfGrowth => "self_growth",
            AdviceTopic::Other(s) => s,
        }
    }

    /// 是否属于固定主题集合
    pub fn is_known(&self) -> bool {
        !matches!(self, AdviceTopic::Other(_))
    }
}

impl From<String> for AdviceTopic {
    fn from(s: String) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .unwrap_or(AdviceTopic::Other(s))
    }
}

impl From<AdviceTopic> for String {
    fn from(t: AdviceTopic) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for AdviceTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdviceTopic {
    type Err = anyhow::Error;

    /// 只接受固定集合中的主题（同时接受连字符写法）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match AdviceTopic::from(normalized) {
            AdviceTopic::Other(_) => Err(anyhow::anyhow!("未知的建议主题: {}", s)),
            topic => Ok(topic),
        }
    }
}

/// 完整的建议记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    #[serde(alias = "id")]
    pub advice_id: String,
    #[serde(default)]
    pub user_id: String,
    pub topic: AdviceTopic,
    #[serde(default)]
    pub situation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_profile: Option<PartnerProfile>,
    #[serde(default)]
    pub content: String,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

/// 建议列表项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceSummary {
    #[serde(alias = "id")]
    pub advice_id: String,
    pub topic: AdviceTopic,
    #[serde(default)]
    pub preview: String,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Advice> for AdviceSummary {
    /// 服务器未返回预览时由正文生成
    fn from(a: &Advice) -> Self {
        let preview = a
            .preview
            .clone()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| preview_text(&a.content, PREVIEW_CHARS));
        Self {
            advice_id: a.advice_id.clone(),
            topic: a.topic.clone(),
            preview,
            created_at: a.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topics_round_trip_through_strings() {
        for topic in AdviceTopic::ALL {
            let json = serde_json::to_string(&topic).unwrap();
            let back: AdviceTopic = serde_json::from_str(&json).unwrap();
            assert_eq!(back, topic);
        }
    }

    #[test]
    fn unknown_topic_from_server_is_preserved() {
        let topic: AdviceTopic = serde_json::from_str(r#""holiday_stress""#).unwrap();
        assert_eq!(topic, AdviceTopic::Other("holiday_stress".into()));
        assert!(!topic.is_known());
        // 用户输入只接受固定集合
        assert!("holiday_stress".parse::<AdviceTopic>().is_err());
        assert_eq!(
            "Date-Ideas".parse::<AdviceTopic>().unwrap(),
            AdviceTopic::DateIdeas
        );
    }

    #[test]
    fn summary_falls_back_to_content_preview() {
        let advice: Advice = serde_json::from_str(
            r#"{"id": "a-1", "topic": "gift_ideas", "situation": "s", "content": "Try a handwritten letter."}"#,
        )
        .unwrap();
        let summary = AdviceSummary::from(&advice);
        assert_eq!(summary.advice_id, "a-1");
        assert_eq!(summary.preview, "Try a handwritten letter.");
    }
}
