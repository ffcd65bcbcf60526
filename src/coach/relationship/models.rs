//! 关系本地模型定义

use crate::coach::serialization::{deserialize_timestamp, deserialize_vec_or_null};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 关系类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipType {
    Romantic,
    Friendship,
    Family,
    SelfGrowth,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 4] = [
        RelationshipType::Romantic,
        RelationshipType::Friendship,
        RelationshipType::Family,
        RelationshipType::SelfGrowth,
    ];

    /// 线上传输使用的字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Romantic => "romantic",
            RelationshipType::Friendship => "friendship",
            RelationshipType::Family => "family",
            RelationshipType::SelfGrowth => "self-growth",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("未知的关系类型: {}", s))
    }
}

/// 伴侣偏好（生日、纪念日、星座及各类喜好），不认识的键原样保留
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartnerPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anniversary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zodiac_sign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_preferences: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub religious_preferences: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vacation_preferences: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fashion_preferences: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_preferences: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl PartnerPreferences {
    pub fn is_empty(&self) -> bool {
        self.birthday.is_none()
            && self.anniversary.is_none()
            && self.zodiac_sign.is_none()
            && self.music_preferences.is_none()
            && self.religious_preferences.is_none()
            && self.vacation_preferences.is_none()
            && self.fashion_preferences.is_none()
            && self.dietary_preferences.is_none()
            && self.extra.is_empty()
    }
}

/// 伴侣档案
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartnerProfile {
    #[serde(default)]
    pub name: String,
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
    pub interests: Vec<String>,
    /// 后端默认值为 `{}`，空偏好解码为 None
    #[serde(
        default,
        deserialize_with = "deserialize_preferences",
        skip_serializing_if = "Option::is_none"
    )]
    pub preferences: Option<PartnerPreferences>,
}

fn deserialize_preferences<'de, D>(deserializer: D) -> Result<Option<PartnerPreferences>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<PartnerPreferences>::deserialize(deserializer)?;
    Ok(opt.filter(|p| !p.is_empty()))
}

impl PartnerProfile {
    /// 列表展示用的名字，缺失时显示 Unknown
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Unknown"
        } else {
            &self.name
        }
    }
}

/// 关系档案（属于某个用户，内嵌伴侣档案）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub user_id: String,
    pub relationship_type: RelationshipType,
    #[serde(default)]
    pub partner_profile: PartnerProfile,
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

impl Relationship {
    /// 用会话快照构造一个关系上下文（会话记录中不含时间信息）
    pub fn from_snapshot(
        user_id: &str,
        relationship_type: RelationshipType,
        partner_profile: PartnerProfile,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            relationship_type,
            partner_profile,
            created_at: None,
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationship_type_uses_kebab_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&RelationshipType::SelfGrowth).unwrap(),
            r#""self-growth""#
        );
        assert_eq!(
            "Self-Growth".parse::<RelationshipType>().unwrap(),
            RelationshipType::SelfGrowth
        );
        assert!("general".parse::<RelationshipType>().is_err());
    }

    #[test]
    fn relationship_decodes_backend_record() {
        let json = r#"{
            "user_id": "u-1",
            "relationship_type": "romantic",
            "partner_profile": {
                "name": "Jordan",
                "personality_type": null,
                "love_language": "Quality Time",
                "communication_style": null,
                "interests": ["hiking", "cooking"],
                "preferences": {}
            },
            "created_at": "2024-05-01T10:00:00.000000",
            "updated_at": "2024-05-02T10:00:00.000000"
        }"#;
        let rel: Relationship = serde_json::from_str(json).unwrap();
        assert_eq!(rel.relationship_type, RelationshipType::Romantic);
        assert_eq!(rel.partner_profile.display_name(), "Jordan");
        assert_eq!(rel.partner_profile.interests, vec!["hiking", "cooking"]);
        assert!(rel.partner_profile.preferences.is_none());
        assert!(rel.updated_at.is_some());
    }

    #[test]
    fn preferences_keep_unknown_keys() {
        let json = r#"{"birthday":"03-14","zodiac_sign":"Pisces","favorite_color":"teal"}"#;
        let prefs: PartnerPreferences = serde_json::from_str(json).unwrap();
        assert_eq!(prefs.birthday.as_deref(), Some("03-14"));
        assert_eq!(prefs.extra["favorite_color"], "teal");

        let back = serde_json::to_value(&prefs).unwrap();
        assert_eq!(back["favorite_color"], "teal");
        assert!(back.get("anniversary").is_none());
    }
}
