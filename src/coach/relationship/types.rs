//! 关系 API DTO 以及“添加关系”表单

use crate::coach::relationship::models::{
    PartnerPreferences, PartnerProfile, Relationship, RelationshipType,
};
use crate::coach::serialization::deserialize_vec_skip_invalid;
use crate::coach::types::normalize_choice;
use serde::{Deserialize, Serialize};

/// 创建关系请求（POST /api/relationships）
#[derive(Debug, Clone, Serialize)]
pub struct CreateRelationshipRequest {
    pub user_id: String,
    pub relationship_type: RelationshipType,
    pub partner_profile: PartnerProfile,
}

/// 关系列表响应（无法识别的关系记录被跳过，不影响其余记录）
#[derive(Debug, Clone, Deserialize)]
pub struct RelationshipsResp {
    #[serde(default, deserialize_with = "deserialize_vec_skip_invalid")]
    pub relationships: Vec<Relationship>,
}

/// 添加关系表单
#[derive(Debug, Clone)]
pub struct RelationshipForm {
    pub relationship_type: RelationshipType,
    pub partner_name: String,
    pub personality_type: Option<String>,
    pub love_language: Option<String>,
    pub communication_style: Option<String>,
    /// 逗号分隔的兴趣列表
    pub interests: String,
    pub preferences: PartnerPreferences,
}

impl RelationshipForm {
    pub fn new(relationship_type: RelationshipType, partner_name: impl Into<String>) -> Self {
        Self {
            relationship_type,
            partner_name: partner_name.into(),
            personality_type: None,
            love_language: None,
            communication_style: None,
            interests: String::new(),
            preferences: PartnerPreferences::default(),
        }
    }

    /// 转换为伴侣档案；名字为空时返回 None
    pub fn partner_profile(&self) -> Option<PartnerProfile> {
        let name = self.partner_name.trim();
        if name.is_empty() {
            return None;
        }
        Some(PartnerProfile {
            name: name.to_string(),
            personality_type: normalize_choice(self.personality_type.clone()),
            love_language: normalize_choice(self.love_language.clone()),
            communication_style: normalize_choice(self.communication_style.clone()),
            interests: parse_interests(&self.interests),
            preferences: Some(self.preferences.clone()).filter(|p| !p.is_empty()),
        })
    }

    pub fn into_request(self, user_id: &str) -> Option<CreateRelationshipRequest> {
        let partner_profile = self.partner_profile()?;
        Some(CreateRelationshipRequest {
            user_id: user_id.to_string(),
            relationship_type: self.relationship_type,
            partner_profile,
        })
    }
}

/// 解析逗号分隔的兴趣，去掉空白项
pub fn parse_interests(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
