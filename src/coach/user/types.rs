//! 用户 API DTO 以及引导表单

use crate::coach::types::normalize_choice;
use crate::coach::user::models::SelfAssessment;
use serde::Serialize;

/// MBTI 人格类型选项
pub const PERSONALITY_TYPES: [&str; 16] = [
    "INTJ", "INTP", "ENTJ", "ENTP", "INFJ", "INFP", "ENFJ", "ENFP", "ISTJ", "ISFJ", "ESTJ",
    "ESFJ", "ISTP", "ISFP", "ESTP", "ESFP",
];

/// 爱的语言选项
pub const LOVE_LANGUAGES: [&str; 5] = [
    "Words of Affirmation",
    "Quality Time",
    "Receiving Gifts",
    "Acts of Service",
    "Physical Touch",
];

/// 创建用户请求（POST /api/users）
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserRequest {
    pub user_id: String,
    pub name: String,
    pub email: String,
    /// 没有任何评估项时整个字段不出现在请求体中
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_assessment: Option<SelfAssessment>,
}

/// 新用户引导表单
#[derive(Debug, Clone, Default)]
pub struct OnboardingForm {
    pub name: String,
    pub email: String,
    pub personality_type: Option<String>,
    pub love_language: Option<String>,
    pub communication_style: Option<String>,
}

impl OnboardingForm {
    /// 表单中填写的自我评估，全部未填时返回 None
    pub fn self_assessment(&self) -> Option<SelfAssessment> {
        SelfAssessment {
            personality_type: normalize_choice(self.personality_type.clone()),
            love_language: normalize_choice(self.love_language.clone()),
            communication_style: normalize_choice(self.communication_style.clone()),
            ..Default::default()
        }
        .into_option()
    }

    /// 转换为创建请求；姓名或邮箱为空时返回 None（仅做存在性检查）
    pub fn into_request(self, user_id: &str) -> Option<CreateUserRequest> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();
        if name.is_empty() || email.is_empty() {
            return None;
        }
        let self_assessment = self.self_assessment();
        Some(CreateUserRequest {
            user_id: user_id.to_string(),
            name,
            email,
            self_assessment,
        })
    }
}
