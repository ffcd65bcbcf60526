//! 建议 API DTO 以及建议草稿

use crate::coach::advice::models::{AdviceSummary, AdviceTopic};
use crate::coach::relationship::PartnerProfile;
use crate::coach::serialization::{deserialize_vec_or_null, truncate_chars};
use crate::coach::user::SelfAssessment;
use serde::{Deserialize, Serialize};

/// 情况描述的最大字符数
pub const MAX_SITUATION_CHARS: usize = 1000;

/// 截断情况描述（按字符计数）
pub fn truncate_situation(situation: &str) -> String {
    truncate_chars(situation, MAX_SITUATION_CHARS)
}

/// 创建建议请求（POST /api/advice）
#[derive(Debug, Clone, Serialize)]
pub struct CreateAdviceRequest {
    pub user_id: String,
    pub topic: AdviceTopic,
    pub situation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_profile: Option<PartnerProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_assessment: Option<SelfAssessment>,
}

/// 建议列表响应
#[derive(Debug, Clone, Deserialize)]
pub struct AdviceListResp {
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub advice: Vec<AdviceSummary>,
}

/// 建议表单草稿
#[derive(Debug, Clone)]
pub struct AdviceDraft {
    pub topic: AdviceTopic,
    situation: String,
    /// 选择时的伴侣档案快照，None 表示不关联伴侣
    pub partner: Option<PartnerProfile>,
}

impl Default for AdviceDraft {
    fn default() -> Self {
        Self {
            topic: AdviceTopic::Communication,
            situation: String::new(),
            partner: None,
        }
    }
}

impl AdviceDraft {
    /// 设置情况描述，超出上限的部分直接丢弃
    pub fn set_situation(&mut self, situation: &str) {
        self.situation = truncate_situation(situation);
    }

    pub fn situation(&self) -> &str {
        &self.situation
    }

    pub fn clear_situation(&mut self) {
        self.situation.clear();
    }

    /// 剩余可输入字符数
    pub fn remaining_chars(&self) -> usize {
        MAX_SITUATION_CHARS.saturating_sub(self.situation.chars().count())
    }
}
