//! 建议模块
//!
//! 按主题请求的独立建议，与聊天消息无关

pub mod api;
pub mod models;
pub mod types;

// 重新导出主要类型
pub use api::AdviceApi;
pub use models::{Advice, AdviceSummary, AdviceTopic};
pub use types::{
    truncate_situation, AdviceDraft, AdviceListResp, CreateAdviceRequest, MAX_SITUATION_CHARS,
};
