//! 会话模块
//!
//! 聊天消息、会话列表与历史记录，以及与教练对话的聊天接口

pub mod api;
pub mod models;
pub mod types;

// 重新导出主要类型
pub use api::SessionApi;
pub use models::{Message, Role, SessionContext, SessionHistory, SessionSummary};
pub use types::{ChatRequest, ChatResponse, QuickAction, SessionsResp, GENERAL_RELATIONSHIP_TYPE};
