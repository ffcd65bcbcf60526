//! 关系（伴侣档案）模块
//!
//! 管理用户与伴侣、朋友、家人等关系档案，用于个性化教练对话

pub mod api;
pub mod models;
pub mod types;

// 重新导出主要类型
pub use api::RelationshipApi;
pub use models::{PartnerPreferences, PartnerProfile, Relationship, RelationshipType};
pub use types::{CreateRelationshipRequest, RelationshipForm, RelationshipsResp};
