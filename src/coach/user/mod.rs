//! 用户模块
//!
//! 用户资料、自我评估以及新用户引导表单

pub mod api;
pub mod models;
pub mod types;

// 重新导出主要类型
pub use api::UserApi;
pub use models::{SelfAssessment, UserProfile};
pub use types::{CreateUserRequest, OnboardingForm, LOVE_LANGUAGES, PERSONALITY_TYPES};
