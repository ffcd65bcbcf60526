pub mod coach;

// 重新导出常用类型和函数，方便外部使用
pub use coach::{
    advice::{Advice, AdviceSummary, AdviceTopic},
    backend::{CoachBackend, HttpCoachBackend},
    client::{ClientConfig, CoachClient},
    listener::{CoachListener, EmptyCoachListener},
    relationship::{PartnerProfile, Relationship, RelationshipType},
    session::{Message, Role, SessionContext, SessionSummary},
    user::{SelfAssessment, UserProfile},
};
