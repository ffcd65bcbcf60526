pub mod advice;
pub mod backend;
pub mod client;
pub mod db;
pub mod listener;
pub mod relationship;
pub mod serialization;
pub mod session;
pub mod storage;
pub mod types;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

// 重新导出控制器相关类型
pub use client::{ClientConfig, CoachClient};
pub use listener::{CoachListener, EmptyCoachListener};
