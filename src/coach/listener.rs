//! 控制器监听器回调接口
//!
//! 状态变化通过监听器“渲染”出去，参数均为 JSON 字符串，方便跨语言绑定

use async_trait::async_trait;

/// 教练客户端监听器
#[async_trait]
pub trait CoachListener: Send + Sync {
    /// 用户资料变更，未创建用户时为 "null"
    async fn on_user_changed(&self, user_json: String);

    /// 关系列表变更，参数为 JSON 数组字符串
    async fn on_relationships_changed(&self, relationships_json: String);

    /// 当前聊天上下文（选中的关系）变更，清除时为 "null"
    async fn on_context_changed(&self, relationship_json: String);

    /// 当前对话消息变更，参数为 JSON 数组字符串
    async fn on_messages_changed(&self, messages_json: String);

    /// 会话列表变更
    async fn on_sessions_changed(&self, sessions_json: String);

    /// 建议列表变更
    async fn on_advice_list_changed(&self, advice_json: String);

    /// 当前打开的建议变更，关闭时为 "null"
    async fn on_current_advice_changed(&self, advice_json: String);

    /// 请求失败（只用于记录，界面状态保持不变）
    async fn on_request_failed(&self, operation: String, error: String);
}

/// 空实现（默认监听器）
pub struct EmptyCoachListener;

#[async_trait]
impl CoachListener for EmptyCoachListener {
    async fn on_user_changed(&self, _user_json: String) {}
    async fn on_relationships_changed(&self, _relationships_json: String) {}
    async fn on_context_changed(&self, _relationship_json: String) {}
    async fn on_messages_changed(&self, _messages_json: String) {}
    async fn on_sessions_changed(&self, _sessions_json: String) {}
    async fn on_advice_list_changed(&self, _advice_json: String) {}
    async fn on_current_advice_changed(&self, _advice_json: String) {}
    async fn on_request_failed(&self, _operation: String, _error: String) {}
}
