//! 教练客户端核心实现模块（视图控制器）
//!
//! 持有全部界面状态，按用户操作依次调用远端 API。
//! 所有请求失败只记录日志，状态保持调用前的样子，不做重试。

use crate::coach::advice::{
    truncate_situation, Advice, AdviceDraft, AdviceSummary, AdviceTopic, CreateAdviceRequest,
};
use crate::coach::backend::{CoachBackend, HttpCoachBackend};
use crate::coach::db::create_sqlite_pool_with_migration;
use crate::coach::listener::{CoachListener, EmptyCoachListener};
use crate::coach::relationship::{Relationship, RelationshipForm};
use crate::coach::session::{
    ChatRequest, Message, QuickAction, SessionSummary, GENERAL_RELATIONSHIP_TYPE,
};
use crate::coach::storage::LocalStorage;
use crate::coach::user::{OnboardingForm, SelfAssessment, UserProfile};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// 客户端配置
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// 后端 HTTP API 基础地址
    pub api_base_url: String,
    /// 本地 SQLite 数据库 URL（只保存用户 ID）
    ///
    /// 例如：`sqlite://luvvtapp.db?mode=rwc`
    pub db_url: String,
    /// 应用名，作为本地存储中用户 ID 的键
    pub app_name: String,
}

impl ClientConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            db_url: "sqlite://luvvtapp.db?mode=rwc".to_string(),
            app_name: "luvvtapp".to_string(),
        }
    }

    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    pub fn with_db_url(mut self, db_url: impl Into<String>) -> Self {
        self.db_url = db_url.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// 教练客户端
///
/// 所有操作都需要 `&mut self`，同一时刻只有一个请求在进行
pub struct CoachClient {
    config: ClientConfig,
    backend: Arc<dyn CoachBackend>,
    storage: LocalStorage,
    listener: Arc<dyn CoachListener>,
    user_id: Option<String>,
    user_profile: Option<UserProfile>,
    relationships: Vec<Relationship>,
    // 当前聊天上下文（选中的关系或打开的会话快照）
    selected_relationship: Option<Relationship>,
    current_session_id: Option<String>,
    messages: Vec<Message>,
    sessions: Vec<SessionSummary>,
    advice_list: Vec<AdviceSummary>,
    current_advice: Option<Advice>,
    advice_draft: AdviceDraft,
}

impl CoachClient {
    /// 按配置创建客户端：打开本地数据库并创建 HTTP 后端
    pub async fn new(config: ClientConfig) -> Result<Self> {
        let pool = create_sqlite_pool_with_migration(&config.db_url).await?;
        let storage = LocalStorage::new(pool, config.app_name.clone());
        let backend = Arc::new(HttpCoachBackend::new(&config.api_base_url)?);
        Ok(Self::with_backend(config, backend, storage))
    }

    /// 使用自定义后端创建客户端
    pub fn with_backend(
        config: ClientConfig,
        backend: Arc<dyn CoachBackend>,
        storage: LocalStorage,
    ) -> Self {
        Self {
            config,
            backend,
            storage,
            listener: Arc::new(EmptyCoachListener),
            user_id: None,
            user_profile: None,
            relationships: Vec::new(),
            selected_relationship: None,
            current_session_id: None,
            messages: Vec::new(),
            sessions: Vec::new(),
            advice_list: Vec::new(),
            current_advice: None,
            advice_draft: AdviceDraft::default(),
        }
    }

    /// 注册监听器
    pub fn set_listener(&mut self, listener: Arc<dyn CoachListener>) {
        self.listener = listener;
    }

    // ========== 状态读取 ==========

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn user_profile(&self) -> Option<&UserProfile> {
        self.user_profile.as_ref()
    }

    pub fn is_onboarded(&self) -> bool {
        self.user_profile.is_some()
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn selected_relationship(&self) -> Option<&Relationship> {
        self.selected_relationship.as_ref()
    }

    pub fn current_session_id(&self) -> Option<&str> {
        self.current_session_id.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn sessions(&self) -> &[SessionSummary] {
        &self.sessions
    }

    pub fn advice_list(&self) -> &[AdviceSummary] {
        &self.advice_list
    }

    pub fn current_advice(&self) -> Option<&Advice> {
        self.current_advice.as_ref()
    }

    pub fn advice_draft(&self) -> &AdviceDraft {
        &self.advice_draft
    }

    // ========== 启动 ==========

    /// 启动：读取（或生成）本地用户 ID，拉取用户资料；已创建用户时加载各列表
    pub async fn bootstrap(&mut self) -> bool {
        let user_id = self.load_or_create_user_id().await;
        info!("[Client] 🚀 启动，用户ID: {}", user_id);
        self.user_id = Some(user_id);
        self.reload_profile().await
    }

    async fn load_or_create_user_id(&self) -> String {
        match self.storage.get_user_id().await {
            Ok(Some(id)) => return id,
            Ok(None) => debug!("[Client] 本地没有用户ID，生成新的用户ID"),
            Err(e) => error!("[Client] 读取本地用户ID失败，生成新的用户ID: {:?}", e),
        }

        let user_id = Uuid::new_v4().to_string();
        if let Err(e) = self.storage.set_user_id(&user_id).await {
            error!("[Client] 保存本地用户ID失败: {:?}", e);
        }
        user_id
    }

    /// 重新拉取用户资料；用户存在时同时刷新关系、会话和建议列表
    async fn reload_profile(&mut self) -> bool {
        let Some(user_id) = self.user_id.clone() else {
            warn!("[Client] 尚未启动，无法获取用户资料");
            return false;
        };

        match self.backend.get_user(&user_id).await {
            Ok(profile) => {
                let exists = profile.is_some();
                self.user_profile = profile;
                self.notify_user().await;
                if exists {
                    self.refresh_relationships().await;
                    self.refresh_sessions().await;
                    self.refresh_advice().await;
                } else {
                    info!("[Client] 👋 新用户，需要先完成资料创建");
                }
                true
            }
            Err(e) => {
                self.report_failure("获取用户资料", &e).await;
                false
            }
        }
    }

    /// 后端健康检查（连接状态指示）
    pub async fn check_health(&self) -> bool {
        match self.backend.health_check().await {
            Ok(status) => {
                info!("[Client] 后端状态: {}", status.status);
                status.is_healthy()
            }
            Err(e) => {
                self.report_failure("健康检查", &e).await;
                false
            }
        }
    }

    // ========== 用户资料 ==========

    /// 提交新用户引导表单（仅检查姓名和邮箱是否填写）
    pub async fn submit_onboarding(&mut self, form: OnboardingForm) -> bool {
        let Some(user_id) = self.user_id.clone() else {
            warn!("[Client] 尚未启动，无法创建用户");
            return false;
        };
        let Some(req) = form.into_request(&user_id) else {
            warn!("[Client] 姓名和邮箱不能为空");
            return false;
        };

        if let Err(e) = self.backend.create_user(&req).await {
            self.report_failure("创建用户", &e).await;
            return false;
        }
        info!("[Client] ✅ 用户资料已创建: {}", req.name);
        self.reload_profile().await
    }

    /// 更新自我评估
    pub async fn update_self_assessment(&mut self, assessment: SelfAssessment) -> bool {
        let Some(user_id) = self.onboarded_user_id() else {
            return false;
        };

        if let Err(e) = self.backend.update_assessment(&user_id, &assessment).await {
            self.report_failure("更新自我评估", &e).await;
            return false;
        }
        self.reload_profile().await
    }

    // ========== 关系 ==========

    pub async fn refresh_relationships(&mut self) -> bool {
        let Some(user_id) = self.onboarded_user_id() else {
            return false;
        };

        match self.backend.get_relationships(&user_id).await {
            Ok(relationships) => {
                debug!("[Client] 关系列表已刷新，共 {} 个", relationships.len());
                self.relationships = relationships;
                self.notify_relationships().await;
                true
            }
            Err(e) => {
                self.report_failure("获取关系列表", &e).await;
                false
            }
        }
    }

    /// 添加关系（仅检查伴侣名字是否填写），成功后刷新列表
    pub async fn add_relationship(&mut self, form: RelationshipForm) -> bool {
        let Some(user_id) = self.onboarded_user_id() else {
            return false;
        };
        let Some(req) = form.into_request(&user_id) else {
            warn!("[Client] 对方名字不能为空");
            return false;
        };

        if let Err(e) = self.backend.create_relationship(&req).await {
            self.report_failure("创建关系", &e).await;
            return false;
        }
        info!("[Client] ✅ 已添加关系: {}", req.partner_profile.name);
        self.refresh_relationships().await
    }

    /// 选择关系作为聊天上下文，同时开始新的对话
    pub async fn select_relationship(&mut self, index: usize) -> bool {
        let Some(relationship) = self.relationships.get(index).cloned() else {
            warn!("[Client] 关系下标越界: {}", index);
            return false;
        };

        info!(
            "[Client] 💕 切换上下文: {} ({})",
            relationship.partner_profile.display_name(),
            relationship.relationship_type
        );
        self.selected_relationship = Some(relationship);
        self.current_session_id = None;
        self.messages.clear();
        self.notify_context().await;
        self.notify_messages().await;
        true
    }

    /// 清除聊天上下文（回到通用对话）
    pub async fn clear_relationship_context(&mut self) {
        self.selected_relationship = None;
        self.notify_context().await;
    }

    // ========== 聊天 ==========

    /// 发送聊天消息
    ///
    /// 用户消息立即追加；教练回复只在请求成功后追加
    pub async fn send_message(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let Some(user_id) = self.onboarded_user_id() else {
            return false;
        };

        self.messages.push(Message::user(text));
        self.notify_messages().await;

        let req = ChatRequest {
            user_id,
            message: text.to_string(),
            relationship_type: self
                .selected_relationship
                .as_ref()
                .map(|r| r.relationship_type.as_str())
                .unwrap_or(GENERAL_RELATIONSHIP_TYPE)
                .to_string(),
            partner_profile: self
                .selected_relationship
                .as_ref()
                .map(|r| r.partner_profile.clone()),
            self_assessment: self.user_profile.as_ref().and_then(UserProfile::assessment),
            session_id: self.current_session_id.clone(),
        };

        match self.backend.chat(&req).await {
            Ok(resp) => {
                if self.current_session_id.is_none() {
                    info!("[Client] 🆕 新会话: {}", resp.session_id);
                    self.current_session_id = Some(resp.session_id);
                }
                self.messages.push(Message::assistant(resp.response));
                self.notify_messages().await;
                self.refresh_sessions().await;
                true
            }
            Err(e) => {
                self.report_failure("聊天", &e).await;
                false
            }
        }
    }

    /// 发送快捷提问
    pub async fn send_quick_action(&mut self, action: QuickAction) -> bool {
        self.send_message(action.prompt()).await
    }

    /// 开始新会话：清空消息、会话 ID 和上下文
    pub async fn new_session(&mut self) {
        self.current_session_id = None;
        self.messages.clear();
        self.selected_relationship = None;
        self.notify_context().await;
        self.notify_messages().await;
    }

    /// 清空当前对话（保留上下文）
    pub async fn clear_chat(&mut self) {
        self.current_session_id = None;
        self.messages.clear();
        self.notify_messages().await;
    }

    // ========== 会话历史 ==========

    pub async fn refresh_sessions(&mut self) -> bool {
        let Some(user_id) = self.onboarded_user_id() else {
            return false;
        };

        match self.backend.get_sessions(&user_id).await {
            Ok(sessions) => {
                self.sessions = sessions;
                self.notify_sessions().await;
                true
            }
            Err(e) => {
                self.report_failure("获取会话列表", &e).await;
                false
            }
        }
    }

    /// 打开历史会话：替换消息并按会话快照设置上下文
    ///
    /// 会话记录不带伴侣档案时清除当前选中的关系
    pub async fn open_session(&mut self, session_id: &str) -> bool {
        let Some(user_id) = self.onboarded_user_id() else {
            return false;
        };

        match self.backend.get_session_history(session_id).await {
            Ok(history) => {
                info!(
                    "[Client] 📂 打开会话: {}，消息数: {}，上下文: {}",
                    session_id,
                    history.messages.len(),
                    history.context.context_type()
                );
                self.current_session_id =
                    Some(history.session_id.unwrap_or_else(|| session_id.to_string()));
                self.selected_relationship = history.context.to_relationship(&user_id);
                self.messages = history.messages;
                self.notify_context().await;
                self.notify_messages().await;
                true
            }
            Err(e) => {
                self.report_failure("获取会话历史", &e).await;
                false
            }
        }
    }

    /// 删除会话；删除的是当前会话时一并清空对话
    pub async fn delete_session(&mut self, session_id: &str) -> bool {
        if self.onboarded_user_id().is_none() {
            return false;
        }

        if let Err(e) = self.backend.delete_session(session_id).await {
            self.report_failure("删除会话", &e).await;
            return false;
        }

        self.sessions.retain(|s| s.session_id != session_id);
        self.notify_sessions().await;
        if self.current_session_id.as_deref() == Some(session_id) {
            self.clear_chat().await;
        }
        true
    }

    // ========== 建议 ==========

    pub async fn refresh_advice(&mut self) -> bool {
        let Some(user_id) = self.onboarded_user_id() else {
            return false;
        };

        match self.backend.get_advice_list(&user_id).await {
            Ok(list) => {
                self.advice_list = list;
                self.notify_advice_list().await;
                true
            }
            Err(e) => {
                self.report_failure("获取建议列表", &e).await;
                false
            }
        }
    }

    /// 设置情况描述（超过 1000 字符的部分被截掉），返回实际显示的内容
    pub fn set_advice_situation(&mut self, situation: &str) -> &str {
        self.advice_draft.set_situation(situation);
        self.advice_draft.situation()
    }

    pub fn set_advice_topic(&mut self, topic: AdviceTopic) {
        self.advice_draft.topic = topic;
    }

    /// 关联的伴侣（关系列表下标），None 表示不关联
    ///
    /// 选择时即保存伴侣档案，之后关系列表刷新不影响提交的内容
    pub fn set_advice_partner(&mut self, index: Option<usize>) -> bool {
        let partner = match index {
            None => None,
            Some(i) => match self.relationships.get(i) {
                Some(r) => Some(r.partner_profile.clone()),
                None => {
                    warn!("[Client] 关系下标越界: {}", i);
                    return false;
                }
            },
        };
        self.advice_draft.partner = partner;
        true
    }

    /// 提交建议请求；成功后打开新建议并插入到列表最前面
    pub async fn submit_advice(&mut self) -> bool {
        let Some(user_id) = self.onboarded_user_id() else {
            return false;
        };
        let situation = truncate_situation(self.advice_draft.situation());
        if situation.trim().is_empty() {
            warn!("[Client] 情况描述不能为空");
            return false;
        }

        let req = CreateAdviceRequest {
            user_id,
            topic: self.advice_draft.topic.clone(),
            situation,
            partner_profile: self.advice_draft.partner.clone(),
            self_assessment: self.user_profile.as_ref().and_then(UserProfile::assessment),
        };

        match self.backend.create_advice(&req).await {
            Ok(advice) => {
                self.advice_list.retain(|a| a.advice_id != advice.advice_id);
                self.advice_list.insert(0, AdviceSummary::from(&advice));
                self.current_advice = Some(advice);
                self.advice_draft.clear_situation();
                self.notify_advice_list().await;
                self.notify_current_advice().await;
                true
            }
            Err(e) => {
                self.report_failure("生成建议", &e).await;
                false
            }
        }
    }

    pub async fn open_advice(&mut self, advice_id: &str) -> bool {
        if self.onboarded_user_id().is_none() {
            return false;
        }

        match self.backend.get_advice(advice_id).await {
            Ok(advice) => {
                self.current_advice = Some(advice);
                self.notify_current_advice().await;
                true
            }
            Err(e) => {
                self.report_failure("获取建议详情", &e).await;
                false
            }
        }
    }

    /// 删除建议；正在查看的建议被删除时一并关闭
    pub async fn delete_advice(&mut self, advice_id: &str) -> bool {
        if self.onboarded_user_id().is_none() {
            return false;
        }

        if let Err(e) = self.backend.delete_advice(advice_id).await {
            self.report_failure("删除建议", &e).await;
            return false;
        }

        self.advice_list.retain(|a| a.advice_id != advice_id);
        self.notify_advice_list().await;
        if self
            .current_advice
            .as_ref()
            .is_some_and(|a| a.advice_id == advice_id)
        {
            self.current_advice = None;
            self.notify_current_advice().await;
        }
        true
    }

    pub async fn close_advice(&mut self) {
        self.current_advice = None;
        self.notify_current_advice().await;
    }

    // ========== 内部工具 ==========

    /// 已完成资料创建时返回用户 ID
    fn onboarded_user_id(&self) -> Option<String> {
        if self.user_profile.is_none() {
            warn!("[Client] 请先创建用户资料");
            return None;
        }
        self.user_id.clone()
    }

    async fn report_failure(&self, operation: &str, e: &anyhow::Error) {
        error!("[Client] {}失败: {:?}", operation, e);
        self.listener
            .on_request_failed(operation.to_string(), format!("{:#}", e))
            .await;
    }

    async fn notify_user(&self) {
        if let Some(json) = to_json(&self.user_profile, "用户资料") {
            self.listener.on_user_changed(json).await;
        }
    }

    async fn notify_relationships(&self) {
        if let Some(json) = to_json(&self.relationships, "关系列表") {
            self.listener.on_relationships_changed(json).await;
        }
    }

    async fn notify_context(&self) {
        if let Some(json) = to_json(&self.selected_relationship, "聊天上下文") {
            self.listener.on_context_changed(json).await;
        }
    }

    async fn notify_messages(&self) {
        if let Some(json) = to_json(&self.messages, "对话消息") {
            self.listener.on_messages_changed(json).await;
        }
    }

    async fn notify_sessions(&self) {
        if let Some(json) = to_json(&self.sessions, "会话列表") {
            self.listener.on_sessions_changed(json).await;
        }
    }

    async fn notify_advice_list(&self) {
        if let Some(json) = to_json(&self.advice_list, "建议列表") {
            self.listener.on_advice_list_changed(json).await;
        }
    }

    async fn notify_current_advice(&self) {
        if let Some(json) = to_json(&self.current_advice, "当前建议") {
            self.listener.on_current_advice_changed(json).await;
        }
    }
}

/// 序列化监听器参数，失败时记录错误并跳过本次通知
fn to_json<T: serde::Serialize + ?Sized>(value: &T, what: &str) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(json) => Some(json),
        Err(e) => {
            error!("[Client] 序列化{}失败，跳过通知: {:?}", what, e);
            None
        }
    }
}
