//! 测试工具：内存后端、记录型监听器和测试日志

use crate::coach::advice::{Advice, AdviceSummary, CreateAdviceRequest};
use crate::coach::backend::CoachBackend;
use crate::coach::client::{ClientConfig, CoachClient};
use crate::coach::db::create_sqlite_pool_with_migration;
use crate::coach::listener::CoachListener;
use crate::coach::relationship::{CreateRelationshipRequest, Relationship};
use crate::coach::session::{ChatRequest, ChatResponse, SessionContext, SessionHistory, SessionSummary};
use crate::coach::storage::LocalStorage;
use crate::coach::types::HealthStatus;
use crate::coach::user::{CreateUserRequest, SelfAssessment, UserProfile};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, Once};

static INIT_LOGGER: Once = Once::new();

pub(crate) fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::EnvFilter;

        let filter_layer = EnvFilter::new("info,luvvtapp_client_rust=debug,sqlx=warn");

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .with_test_writer();

        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .init();
    });
}

/// 内存后端的全部数据，测试中可直接检查请求体
#[derive(Default)]
pub(crate) struct FakeState {
    pub users: HashMap<String, UserProfile>,
    pub user_requests: Vec<serde_json::Value>,
    pub relationships: Vec<Relationship>,
    pub sessions: Vec<SessionSummary>,
    pub histories: HashMap<String, SessionHistory>,
    pub chat_requests: Vec<serde_json::Value>,
    pub advice: Vec<Advice>,
    pub advice_requests: Vec<serde_json::Value>,
    /// 需要失败的操作名
    pub failing: HashSet<&'static str>,
    next_id: u32,
}

impl FakeState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    pub state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn with_user(user_id: &str, name: &str) -> Self {
        let backend = Self::default();
        backend.state().users.insert(
            user_id.to_string(),
            UserProfile {
                user_id: user_id.to_string(),
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                self_assessment: None,
                created_at: None,
            },
        );
        backend
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn fail(&self, operation: &'static str) {
        self.state().failing.insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.state().failing.remove(operation);
    }

    fn check(&self, operation: &'static str) -> Result<()> {
        if self.state().failing.contains(operation) {
            return Err(anyhow::anyhow!("HTTP 错误 500 Internal Server Error: {}", operation));
        }
        Ok(())
    }
}

#[async_trait]
impl CoachBackend for FakeBackend {
    async fn health_check(&self) -> Result<HealthStatus> {
        self.check("health_check")?;
        Ok(HealthStatus {
            status: "healthy".to_string(),
            database: Some("connected".to_string()),
            openai: None,
        })
    }

    async fn create_user(&self, req: &CreateUserRequest) -> Result<()> {
        self.check("create_user")?;
        let mut state = self.state();
        state.user_requests.push(serde_json::to_value(req)?);
        state.users.insert(
            req.user_id.clone(),
            UserProfile {
                user_id: req.user_id.clone(),
                name: req.name.clone(),
                email: req.email.clone(),
                self_assessment: req.self_assessment.clone(),
                created_at: None,
            },
        );
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        self.check("get_user")?;
        Ok(self.state().users.get(user_id).cloned())
    }

    async fn update_assessment(&self, user_id: &str, assessment: &SelfAssessment) -> Result<()> {
        self.check("update_assessment")?;
        let mut state = self.state();
        let user = state
            .users
            .get_mut(user_id)
            .ok_or_else(|| anyhow::anyhow!("HTTP 错误 404 Not Found: User not found"))?;
        user.self_assessment = Some(assessment.clone());
        Ok(())
    }

    async fn get_relationships(&self, user_id: &str) -> Result<Vec<Relationship>> {
        self.check("get_relationships")?;
        Ok(self
            .state()
            .relationships
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_relationship(&self, req: &CreateRelationshipRequest) -> Result<()> {
        self.check("create_relationship")?;
        let mut state = self.state();
        // 与后端一致：同一用户同一关系类型只保留一条
        state
            .relationships
            .retain(|r| !(r.user_id == req.user_id && r.relationship_type == req.relationship_type));
        state.relationships.push(Relationship::from_snapshot(
            &req.user_id,
            req.relationship_type,
            req.partner_profile.clone(),
        ));
        Ok(())
    }

    async fn get_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>> {
        self.check("get_sessions")?;
        Ok(self
            .state()
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_session_history(&self, session_id: &str) -> Result<SessionHistory> {
        self.check("get_session_history")?;
        self.state()
            .histories
            .get(session_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("HTTP 错误 404 Not Found: Session not found"))
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.check("delete_session")?;
        let mut state = self.state();
        let before = state.sessions.len();
        state.sessions.retain(|s| s.session_id != session_id);
        state.histories.remove(session_id);
        if state.sessions.len() == before {
            return Err(anyhow::anyhow!("HTTP 错误 404 Not Found: Session not found"));
        }
        Ok(())
    }

    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse> {
        self.check("chat")?;
        let mut state = self.state();
        state.chat_requests.push(serde_json::to_value(req)?);

        let session_id = match &req.session_id {
            Some(id) => id.clone(),
            None => {
                let id = state.next_id("s");
                state.sessions.insert(
                    0,
                    SessionSummary {
                        session_id: id.clone(),
                        user_id: req.user_id.clone(),
                        context: SessionContext::from_parts(
                            Some(req.relationship_type.as_str()),
                            req.partner_profile.clone(),
                        ),
                        created_at: None,
                        updated_at: None,
                    },
                );
                id
            }
        };
        Ok(ChatResponse {
            session_id,
            response: format!("coach: {}", req.message),
            tokens_used: Some(42),
        })
    }

    async fn get_advice_list(&self, user_id: &str) -> Result<Vec<AdviceSummary>> {
        self.check("get_advice_list")?;
        Ok(self
            .state()
            .advice
            .iter()
            .filter(|a| a.user_id == user_id)
            .map(AdviceSummary::from)
            .collect())
    }

    async fn get_advice(&self, advice_id: &str) -> Result<Advice> {
        self.check("get_advice")?;
        self.state()
            .advice
            .iter()
            .find(|a| a.advice_id == advice_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("HTTP 错误 404 Not Found: Advice not found"))
    }

    async fn create_advice(&self, req: &CreateAdviceRequest) -> Result<Advice> {
        self.check("create_advice")?;
        let mut state = self.state();
        state.advice_requests.push(serde_json::to_value(req)?);
        let advice = Advice {
            advice_id: state.next_id("a"),
            user_id: req.user_id.clone(),
            topic: req.topic.clone(),
            situation: req.situation.clone(),
            partner_profile: req.partner_profile.clone(),
            content: format!("Some thoughts on {}.", req.topic),
            created_at: None,
            preview: None,
        };
        state.advice.insert(0, advice.clone());
        Ok(advice)
    }

    async fn delete_advice(&self, advice_id: &str) -> Result<()> {
        self.check("delete_advice")?;
        let mut state = self.state();
        let before = state.advice.len();
        state.advice.retain(|a| a.advice_id != advice_id);
        if state.advice.len() == before {
            return Err(anyhow::anyhow!("HTTP 错误 404 Not Found: Advice not found"));
        }
        Ok(())
    }
}

/// 记录所有回调的监听器，事件格式为 `回调名:参数`
#[derive(Default)]
pub(crate) struct RecordingListener {
    pub events: Mutex<Vec<(String, String)>>,
}

impl RecordingListener {
    fn record(&self, name: &str, payload: String) {
        self.events.lock().unwrap().push((name.to_string(), payload));
    }

    /// 指定回调收到的全部参数
    pub fn payloads(&self, name: &str) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

#[async_trait]
impl CoachListener for RecordingListener {
    async fn on_user_changed(&self, user_json: String) {
        self.record("user", user_json);
    }
    async fn on_relationships_changed(&self, relationships_json: String) {
        self.record("relationships", relationships_json);
    }
    async fn on_context_changed(&self, relationship_json: String) {
        self.record("context", relationship_json);
    }
    async fn on_messages_changed(&self, messages_json: String) {
        self.record("messages", messages_json);
    }
    async fn on_sessions_changed(&self, sessions_json: String) {
        self.record("sessions", sessions_json);
    }
    async fn on_advice_list_changed(&self, advice_json: String) {
        self.record("advice_list", advice_json);
    }
    async fn on_current_advice_changed(&self, advice_json: String) {
        self.record("current_advice", advice_json);
    }
    async fn on_request_failed(&self, operation: String, _error: String) {
        self.record("failed", operation);
    }
}

/// 内存数据库上的本地存储
pub(crate) async fn memory_storage() -> LocalStorage {
    let pool = create_sqlite_pool_with_migration("sqlite::memory:")
        .await
        .unwrap();
    LocalStorage::new(pool, "luvvtapp".to_string())
}

/// 创建使用内存后端的客户端；`cached_user_id` 会预先写入本地存储
pub(crate) async fn test_client(
    backend: Arc<FakeBackend>,
    cached_user_id: Option<&str>,
) -> CoachClient {
    init_test_logger();
    let storage = memory_storage().await;
    if let Some(id) = cached_user_id {
        storage.set_user_id(id).await.unwrap();
    }
    CoachClient::with_backend(ClientConfig::new(), backend, storage)
}

/// 只应答一次的本地 HTTP 服务：返回固定状态和 body，并交出收到的原始请求
pub(crate) async fn serve_once(
    status: u16,
    body: &'static str,
) -> (String, tokio::task::JoinHandle<String>) {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 4096];
        while !request_complete(&request) {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
        }

        let reason = match status {
            200 => "OK",
            404 => "Not Found",
            422 => "Unprocessable Entity",
            500 => "Internal Server Error",
            _ => "Unknown",
        };
        let reply = format!(
            "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            reason,
            body.len(),
            body
        );
        socket.write_all(reply.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&request).into_owned()
    });

    (base_url, handle)
}

/// 请求头和 content-length 指定的 body 都已读完
fn request_complete(buf: &[u8]) -> bool {
    let text = String::from_utf8_lossy(buf);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .find_map(|line| {
            line.to_ascii_lowercase()
                .strip_prefix("content-length:")
                .and_then(|v| v.trim().parse::<usize>().ok())
        })
        .unwrap_or(0);
    buf.len() >= header_end + 4 + content_length
}
