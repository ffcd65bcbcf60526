//! 会话 HTTP API 客户端
//!
//! 负责会话列表、历史记录以及聊天请求

use crate::coach::session::models::{SessionHistory, SessionSummary};
use crate::coach::session::types::{ChatRequest, ChatResponse, SessionsResp};
use crate::coach::types::{handle_empty_response, handle_http_response};
use anyhow::{Context, Result};
use tracing::{debug, info};

/// 会话相关的 HTTP API 客户端
#[derive(Clone)]
pub struct SessionApi {
    client: reqwest::Client,
    api_base_url: String,
}

impl SessionApi {
    pub fn new(client: reqwest::Client, api_base_url: String) -> Self {
        Self {
            client,
            api_base_url,
        }
    }

    /// 获取用户的会话列表（服务器按 updated_at 倒序返回）
    pub async fn get_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>> {
        let url = format!("{}/api/sessions/{}", self.api_base_url, user_id);

        info!("[SessionAPI] 📡 请求会话列表");
        debug!("[SessionAPI]   请求URL: {}", url);
        debug!("[SessionAPI]   用户ID: {}", user_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("请求失败")?;

        let resp: SessionsResp = handle_http_response(response, "会话列表").await?;
        info!(
            "[SessionAPI] ✅ 会话列表响应，会话数: {}",
            resp.sessions.len()
        );
        Ok(resp.sessions)
    }

    /// 获取会话完整历史
    pub async fn get_session_history(&self, session_id: &str) -> Result<SessionHistory> {
        let url = format!(
            "{}/api/sessions/{}/history",
            self.api_base_url, session_id
        );

        info!("[SessionAPI] 📡 请求会话历史: {}", session_id);
        debug!("[SessionAPI]   请求URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("请求失败")?;

        let history: SessionHistory = handle_http_response(response, "会话历史").await?;
        info!(
            "[SessionAPI] ✅ 会话历史响应，消息数: {}, 上下文: {}",
            history.messages.len(),
            history.context.context_type()
        );
        Ok(history)
    }

    /// 删除会话
    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        let url = format!("{}/api/sessions/{}", self.api_base_url, session_id);

        info!("[SessionAPI] 📡 请求删除会话: {}", session_id);
        debug!("[SessionAPI]   请求URL: {}", url);

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .context("请求失败")?;

        handle_empty_response(response, "删除会话").await
    }

    /// 发送聊天消息，返回教练回复及（可能新建的）会话 ID
    pub async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/api/chat", self.api_base_url);

        info!("[SessionAPI] 📡 发送聊天消息");
        debug!("[SessionAPI]   请求URL: {}", url);
        debug!(
            "[SessionAPI]   用户ID: {}, 会话ID: {:?}, 关系类型: {}",
            req.user_id, req.session_id, req.relationship_type
        );

        let response = self
            .client
            .post(&url)
            .json(req)
            .send()
            .await
            .context("请求失败")?;

        let resp: ChatResponse = handle_http_response(response, "聊天").await?;
        info!(
            "[SessionAPI] ✅ 收到教练回复，会话ID: {}, tokens: {:?}",
            resp.session_id, resp.tokens_used
        );
        Ok(resp)
    }
}
