//! 后端服务接口
//!
//! 控制器只依赖 `CoachBackend`，HTTP 实现由各模块的 API 客户端组合而成

use crate::coach::advice::{Advice, AdviceApi, AdviceSummary, CreateAdviceRequest};
use crate::coach::relationship::{CreateRelationshipRequest, Relationship, RelationshipApi};
use crate::coach::session::{ChatRequest, ChatResponse, SessionApi, SessionHistory, SessionSummary};
use crate::coach::types::{handle_http_response, HealthStatus};
use crate::coach::user::{CreateUserRequest, SelfAssessment, UserApi, UserProfile};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};

/// 教练后端接口（所有业务逻辑都在远端）
#[async_trait]
pub trait CoachBackend: Send + Sync {
    async fn health_check(&self) -> Result<HealthStatus>;

    async fn create_user(&self, req: &CreateUserRequest) -> Result<()>;
    /// 用户不存在时返回 None
    async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>>;
    async fn update_assessment(&self, user_id: &str, assessment: &SelfAssessment) -> Result<()>;

    async fn get_relationships(&self, user_id: &str) -> Result<Vec<Relationship>>;
    async fn create_relationship(&self, req: &CreateRelationshipRequest) -> Result<()>;

    async fn get_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>>;
    async fn get_session_history(&self, session_id: &str) -> Result<SessionHistory>;
    async fn delete_session(&self, session_id: &str) -> Result<()>;
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse>;

    async fn get_advice_list(&self, user_id: &str) -> Result<Vec<AdviceSummary>>;
    async fn get_advice(&self, advice_id: &str) -> Result<Advice>;
    async fn create_advice(&self, req: &CreateAdviceRequest) -> Result<Advice>;
    async fn delete_advice(&self, advice_id: &str) -> Result<()>;
}

/// 基于 reqwest 的后端实现
pub struct HttpCoachBackend {
    client: reqwest::Client,
    api_base_url: String,
    user_api: UserApi,
    relationship_api: RelationshipApi,
    session_api: SessionApi,
    advice_api: AdviceApi,
}

impl HttpCoachBackend {
    /// 创建 HTTP 后端（所有 API 客户端共享同一个连接池）
    pub fn new(api_base_url: &str) -> Result<Self> {
        let api_base_url = api_base_url.trim_end_matches('/').to_string();

        let client = reqwest::ClientBuilder::new()
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()
            .context("创建 HTTP 客户端失败")?;

        info!("[Backend] 创建 HTTP 后端，API地址: {}", api_base_url);

        Ok(Self {
            user_api: UserApi::new(client.clone(), api_base_url.clone()),
            relationship_api: RelationshipApi::new(client.clone(), api_base_url.clone()),
            session_api: SessionApi::new(client.clone(), api_base_url.clone()),
            advice_api: AdviceApi::new(client.clone(), api_base_url.clone()),
            client,
            api_base_url,
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

#[async_trait]
impl CoachBackend for HttpCoachBackend {
    async fn health_check(&self) -> Result<HealthStatus> {
        let url = format!("{}/health", self.api_base_url);
        debug!("[Backend] 健康检查: {}", url);
        let response = self.client.get(&url).send().await.context("请求失败")?;
        handle_http_response(response, "健康检查").await
    }

    async fn create_user(&self, req: &CreateUserRequest) -> Result<()> {
        self.user_api.create_user(req).await
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        self.user_api.get_user(user_id).await
    }

    async fn update_assessment(&self, user_id: &str, assessment: &SelfAssessment) -> Result<()> {
        self.user_api.update_assessment(user_id, assessment).await
    }

    async fn get_relationships(&self, user_id: &str) -> Result<Vec<Relationship>> {
        self.relationship_api.get_relationships(user_id).await
    }

    async fn create_relationship(&self, req: &CreateRelationshipRequest) -> Result<()> {
        self.relationship_api.create_relationship(req).await
    }

    async fn get_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>> {
        self.session_api.get_sessions(user_id).await
    }

    async fn get_session_history(&self, session_id: &str) -> Result<SessionHistory> {
        self.session_api.get_session_history(session_id).await
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.session_api.delete_session(session_id).await
    }

    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse> {
        self.session_api.chat(req).await
    }

    async fn get_advice_list(&self, user_id: &str) -> Result<Vec<AdviceSummary>> {
        self.advice_api.get_advice_list(user_id).await
    }

    async fn get_advice(&self, advice_id: &str) -> Result<Advice> {
        self.advice_api.get_advice(advice_id).await
    }

    async fn create_advice(&self, req: &CreateAdviceRequest) -> Result<Advice> {
        self.advice_api.create_advice(req).await
    }

    async fn delete_advice(&self, advice_id: &str) -> Result<()> {
        self.advice_api.delete_advice(advice_id).await
    }
}
