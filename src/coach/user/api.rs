//! 用户 HTTP API 客户端
//!
//! 负责用户资料相关的 HTTP 请求

use crate::coach::types::{handle_empty_response, handle_optional_response};
use crate::coach::user::models::{SelfAssessment, UserProfile};
use crate::coach::user::types::CreateUserRequest;
use anyhow::{Context, Result};
use tracing::{debug, info};

/// 用户相关的 HTTP API 客户端
#[derive(Clone)]
pub struct UserApi {
    client: reqwest::Client,
    api_base_url: String,
}

impl UserApi {
    pub fn new(client: reqwest::Client, api_base_url: String) -> Self {
        Self {
            client,
            api_base_url,
        }
    }

    /// 创建用户
    pub async fn create_user(&self, req: &CreateUserRequest) -> Result<()> {
        let url = format!("{}/api/users", self.api_base_url);

        info!("[UserAPI] 📡 请求创建用户");
        debug!("[UserAPI]   请求URL: {}", url);
        debug!(
            "[UserAPI]   用户ID: {}, 含自我评估: {}",
            req.user_id,
            req.self_assessment.is_some()
        );

        let response = self
            .client
            .post(&url)
            .json(req)
            .send()
            .await
            .context("请求失败")?;

        handle_empty_response(response, "创建用户").await?;
        info!("[UserAPI] ✅ 用户创建成功: {}", req.user_id);
        Ok(())
    }

    /// 获取用户资料；404 表示用户尚未创建，返回 None
    pub async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let url = format!("{}/api/users/{}", self.api_base_url, user_id);

        info!("[UserAPI] 📡 请求用户资料");
        debug!("[UserAPI]   请求URL: {}", url);
        debug!("[UserAPI]   用户ID: {}", user_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("请求失败")?;

        let profile: Option<UserProfile> =
            handle_optional_response(response, "获取用户资料").await?;
        if profile.is_none() {
            info!("[UserAPI] 用户不存在: {}", user_id);
        }
        Ok(profile)
    }

    /// 更新自我评估
    pub async fn update_assessment(
        &self,
        user_id: &str,
        assessment: &SelfAssessment,
    ) -> Result<()> {
        let url = format!("{}/api/users/{}/assessment", self.api_base_url, user_id);

        info!("[UserAPI] 📡 请求更新自我评估");
        debug!("[UserAPI]   请求URL: {}", url);
        debug!("[UserAPI]   用户ID: {}", user_id);

        let response = self
            .client
            .put(&url)
            .json(assessment)
            .send()
            .await
            .context("请求失败")?;

        handle_empty_response(response, "更新自我评估").await
    }
}
