//! 关系 HTTP API 客户端

use crate::coach::relationship::models::Relationship;
use crate::coach::relationship::types::{CreateRelationshipRequest, RelationshipsResp};
use crate::coach::types::{handle_empty_response, handle_http_response};
use anyhow::{Context, Result};
use tracing::{debug, info};

/// 关系相关的 HTTP API 客户端
#[derive(Clone)]
pub struct RelationshipApi {
    client: reqwest::Client,
    api_base_url: String,
}

impl RelationshipApi {
    pub fn new(client: reqwest::Client, api_base_url: String) -> Self {
        Self {
            client,
            api_base_url,
        }
    }

    /// 获取用户的全部关系档案
    pub async fn get_relationships(&self, user_id: &str) -> Result<Vec<Relationship>> {
        let url = format!("{}/api/relationships/{}", self.api_base_url, user_id);

        info!("[RelationshipAPI] 📡 请求关系列表");
        debug!("[RelationshipAPI]   请求URL: {}", url);
        debug!("[RelationshipAPI]   用户ID: {}", user_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("请求失败")?;

        let resp: RelationshipsResp = handle_http_response(response, "关系列表").await?;
        info!(
            "[RelationshipAPI] ✅ 关系列表响应，条目数: {}",
            resp.relationships.len()
        );
        Ok(resp.relationships)
    }

    /// 创建（或按关系类型覆盖）关系档案
    pub async fn create_relationship(&self, req: &CreateRelationshipRequest) -> Result<()> {
        let url = format!("{}/api/relationships", self.api_base_url);

        info!(
            "[RelationshipAPI] 📡 请求创建关系: {} ({})",
            req.partner_profile.name, req.relationship_type
        );
        debug!("[RelationshipAPI]   请求URL: {}", url);
        debug!("[RelationshipAPI]   用户ID: {}", req.user_id);

        let response = self
            .client
            .post(&url)
            .json(req)
            .send()
            .await
            .context("请求失败")?;

        handle_empty_response(response, "创建关系").await
    }
}
