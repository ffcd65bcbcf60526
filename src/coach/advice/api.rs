//! 建议 HTTP API 客户端

use crate::coach::advice::models::{Advice, AdviceSummary};
use crate::coach::advice::types::{AdviceListResp, CreateAdviceRequest};
use crate::coach::types::{handle_empty_response, handle_http_response};
use anyhow::{Context, Result};
use tracing::{debug, info};

/// 建议相关的 HTTP API 客户端
#[derive(Clone)]
pub struct AdviceApi {
    client: reqwest::Client,
    api_base_url: String,
}

impl AdviceApi {
    pub fn new(client: reqwest::Client, api_base_url: String) -> Self {
        Self {
            client,
            api_base_url,
        }
    }

    /// 获取用户的建议列表（仅含预览）
    pub async fn get_advice_list(&self, user_id: &str) -> Result<Vec<AdviceSummary>> {
        let url = format!("{}/api/advice/{}", self.api_base_url, user_id);

        info!("[AdviceAPI] 📡 请求建议列表");
        debug!("[AdviceAPI]   请求URL: {}", url);
        debug!("[AdviceAPI]   用户ID: {}", user_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("请求失败")?;

        let resp: AdviceListResp = handle_http_response(response, "建议列表").await?;
        info!("[AdviceAPI] ✅ 建议列表响应，条目数: {}", resp.advice.len());
        Ok(resp.advice)
    }

    /// 获取单条建议的完整内容
    pub async fn get_advice(&self, advice_id: &str) -> Result<Advice> {
        let url = format!("{}/api/advice/item/{}", self.api_base_url, advice_id);

        info!("[AdviceAPI] 📡 请求建议详情: {}", advice_id);
        debug!("[AdviceAPI]   请求URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("请求失败")?;

        handle_http_response(response, "建议详情").await
    }

    /// 请求生成一条新建议，返回服务器创建的记录
    pub async fn create_advice(&self, req: &CreateAdviceRequest) -> Result<Advice> {
        let url = format!("{}/api/advice", self.api_base_url);

        info!("[AdviceAPI] 📡 请求生成建议，主题: {}", req.topic);
        debug!("[AdviceAPI]   请求URL: {}", url);
        debug!(
            "[AdviceAPI]   用户ID: {}, 情况描述字符数: {}, 关联伴侣: {}",
            req.user_id,
            req.situation.chars().count(),
            req.partner_profile.is_some()
        );

        let response = self
            .client
            .post(&url)
            .json(req)
            .send()
            .await
            .context("请求失败")?;

        let advice: Advice = handle_http_response(response, "生成建议").await?;
        info!("[AdviceAPI] ✅ 建议已生成: {}", advice.advice_id);
        Ok(advice)
    }

    /// 删除建议
    pub async fn delete_advice(&self, advice_id: &str) -> Result<()> {
        let url = format!("{}/api/advice/{}", self.api_base_url, advice_id);

        info!("[AdviceAPI] 📡 请求删除建议: {}", advice_id);
        debug!("[AdviceAPI]   请求URL: {}", url);

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .context("请求失败")?;

        handle_empty_response(response, "删除建议").await
    }
}
