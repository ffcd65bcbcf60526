use serde::Deserialize;
use tracing::{debug, error, info};

/// 下拉框里表示“未选择”的占位项
pub const NOT_SURE: &str = "Not sure";

/// `/health` 接口响应
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub openai: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// FastAPI 错误响应体：`{"detail": "..."}`，校验错误时 detail 为数组
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// 从错误响应体中提取可读的错误信息，取不到 detail 时返回原始 body
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: Some(serde_json::Value::String(s)),
        }) => s,
        Ok(ErrorBody { detail: Some(v) }) => v.to_string(),
        _ => body.to_string(),
    }
}

/// 读取响应 body 并检查 HTTP 状态，返回 body bytes
async fn read_checked_body(
    response: reqwest::Response,
    operation_name: &str,
) -> anyhow::Result<Vec<u8>> {
    use anyhow::Context;

    let status = response.status();

    // 读取 body bytes（只能读取一次）
    let body_bytes = response.bytes().await.context("读取响应 body 失败")?;
    let body_str = String::from_utf8_lossy(&body_bytes);
    info!("[HTTP] {}响应 Body: {}", operation_name, body_str);

    if !status.is_success() {
        error!(
            "[HTTP] {}请求失败，HTTP状态: {}, 响应: {}",
            operation_name, status, body_str
        );
        return Err(anyhow::anyhow!(
            "HTTP 错误 {}: {}",
            status,
            error_detail(&body_str)
        ));
    }
    debug!("[HTTP] {}请求成功，HTTP状态: {}", operation_name, status);

    Ok(body_bytes.to_vec())
}

/// 通用 HTTP 响应处理函数：检查状态码后直接反序列化为 `T`
///
/// 后端没有统一的外层包装，成功时 body 就是业务数据本身
pub async fn handle_http_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    operation_name: &str,
) -> anyhow::Result<T> {
    let body_bytes = read_checked_body(response, operation_name).await?;

    let data: T = serde_json::from_slice(&body_bytes).map_err(|e| {
        error!(
            "[HTTP] {}反序列化失败: {:?}\n原始响应: {}",
            operation_name,
            e,
            String::from_utf8_lossy(&body_bytes)
        );
        anyhow::anyhow!("反序列化响应失败: {:?}", e)
    })?;

    Ok(data)
}

/// 资源可能不存在的查询接口：404 返回 None，其余状态同 `handle_http_response`
pub async fn handle_optional_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    operation_name: &str,
) -> anyhow::Result<Option<T>> {
    if response.status() == reqwest::StatusCode::NOT_FOUND {
        info!("[HTTP] {}：资源不存在 (404)", operation_name);
        return Ok(None);
    }
    handle_http_response(response, operation_name).await.map(Some)
}

/// 只关心成功与否的接口（创建、删除等），忽略响应内容
pub async fn handle_empty_response(
    response: reqwest::Response,
    operation_name: &str,
) -> anyhow::Result<()> {
    read_checked_body(response, operation_name).await?;
    Ok(())
}

/// 规范化表单中的可选项：空白或“Not sure”视为未填写
pub(crate) fn normalize_choice(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != NOT_SURE)
}
