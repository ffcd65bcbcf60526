use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::warn;

/// 反序列化数组字段，处理 null 值
pub(crate) fn deserialize_vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// 逐条反序列化数组，跳过无法解析的元素，null 视为空数组
///
/// 后端按自由字符串保存的字段（如关系类型）出现未知取值时，只丢弃那一条记录
pub(crate) fn deserialize_vec_skip_invalid<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<T>(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("[Serialization] 跳过无法解析的列表项: {}", e);
                None
            }
        })
        .collect())
}

/// 宽松的时间戳反序列化
///
/// 后端用 `datetime.utcnow()` 写入，序列化后不带时区（按 UTC 处理）；
/// 同时兼容 RFC 3339。无法解析或为 null 时返回 None，不让整条记录失败
pub(crate) fn deserialize_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt_s: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt_s.as_deref().and_then(parse_timestamp))
}

pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// 按字符（而不是字节）截断，保证不会切断多字节字符
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// 生成列表用的简短预览：折叠空白，超长时追加省略号
pub fn preview_text(content: &str, max_chars: usize) -> String {
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > max_chars {
        format!("{}...", truncate_chars(&collapsed, max_chars))
    } else {
        collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // 每个 emoji 占 4 个字节
        assert_eq!(truncate_chars("💙💙💙", 2), "💙💙");
        assert_eq!(truncate_chars("", 0), "");
    }

    #[test]
    fn preview_collapses_whitespace() {
        assert_eq!(preview_text("a\n\n  b", 10), "a b");
        assert_eq!(preview_text("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn naive_and_rfc3339_timestamps_parse() {
        let dt = parse_timestamp("2024-02-14T18:30:05.123456").unwrap();
        assert_eq!((dt.month(), dt.day(), dt.hour()), (2, 14, 18));
        let dt = parse_timestamp("2024-02-14T18:30:05+02:00").unwrap();
        assert_eq!(dt.hour(), 16);
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
