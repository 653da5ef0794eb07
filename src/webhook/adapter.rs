//! Kore.ai 事件适配 - 平台 payload 与内部 Event 互转

use serde::Serialize;
use serde_json::{Map, Value};

use crate::notification::event::{Category, Event};

/// 缺失字段的默认值
pub const UNKNOWN: &str = "unknown";

/// 把 Kore webhook payload 转成内部事件
///
/// 用户 ID 优先取 `userInfo.email`，其次 `userId`；类别取 `eventType`；
/// metadata 取 `parameters`。任何字段缺失都用默认值，不会失败。
pub fn parse_payload(payload: &Value) -> Event {
    let user_id = payload
        .get("userInfo")
        .and_then(|info| info.get("email"))
        .and_then(as_identifier)
        .or_else(|| payload.get("userId").and_then(as_identifier))
        .unwrap_or_else(|| UNKNOWN.to_string());

    let event_type = payload
        .get("eventType")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN);

    let metadata = payload
        .get("parameters")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    Event::new(user_id, Category::parse(event_type)).with_metadata(metadata)
}

// 平台偶尔用数字 ID
fn as_identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 回复给 Kore 的响应
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KoreReply {
    pub response: ReplyBody,
    pub context: Map<String, Value>,
    pub expect_user_response: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyBody {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// 生成 Kore 响应（不发送时 text 为空字符串）
pub fn format_reply(text: impl Into<String>) -> KoreReply {
    KoreReply {
        response: ReplyBody {
            text: text.into(),
            kind: "text".to_string(),
        },
        context: Map::new(),
        expect_user_response: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_payload_full() {
        let payload = json!({
            "userInfo": {"email": "alice@example.com"},
            "userId": "u-42",
            "eventType": "payment_failed",
            "parameters": {"amount": 99}
        });
        let event = parse_payload(&payload);
        assert_eq!(event.user_id, "alice@example.com");
        assert_eq!(event.category, Category::PaymentFailed);
        assert_eq!(event.metadata.get("amount"), Some(&json!(99)));
    }

    #[test]
    fn test_parse_payload_flat_user_id() {
        let payload = json!({"userId": "u-42", "eventType": "low_balance"});
        let event = parse_payload(&payload);
        assert_eq!(event.user_id, "u-42");
        assert_eq!(event.category, Category::LowBalance);
        assert!(event.metadata.is_empty());
    }

    #[test]
    fn test_parse_payload_user_info_without_email() {
        let payload = json!({"userInfo": {"name": "Alice"}, "userId": 1001});
        let event = parse_payload(&payload);
        assert_eq!(event.user_id, "1001");
    }

    #[test]
    fn test_parse_payload_missing_everything() {
        let event = parse_payload(&json!({}));
        assert_eq!(event.user_id, UNKNOWN);
        assert_eq!(event.category, Category::Other(UNKNOWN.to_string()));
        assert!(event.metadata.is_empty());
    }

    #[test]
    fn test_parse_payload_wrong_types_use_defaults() {
        let payload = json!({"userId": "", "eventType": 7, "parameters": [1, 2]});
        let event = parse_payload(&payload);
        assert_eq!(event.user_id, UNKNOWN);
        assert_eq!(event.category.as_str(), UNKNOWN);
        assert!(event.metadata.is_empty());
    }

    #[test]
    fn test_format_reply_shape() {
        assert_eq!(
            serde_json::to_value(format_reply("hi")).unwrap(),
            json!({
                "response": {"text": "hi", "type": "text"},
                "context": {},
                "expectUserResponse": true
            })
        );
        assert_eq!(format_reply("").response.text, "");
    }
}
