//! 投递渠道 trait 定义

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::event::{Category, Event};

/// 待投递的通知消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// 接收用户
    pub user_id: String,
    /// 消息文案
    pub text: String,
    /// 事件类别
    pub category: Category,
    /// 事件 metadata（透传）
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl OutboundMessage {
    /// 创建简单消息
    pub fn new(user_id: impl Into<String>, text: impl Into<String>, category: Category) -> Self {
        Self {
            user_id: user_id.into(),
            text: text.into(),
            category,
            metadata: Map::new(),
        }
    }

    /// 从事件和文案创建
    pub fn for_event(event: &Event, text: impl Into<String>) -> Self {
        Self {
            user_id: event.user_id.clone(),
            text: text.into(),
            category: event.category.clone(),
            metadata: event.metadata.clone(),
        }
    }
}

/// 发送结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum SendResult {
    /// 发送成功
    Sent,
    /// 跳过（dry-run 等）
    Skipped(String),
    /// 发送失败
    Failed(String),
}

impl SendResult {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendResult::Sent)
    }
}

/// 投递渠道 trait
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// 渠道名称（用于日志）
    fn name(&self) -> &str;

    /// 投递消息，调用方应有自己的超时约束
    async fn deliver(&self, message: &OutboundMessage) -> Result<SendResult>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outbound_message_for_event() {
        let mut metadata = Map::new();
        metadata.insert("order_id".to_string(), json!(1234));
        let event = Event::new("user1", "order_delayed").with_metadata(metadata);

        let msg = OutboundMessage::for_event(&event, "Track order here.");
        assert_eq!(msg.user_id, "user1");
        assert_eq!(msg.text, "Track order here.");
        assert_eq!(msg.category, Category::OrderDelayed);
        assert_eq!(msg.metadata.get("order_id"), Some(&json!(1234)));
    }

    #[test]
    fn test_send_result_serialization() {
        assert_eq!(
            serde_json::to_value(SendResult::Sent).unwrap(),
            json!({"status": "sent"})
        );
        assert_eq!(
            serde_json::to_value(SendResult::Failed("timeout".to_string())).unwrap(),
            json!({"status": "failed", "reason": "timeout"})
        );
        assert!(SendResult::Sent.is_sent());
        assert!(!SendResult::Skipped("dry-run".to_string()).is_sent());
    }
}
