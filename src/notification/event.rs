//! 业务事件结构
//!
//! Inbound Adapter 和 demo 驱动共用的事件数据结构。事件只被 Dispatcher 消费一次，不持久化。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// 事件类别
///
/// 已知类别有固定的优先级权重和消息模板；其余字符串落入 `Other`，保留原始标签。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    PaymentFailed,
    OrderDelayed,
    LowBalance,
    MarketingOffer,
    InventoryBack,
    Other(String),
}

impl Category {
    /// 从标签解析（总是成功，未知标签归入 `Other`）
    pub fn parse(tag: &str) -> Self {
        match tag {
            "payment_failed" => Category::PaymentFailed,
            "order_delayed" => Category::OrderDelayed,
            "low_balance" => Category::LowBalance,
            "marketing_offer" => Category::MarketingOffer,
            "inventory_back" => Category::InventoryBack,
            other => Category::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Category::PaymentFailed => "payment_failed",
            Category::OrderDelayed => "order_delayed",
            Category::LowBalance => "low_balance",
            Category::MarketingOffer => "marketing_offer",
            Category::InventoryBack => "inventory_back",
            Category::Other(tag) => tag,
        }
    }

    /// 是否为内置类别
    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Other(_))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Category {
    fn from(tag: &str) -> Self {
        Category::parse(tag)
    }
}

impl Serialize for Category {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Category::parse(&tag))
    }
}

/// 一次需要判断相关性的业务事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// 用户 ID
    pub user_id: String,
    /// 事件类别
    pub category: Category,
    /// 类别相关的附加数据（核心逻辑不读取，只透传）
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// 创建时间
    pub occurred_at: DateTime<Utc>,
}

impl Event {
    pub fn new(user_id: impl Into<String>, category: impl Into<Category>) -> Self {
        Self {
            user_id: user_id.into(),
            category: category.into(),
            metadata: Map::new(),
            occurred_at: Utc::now(),
        }
    }

    /// 设置 metadata
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}
