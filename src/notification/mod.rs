//! 通知决策引擎 - 评分、决策、文案、投递和互动学习
//!
//! # 流程
//! 1. `ScoringEngine` 结合类别基础权重（`PriorityTable`）和用户点击率（`EngagementStore`）打分
//! 2. `DecisionPolicy` 按阈值决定是否发送
//! 3. `compose` 生成文案，`DeliveryChannel` 投递
//! 4. 记录点击结果，影响之后的评分
//!
//! # 使用示例
//! ```ignore
//! use bot_optimizer::notification::{Dispatcher, EngagementStore, Event};
//! use std::sync::Arc;
//!
//! let dispatcher = Dispatcher::new(Arc::new(EngagementStore::new()));
//! let outcome = dispatcher.handle_event(&Event::new("user1", "payment_failed")).await;
//! ```

pub mod builder;
pub mod channel;
pub mod channels;
pub mod composer;
pub mod dispatcher;
pub mod engagement;
pub mod event;
pub mod policy;
pub mod priority;
pub mod scoring;

pub use builder::DispatcherBuilder;
pub use channel::{DeliveryChannel, OutboundMessage, SendResult};
pub use channels::KoreChannel;
pub use composer::{compose, FALLBACK_MESSAGE};
pub use dispatcher::{Decision, DispatchOutcome, Dispatcher, FeedbackMode, FeedbackStatus};
pub use engagement::{EngagementRecord, EngagementStore};
pub use event::{Category, Event};
pub use policy::{should_notify, DecisionPolicy, DEFAULT_THRESHOLD};
pub use priority::{PriorityTable, DEFAULT_WEIGHT};
pub use scoring::ScoringEngine;
