//! 通知分发器 - 单个事件的评分、决策、投递和反馈记录
//!
//! 每个事件只走一遍：`Received → Scored → {Skipped | Notified → FeedbackRecorded}`。
//! 投递是尽力而为的，投递失败不影响反馈记录。

use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use super::channel::{DeliveryChannel, OutboundMessage, SendResult};
use super::composer::compose;
use super::engagement::EngagementStore;
use super::event::{Category, Event};
use super::policy::DecisionPolicy;
use super::scoring::ScoringEngine;
use crate::error::OptimizerError;

/// 反馈获取方式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedbackMode {
    /// 发送后立即随机模拟点击（demo/测试用）
    Simulated { click_probability: f64 },
    /// 发送后立即记为未点击
    AssumeIgnored,
    /// 发送时只登记，等待 `submit_feedback` 提交真实结果
    Deferred,
}

impl FeedbackMode {
    /// 模拟点击，概率被限制在 [0, 1]
    pub fn simulated(click_probability: f64) -> Self {
        let p = if click_probability.is_nan() {
            0.0
        } else {
            click_probability.clamp(0.0, 1.0)
        };
        FeedbackMode::Simulated { click_probability: p }
    }
}

impl Default for FeedbackMode {
    fn default() -> Self {
        FeedbackMode::Simulated { click_probability: 0.5 }
    }
}

/// 反馈状态
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FeedbackStatus {
    /// 已写入 store
    Recorded { clicked: bool },
    /// 等待提交
    Pending,
}

/// 决策结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Decision {
    /// 分数低于阈值，不发送，不影响 store
    Skipped,
    /// 已发送
    Notified {
        message: String,
        deliveries: Vec<(String, SendResult)>,
        feedback: FeedbackStatus,
    },
}

/// 单个事件的处理结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchOutcome {
    pub user_id: String,
    pub category: Category,
    pub score: f64,
    pub threshold: f64,
    pub decision: Decision,
}

impl DispatchOutcome {
    pub fn is_notified(&self) -> bool {
        matches!(self.decision, Decision::Notified { .. })
    }

    /// 发送的文案（跳过时为 None）
    pub fn message(&self) -> Option<&str> {
        match &self.decision {
            Decision::Notified { message, .. } => Some(message),
            Decision::Skipped => None,
        }
    }
}

type PendingKey = (String, Category);

/// 通知分发器
pub struct Dispatcher {
    store: Arc<EngagementStore>,
    scoring: ScoringEngine,
    policy: DecisionPolicy,
    channels: Vec<Arc<dyn DeliveryChannel>>,
    feedback: FeedbackMode,
    dry_run: bool,
    /// Deferred 模式下已发送但未收到反馈的通知数
    pending: Mutex<HashMap<PendingKey, u32>>,
}

impl Dispatcher {
    /// 使用默认评分表和阈值创建
    pub fn new(store: Arc<EngagementStore>) -> Self {
        Self {
            store,
            scoring: ScoringEngine::default(),
            policy: DecisionPolicy::default(),
            channels: Vec::new(),
            feedback: FeedbackMode::default(),
            dry_run: false,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_scoring(mut self, scoring: ScoringEngine) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_policy(mut self, policy: DecisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_feedback(mut self, feedback: FeedbackMode) -> Self {
        self.feedback = feedback;
        self
    }

    /// 设置 dry-run 模式
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 注册渠道
    pub fn register_channel(&mut self, channel: Arc<dyn DeliveryChannel>) {
        info!(channel = channel.name(), "Registering delivery channel");
        self.channels.push(channel);
    }

    pub fn store(&self) -> &Arc<EngagementStore> {
        &self.store
    }

    pub fn threshold(&self) -> f64 {
        self.policy.threshold()
    }

    pub fn feedback_mode(&self) -> FeedbackMode {
        self.feedback
    }

    /// 获取已注册的渠道名称
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// 只评分，不产生副作用
    pub fn score(&self, event: &Event) -> f64 {
        self.scoring.score(event, &self.store)
    }

    /// 处理一个事件
    pub async fn handle_event(&self, event: &Event) -> DispatchOutcome {
        let score = self.score(event);
        debug!(
            user_id = %event.user_id,
            category = %event.category,
            score,
            occurred_at = %event.occurred_at,
            "Event scored"
        );

        let mut outcome = DispatchOutcome {
            user_id: event.user_id.clone(),
            category: event.category.clone(),
            score,
            threshold: self.policy.threshold(),
            decision: Decision::Skipped,
        };

        if !self.policy.should_notify(score) {
            info!(
                user_id = %event.user_id,
                category = %event.category,
                score,
                threshold = self.policy.threshold(),
                "Skipped (low priority)"
            );
            return outcome;
        }

        let message = compose(&event.category).to_string();
        let outbound = OutboundMessage::for_event(event, message.clone());
        let deliveries = self.deliver(&outbound).await;
        info!(
            user_id = %event.user_id,
            category = %event.category,
            score,
            channels = deliveries.len(),
            "Notified"
        );

        // 一旦决定发送，反馈记录不依赖投递是否成功
        let feedback = self.after_notify(&event.user_id, &event.category);

        outcome.decision = Decision::Notified {
            message,
            deliveries,
            feedback,
        };
        outcome
    }

    /// 提交一条已发送通知的真实反馈
    ///
    /// 只有存在未反馈的已发送通知时才会写入 store，每条通知最多写入一次。
    pub fn submit_feedback(
        &self,
        user_id: &str,
        category: &Category,
        clicked: bool,
    ) -> Result<(), OptimizerError> {
        {
            let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
            let key = (user_id.to_string(), category.clone());
            match pending.get_mut(&key) {
                Some(count) if *count > 1 => *count -= 1,
                Some(_) => {
                    pending.remove(&key);
                }
                None => {
                    return Err(OptimizerError::NoPendingNotification {
                        user_id: user_id.to_string(),
                        category: category.to_string(),
                    });
                }
            }
        }

        self.store.record(user_id, category, clicked);
        info!(user_id = %user_id, category = %category, clicked, "Feedback recorded");
        Ok(())
    }

    /// 某个 (用户, 类别) 等待反馈的通知数
    pub fn pending_feedback(&self, user_id: &str, category: &Category) -> u32 {
        let pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending
            .get(&(user_id.to_string(), category.clone()))
            .copied()
            .unwrap_or(0)
    }

    async fn deliver(&self, message: &OutboundMessage) -> Vec<(String, SendResult)> {
        let mut results = Vec::with_capacity(self.channels.len());

        for channel in &self.channels {
            let name = channel.name().to_string();

            if self.dry_run {
                info!(channel = %name, user_id = %message.user_id, text = %message.text, "[DRY-RUN] Would deliver");
                results.push((name, SendResult::Skipped("dry-run".to_string())));
                continue;
            }

            let result = match channel.deliver(message).await {
                Ok(r) => r,
                Err(e) => {
                    warn!(channel = %name, error = %e, "Channel delivery failed");
                    SendResult::Failed(e.to_string())
                }
            };
            if let SendResult::Failed(reason) = &result {
                warn!(
                    channel = %name,
                    user_id = %message.user_id,
                    reason = %reason,
                    "Delivery failed, engagement is still recorded"
                );
            }

            results.push((name, result));
        }

        results
    }

    fn after_notify(&self, user_id: &str, category: &Category) -> FeedbackStatus {
        let clicked = match self.feedback {
            FeedbackMode::Simulated { click_probability } => {
                rand::thread_rng().gen::<f64>() < click_probability
            }
            FeedbackMode::AssumeIgnored => false,
            FeedbackMode::Deferred => {
                let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
                *pending
                    .entry((user_id.to_string(), category.clone()))
                    .or_insert(0) += 1;
                debug!(user_id = %user_id, category = %category, "Awaiting feedback");
                return FeedbackStatus::Pending;
            }
        };

        self.store.record(user_id, category, clicked);
        info!(user_id = %user_id, category = %category, clicked, "Engagement recorded");
        FeedbackStatus::Recorded { clicked }
    }
}
