//! 分发器构建器 - 根据配置组装评分表、阈值和渠道

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use super::channels::kore::{KoreChannel, KoreConfig};
use super::dispatcher::{Dispatcher, FeedbackMode};
use super::engagement::EngagementStore;
use super::policy::DecisionPolicy;
use super::priority::PriorityTable;
use super::scoring::ScoringEngine;
use crate::config::AppConfig;

/// 分发器构建器
pub struct DispatcherBuilder {
    config: AppConfig,
    store: Option<Arc<EngagementStore>>,
    feedback: Option<FeedbackMode>,
    dry_run: bool,
    enable_kore: bool,
}

impl DispatcherBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            store: None,
            feedback: None,
            dry_run: false,
            enable_kore: true,
        }
    }

    /// 共享已有的 store（默认新建）
    pub fn store(mut self, store: Arc<EngagementStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// 覆盖配置中的反馈方式
    pub fn feedback(mut self, feedback: FeedbackMode) -> Self {
        self.feedback = Some(feedback);
        self
    }

    /// 设置 dry-run 模式
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 是否注册 Kore 渠道（webhook 回复本身就是投递时关闭）
    pub fn enable_kore(mut self, enable: bool) -> Self {
        self.enable_kore = enable;
        self
    }

    pub fn build(self) -> Result<Dispatcher> {
        self.config.validate()?;
        let priorities = PriorityTable::with_overrides(self.config.priorities.clone())?;
        let policy = DecisionPolicy::new(self.config.threshold)?;
        let feedback = self.feedback.unwrap_or_else(|| self.config.feedback.to_mode());
        let store = self.store.unwrap_or_default();

        let mut dispatcher = Dispatcher::new(store)
            .with_scoring(ScoringEngine::new(priorities))
            .with_policy(policy)
            .with_feedback(feedback)
            .with_dry_run(self.dry_run);

        if self.enable_kore {
            if let Some(channel) = Self::detect_kore(&self.config.kore)? {
                dispatcher.register_channel(Arc::new(channel));
            }
        }

        info!(
            threshold = dispatcher.threshold(),
            feedback = ?dispatcher.feedback_mode(),
            channels = ?dispatcher.channel_names(),
            "Dispatcher ready"
        );
        Ok(dispatcher)
    }

    fn detect_kore(config: &KoreConfig) -> Result<Option<KoreChannel>> {
        if !config.is_configured() {
            return Ok(None);
        }
        info!(channel = "kore", url = %config.proactive_url(), "Detected Kore channel");
        Ok(Some(KoreChannel::new(config.clone())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::event::{Category, Event};
    use std::collections::HashMap;

    #[test]
    fn test_build_defaults() {
        let dispatcher = DispatcherBuilder::new(AppConfig::default()).build().unwrap();
        assert_eq!(dispatcher.threshold(), 0.6);
        assert_eq!(dispatcher.feedback_mode(), FeedbackMode::Deferred);
        assert!(dispatcher.channel_names().is_empty());
    }

    #[test]
    fn test_build_registers_kore_when_configured() {
        let mut config = AppConfig::default();
        config.kore = KoreConfig {
            base_url: "https://kore.example.com/api/webhooks".to_string(),
            bot_id: "bot".to_string(),
            api_key: "key".to_string(),
            timeout_secs: 5,
        };

        let dispatcher = DispatcherBuilder::new(config.clone()).build().unwrap();
        assert_eq!(dispatcher.channel_names(), vec!["kore"]);

        let inline = DispatcherBuilder::new(config).enable_kore(false).build().unwrap();
        assert!(inline.channel_names().is_empty());
    }

    #[test]
    fn test_build_applies_priority_overrides() {
        let mut config = AppConfig::default();
        config.priorities = HashMap::from([("marketing_offer".to_string(), 1.0)]);
        let dispatcher = DispatcherBuilder::new(config).build().unwrap();

        assert_eq!(dispatcher.score(&Event::new("u", "marketing_offer")), 0.5);
    }

    #[test]
    fn test_build_rejects_invalid_weight() {
        let mut config = AppConfig::default();
        config.priorities = HashMap::from([("payment_failed".to_string(), -1.0)]);
        assert!(DispatcherBuilder::new(config).build().is_err());
    }

    #[test]
    fn test_build_shares_store() {
        let store = Arc::new(EngagementStore::new());
        store.record("u", &Category::LowBalance, true);
        let dispatcher = DispatcherBuilder::new(AppConfig::default())
            .store(store.clone())
            .feedback(FeedbackMode::AssumeIgnored)
            .build()
            .unwrap();

        assert!(Arc::ptr_eq(dispatcher.store(), &store));
        assert_eq!(dispatcher.feedback_mode(), FeedbackMode::AssumeIgnored);
        assert_eq!(dispatcher.score(&Event::new("u", "low_balance")), 0.7);
    }
}
