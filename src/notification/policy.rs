//! 发送决策

use crate::error::OptimizerError;

/// 默认发送阈值
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// 检查分数是否达到阈值（阈值本身也发送）
pub fn should_notify(score: f64, threshold: f64) -> bool {
    score >= threshold
}

/// 决策策略，每个 Dispatcher 持有自己的阈值
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionPolicy {
    threshold: f64,
}

impl DecisionPolicy {
    pub fn new(threshold: f64) -> Result<Self, OptimizerError> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(OptimizerError::InvalidConfig(format!(
                "threshold must be within [0.0, 1.0], got {}",
                threshold
            )));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn should_notify(&self, score: f64) -> bool {
        should_notify(score, self.threshold)
    }
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}
