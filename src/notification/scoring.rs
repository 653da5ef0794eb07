//! 相关性评分

use super::engagement::EngagementStore;
use super::event::Event;
use super::priority::PriorityTable;

/// 评分引擎
///
/// `score = base * (0.5 + 0.5 * click_rate)`，保留两位小数。
/// 没有互动历史的用户得到一半的基础权重，全部点击的用户得到完整的基础权重，
/// 基础权重是上限。
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    priorities: PriorityTable,
}

impl ScoringEngine {
    pub fn new(priorities: PriorityTable) -> Self {
        Self { priorities }
    }

    pub fn priorities(&self) -> &PriorityTable {
        &self.priorities
    }

    /// 计算事件的相关性分数（只读，不修改 store）
    pub fn score(&self, event: &Event, store: &EngagementStore) -> f64 {
        let base = self.priorities.lookup(&event.category);
        let rate = store.click_rate(&event.user_id, &event.category);
        round2(base * (0.5 + 0.5 * rate))
    }
}

/// 按二进制精确值四舍五入到两位小数
///
/// 不能先乘 100：`0.59499…` 乘完会变成 `59.5`，再 round 就成了 0.60。
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}
