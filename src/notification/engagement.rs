//! 互动记录存储 - 每个 (用户, 类别) 的点击数/发送数

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::event::Category;

/// 单个 (用户, 类别) 的互动计数，保证 `clicks <= total`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngagementRecord {
    pub clicks: u64,
    pub total: u64,
}

impl EngagementRecord {
    /// 点击率，无历史时为 0
    pub fn click_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.clicks as f64 / self.total as f64
        }
    }

    fn increment(&mut self, clicked: bool) {
        self.total += 1;
        if clicked {
            self.clicks += 1;
        }
    }
}

type Key = (String, Category);

/// 互动记录存储
///
/// 进程内唯一的可变状态。所有写入在写锁内完成一次完整的自增，
/// 读取拿到的是 `(clicks, total)` 的一致拷贝。
#[derive(Debug, Default)]
pub struct EngagementStore {
    records: RwLock<HashMap<Key, EngagementRecord>>,
}

impl EngagementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 点击率（未知的 key 返回 0）
    pub fn click_rate(&self, user_id: &str, category: &Category) -> f64 {
        self.get(user_id, category)
            .map(|r| r.click_rate())
            .unwrap_or(0.0)
    }

    /// 记录一次已发送通知的结果，这是唯一的写入入口
    pub fn record(&self, user_id: &str, category: &Category, clicked: bool) {
        let mut records = self.write();
        records
            .entry((user_id.to_string(), category.clone()))
            .or_default()
            .increment(clicked);
    }

    /// 读取单条记录的拷贝
    pub fn get(&self, user_id: &str, category: &Category) -> Option<EngagementRecord> {
        // HashMap 的 key 是 (String, Category)，这里构造一次临时 key
        let key = (user_id.to_string(), category.clone());
        self.read().get(&key).copied()
    }

    /// 某个用户所有类别的记录，按类别标签排序
    pub fn user_records(&self, user_id: &str) -> Vec<(Category, EngagementRecord)> {
        let mut records: Vec<(Category, EngagementRecord)> = self
            .read()
            .iter()
            .filter(|((user, _), _)| user == user_id)
            .map(|((_, category), record)| (category.clone(), *record))
            .collect();
        records.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        records
    }

    /// 已记录的 (用户, 类别) 数量
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // 写锁内只做完整的自增，poison 后的数据仍然一致，直接取回
    fn read(&self) -> RwLockReadGuard<'_, HashMap<Key, EngagementRecord>> {
        self.records.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Key, EngagementRecord>> {
        self.records.write().unwrap_or_else(|e| e.into_inner())
    }
}
