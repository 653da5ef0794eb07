//! 领域错误类型

use thiserror::Error;

/// 调用方可能需要区分处理的错误
#[derive(Debug, Error, PartialEq)]
pub enum OptimizerError {
    /// 配置值不合法（阈值或权重越界）
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// 反馈提交时没有对应的已发送通知
    #[error("no pending notification for user {user_id} / {category}")]
    NoPendingNotification { user_id: String, category: String },
}
