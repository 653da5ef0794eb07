//! Bot Optimizer - 主动通知的相关性评分与互动学习

pub mod cli;
pub mod config;
pub mod error;
pub mod notification;
pub mod webhook;

pub use config::{AppConfig, FeedbackSetting};
pub use error::OptimizerError;
pub use notification::{
    Category, Decision, DispatchOutcome, Dispatcher, DispatcherBuilder, EngagementRecord,
    EngagementStore, Event, FeedbackMode, FeedbackStatus,
};
pub use webhook::{create_router, AppState};
