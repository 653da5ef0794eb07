//! 配置文件加载
//!
//! 默认路径 `~/.config/bot-optimizer/config.json`，文件不存在时全部使用默认值。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::OptimizerError;
use crate::notification::channels::kore::KoreConfig;
use crate::notification::dispatcher::FeedbackMode;
use crate::notification::policy::DEFAULT_THRESHOLD;

/// 反馈方式配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSetting {
    /// 等待 /feedback 提交
    #[default]
    Deferred,
    /// 随机模拟点击
    Simulated,
    /// 记为未点击
    AssumeIgnored,
}

impl FeedbackSetting {
    pub fn to_mode(self) -> FeedbackMode {
        match self {
            FeedbackSetting::Deferred => FeedbackMode::Deferred,
            FeedbackSetting::Simulated => FeedbackMode::default(),
            FeedbackSetting::AssumeIgnored => FeedbackMode::AssumeIgnored,
        }
    }
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 发送阈值
    pub threshold: f64,
    /// 类别权重覆盖
    pub priorities: HashMap<String, f64>,
    /// Kore 平台
    pub kore: KoreConfig,
    /// HTTP 服务
    pub server: ServerConfig,
    /// 反馈方式
    pub feedback: FeedbackSetting,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            priorities: HashMap::new(),
            kore: KoreConfig::default(),
            server: ServerConfig::default(),
            feedback: FeedbackSetting::default(),
        }
    }
}

impl AppConfig {
    /// 默认配置文件路径
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("bot-optimizer")
            .join("config.json")
    }

    /// 加载配置（指定路径必须存在，默认路径可以不存在）
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    debug!(path = %default_path.display(), "No config file, using defaults");
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// 检查阈值范围（权重在构建评分表时检查）
    pub fn validate(&self) -> Result<(), OptimizerError> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(OptimizerError::InvalidConfig(format!(
                "threshold must be within [0.0, 1.0], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}
