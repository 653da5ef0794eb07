//! CLI command handling

pub mod demo;
pub mod output;
pub mod score;
pub mod send;
pub mod serve;

pub use demo::*;
pub use output::*;
pub use score::*;
pub use send::*;
pub use serve::*;

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::config::AppConfig;

/// 所有命令共用的参数
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// 配置文件路径 (默认: ~/.config/bot-optimizer/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 覆盖发送阈值
    #[arg(long, global = true)]
    pub threshold: Option<f64>,
}

impl GlobalArgs {
    /// 加载配置并应用命令行覆盖
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        config.validate()?;
        Ok(config)
    }
}
