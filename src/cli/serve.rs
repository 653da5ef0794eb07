//! Serve 命令 - 启动 Kore webhook 服务

use anyhow::Result;
use clap::Args;

use crate::config::AppConfig;
use crate::notification::builder::DispatcherBuilder;
use crate::webhook::{serve, AppState};

/// Serve 命令参数
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// 监听地址
    #[arg(long)]
    pub host: Option<String>,

    /// 监听端口
    #[arg(long, short)]
    pub port: Option<u16>,

    /// 同时通过 Kore 主动消息接口推送（默认只在 webhook 响应里回复）
    #[arg(long)]
    pub proactive: bool,

    /// Dry-run 模式（不实际推送）
    #[arg(long)]
    pub dry_run: bool,
}

/// 处理 serve 命令
pub async fn handle_serve(args: ServeArgs, mut config: AppConfig) -> Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    let (host, port) = (config.server.host.clone(), config.server.port);

    let dispatcher = DispatcherBuilder::new(config)
        .enable_kore(args.proactive)
        .dry_run(args.dry_run)
        .build()?;

    serve(&host, port, AppState::new(dispatcher)).await
}
