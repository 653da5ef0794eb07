//! Bot Optimizer CLI
//!
//! 主动通知的评分决策 demo、Kore webhook 服务和主动推送

use anyhow::Result;
use bot_optimizer::cli::{
    handle_demo, handle_score, handle_send, handle_serve, DemoArgs, GlobalArgs, ScoreArgs,
    SendArgs, ServeArgs,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "botopt")]
#[command(about = "Bot Optimizer - 主动通知的相关性评分与互动学习")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 用样例事件演示评分、决策和模拟点击
    Demo(DemoArgs),
    /// 启动 Kore webhook 服务
    Serve(ServeArgs),
    /// 通过 Kore 主动推送一条消息
    Send(SendArgs),
    /// 查看单个事件的分数和决策
    Score(ScoreArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    // 例如: RUST_LOG=debug botopt serve
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bot_optimizer=info,botopt=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();
    let config = cli.global.load_config()?;

    match cli.command {
        Commands::Demo(args) => handle_demo(args, config).await?,
        Commands::Serve(args) => handle_serve(args, config).await?,
        Commands::Send(args) => handle_send(args, config).await?,
        Commands::Score(args) => handle_score(args, config)?,
    }

    Ok(())
}
