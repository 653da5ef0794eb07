//! Score 命令 - 查看单个事件的分数和决策（不发送、不记录）

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::output::format_json;
use crate::config::AppConfig;
use crate::notification::builder::DispatcherBuilder;
use crate::notification::event::{Category, Event};
use crate::notification::policy::should_notify;

/// Score 命令参数
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// 用户 ID
    #[arg(long, default_value = "unknown")]
    pub user: String,

    /// 事件类别
    #[arg(long)]
    pub category: String,

    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

/// Score 命令输出
#[derive(Debug, Serialize)]
pub struct ScoreOutput {
    pub user_id: String,
    pub category: Category,
    pub score: f64,
    pub threshold: f64,
    pub notify: bool,
}

/// 计算分数（新的 store，没有互动历史）
pub fn evaluate(args: &ScoreArgs, config: AppConfig) -> Result<ScoreOutput> {
    let dispatcher = DispatcherBuilder::new(config).enable_kore(false).build()?;
    let event = Event::new(args.user.clone(), Category::parse(&args.category));
    let score = dispatcher.score(&event);

    Ok(ScoreOutput {
        user_id: event.user_id,
        category: event.category,
        score,
        threshold: dispatcher.threshold(),
        notify: should_notify(score, dispatcher.threshold()),
    })
}

/// 处理 score 命令
pub fn handle_score(args: ScoreArgs, config: AppConfig) -> Result<()> {
    let output = evaluate(&args, config)?;
    if args.json {
        println!("{}", format_json(&output));
    } else {
        println!(
            "Event '{}' for User {} scored {} (threshold {}) → {}",
            output.category,
            output.user_id,
            output.score,
            output.threshold,
            if output.notify { "notify" } else { "skip" }
        );
    }
    Ok(())
}
