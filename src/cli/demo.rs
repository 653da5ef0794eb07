//! Demo 命令 - 用样例事件演示评分、决策和反馈学习

use anyhow::Result;
use clap::Args;
use serde_json::{json, Map, Value};
use std::time::Duration;

use super::output::format_outcome;
use crate::config::AppConfig;
use crate::notification::builder::DispatcherBuilder;
use crate::notification::dispatcher::FeedbackMode;
use crate::notification::event::Event;

/// Demo 命令参数
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// 事件间隔（毫秒）
    #[arg(long, default_value = "1000")]
    pub interval_ms: u64,

    /// 模拟点击概率
    #[arg(long, default_value = "0.5")]
    pub click_probability: f64,

    /// 重复发送样例事件的轮数（多轮可以观察分数变化）
    #[arg(long, default_value = "1")]
    pub rounds: usize,

    /// 不通过 Kore 渠道实际发送
    #[arg(long)]
    pub dry_run: bool,
}

/// 样例事件
pub fn sample_events() -> Vec<Event> {
    fn metadata(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    vec![
        Event::new("user1", "payment_failed").with_metadata(metadata(json!({"amount": 99}))),
        Event::new("user2", "marketing_offer"),
        Event::new("user1", "order_delayed").with_metadata(metadata(json!({"order_id": 1234}))),
        Event::new("user2", "inventory_back").with_metadata(metadata(json!({"item": "Laptop"}))),
        Event::new("user3", "low_balance").with_metadata(metadata(json!({"balance": 200}))),
    ]
}

/// 处理 demo 命令
pub async fn handle_demo(args: DemoArgs, config: AppConfig) -> Result<()> {
    let dispatcher = DispatcherBuilder::new(config)
        .feedback(FeedbackMode::simulated(args.click_probability))
        .dry_run(args.dry_run)
        .build()?;

    for round in 1..=args.rounds.max(1) {
        if args.rounds > 1 {
            println!("=== Round {} ===\n", round);
        }
        for event in sample_events() {
            let outcome = dispatcher.handle_event(&event).await;
            println!("[{}] {}\n", event.occurred_at.format("%Y-%m-%d %H:%M:%S"), format_outcome(&outcome));
            tokio::time::sleep(Duration::from_millis(args.interval_ms)).await;
        }
    }

    Ok(())
}
