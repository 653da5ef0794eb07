//! Send 命令 - 通过 Kore 平台主动推送一条消息

use anyhow::{bail, Result};
use clap::Args;

use crate::config::AppConfig;
use crate::notification::channel::{DeliveryChannel, OutboundMessage, SendResult};
use crate::notification::channels::kore::KoreChannel;
use crate::notification::event::Category;

/// Send 命令参数
#[derive(Args, Debug)]
pub struct SendArgs {
    /// 接收用户 ID
    #[arg(long)]
    pub user: String,

    /// 消息内容
    #[arg(long)]
    pub text: String,

    /// 事件类别（仅用于日志）
    #[arg(long, default_value = "unknown")]
    pub category: String,
}

/// 处理 send 命令
pub async fn handle_send(args: SendArgs, config: AppConfig) -> Result<()> {
    if !config.kore.is_configured() {
        bail!("Kore channel is not configured (set kore.base_url and kore.api_key)");
    }
    let channel = KoreChannel::new(config.kore)?;
    let message = OutboundMessage::new(args.user, args.text, Category::parse(&args.category));

    match channel.deliver(&message).await? {
        SendResult::Sent => {
            println!("✅ Sent to {}", message.user_id);
            Ok(())
        }
        SendResult::Skipped(reason) => {
            println!("⏭️  Skipped: {}", reason);
            Ok(())
        }
        SendResult::Failed(reason) => bail!("Send failed: {}", reason),
    }
}
