//! Kore.ai 主动消息渠道
//!
//! 通过 HTTP POST `{base_url}/proactive` 向平台推送消息，Bearer token 认证。

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::notification::channel::{DeliveryChannel, OutboundMessage, SendResult};

/// Kore 渠道配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KoreConfig {
    /// 平台 API 地址（如 https://your-kore-instance.com/api/webhooks）
    pub base_url: String,
    /// Bot ID
    pub bot_id: String,
    /// API key（Bearer token）
    pub api_key: String,
    /// 超时时间 (秒)
    pub timeout_secs: u64,
}

impl Default for KoreConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            bot_id: String::new(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

impl KoreConfig {
    /// base_url 和 api_key 都已配置
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.api_key.is_empty()
    }

    /// 主动消息接口地址
    pub fn proactive_url(&self) -> String {
        format!("{}/proactive", self.base_url.trim_end_matches('/'))
    }
}

/// 主动消息请求体
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProactivePayload<'a> {
    pub bot_id: &'a str,
    pub to: Recipient<'a>,
    pub message: PayloadMessage<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient<'a> {
    pub user_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct PayloadMessage<'a> {
    pub text: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl<'a> ProactivePayload<'a> {
    pub fn new(bot_id: &'a str, user_id: &'a str, text: &'a str) -> Self {
        Self {
            bot_id,
            to: Recipient { user_id },
            message: PayloadMessage { text, kind: "text" },
        }
    }
}

/// Kore.ai 主动消息渠道
#[derive(Debug)]
pub struct KoreChannel {
    client: Client,
    config: KoreConfig,
}

impl KoreChannel {
    /// 创建渠道（需要 base_url 和 api_key）
    pub fn new(config: KoreConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(anyhow!("kore.base_url is required"));
        }
        if config.api_key.is_empty() {
            return Err(anyhow!("kore.api_key is required"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &KoreConfig {
        &self.config
    }
}

#[async_trait]
impl DeliveryChannel for KoreChannel {
    fn name(&self) -> &str {
        "kore"
    }

    async fn deliver(&self, message: &OutboundMessage) -> Result<SendResult> {
        let payload = ProactivePayload::new(&self.config.bot_id, &message.user_id, &message.text);

        let response = match self
            .client
            .post(self.config.proactive_url())
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(channel = "kore", user_id = %message.user_id, error = %e, "Proactive send failed");
                return Ok(SendResult::Failed(format!("HTTP request failed: {}", e)));
            }
        };

        let status = response.status();
        if status.is_success() {
            info!(channel = "kore", user_id = %message.user_id, "Proactive message sent");
            Ok(SendResult::Sent)
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(channel = "kore", status = %status, body = %body, "Platform rejected proactive message");
            Ok(SendResult::Failed(format!("HTTP {}: {}", status, body)))
        }
    }
}
