//! Kore.ai webhook 集成 - 入站事件适配和 HTTP 服务

pub mod adapter;
pub mod error;
pub mod server;

pub use adapter::{format_reply, parse_payload, KoreReply};
pub use error::{ApiError, ApiResult};
pub use server::{create_router, serve, AppState};
