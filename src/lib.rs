//! 生成式发帖服务
//!
//! 把 LLM 文本补全与 X/Twitter API 串在一起：
//! - 根据提示词生成一条不超过 280 字符的帖子并发布
//! - 查询用户最近的帖子
//! - 批量把用户名解析为用户 ID
//! - 可选的定时自动发帖
//!
//! # 架构分层
//!
//! - `core`: 外部能力的抽象接口
//! - `domain`: 请求级的领域模型
//! - `infrastructure`: 基础设施层，外部系统交互与 HTTP 服务
//! - `application`: 应用层，业务编排

pub mod config;
pub mod errors;

// 核心层
pub mod core;

// 领域模型
pub mod domain;

// 基础设施层
pub mod infrastructure;

// 应用层
pub mod application;

pub use application::{PostPublisher, PostScheduler};
pub use config::{AppConfig, LlmApi};
pub use crate::core::{SocialClient, TextGenerator};
pub use errors::{AppError, Result};
pub use infrastructure::llm::{ChatClient, CompletionsClient};
pub use infrastructure::oauth::OAuthCredentials;
pub use infrastructure::twitter::TwitterClient;
pub use infrastructure::web::{create_router, start_web_server, AppState};

/// 版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
