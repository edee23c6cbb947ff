//! 文本生成接口

use async_trait::async_trait;

use crate::errors::Result;

/// LLM 文本补全能力
///
/// 单次调用，不重试也不缓存；任何传输、鉴权或配额失败都以
/// [`AppError::Upstream`](crate::errors::AppError::Upstream) 返回。
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// 返回原始补全文本（未去空白，长度不限）
    async fn complete(&self, prompt: &str, max_tokens: u32, temperature: f32) -> Result<String>;
}
