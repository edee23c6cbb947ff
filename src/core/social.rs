//! 社交平台接口

use async_trait::async_trait;

use crate::domain::{PostRecord, UserLookup};
use crate::errors::Result;

/// 默认拉取的帖子数量
pub const DEFAULT_MAX_RESULTS: u32 = 100;

/// 社交平台读写能力，每个操作只发起一次请求
#[async_trait]
pub trait SocialClient: Send + Sync {
    /// 公开发布一条帖子，返回帖子 ID。发布不可撤销。
    async fn create_post(&self, text: &str) -> Result<String>;

    /// 获取用户最近的帖子，没有帖子时返回空列表
    async fn get_user_posts(&self, user_id: &str, max_results: u32) -> Result<Vec<PostRecord>>;

    /// 按用户名查询用户 ID，失败不会返回错误
    async fn resolve_user_id(&self, username: &str) -> UserLookup;
}
