//! 帖子相关的领域模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 单条帖子的最大字符数
pub const MAX_POST_CHARS: usize = 280;

/// 生成请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

impl GenerationRequest {
    /// 返回非空的提示词
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref().filter(|p| !p.is_empty())
    }
}

/// 经过截断、可直接发布的帖子文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GeneratedPost {
    text: String,
}

impl GeneratedPost {
    /// 去掉首尾空白后保留前 280 个字符，不考虑单词边界
    pub fn from_completion(completion: &str) -> Self {
        let text = completion.trim().chars().take(MAX_POST_CHARS).collect();
        Self { text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// 用户帖子（只读）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    #[serde(rename = "tweet_id")]
    pub id: String,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "user")]
    pub author_username: Option<String>,
    #[serde(rename = "profile_image_url")]
    pub author_avatar_url: Option<String>,
}
