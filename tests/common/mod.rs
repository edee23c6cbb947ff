//! 测试通用工具
//!
//! 提供测试替身和本地服务器启动辅助函数
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};

use async_trait::async_trait;
use axum::Router;
use tokio::time::Duration;

use tweetgen::domain::{PostRecord, UserLookup};
use tweetgen::{AppError, Result, SocialClient, TextGenerator};

static INIT: Once = Once::new();

/// 初始化测试环境
pub fn setup() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// 在随机端口启动服务器，返回地址
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // 等待服务器启动
    tokio::time::sleep(Duration::from_millis(50)).await;

    addr
}

// ==================== LLM 替身 ====================

/// 返回固定文本的生成器
pub struct StubGenerator {
    pub reply: Result<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(AppError::upstream(message)),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn complete(&self, prompt: &str, _max_tokens: u32, _temperature: f32) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(e) => Err(AppError::upstream(e.to_string())),
        }
    }
}

// ==================== 社交平台替身 ====================

/// 内存中的社交平台
#[derive(Default)]
pub struct StubSocial {
    pub published: Mutex<Vec<String>>,
    pub publish_error: Option<String>,
    pub posts: HashMap<String, Vec<PostRecord>>,
    pub timeline_error: Option<String>,
    pub users: HashMap<String, UserLookup>,
    pub calls: AtomicUsize,
}

impl StubSocial {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl SocialClient for StubSocial {
    async fn create_post(&self, text: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.publish_error {
            return Err(AppError::upstream(message.clone()));
        }
        let mut published = self.published.lock().unwrap();
        published.push(text.to_string());
        Ok(format!("post-{}", published.len()))
    }

    async fn get_user_posts(&self, user_id: &str, _max_results: u32) -> Result<Vec<PostRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.timeline_error {
            return Err(AppError::upstream(message.clone()));
        }
        Ok(self.posts.get(user_id).cloned().unwrap_or_default())
    }

    async fn resolve_user_id(&self, username: &str) -> UserLookup {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.users
            .get(username)
            .cloned()
            .unwrap_or(UserLookup::NotFound)
    }
}

pub fn post_record(id: &str, text: &str, username: &str) -> PostRecord {
    PostRecord {
        id: id.to_string(),
        text: text.to_string(),
        created_at: chrono::DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .ok()
            .map(|t| t.with_timezone(&chrono::Utc)),
        author_username: Some(username.to_string()),
        author_avatar_url: Some(format!("https://img.example.com/{}.png", username)),
    }
}
