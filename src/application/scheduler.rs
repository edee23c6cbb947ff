//! 定时发帖
//!
//! 按固定间隔调用 [`PostPublisher`]，失败只记录日志，循环继续

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::application::publisher::PostPublisher;

/// 定时发帖任务
pub struct PostScheduler {
    publisher: PostPublisher,
    prompt: String,
    interval: Duration,
}

impl PostScheduler {
    pub fn new(publisher: PostPublisher, prompt: impl Into<String>, interval: Duration) -> Self {
        Self {
            publisher,
            prompt: prompt.into(),
            interval,
        }
    }

    /// 执行一次，返回是否发布成功
    pub async fn tick(&self) -> bool {
        match self.publisher.generate_and_post(&self.prompt).await {
            Ok(post) => {
                info!(tweet = %post.text(), "scheduled post published");
                true
            }
            Err(e) => {
                error!("Scheduled post failed: {}", e);
                false
            }
        }
    }

    /// 在后台启动循环，第一次执行在一个完整间隔之后
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(interval_secs = self.interval.as_secs(), "post scheduler started");

            let start = tokio::time::Instant::now() + self.interval;
            let mut ticker = tokio::time::interval_at(start, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                self.tick().await;
            }
        })
    }
}
