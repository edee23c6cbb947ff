//! 生成并发布帖子
//!
//! HTTP 处理器与定时任务共用的核心流程：套用模板 → 生成 → 截断 → 发布

use std::sync::Arc;

use tracing::{info, warn};

use crate::core::{SocialClient, TextGenerator};
use crate::domain::GeneratedPost;
use crate::errors::Result;

/// 生成时的最大 token 数
pub const MAX_TOKENS: u32 = 280;
/// 生成温度
pub const TEMPERATURE: f32 = 0.7;

const TEMPLATE_PLACEHOLDER: &str = "{prompt}";

/// 帖子发布器
#[derive(Clone)]
pub struct PostPublisher {
    llm: Arc<dyn TextGenerator>,
    social: Arc<dyn SocialClient>,
    prompt_template: Option<String>,
}

impl PostPublisher {
    pub fn new(llm: Arc<dyn TextGenerator>, social: Arc<dyn SocialClient>) -> Self {
        Self {
            llm,
            social,
            prompt_template: None,
        }
    }

    /// 设置提示词模板
    pub fn with_prompt_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = Some(template.into());
        self
    }

    /// 模板中有 `{prompt}` 时替换，否则作为前缀
    pub fn render_prompt(&self, prompt: &str) -> String {
        match self.prompt_template.as_deref() {
            Some(template) if template.contains(TEMPLATE_PLACEHOLDER) => {
                template.replace(TEMPLATE_PLACEHOLDER, prompt)
            }
            Some(template) => format!("{}{}", template, prompt),
            None => prompt.to_string(),
        }
    }

    /// 生成并发布，调用方负责保证 `prompt` 非空
    pub async fn generate_and_post(&self, prompt: &str) -> Result<GeneratedPost> {
        let rendered = self.render_prompt(prompt);
        let completion = self.llm.complete(&rendered, MAX_TOKENS, TEMPERATURE).await?;
        let post = GeneratedPost::from_completion(&completion);

        // 发布失败时生成的文本不会返回给调用方，这里留一份日志
        if let Err(e) = self.social.create_post(post.text()).await {
            warn!(text = %post.text(), error = %e, "generated post was not published");
            return Err(e);
        }

        info!(chars = post.text().chars().count(), "generated post published");
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PostRecord, UserLookup};
    use crate::errors::AppError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn complete(&self, prompt: &str, max_tokens: u32, temperature: f32) -> Result<String> {
            assert_eq!(max_tokens, MAX_TOKENS);
            assert!((temperature - TEMPERATURE).abs() < f32::EPSILON);
            Ok(format!("  {}  ", prompt))
        }
    }

    #[derive(Default)]
    struct RecordingSocial {
        posts: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl SocialClient for RecordingSocial {
        async fn create_post(&self, text: &str) -> Result<String> {
            if self.fail {
                return Err(AppError::upstream("403 Forbidden"));
            }
            let mut posts = self.posts.lock().unwrap();
            posts.push(text.to_string());
            Ok(posts.len().to_string())
        }

        async fn get_user_posts(&self, _user_id: &str, _max: u32) -> Result<Vec<PostRecord>> {
            Ok(vec![])
        }

        async fn resolve_user_id(&self, _username: &str) -> UserLookup {
            UserLookup::NotFound
        }
    }

    #[test]
    fn test_render_prompt() {
        let social = Arc::new(RecordingSocial::default());
        let publisher = PostPublisher::new(Arc::new(EchoGenerator), social.clone());
        assert_eq!(publisher.render_prompt("cats"), "cats");

        let publisher = publisher.with_prompt_template("Write a tweet about: ");
        assert_eq!(publisher.render_prompt("cats"), "Write a tweet about: cats");

        let publisher = PostPublisher::new(Arc::new(EchoGenerator), social)
            .with_prompt_template("Topic: {prompt}. Keep it short.");
        assert_eq!(publisher.render_prompt("cats"), "Topic: cats. Keep it short.");
    }

    #[tokio::test]
    async fn test_generate_and_post_publishes_trimmed_text() {
        let social = Arc::new(RecordingSocial::default());
        let publisher = PostPublisher::new(Arc::new(EchoGenerator), social.clone())
            .with_prompt_template("Tweet: ");

        let post = publisher.generate_and_post("hello").await.unwrap();

        assert_eq!(post.text(), "Tweet: hello");
        assert_eq!(*social.posts.lock().unwrap(), vec!["Tweet: hello".to_string()]);
    }

    #[tokio::test]
    async fn test_publish_failure_propagates() {
        let social = Arc::new(RecordingSocial {
            fail: true,
            ..Default::default()
        });
        let publisher = PostPublisher::new(Arc::new(EchoGenerator), social);

        let err = publisher.generate_and_post("hello").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(ref m) if m == "403 Forbidden"));
    }
}
