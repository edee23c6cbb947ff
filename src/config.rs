use clap::Parser;

/// LLM 接口类型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LlmApi {
    /// 传统 completions 接口（gpt-3.5-turbo-instruct 等）
    Completions,
    /// chat completions 接口
    Chat,
}

impl LlmApi {
    /// 未指定模型时使用的默认模型
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmApi::Completions => "gpt-3.5-turbo-instruct",
            LlmApi::Chat => "gpt-4o-mini",
        }
    }
}

impl std::str::FromStr for LlmApi {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "completions" => Ok(LlmApi::Completions),
            "chat" => Ok(LlmApi::Chat),
            _ => Err(format!("Unknown LLM api: {}", s)),
        }
    }
}

impl std::fmt::Display for LlmApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmApi::Completions => write!(f, "completions"),
            LlmApi::Chat => write!(f, "chat"),
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Generate posts with an LLM and publish them to X/Twitter"
)]
pub struct AppConfig {
    /// HTTP 监听地址
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:5000")]
    pub bind_addr: String,

    /// 调试模式（日志级别提升到 debug）
    #[arg(long, env = "DEBUG", default_value = "true")]
    pub debug: String,

    // Twitter 配置
    #[arg(long, env = "API_KEY", default_value = "")]
    pub api_key: String,

    #[arg(long, env = "API_SECRET_KEY", default_value = "")]
    pub api_secret_key: String,

    #[arg(long, env = "ACCESS_TOKEN", default_value = "")]
    pub access_token: String,

    #[arg(long, env = "ACCESS_TOKEN_SECRET", default_value = "")]
    pub access_token_secret: String,

    #[arg(long, env = "BEARER_TOKEN", default_value = "")]
    pub bearer_token: String,

    #[arg(long, env = "TWITTER_API_BASE", default_value = "https://api.twitter.com")]
    pub twitter_api_base: String,

    // LLM 配置
    #[arg(long, env = "OPENAI_API_KEY", default_value = "")]
    pub openai_api_key: String,

    /// 不设置时按 `llm_api` 选择默认模型
    #[arg(long, env = "OPENAI_MODEL")]
    pub openai_model: Option<String>,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub openai_base_url: String,

    /// completions 或 chat
    #[arg(long, env = "LLM_API", default_value = "completions")]
    pub llm_api: LlmApi,

    /// 生成前套用的提示词模板，`{prompt}` 会被替换，否则作为前缀
    #[arg(long, env = "PROMPT_TEMPLATE")]
    pub prompt_template: Option<String>,

    // 定时发帖
    /// 定时发帖间隔（秒），不设置则不启用
    #[arg(long, env = "SCHEDULE_INTERVAL_SECS")]
    pub schedule_interval_secs: Option<u64>,

    #[arg(
        long,
        env = "SCHEDULE_PROMPT",
        default_value = "Write a short, engaging tweet about technology"
    )]
    pub schedule_prompt: String,
}

impl AppConfig {
    /// 验证配置的有效性
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.openai_api_key.is_empty() {
            anyhow::bail!("OPENAI_API_KEY is required");
        }

        if self.bearer_token.is_empty() {
            anyhow::bail!("BEARER_TOKEN is required");
        }

        let user_context = [
            ("API_KEY", &self.api_key),
            ("API_SECRET_KEY", &self.api_secret_key),
            ("ACCESS_TOKEN", &self.access_token),
            ("ACCESS_TOKEN_SECRET", &self.access_token_secret),
        ];
        for (name, value) in user_context {
            if value.is_empty() {
                anyhow::bail!("{} is required for posting", name);
            }
        }

        // instruct 模型只能走 completions 接口
        if self.llm_api == LlmApi::Chat && self.model().contains("-instruct") {
            anyhow::bail!(
                "OPENAI_MODEL {} is a completions model and cannot be used with LLM_API=chat",
                self.model()
            );
        }

        if self.schedule_interval_secs == Some(0) {
            anyhow::bail!("SCHEDULE_INTERVAL_SECS must be greater than zero");
        }

        Ok(())
    }

    /// 实际使用的模型
    pub fn model(&self) -> &str {
        self.openai_model
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.llm_api.default_model())
    }

    /// DEBUG 环境变量按常见的真值写法解析
    pub fn debug_enabled(&self) -> bool {
        matches!(
            self.debug.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    }

    /// 定时发帖间隔
    pub fn schedule_interval(&self) -> Option<std::time::Duration> {
        self.schedule_interval_secs
            .filter(|secs| *secs > 0)
            .map(std::time::Duration::from_secs)
    }
}
