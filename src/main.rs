use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use tweetgen::infrastructure::logger;
use tweetgen::{
    start_web_server, AppConfig, AppState, ChatClient, CompletionsClient, LlmApi,
    OAuthCredentials, PostScheduler, SocialClient, TextGenerator, TwitterClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenv::dotenv() {
        eprintln!("no .env file loaded: {}", e);
    }

    let cfg = AppConfig::parse();
    logger::init(cfg.debug_enabled());
    cfg.validate().context("invalid configuration")?;

    let llm: Arc<dyn TextGenerator> = match cfg.llm_api {
        LlmApi::Completions => Arc::new(CompletionsClient::new(
            cfg.openai_api_key.clone(),
            cfg.model().to_string(),
            cfg.openai_base_url.clone(),
        )),
        LlmApi::Chat => Arc::new(ChatClient::new_with_base_url(
            cfg.openai_api_key.clone(),
            cfg.model().to_string(),
            cfg.openai_base_url.clone(),
        )),
    };

    let social: Arc<dyn SocialClient> = Arc::new(TwitterClient::new(
        cfg.twitter_api_base.clone(),
        cfg.bearer_token.clone(),
        OAuthCredentials {
            consumer_key: cfg.api_key.clone(),
            consumer_secret: cfg.api_secret_key.clone(),
            access_token: cfg.access_token.clone(),
            access_token_secret: cfg.access_token_secret.clone(),
        },
    ));

    let state = AppState::new(llm, social, cfg.prompt_template.clone());
    info!(llm_api = %cfg.llm_api, model = %cfg.model(), "clients initialized");

    let scheduler = cfg.schedule_interval().map(|interval| {
        PostScheduler::new(state.publisher.clone(), cfg.schedule_prompt.clone(), interval).spawn()
    });
    if scheduler.is_none() {
        info!("post scheduler disabled");
    }

    let result = start_web_server(&cfg.bind_addr, state)
        .await
        .context("web server failed");

    if let Some(handle) = scheduler {
        warn!("stopping post scheduler");
        handle.abort();
    }

    result
}
