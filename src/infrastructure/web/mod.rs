//! Web 服务器模块
//!
//! 提供生成发帖、用户帖子查询和用户名解析的 HTTP API

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info};

use crate::application::publisher::PostPublisher;
use crate::core::{SocialClient, TextGenerator, DEFAULT_MAX_RESULTS};
use crate::domain::{GenerationRequest, UserLookup, UsernameResolution};
use crate::errors::{AppError, Result};

// ==================== 状态 ====================

#[derive(Clone)]
pub struct AppState {
    pub publisher: PostPublisher,
    pub social: Arc<dyn SocialClient>,
}

impl AppState {
    pub fn new(
        llm: Arc<dyn TextGenerator>,
        social: Arc<dyn SocialClient>,
        prompt_template: Option<String>,
    ) -> Self {
        let mut publisher = PostPublisher::new(llm, social.clone());
        if let Some(template) = prompt_template {
            publisher = publisher.with_prompt_template(template);
        }
        Self { publisher, social }
    }
}

// ==================== 请求类型 ====================

/// 原始查询参数，重复的键保留全部
type QueryPairs = Vec<(String, String)>;

/// 取第一个同名且非空的查询参数
fn first_param(pairs: QueryPairs, key: &str) -> Option<String> {
    pairs
        .into_iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
        .filter(|v| !v.is_empty())
}

// ==================== 处理器 ====================

/// 健康检查
async fn ping() -> &'static str {
    "pong"
}

/// 生成并发布帖子
async fn generate_tweet(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!("rejected generate request body: {}", rejection);
            GenerationRequest::default()
        }
    };
    let prompt = request
        .prompt()
        .ok_or_else(|| AppError::invalid("Invalid prompt"))?;

    let post = state.publisher.generate_and_post(prompt).await.map_err(|e| {
        error!("Failed to generate and post tweet: {}", e);
        e
    })?;

    Ok(Json(serde_json::json!({
        "message": "Tweet posted successfully!",
        "tweet": post,
    })))
}

/// 获取用户最近的帖子
async fn get_user_tweets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryPairs>,
) -> Result<impl IntoResponse> {
    let user_id = first_param(query, "user_id")
        .ok_or_else(|| AppError::invalid("User ID is required"))?;

    let posts = state
        .social
        .get_user_posts(&user_id, DEFAULT_MAX_RESULTS)
        .await
        .map_err(|e| {
            error!("Failed to fetch tweets for {}: {}", user_id, e);
            e
        })?;

    if posts.is_empty() {
        return Ok(Json(serde_json::json!({
            "message": "No tweets found for this user."
        })));
    }

    Ok(Json(serde_json::json!({ "tweets": posts })))
}

/// 批量解析用户名，单个失败不影响整体响应
async fn get_user_ids(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryPairs>,
) -> Result<Json<UsernameResolution>> {
    let usernames = first_param(query, "usernames")
        .ok_or_else(|| AppError::invalid("No usernames provided"))?;

    let mut resolution = UsernameResolution::new();
    for username in usernames.split(',') {
        let lookup = state.social.resolve_user_id(username).await;
        if let UserLookup::Failed(reason) = &lookup {
            debug!(username, reason = %reason, "username lookup failed");
        }
        resolution.insert(username, lookup);
    }

    Ok(Json(resolution))
}

// ==================== 路由 ====================

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/ping", get(ping))
        .route("/generate-tweet", post(generate_tweet))
        .route("/get-user-tweets", get(get_user_tweets))
        .route("/get_user_ids", get(get_user_ids))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ==================== 服务器启动 ====================

pub async fn start_web_server(bind_addr: &str, state: AppState) -> anyhow::Result<()> {
    let app = create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Web server started on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
