//! X/Twitter API v2 客户端
//!
//! 发帖使用 OAuth 1.0a 用户上下文，读取与用户名查询使用 Bearer Token

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::core::SocialClient;
use crate::domain::{PostRecord, UserLookup};
use crate::errors::{AppError, Result};
use crate::infrastructure::oauth::OAuthCredentials;

#[derive(Debug, Deserialize)]
struct CreatePostResponse {
    data: CreatedPost,
}

#[derive(Debug, Deserialize)]
struct CreatedPost {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TimelineResponse {
    #[serde(default)]
    data: Vec<Tweet>,
    includes: Option<Includes>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    id: String,
    text: String,
    created_at: Option<DateTime<Utc>>,
    author_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Includes {
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct User {
    id: String,
    username: Option<String>,
    profile_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsersResponse {
    data: Option<Vec<User>>,
}

/// v2 接口的错误体
#[derive(Debug, Default, Deserialize)]
struct ApiError {
    title: Option<String>,
    detail: Option<String>,
    #[serde(default)]
    errors: Vec<ApiErrorItem>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorItem {
    message: Option<String>,
}

impl ApiError {
    /// 拼出可读的错误消息，解析失败时使用原始响应体
    fn describe(status: reqwest::StatusCode, body: &str) -> String {
        let parsed: ApiError = serde_json::from_str(body).unwrap_or_default();

        let mut parts: Vec<String> = parsed
            .detail
            .or(parsed.title)
            .into_iter()
            .collect();
        parts.extend(parsed.errors.into_iter().filter_map(|e| e.message));

        if parts.is_empty() && !body.trim().is_empty() {
            parts.push(body.trim().to_string());
        }

        if parts.is_empty() {
            status.to_string()
        } else {
            format!("{}: {}", status, parts.join("; "))
        }
    }
}

/// Twitter 客户端
#[derive(Debug, Clone)]
pub struct TwitterClient {
    base_url: String,
    bearer_token: String,
    oauth: OAuthCredentials,
    http: reqwest::Client,
}

impl TwitterClient {
    pub fn new(base_url: String, bearer_token: String, oauth: OAuthCredentials) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token,
            oauth,
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<url::Url> {
        url::Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| AppError::Config(format!("invalid twitter api url: {}", e)))
    }

    async fn check(res: reqwest::Response) -> Result<reqwest::Response> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let body = res.text().await.unwrap_or_default();
        Err(AppError::upstream(ApiError::describe(status, &body)))
    }
}

#[async_trait]
impl SocialClient for TwitterClient {
    async fn create_post(&self, text: &str) -> Result<String> {
        let url = self.endpoint("/2/tweets")?;
        let auth = self.oauth.authorization_header("POST", &url)?;

        let res = self
            .http
            .post(url)
            .header(AUTHORIZATION, auth)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        let body: CreatePostResponse = Self::check(res)
            .await?
            .json()
            .await
            .map_err(|e| AppError::upstream(format!("failed to parse create post response: {}", e)))?;

        info!(post_id = %body.data.id, "post published");
        Ok(body.data.id)
    }

    async fn get_user_posts(&self, user_id: &str, max_results: u32) -> Result<Vec<PostRecord>> {
        let mut url = self.endpoint(&format!("/2/users/{}/tweets", urlencoding::encode(user_id)))?;
        url.query_pairs_mut()
            .append_pair("max_results", &max_results.to_string())
            .append_pair("tweet.fields", "created_at,author_id")
            .append_pair("expansions", "author_id")
            .append_pair("user.fields", "username,profile_image_url");

        let res = self
            .http
            .get(url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;

        let body: TimelineResponse = Self::check(res)
            .await?
            .json()
            .await
            .map_err(|e| AppError::upstream(format!("failed to parse timeline response: {}", e)))?;

        let users: HashMap<String, User> = body
            .includes
            .unwrap_or_default()
            .users
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        debug!(user_id, count = body.data.len(), "fetched user posts");

        let posts = body
            .data
            .into_iter()
            .map(|tweet| {
                let author = tweet.author_id.as_ref().and_then(|id| users.get(id));
                PostRecord {
                    id: tweet.id,
                    text: tweet.text,
                    created_at: tweet.created_at,
                    author_username: author.and_then(|u| u.username.clone()),
                    author_avatar_url: author.and_then(|u| u.profile_image_url.clone()),
                }
            })
            .collect();

        Ok(posts)
    }

    async fn resolve_user_id(&self, username: &str) -> UserLookup {
        if username.trim().is_empty() {
            return UserLookup::NotFound;
        }

        let mut url = match self.endpoint("/2/users/by") {
            Ok(url) => url,
            Err(e) => return UserLookup::Failed(e.to_string()),
        };
        url.query_pairs_mut().append_pair("usernames", username);

        let res = match self
            .http
            .get(url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await
        {
            Ok(res) => res,
            Err(e) => {
                warn!(username, error = %e, "user lookup request failed");
                return UserLookup::Failed(e.to_string());
            }
        };

        let status = res.status();
        if status != reqwest::StatusCode::OK {
            warn!(username, %status, "user lookup returned non-success status");
            return UserLookup::Failed(status.to_string());
        }

        match res.json::<UsersResponse>().await {
            Ok(body) => body
                .data
                .and_then(|users| users.into_iter().next())
                .map(|u| UserLookup::Found(u.id))
                .unwrap_or(UserLookup::NotFound),
            Err(e) => {
                warn!(username, error = %e, "failed to parse user lookup response");
                UserLookup::Failed(e.to_string())
            }
        }
    }
}
