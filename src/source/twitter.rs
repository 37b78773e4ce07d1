//! source::twitter
//!
//! Twitter v2 recent search.
//!
//! # Authentication
//!
//! App-only bearer token, sent as `Authorization: Bearer <token>`.
//!
//! # Rate Limiting
//!
//! A 429 response is returned as [`SourceError::RateLimited`]. There is no
//! automatic retry; [`collect_posts`](super::collect_posts) keeps whatever
//! was collected before the limit was hit.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use super::{PostSource, SearchPage, SearchRequest, SourceError};
use crate::core::config::DEFAULT_API_BASE;
use crate::core::document::RawPost;

/// Path of the recent search endpoint.
const SEARCH_PATH: &str = "/2/tweets/search/recent";

/// Tweet fields requested with every search.
pub const TWEET_FIELDS: &str = "created_at,author_id,lang,public_metrics,entities";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "chirpgraph";

/// Twitter search client.
pub struct TwitterClient {
    client: Client,
    bearer_token: Option<String>,
    api_base: String,
}

impl std::fmt::Debug for TwitterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterClient")
            .field("has_token", &self.bearer_token.is_some())
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl TwitterClient {
    /// Create a client against the public API.
    pub fn new(bearer_token: Option<String>) -> Self {
        Self::with_api_base(bearer_token, DEFAULT_API_BASE)
    }

    /// Create a client against a custom API base (proxies, tests).
    pub fn with_api_base(bearer_token: Option<String>, api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            bearer_token: bearer_token.filter(|t| !t.trim().is_empty()),
            api_base,
        }
    }

    fn headers(&self) -> Result<HeaderMap, SourceError> {
        let token = self.bearer_token.as_deref().ok_or(SourceError::AuthRequired)?;
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|_| SourceError::AuthFailed("token contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, value);
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        Ok(headers)
    }

    async fn handle_error_response(response: Response, status: StatusCode) -> SourceError {
        let message = match response.json::<TwitterErrorResponse>().await {
            Ok(err) => err.message(),
            Err(_) => "Unknown error".to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED => SourceError::AuthFailed("invalid or expired token".into()),
            StatusCode::FORBIDDEN => SourceError::AuthFailed(format!("forbidden: {}", message)),
            StatusCode::TOO_MANY_REQUESTS => SourceError::RateLimited,
            _ => SourceError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl PostSource for TwitterClient {
    fn name(&self) -> &'static str {
        "twitter"
    }

    async fn search_recent(&self, request: SearchRequest) -> Result<SearchPage, SourceError> {
        let headers = self.headers()?;
        let url = format!("{}{}", self.api_base, SEARCH_PATH);

        let mut params: Vec<(&str, String)> = vec![
            ("query", request.query.clone()),
            ("max_results", request.max_results.to_string()),
            ("tweet.fields", TWEET_FIELDS.to_string()),
            ("expansions", "author_id".to_string()),
            ("user.fields", "username".to_string()),
        ];
        if let Some(token) = &request.next_token {
            params.push(("next_token", token.clone()));
        }

        tracing::debug!(url = %url, max_results = request.max_results, "searching recent posts");

        let response = self
            .client
            .get(&url)
            .headers(headers)
            .query(&params)
            .send()
            .await
            .map_err(|e| SourceError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_response(response, status).await);
        }

        let body: SearchResponse = response.json().await.map_err(|e| SourceError::ApiError {
            status: status.as_u16(),
            message: format!("Failed to parse response: {}", e),
        })?;

        Ok(body.into_page())
    }
}

/// Recent search response body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResponse {
    data: Vec<RawPost>,
    includes: Includes,
    meta: Meta,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Includes {
    users: Vec<User>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct User {
    id: Option<String>,
    username: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Meta {
    next_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TwitterErrorResponse {
    title: Option<String>,
    detail: Option<String>,
}

impl TwitterErrorResponse {
    fn message(self) -> String {
        self.detail
            .or(self.title)
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

impl SearchResponse {
    /// Attach resolved usernames and split off the paging token.
    fn into_page(self) -> SearchPage {
        let usernames: HashMap<String, String> = self
            .includes
            .users
            .into_iter()
            .filter_map(|u| Some((u.id?, u.username?)))
            .collect();

        let posts = self
            .data
            .into_iter()
            .map(|mut post| {
                if post.author.is_none() {
                    post.author = post
                        .author_id
                        .as_ref()
                        .and_then(|id| usernames.get(id))
                        .cloned();
                }
                post
            })
            .collect();

        SearchPage {
            posts,
            next_token: self.meta.next_token.filter(|t| !t.is_empty()),
        }
    }
}
