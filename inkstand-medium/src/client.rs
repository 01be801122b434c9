//! Medium REST client plus the profile-stream GraphQL reader.
//!
//! Handles bearer auth, the fixed header set, per-request timeouts and the
//! platform's `{data}` / `{errors}` envelope before handing typed values back.
use crate::error::{MediumError, Result};
use crate::query::{GraphqlBody, Projection, StreamData, StreamPost};
use crate::types::{
    ContentFormat, Contributor, CreatedPost, Cursor, License, NewPost, Post, PostBody, PostPage,
    Publication, PublishStatus, User,
};
use inkstand_http::{Auth, HttpClient, HttpResponse, RequestOpts};
use reqwest::header::{ACCEPT, ACCEPT_CHARSET, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.medium.com";
pub const DEFAULT_GRAPHQL_BASE: &str = "https://medium.com";
pub const GRAPHQL_PATH: &str = "/_/graphql";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// Everything the client needs, resolved once by the caller.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub access_token: String,
    pub default_publish_status: PublishStatus,
    pub default_license: License,
    pub default_content_format: ContentFormat,
    pub api_base: String,
    pub graphql_base: String,
    /// Budget for each individual request.
    pub timeout: Duration,
    /// Upper bound on profile-stream pages; `None` trusts the server to end the stream.
    pub max_pages: Option<u32>,
}

impl ClientConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            default_publish_status: PublishStatus::Draft,
            default_license: License::AllRightsReserved,
            default_content_format: ContentFormat::Markdown,
            api_base: DEFAULT_API_BASE.to_string(),
            graphql_base: DEFAULT_GRAPHQL_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_pages: Some(DEFAULT_MAX_PAGES),
        }
    }

    /// Point both endpoints at one host (handy for tests and proxies).
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.graphql_base = base.clone();
        self.api_base = base;
        self
    }
}

#[derive(Clone)]
pub struct MediumClient {
    api: HttpClient,
    graphql: HttpClient,
    config: ClientConfig,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<RemoteError>,
}

#[derive(Deserialize)]
struct RemoteError {
    #[serde(default)]
    message: String,
    #[serde(default = "default_code")]
    code: i64,
}

fn default_code() -> i64 {
    crate::error::DEFAULT_ERROR_CODE
}

impl MediumClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api = HttpClient::new(&config.api_base)?.with_timeout(config.timeout);
        let graphql = HttpClient::new(&config.graphql_base)?.with_timeout(config.timeout);
        Ok(Self {
            api,
            graphql,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ==============================
    // REST operations
    // ==============================

    /// The identity behind the access token.
    pub async fn get_user(&self) -> Result<User> {
        self.request::<(), _>(Method::GET, &["v1", "me"], None).await
    }

    pub async fn get_publications_for_user(&self, user_id: &str) -> Result<Vec<Publication>> {
        enforce("userId", user_id)?;
        self.request::<(), _>(Method::GET, &["v1", "users", user_id, "publications"], None)
            .await
    }

    pub async fn get_contributors_for_publication(
        &self,
        publication_id: &str,
    ) -> Result<Vec<Contributor>> {
        enforce("publicationId", publication_id)?;
        self.request::<(), _>(
            Method::GET,
            &["v1", "publications", publication_id, "contributors"],
            None,
        )
        .await
    }

    /// Create a post under a user, resolving the current user when no id is given.
    pub async fn create_post(&self, post: NewPost) -> Result<CreatedPost> {
        let user_id = match post.user_id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => self.get_user().await?.id,
        };
        enforce("userId", &user_id)?;

        let body = self.post_body(&post);
        self.request(Method::POST, &["v1", "users", user_id.as_str(), "posts"], Some(&body))
            .await
    }

    pub async fn create_post_in_publication(
        &self,
        publication_id: &str,
        post: NewPost,
    ) -> Result<CreatedPost> {
        enforce("publicationId", publication_id)?;

        let body = self.post_body(&post);
        self.request(
            Method::POST,
            &["v1", "publications", publication_id, "posts"],
            Some(&body),
        )
        .await
    }

    fn post_body<'a>(&self, post: &'a NewPost) -> PostBody<'a> {
        PostBody {
            title: &post.title,
            content: &post.content,
            content_format: Some(
                post.content_format
                    .unwrap_or(self.config.default_content_format),
            ),
            tags: post.tags.as_deref(),
            canonical_url: post.canonical_url.as_deref(),
            published_at: post.published_at.as_deref(),
            publish_status: Some(
                post.publish_status
                    .unwrap_or(self.config.default_publish_status),
            ),
            license: Some(post.license.unwrap_or(self.config.default_license)),
        }
    }

    // ==============================
    // Profile stream
    // ==============================

    /// One page of the full projection, plus the author's display name.
    pub async fn fetch_post_page(
        &self,
        username: &str,
        cursor: &Cursor,
    ) -> Result<PostPage<Post>> {
        self.fetch_page(Projection::Full, username, cursor, Post::from)
            .await
    }

    /// One page of titles.
    pub async fn fetch_title_page(&self, username: &str, cursor: &Cursor) -> Result<PostPage<String>> {
        self.fetch_page(Projection::Titles, username, cursor, |p| p.title)
            .await
    }

    async fn fetch_page<T>(
        &self,
        projection: Projection,
        username: &str,
        cursor: &Cursor,
        project: fn(StreamPost) -> T,
    ) -> Result<PostPage<T>> {
        let body = GraphqlBody::new(projection, username, cursor);
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let resp = self
            .graphql
            .send(
                Method::POST,
                GRAPHQL_PATH,
                Some(&body),
                RequestOpts {
                    headers: Some(headers),
                    ..Default::default()
                },
            )
            .await?;
        let data: StreamData = classify_graphql(resp)?;

        let user = data.user.ok_or_else(|| {
            MediumError::Unexpected(format!("no profile stream for user \"{username}\""))
        })?;
        let connection = user.profile_stream_connection;
        let next = connection.next_cursor();
        let items = connection.into_posts().map(project).collect();

        Ok(PostPage {
            author: user.name,
            items,
            next,
        })
    }

    // ==============================
    // Request execution
    // ==============================

    /// Ids land in the path as single percent-encoded segments.
    async fn request<B, T>(&self, method: Method, segments: &[&str], body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.api.endpoint(segments)?;
        let resp = self
            .api
            .send_to(
                method,
                url,
                body,
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.config.access_token)),
                    headers: Some(rest_headers()),
                    ..Default::default()
                },
            )
            .await?;
        classify(resp)
    }
}

fn rest_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT_CHARSET, HeaderValue::from_static("utf-8"));
    headers
}

/// Empty (or whitespace-only) strings count as absent. `.` and `..` can
/// never name a resource and would collapse out of the path.
fn enforce(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MediumError::missing(name));
    }
    if matches!(value, "." | "..") {
        return Err(MediumError::Validation(format!(
            "invalid parameter \"{name}\": \"{value}\""
        )));
    }
    Ok(())
}

/// Map a raw response onto the platform envelope by status family.
fn classify<T: DeserializeOwned>(resp: HttpResponse) -> Result<T> {
    match resp.status.as_u16() / 100 {
        2 => {
            let payload: Value = resp.json()?;
            let data = match payload {
                Value::Object(mut map) => match map.remove("data") {
                    Some(data) if !data.is_null() => data,
                    _ => Value::Object(map),
                },
                other => other,
            };
            serde_json::from_value(data).map_err(|e| {
                MediumError::Unexpected(format!("response did not match the expected shape: {e}"))
            })
        }
        4 | 5 => Err(remote_error(&resp)),
        _ => Err(MediumError::Unexpected(format!(
            "Unexpected response (status {})",
            resp.status
        ))),
    }
}

/// GraphQL reports failures inside a 200 body; the first entry wins over `data`.
fn classify_graphql<T: DeserializeOwned>(resp: HttpResponse) -> Result<T> {
    if resp.status.is_success()
        && let Ok(envelope) = resp.json::<ErrorEnvelope>()
        && let Some(first) = envelope.errors.into_iter().next()
    {
        return Err(MediumError::Remote {
            status: resp.status,
            code: first.code,
            message: first.message,
        });
    }
    classify(resp)
}

fn remote_error(resp: &HttpResponse) -> MediumError {
    let status: StatusCode = resp.status;
    match resp.json::<ErrorEnvelope>() {
        Ok(envelope) => match envelope.errors.into_iter().next() {
            Some(first) => MediumError::Remote {
                status,
                code: first.code,
                message: first.message,
            },
            None => MediumError::Unexpected(format!(
                "error response without an errors array (status {status})"
            )),
        },
        Err(e) => MediumError::Transport(e),
    }
}
