use inkstand_http::HttpError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Readable view of a web page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Host without a leading `www.`.
    pub domain: String,
    pub title: Option<String>,
    pub article_content: String,
    pub primary_image: Option<String>,
    /// Publication timestamp exactly as the page states it.
    pub date: Option<String>,
    pub author: Option<String>,
    pub short_description: Option<String>,
}

#[derive(Debug, Error)]
pub enum ArticleError {
    #[error("invalid url \"{0}\"")]
    InvalidUrl(String),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("no readable content at {0}")]
    NoContent(String),
}

/// Turns a URL into an [`Article`].
#[async_trait::async_trait]
pub trait ArticleExtractor: Send + Sync {
    async fn extract(&self, url: &Url) -> Result<Article, ArticleError>;
}

/// Front door for article lookups: validates the URL, then hands it to the extractor.
pub struct ArticleFetcher<E> {
    extractor: E,
}

impl<E: ArticleExtractor> ArticleFetcher<E> {
    pub fn new(extractor: E) -> Self {
        Self { extractor }
    }

    pub async fn fetch(&self, url: &str) -> Result<Article, ArticleError> {
        let parsed = Url::parse(url.trim()).map_err(|_| ArticleError::InvalidUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ArticleError::InvalidUrl(url.to_string()));
        }
        tracing::debug!(target: "web.article", url = %parsed, "article.fetch");
        self.extractor.extract(&parsed).await
    }
}
