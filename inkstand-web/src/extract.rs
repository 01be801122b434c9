//! Download a page and pull readable fields out of its HTML.
//!
//! Each field walks a fixed list of sources (Open Graph, Twitter cards,
//! plain meta tags, JSON-LD, then the markup itself) and keeps the first
//! non-empty hit.

use std::time::Duration;

use inkstand_http::{HttpClient, RequestOpts};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use url::Url;

use crate::article::{Article, ArticleError, ArticleExtractor};

const DESCRIPTION_CHARS: usize = 140;

/// Default [`ArticleExtractor`]: plain GET plus `scraper` heuristics.
#[derive(Clone)]
pub struct HtmlExtractor {
    http: HttpClient,
    headers: HeaderMap,
}

impl HtmlExtractor {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ArticleError> {
        let http = HttpClient::detached()?.with_timeout(timeout);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/html,application/xhtml+xml"));
        let agent = HeaderValue::from_str(user_agent)
            .map_err(|e| inkstand_http::HttpError::Build(format!("user agent: {e}")))?;
        headers.insert(USER_AGENT, agent);

        Ok(Self { http, headers })
    }
}

#[async_trait::async_trait]
impl ArticleExtractor for HtmlExtractor {
    async fn extract(&self, url: &Url) -> Result<Article, ArticleError> {
        let opts = RequestOpts {
            headers: Some(self.headers.clone()),
            ..Default::default()
        };
        let html = self.http.get_text(url.as_str(), opts).await?;
        tracing::debug!(target: "web.article", url = %url, bytes = html.len(), "article.downloaded");
        parse_article(url, &html)
    }
}

/// Build an [`Article`] from an already downloaded document.
///
/// Fails with [`ArticleError::NoContent`] when the page has neither a title
/// nor any paragraph text.
pub fn parse_article(url: &Url, html: &str) -> Result<Article, ArticleError> {
    let doc = Html::parse_document(html);
    let json_ld = json_ld_blocks(&doc);

    let paragraphs = paragraphs(&doc);
    let title = meta(&doc, "og:title")
        .or_else(|| meta(&doc, "twitter:title"))
        .or_else(|| first_text(&doc, "title"))
        .or_else(|| first_text(&doc, "h1"));

    if title.is_none() && paragraphs.is_empty() {
        return Err(ArticleError::NoContent(url.to_string()));
    }

    let primary_image = meta(&doc, "og:image")
        .or_else(|| meta(&doc, "twitter:image"))
        .or_else(|| first_attr(&doc, "article img[src]", "src"))
        .map(|src| resolve(url, &src));

    let date = meta(&doc, "article:published_time")
        .or_else(|| json_ld.iter().find_map(|v| ld_string(v, "datePublished")))
        .or_else(|| first_attr(&doc, "time[datetime]", "datetime"));

    let author = meta(&doc, "twitter:creator")
        .or_else(|| meta(&doc, "author"))
        .or_else(|| meta(&doc, "article:author"))
        .or_else(|| json_ld.iter().find_map(ld_author));

    let short_description = meta(&doc, "og:description")
        .or_else(|| meta(&doc, "description"))
        .or_else(|| paragraphs.first().map(|p| truncate(p, DESCRIPTION_CHARS)));

    Ok(Article {
        domain: domain_of(url),
        title,
        article_content: paragraphs.join("\n\n"),
        primary_image,
        date,
        author,
        short_description,
    })
}

fn domain_of(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// `<meta name=..>` first, then `<meta property=..>`.
fn meta(doc: &Html, key: &str) -> Option<String> {
    ["name", "property"].iter().find_map(|attr| {
        first_attr(doc, &format!("meta[{attr}=\"{key}\"]"), "content")
    })
}

fn first_attr(doc: &Html, css: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    doc.select(&selector)
        .filter_map(|el| el.value().attr(attr))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

fn first_text(doc: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    doc.select(&selector)
        .map(normalized_text)
        .find(|t| !t.is_empty())
}

fn normalized_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Paragraph text from the most specific container that has any.
fn paragraphs(doc: &Html) -> Vec<String> {
    for css in ["article p", "main p", "body p"] {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        let found: Vec<String> = doc
            .select(&selector)
            .map(normalized_text)
            .filter(|t| !t.is_empty())
            .collect();
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

fn resolve(base: &Url, src: &str) -> String {
    base.join(src)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| src.to_string())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}

fn json_ld_blocks(doc: &Html) -> Vec<Value> {
    let Ok(selector) = Selector::parse("script[type=\"application/ld+json\"]") else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for el in doc.select(&selector) {
        let raw: String = el.text().collect();
        if let Ok(value) = serde_json::from_str::<Value>(raw.trim()) {
            flatten_ld(value, &mut out);
        }
    }
    out
}

/// Unwrap top-level arrays and `@graph` containers into individual nodes.
fn flatten_ld(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => items.into_iter().for_each(|v| flatten_ld(v, out)),
        Value::Object(mut obj) => {
            if let Some(graph) = obj.remove("@graph") {
                flatten_ld(graph, out);
            }
            out.push(Value::Object(obj));
        }
        _ => {}
    }
}

fn ld_string(node: &Value, key: &str) -> Option<String> {
    node.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn ld_author(node: &Value) -> Option<String> {
    fn name(author: &Value) -> Option<String> {
        match author {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Object(_) => ld_string(author, "name"),
            Value::Array(items) => items.iter().find_map(name),
            _ => None,
        }
    }
    node.get("author").and_then(name)
}
