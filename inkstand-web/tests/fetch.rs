use std::time::Duration;

use inkstand_web::{ArticleError, ArticleFetcher, HtmlExtractor};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<!doctype html>
<html><head>
  <meta property="og:title" content="Mocked Story">
  <meta name="twitter:creator" content="@Aegist">
  <meta property="og:image" content="/hero.jpeg">
</head><body><article><p>First paragraph.</p><p>Second paragraph.</p></article></body></html>"#;

fn fetcher(timeout: Duration) -> ArticleFetcher<HtmlExtractor> {
    ArticleFetcher::new(HtmlExtractor::new("inkstand-test/1.0", timeout).unwrap())
}

#[tokio::test]
async fn downloads_and_extracts_with_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/story"))
        .and(header("user-agent", "inkstand-test/1.0"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(PAGE),
        )
        .expect(1)
        .mount(&server)
        .await;

    let article = fetcher(Duration::from_secs(5))
        .fetch(&format!("{}/story", server.uri()))
        .await
        .unwrap();

    assert_eq!(article.domain, "127.0.0.1");
    assert_eq!(article.title.as_deref(), Some("Mocked Story"));
    assert_eq!(article.author.as_deref(), Some("@Aegist"));
    assert_eq!(article.primary_image, Some(format!("{}/hero.jpeg", server.uri())));
    assert_eq!(article.article_content, "First paragraph.\n\nSecond paragraph.");
}

#[tokio::test]
async fn http_failures_propagate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&server)
        .await;

    let err = fetcher(Duration::from_secs(5))
        .fetch(&format!("{}/missing", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ArticleError::Http(_)));
}

#[tokio::test]
async fn slow_pages_time_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(PAGE)
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = fetcher(Duration::from_millis(100))
        .fetch(&server.uri())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ArticleError::Http(inkstand_http::HttpError::Timeout { timeout_ms: 100 })
    ));
}
