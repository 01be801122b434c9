use inkstand_http::{Auth, HttpClient, HttpError, RequestOpts};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn send_attaches_bearer_headers_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/things"))
        .and(header("authorization", "Bearer secret"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"name": "widget"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "1"}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let resp = client
        .send(
            Method::POST,
            "/v1/things",
            Some(&json!({"name": "widget"})),
            RequestOpts {
                auth: Some(Auth::Bearer(" secret ")),
                headers: Some(headers),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(resp.status, StatusCode::CREATED);
    let body: serde_json::Value = resp.json().unwrap();
    assert_eq!(body["data"]["id"], "1");
}

#[tokio::test]
async fn send_returns_error_statuses_unjudged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"errors": [{"message": "not found", "code": 42}]})),
        )
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let resp = client
        .send::<()>(Method::GET, "/missing", None, RequestOpts::default())
        .await
        .unwrap();

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.error_message(), "not found");
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri())
        .unwrap()
        .with_timeout(Duration::from_millis(100));
    let err = client
        .send::<()>(Method::GET, "/slow", None, RequestOpts::default())
        .await
        .unwrap_err();

    assert!(matches!(err, HttpError::Timeout { timeout_ms: 100 }));
}

#[tokio::test]
async fn get_text_rejects_non_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_text("/page", RequestOpts::default())
        .await
        .unwrap_err();

    match err {
        HttpError::Api { status, message } => {
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(message, "maintenance");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn endpoint_segments_are_escaped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/a%3Fx=1%2Fb/posts"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let url = client.endpoint(&["v1", "users", "a?x=1/b", "posts"]).unwrap();
    let resp = client
        .send_to::<()>(Method::GET, url, None, RequestOpts::default())
        .await
        .unwrap();
    assert_eq!(resp.status, StatusCode::OK);

    assert!(matches!(
        client.endpoint(&["v1", "users", ".."]),
        Err(HttpError::Url(_))
    ));
}

#[tokio::test]
async fn detached_client_needs_absolute_urls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>hi</p>"))
        .mount(&server)
        .await;

    let client = HttpClient::detached().unwrap();
    assert!(client.base().is_none());

    let html = client
        .get_text(&format!("{}/page", server.uri()), RequestOpts::default())
        .await
        .unwrap();
    assert_eq!(html, "<p>hi</p>");

    let err = client
        .get_text("/page", RequestOpts::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Url(_)));
    assert!(client.endpoint(&["v1"]).is_err());
}
