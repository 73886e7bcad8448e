//! Provider contract tests.
//!
//! Verify the HTTP requests sent to both knowledge services and how their
//! responses (including error statuses and malformed bodies) are mapped,
//! using a local mock server.

use std::time::Duration;

use sage_chat::error::ProviderError;
use sage_chat::provider::http::build_client;
use sage_chat::{
    EncyclopediaProvider, InstantAnswerProvider, KnowledgeProvider, KnowledgeResolver,
    ProviderKind, Resolution,
};
use sage_core::config::ProvidersConfig;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ProvidersConfig {
    ProvidersConfig {
        instant_answer_url: format!("{}/", server.uri()),
        summary_url: format!("{}/page/summary/", server.uri()),
        ..ProvidersConfig::default()
    }
}

fn instant_answer(server: &MockServer) -> InstantAnswerProvider {
    let config = config_for(server);
    InstantAnswerProvider::new(build_client(&config).unwrap(), &config.instant_answer_url).unwrap()
}

fn encyclopedia(server: &MockServer) -> EncyclopediaProvider {
    let config = config_for(server);
    EncyclopediaProvider::new(build_client(&config).unwrap(), &config.summary_url).unwrap()
}

fn empty_instant_answer() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "Abstract": "",
        "AbstractURL": "",
        "Answer": "",
        "Definition": ""
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Instant answers
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_instant_answer_request_format() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("q", "ada lovelace"))
        .and(query_param("format", "json"))
        .and(query_param("no_redirect", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Abstract": "Ada Lovelace was an English mathematician.",
            "AbstractURL": "https://en.wikipedia.org/wiki/Ada_Lovelace"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = instant_answer(&server).lookup("ada lovelace").await.unwrap();
    assert_eq!(
        result.extract.as_deref(),
        Some("Ada Lovelace was an English mathematician.")
    );
    assert_eq!(
        result.source_url.as_deref(),
        Some("https://en.wikipedia.org/wiki/Ada_Lovelace")
    );
}

#[tokio::test]
async fn test_instant_answer_sends_user_agent() {
    let server = MockServer::start().await;
    let config = config_for(&server);

    Mock::given(method("GET"))
        .and(header("user-agent", config.user_agent.as_str()))
        .respond_with(empty_instant_answer())
        .expect(1)
        .mount(&server)
        .await;

    let result = instant_answer(&server).lookup("anything").await.unwrap();
    assert!(!result.is_usable());
}

#[tokio::test]
async fn test_instant_answer_definition_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Abstract": "",
            "Answer": "",
            "Definition": "Entropy: a thermodynamic quantity."
        })))
        .mount(&server)
        .await;

    let result = instant_answer(&server).lookup("entropy").await.unwrap();
    assert_eq!(
        result.extract.as_deref(),
        Some("Entropy: a thermodynamic quantity.")
    );
}

#[tokio::test]
async fn test_instant_answer_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = instant_answer(&server).lookup("x").await.unwrap_err();
    assert_eq!(err, ProviderError::Status(503));
}

#[tokio::test]
async fn test_instant_answer_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&server)
        .await;

    let err = instant_answer(&server).lookup("x").await.unwrap_err();
    assert!(matches!(err, ProviderError::Parse(_)));
}

// ────────────────────────────────────────────────────────────────────────────
// Encyclopedia summaries
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_summary_request_path_encodes_topic() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page/summary/black%20hole"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "Black hole",
            "extract": "A black hole is a region of spacetime.",
            "thumbnail": {"source": "https://upload.wikimedia.org/bh.jpg"},
            "content_urls": {"desktop": {"page": "https://en.wikipedia.org/wiki/Black_hole"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = encyclopedia(&server).lookup("black hole").await.unwrap();
    assert_eq!(
        result.extract.as_deref(),
        Some("A black hole is a region of spacetime.")
    );
    assert_eq!(
        result.thumbnail_url.as_deref(),
        Some("https://upload.wikimedia.org/bh.jpg")
    );
    assert_eq!(
        result.source_url.as_deref(),
        Some("https://en.wikipedia.org/wiki/Black_hole")
    );
}

#[tokio::test]
async fn test_summary_not_found_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "type": "https://mediawiki.org/wiki/HyperSwitch/errors/not_found",
            "title": "Not found.",
            "detail": "Page or revision not found."
        })))
        .mount(&server)
        .await;

    let result = encyclopedia(&server).lookup("zzzzqqq").await.unwrap();
    assert!(!result.is_usable());
}

#[tokio::test]
async fn test_summary_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = encyclopedia(&server).lookup("x").await.unwrap_err();
    assert_eq!(err, ProviderError::Status(500));
}

#[tokio::test]
async fn test_summary_error_status_with_json_body_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "title": "Service unavailable",
            "detail": "upstream timeout"
        })))
        .mount(&server)
        .await;

    let err = encyclopedia(&server).lookup("x").await.unwrap_err();
    assert_eq!(err, ProviderError::Status(503));
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    // Reserve a port, then free it so nothing is listening there.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let config = ProvidersConfig::default();
    let provider = EncyclopediaProvider::new(
        build_client(&config).unwrap(),
        &format!("http://{}/page/summary/", addr),
    )
    .unwrap();

    let err = provider.lookup("x").await.unwrap_err();
    assert!(matches!(err, ProviderError::Http(_)));
}

// ────────────────────────────────────────────────────────────────────────────
// Resolver over HTTP
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_generic_answer_never_queries_summary() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Abstract": "Rust is a programming language."
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/summary/rust"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"extract": "unused"})))
        .expect(0)
        .mount(&server)
        .await;

    let resolver = KnowledgeResolver::from_config(&config_for(&server)).unwrap();
    match resolver.resolve_generic("rust").await {
        Resolution::Answer { provider, result } => {
            assert_eq!(provider, ProviderKind::InstantAnswer);
            assert_eq!(
                result.extract.as_deref(),
                Some("Rust is a programming language.")
            );
        }
        other => panic!("expected answer, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generic_falls_back_to_summary() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(empty_instant_answer())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/summary/python"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "extract": "Python is a programming language."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = KnowledgeResolver::from_config(&config_for(&server)).unwrap();
    let resolution = resolver.resolve_generic("python").await;
    assert!(matches!(
        resolution,
        Resolution::Answer {
            provider: ProviderKind::Encyclopedia,
            ..
        }
    ));
}

#[tokio::test]
async fn test_generic_not_found_when_both_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(empty_instant_answer())
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/summary/zzzzqqq"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let resolver = KnowledgeResolver::from_config(&config_for(&server)).unwrap();
    assert_eq!(resolver.resolve_generic("zzzzqqq").await, Resolution::NotFound);
}

#[tokio::test]
async fn test_generic_network_error_when_summary_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/summary/x"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let resolver = KnowledgeResolver::from_config(&config_for(&server)).unwrap();
    assert_eq!(
        resolver.resolve_generic("x").await,
        Resolution::NetworkError(ProviderError::Status(502))
    );
}

#[tokio::test]
async fn test_limited_lookup_queries_summary_only() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Abstract": "unused"})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/summary/planet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "extract": "A planet is a large body. It orbits a star. It has cleared its orbit."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = KnowledgeResolver::from_config(&config_for(&server)).unwrap();
    match resolver.resolve_limited("planet", 2).await {
        Resolution::Answer { result, .. } => {
            assert_eq!(
                result.extract.as_deref(),
                Some("A planet is a large body. It orbits a star.")
            );
        }
        other => panic!("expected answer, got {:?}", other),
    }
}

#[tokio::test]
async fn test_configured_timeout_surfaces_as_network_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"extract": "too late"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = ProvidersConfig {
        timeout_secs: Some(1),
        ..config_for(&server)
    };
    let resolver = KnowledgeResolver::from_config(&config).unwrap();
    assert!(matches!(
        resolver.resolve_limited("slow", 3).await,
        Resolution::NetworkError(ProviderError::Http(_))
    ));
}
