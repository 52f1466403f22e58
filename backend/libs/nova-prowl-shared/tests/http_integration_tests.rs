//! Integration tests for the Prowl client over real HTTP

use nova_prowl_shared::{
    Notification, Priority, ProwlClient, ProwlConfig, ProwlError, ReqwestTransport, ServiceResult,
};
use std::time::Duration;
use wiremock::matchers::{body_string, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SUCCESS_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<prowl>
<success code="200" remaining="999" resetdate="1230000000" />
</prowl>"#;

const ERROR_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<prowl>
<error code="401">Invalid API key</error>
</prowl>"#;

fn client_for(server: &MockServer, api_keys: Vec<&str>, provider_key: Option<&str>) -> ProwlClient {
    let config = ProwlConfig::new(server.uri()).with_timeout(Duration::from_secs(5));
    ProwlClient::with_config(config, api_keys, provider_key.map(str::to_string))
        .expect("client should build")
}

// ==================== add ====================

#[tokio::test]
async fn test_add_posts_form_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/add"))
        .and(body_string(
            "apikey=abc123&event=Test&description=Desc&priority=0&application=DefaultApp",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(SUCCESS_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server, vec!["abc123"], None);
    client.set_notification(Notification::new("Test", "Desc"));

    let result = client.add().await.unwrap();
    assert!(result.is_success());
    assert_eq!(client.return_code(), Some(200));
    assert_eq!(client.remaining_requests(), Some(999));
}

#[tokio::test]
async fn test_add_with_multiple_keys_and_provider() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/add"))
        .and(body_string_contains("apikey=k1%2Ck2%2Ck3"))
        .and(body_string_contains("providerkey=prov"))
        .and(body_string_contains("priority=-2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SUCCESS_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server, vec!["k1", "k2", "k3"], Some("prov"));
    client.set_notification(
        Notification::new("Backup", "nightly backup done").with_priority(Priority::VeryLow),
    );

    assert!(client.add().await.unwrap().is_success());
}

#[tokio::test]
async fn test_add_service_error_is_not_an_err() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/add"))
        .respond_with(ResponseTemplate::new(401).set_body_string(ERROR_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server, vec!["badkey"], None);
    client.set_event(Some("Test".to_string()));

    match client.add().await.unwrap() {
        ServiceResult::Failure(info) => {
            assert_eq!(info.return_code, 401);
            assert_eq!(info.error_message, "Invalid API key");
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(client.error_message(), Some("Invalid API key"));
    assert!(client.remaining_requests().is_none());
}

// ==================== verify ====================

#[tokio::test]
async fn test_verify_uses_query_string() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/verify"))
        .and(query_param("apikey", "abc123"))
        .and(query_param("providerkey", "prov"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SUCCESS_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server, vec!["abc123"], Some("prov"));
    assert!(client.verify().await.unwrap().is_success());
    assert_eq!(client.reset_date(), Some("2008-12-23T02:40:00+00:00"));
}

#[tokio::test]
async fn test_lazy_quota_hits_server_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SUCCESS_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server, vec!["abc123"], None);
    assert_eq!(client.load_remaining_requests().await.unwrap(), Some(999));
    assert_eq!(client.load_remaining_requests().await.unwrap(), Some(999));
}

#[tokio::test]
async fn test_client_over_prebuilt_reqwest_client() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/verify"))
        .and(wiremock::matchers::header("user-agent", "nova-notifier/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SUCCESS_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let http_client = reqwest::Client::builder()
        .user_agent("nova-notifier/1.0")
        .build()
        .unwrap();
    let transport = ReqwestTransport::from_client(http_client);
    let mut client = ProwlClient::with_transport(
        ProwlConfig::new(server.uri()),
        Box::new(transport),
        "abc123",
        None,
    );

    assert!(client.verify().await.unwrap().is_success());
    assert_eq!(client.remaining_requests(), Some(999));
}

// ==================== failures ====================

#[tokio::test]
async fn test_unrecognized_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<prowl><retrieve/></prowl>"))
        .mount(&server)
        .await;

    let mut client = client_for(&server, vec!["abc123"], None);
    assert!(matches!(
        client.verify().await,
        Err(ProwlError::UnrecognizedResponse)
    ));
}

#[tokio::test]
async fn test_html_error_page_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/add"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html><body>Bad Gateway"))
        .mount(&server)
        .await;

    let mut client = client_for(&server, vec!["abc123"], None);
    assert!(matches!(
        client.add().await,
        Err(ProwlError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/verify"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(SUCCESS_BODY)
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = ProwlConfig::new(server.uri()).with_timeout(Duration::from_millis(50));
    let mut client = ProwlClient::with_config(config, "abc123", None).unwrap();

    let err = client.verify().await.unwrap_err();
    assert!(matches!(err, ProwlError::Transport(_)));
    assert!(client.last_result().is_none());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let config = ProwlConfig::new("http://127.0.0.1:1".to_string());
    let mut client = ProwlClient::with_config(config, "abc123", None).unwrap();

    assert!(matches!(
        client.verify().await,
        Err(ProwlError::Transport(_))
    ));
}
