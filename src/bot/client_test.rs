use super::client::{AuthApi, HttpApiClient};
use crate::constants::{
    BOT_SECRET_HEADER, ROUTE_BOT_CODE, ROUTE_BOT_ENSURE_USER, ROUTE_BOT_PROFILE,
};
use crate::model::EnsureUserRequest;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_code_fetches_and_sends_secret() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE_BOT_CODE))
        .and(header(BOT_SECRET_HEADER, "s3cret"))
        .and(body_json(json!({"chatId": 42})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "1234"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpApiClient::new(server.uri(), "s3cret").unwrap();
    let code = client.code(42).await.unwrap();
    assert_eq!(code.as_deref(), Some("1234"));
}

#[tokio::test]
async fn test_code_absent_on_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE_BOT_CODE))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": "No user linked to this chat account.",
            "errorCode": 40402
        })))
        .mount(&server)
        .await;

    let client = HttpApiClient::new(server.uri(), "s3cret").unwrap();
    assert_eq!(client.code(42).await.unwrap(), None);
}

#[tokio::test]
async fn test_ensure_user_reports_acceptance() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE_BOT_ENSURE_USER))
        .and(header(BOT_SECRET_HEADER, "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let client = HttpApiClient::new(server.uri(), "s3cret").unwrap();
    let req = EnsureUserRequest {
        chat_id: 42,
        first_name: Some("Ada".to_string()),
        ..Default::default()
    };
    assert!(client.ensure_user(&req).await.unwrap());
}

#[tokio::test]
async fn test_ensure_user_rejection_is_false_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE_BOT_ENSURE_USER))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = HttpApiClient::new(server.uri(), "s3cret").unwrap();
    let req = EnsureUserRequest {
        chat_id: 42,
        ..Default::default()
    };
    assert!(!client.ensure_user(&req).await.unwrap());
}

#[tokio::test]
async fn test_profile_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ROUTE_BOT_PROFILE))
        .and(query_param("chatId", "42"))
        .and(header(BOT_SECRET_HEADER, "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "phone": "+15551230001",
            "chatId": 42
        })))
        .mount(&server)
        .await;

    let client = HttpApiClient::new(server.uri(), "s3cret").unwrap();
    let profile = client.profile(42).await.unwrap().unwrap();
    assert_eq!(profile.first_name.as_deref(), Some("Ada"));
    assert_eq!(profile.phone.as_deref(), Some("+15551230001"));
    assert_eq!(profile.chat_id, 42);
}

#[tokio::test]
async fn test_profile_absent_on_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ROUTE_BOT_PROFILE))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = HttpApiClient::new(server.uri(), "s3cret").unwrap();
    assert_eq!(client.profile(42).await.unwrap(), None);
}

#[tokio::test]
async fn test_base_url_trailing_slash_is_tolerated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE_BOT_CODE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "1234"})))
        .mount(&server)
        .await;

    let client = HttpApiClient::new(format!("{}/", server.uri()), "s3cret").unwrap();
    assert_eq!(client.code(42).await.unwrap().as_deref(), Some("1234"));
}
