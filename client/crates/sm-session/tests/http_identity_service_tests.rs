//! HttpIdentityService against a wiremock server

use sm_session::{
    Credentials, HttpIdentityService, IdentityService, ImageRef, ProfilePatch, Role, ServiceError,
};

use std::time::Duration;

use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

fn user_json(image: Option<&str>) -> serde_json::Value {
    json!({
        "_id": "p-3",
        "firstName": "Mary",
        "lastName": "Jackson",
        "role": "parent",
        "email": "mary@school.example",
        "profileImage": image
    })
}

#[tokio::test]
async fn test_login_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_partial_json(json!({
            "email": "mary@school.example",
            "password": "secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": user_json(Some("/uploads/p-3.png")),
            "token": "jwt-abc"
        })))
        .mount(&mock_server)
        .await;

    let service = HttpIdentityService::new(&mock_server.uri());
    let response = service
        .login(&Credentials::new("mary@school.example", "secret"))
        .await
        .unwrap();

    assert_eq!(response.token, "jwt-abc");
    assert_eq!(response.user.id, "p-3");
    assert_eq!(response.user.role, Role::Parent);
    assert_eq!(response.user.profile_image, ImageRef::new("/uploads/p-3.png"));
}

#[tokio::test]
async fn test_login_rejected_uses_server_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid email or password"
        })))
        .mount(&mock_server)
        .await;

    let service = HttpIdentityService::new(&mock_server.uri());
    let err = service
        .login(&Credentials::new("mary@school.example", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Rejected { status: 401, .. }));
    assert_eq!(err.user_message(), "Invalid email or password");
}

#[tokio::test]
async fn test_nested_error_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": "VALIDATION", "message": "Email already in use" }
        })))
        .mount(&mock_server)
        .await;

    let service = HttpIdentityService::new(&mock_server.uri());
    let patch = ProfilePatch {
        email: Some("taken@school.example".to_string()),
        ..Default::default()
    };
    let err = service.update_identity("jwt-abc", &patch).await.unwrap_err();

    assert_eq!(err.user_message(), "Email already in use");
}

#[tokio::test]
async fn test_error_without_body_uses_status_reason() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let service = HttpIdentityService::new(&mock_server.uri());
    let err = service
        .update_identity("jwt-abc", &ProfilePatch::default())
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Service Unavailable");
}

#[tokio::test]
async fn test_update_sends_bearer_token_and_reads_wrapped_user() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/users/me"))
        .and(header("authorization", "Bearer jwt-abc"))
        .and(body_partial_json(json!({ "firstName": "Mae" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": user_json(None)
        })))
        .mount(&mock_server)
        .await;

    let service = HttpIdentityService::new(&format!("{}/", mock_server.uri()));
    assert_eq!(service.base_url(), mock_server.uri());
    let patch = ProfilePatch {
        first_name: Some("Mae".to_string()),
        ..Default::default()
    };
    let record = service.update_identity("jwt-abc", &patch).await.unwrap();

    assert_eq!(record.id, "p-3");
    assert_eq!(record.profile_image, None);
}

#[tokio::test]
async fn test_update_reads_bare_user() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(Some(""))))
        .mount(&mock_server)
        .await;

    let service = HttpIdentityService::new(&mock_server.uri());
    let record = service
        .update_identity("jwt-abc", &ProfilePatch::default())
        .await
        .unwrap();

    assert_eq!(record.email, "mary@school.example");
    assert_eq!(record.profile_image, None);
}

#[tokio::test]
async fn test_malformed_body_is_json_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let service = HttpIdentityService::new(&mock_server.uri());
    let err = service
        .login(&Credentials::new("mary@school.example", "secret"))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Json { .. }));
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    let service =
        HttpIdentityService::with_timeout("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();

    let err = service
        .login(&Credentials::new("mary@school.example", "secret"))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Http { .. }));
    assert_eq!(err.user_message(), "Unable to reach the server. Please try again.");
}
