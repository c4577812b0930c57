use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use session_cell::{AuthClient, RegisterRequest, Role};
use shared_models::PortalError;
use shared_utils::test_utils::{MockGatewayResponses, TestConfig, TestUser};

fn auth_client(mock_server: &MockServer) -> AuthClient {
    let config = TestConfig::new(mock_server.uri()).to_portal_config();
    AuthClient::new(&config)
}

#[tokio::test]
async fn login_builds_a_session_from_the_issued_token() {
    let mock_server = MockServer::start().await;
    let token = TestUser::admin().token();

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"username": "admin1", "password": "s3cret"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockGatewayResponses::auth_success(&token, "admin1")),
        )
        .mount(&mock_server)
        .await;

    let session = auth_client(&mock_server)
        .login("admin1", "s3cret")
        .await
        .unwrap();

    assert_eq!(session.username, "admin1");
    assert_eq!(session.role, Some(Role::Admin));
    assert_eq!(session.token, token);
    assert!(!session.is_expired());
}

#[tokio::test]
async fn login_rejection_carries_the_server_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"message": "Invalid password"})),
        )
        .mount(&mock_server)
        .await;

    let result = auth_client(&mock_server).login("admin1", "wrong").await;

    assert_matches!(result, Err(PortalError::Validation(msg)) => {
        assert_eq!(msg, "Invalid password");
    });
}

#[tokio::test]
async fn login_envelope_failure_is_a_validation_error() {
    // Some gateway deployments answer 200 with success=false instead of a
    // 4xx; the portal treats both the same way.
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockGatewayResponses::auth_failure("User account is disabled")),
        )
        .mount(&mock_server)
        .await;

    let result = auth_client(&mock_server).login("admin1", "s3cret").await;

    assert_matches!(result, Err(PortalError::Validation(msg)) => {
        assert_eq!(msg, "User account is disabled");
    });
}

#[tokio::test]
async fn register_returns_a_live_session() {
    let mock_server = MockServer::start().await;
    let token = TestUser::new("newnurse", "NURSE").token();

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockGatewayResponses::auth_success(&token, "newnurse")),
        )
        .mount(&mock_server)
        .await;

    let request = RegisterRequest {
        username: "newnurse".to_string(),
        email: "nurse@hospital.test".to_string(),
        password: "s3cret".to_string(),
        first_name: "Nadia".to_string(),
        last_name: "Imani".to_string(),
        role: "NURSE".to_string(),
    };
    let session = auth_client(&mock_server).register(&request).await.unwrap();

    assert_eq!(session.username, "newnurse");
    assert_eq!(session.role, Some(Role::Nurse));
}

#[tokio::test]
async fn unreachable_auth_service_is_a_transport_error() {
    let config = TestConfig::new("http://127.0.0.1:9").to_portal_config();
    let result = AuthClient::new(&config).login("admin1", "s3cret").await;

    assert_matches!(result, Err(PortalError::Transport(_)));
}
