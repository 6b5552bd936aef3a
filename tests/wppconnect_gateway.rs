use std::time::Duration;

use campaigns::{
    application::services::gateway::{GatewayError, MessageGateway, OutboundMessage},
    domain::models::GatewaySession,
    infrastructure::messaging::wppconnect::{WppConnectConfig, WppConnectGateway},
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

fn session() -> GatewaySession {
    GatewaySession {
        user_id: Uuid::new_v4(),
        session_name: "acme".to_string(),
        token: "tok-123".to_string(),
        updated_at: Utc::now(),
    }
}

fn gateway(server: &MockServer, timeout: Duration) -> std::sync::Arc<WppConnectGateway> {
    WppConnectGateway::new(&WppConnectConfig {
        base_url: format!("{}/", server.uri()),
        timeout,
    })
    .unwrap()
}

const HELLO: OutboundMessage<'static> = OutboundMessage {
    phone: "5511999",
    is_group: false,
    body: "hello",
};

#[tokio::test]
async fn posts_send_message_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/acme/send-message"))
        .and(header("authorization", "Bearer tok-123"))
        .and(body_json(json!({
            "phone": "120363",
            "isGroup": true,
            "isNewsletter": false,
            "isLid": false,
            "message": "hello"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "success",
            "response": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = gateway(&server, Duration::from_secs(5))
        .send(
            &session(),
            OutboundMessage {
                phone: "120363",
                is_group: true,
                body: "hello",
            },
        )
        .await;

    assert_eq!(result, Ok(()));
}

#[tokio::test]
async fn non_success_status_is_rejected_with_gateway_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "error",
            "message": "Unauthorized"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = gateway(&server, Duration::from_secs(5))
        .send(&session(), HELLO)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        GatewayError::Rejected {
            status: 401,
            message: "Unauthorized".to_string()
        }
    );
}

#[tokio::test]
async fn error_status_in_success_envelope_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "message": "number not on whatsapp"
        })))
        .mount(&server)
        .await;

    let err = gateway(&server, Duration::from_secs(5))
        .send(&session(), HELLO)
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Rejected { status: 200, ref message } if message == "number not on whatsapp"));
}

#[tokio::test]
async fn unparsable_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let err = gateway(&server, Duration::from_secs(5))
        .send(&session(), HELLO)
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Malformed(_)));
}

#[tokio::test]
async fn slow_gateway_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "success" }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = gateway(&server, Duration::from_millis(200))
        .send(&session(), HELLO)
        .await
        .unwrap_err();

    assert_eq!(err, GatewayError::Timeout);
    assert_eq!(err.to_string(), "timeout");
}

#[tokio::test]
async fn unreachable_gateway_is_a_transport_error() {
    let gateway = WppConnectGateway::new(&WppConnectConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout: Duration::from_secs(2),
    })
    .unwrap();

    let err = gateway.send(&session(), HELLO).await.unwrap_err();

    assert!(matches!(err, GatewayError::Transport(_)));
}
