//! Tests for WhatsApp option discovery.

use super::*;
use crate::client::ClientConfig;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    let config = ClientConfig::default().with_base_url(server.uri());
    ApiClient::new(config).unwrap()
}

fn credential() -> Credential {
    Credential::new("token")
}

/// Verify bots map to name/value options.
#[tokio::test]
async fn test_list_whatsapp_bots() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/whatsapp-automation"))
        .and(header("Authorization", "Bearer token"))
        .and(header("authtype", "Key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"_id": "bot-1", "name": "Support Bot"},
                {"_id": "bot-2", "name": "Sales Bot"},
            ]
        })))
        .mount(&mock_server)
        .await;

    let bots = client_for(&mock_server)
        .list_whatsapp_bots(&credential())
        .await
        .unwrap();

    assert_eq!(
        bots,
        vec![
            SelectOption {
                name: "Support Bot".to_string(),
                value: "bot-1".to_string(),
            },
            SelectOption {
                name: "Sales Bot".to_string(),
                value: "bot-2".to_string(),
            },
        ]
    );
}

/// Verify bots with missing fields map to empty strings instead of failing.
#[tokio::test]
async fn test_list_whatsapp_bots_missing_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/whatsapp-automation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"somethingElse": true}]
        })))
        .mount(&mock_server)
        .await;

    let bots = client_for(&mock_server)
        .list_whatsapp_bots(&credential())
        .await
        .unwrap();

    assert_eq!(bots.len(), 1);
    assert_eq!(bots[0].name, "");
    assert_eq!(bots[0].value, "");
}

/// Verify a missing data field yields an empty list.
#[tokio::test]
async fn test_list_whatsapp_bots_no_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/whatsapp-automation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&mock_server)
        .await;

    let bots = client_for(&mock_server)
        .list_whatsapp_bots(&credential())
        .await
        .unwrap();
    assert!(bots.is_empty());
}

/// Verify template names come from the nested configuration object.
#[tokio::test]
async fn test_list_whatsapp_templates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/whatsapp-automation/plugin/templates/bot-1"))
        .and(header("Authorization", "Bearer token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"_id": "tpl-1", "configuration": {"name": "Welcome"}},
                {"_id": "tpl-2"},
            ]
        })))
        .mount(&mock_server)
        .await;

    let templates = client_for(&mock_server)
        .list_whatsapp_templates(&credential(), &BotId::new("bot-1"))
        .await
        .unwrap();

    assert_eq!(templates.len(), 2);
    assert_eq!(templates[0].name, "Welcome");
    assert_eq!(templates[0].value, "tpl-1");
    assert_eq!(templates[1].name, "");
}

/// Verify an empty bot ID short-circuits without a network call.
#[tokio::test]
async fn test_list_whatsapp_templates_empty_bot_id() {
    let mock_server = MockServer::start().await;
    // No mock mounted: a request would fail the test.

    let templates = client_for(&mock_server)
        .list_whatsapp_templates(&credential(), &BotId::new(""))
        .await
        .unwrap();
    assert!(templates.is_empty());
}

/// Verify dynamic fields map key and sample value.
#[tokio::test]
async fn test_template_dynamic_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/whatsapp-automation/plugin/make-template-dynamic-fields/tpl-1",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"key": "firstName", "value": "e.g. Jane"},
                {"key": "orderId"},
            ]
        })))
        .mount(&mock_server)
        .await;

    let fields = client_for(&mock_server)
        .template_dynamic_fields(&credential(), "tpl-1")
        .await
        .unwrap();

    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].key, "firstName");
    assert_eq!(fields[0].description.as_deref(), Some("e.g. Jane"));
    assert_eq!(fields[1].description, None);
}

/// Verify an empty template ID short-circuits without a network call.
#[tokio::test]
async fn test_template_dynamic_fields_empty_id() {
    let mock_server = MockServer::start().await;

    let fields = client_for(&mock_server)
        .template_dynamic_fields(&credential(), "")
        .await
        .unwrap();
    assert!(fields.is_empty());
}
