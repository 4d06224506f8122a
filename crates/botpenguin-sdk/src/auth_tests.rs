//! Tests for credential types and auth context derivation.

use super::*;

// ============================================================================
// Credential Tests
// ============================================================================

/// Verify the builder produces a bot-scoped credential.
#[test]
fn test_credential_bot_scoped() {
    let credential = Credential::new("token")
        .with_bot(BotId::new("bot-1"))
        .with_platform("WhatsApp");

    assert_eq!(credential.access_token, "token");
    assert_eq!(credential.bot_id(), Some(&BotId::new("bot-1")));
    assert_eq!(credential.agent_id(), None);
}

/// Verify scoping to an agent replaces a previous bot scope.
#[test]
fn test_credential_actor_is_exclusive() {
    let credential = Credential::new("token")
        .with_bot(BotId::new("bot-1"))
        .with_agent(AgentId::new("agent-1"));

    assert_eq!(credential.bot_id(), None);
    assert_eq!(credential.agent_id(), Some(&AgentId::new("agent-1")));
}

// ============================================================================
// CredentialRecord Tests
// ============================================================================

/// Verify a bot record converts into the tagged form.
#[test]
fn test_record_with_bot_discriminant() {
    let record = CredentialRecord {
        access_token: "token".to_string(),
        bot_id: Some("bot-1".to_string()),
        agent_id: Some("agent-1".to_string()),
        context_type: Some("bot".to_string()),
        platform: Some("whatsapp".to_string()),
    };

    let credential = Credential::from(record);
    assert_eq!(credential.actor, Some(ActorContext::Bot(BotId::new("bot-1"))));
}

/// Verify an agent record converts into the tagged form.
#[test]
fn test_record_with_agent_discriminant() {
    let record = CredentialRecord {
        access_token: "token".to_string(),
        bot_id: Some("bot-1".to_string()),
        agent_id: Some("agent-1".to_string()),
        context_type: Some("agent".to_string()),
        platform: None,
    };

    let credential = Credential::from(record);
    assert_eq!(
        credential.actor,
        Some(ActorContext::Agent(AgentId::new("agent-1")))
    );
}

/// Verify an undiscriminated record prefers the bot identity.
#[test]
fn test_record_without_discriminant_prefers_bot() {
    let record = CredentialRecord {
        access_token: "token".to_string(),
        bot_id: Some("bot-1".to_string()),
        agent_id: Some("agent-1".to_string()),
        context_type: None,
        platform: None,
    };

    let credential = Credential::from(record);
    assert_eq!(credential.actor, Some(ActorContext::Bot(BotId::new("bot-1"))));
}

/// Verify camelCase field names round-trip through the stored format.
#[test]
fn test_record_deserializes_stored_format() {
    let record: CredentialRecord = serde_json::from_str(
        r#"{"accessToken": "token", "botId": "bot-1", "contextType": "bot", "platform": "telegram"}"#,
    )
    .unwrap();

    assert_eq!(record.access_token, "token");
    assert_eq!(record.bot_id.as_deref(), Some("bot-1"));
    assert_eq!(record.platform.as_deref(), Some("telegram"));
}

/// Verify missing fields default instead of failing.
#[test]
fn test_record_tolerates_missing_fields() {
    let record: CredentialRecord = serde_json::from_str("{}").unwrap();
    assert_eq!(record.access_token, "");
    assert_eq!(Credential::from(record).actor, None);
}

// ============================================================================
// AuthContext Tests
// ============================================================================

/// Verify derivation produces all outbound material.
#[test]
fn test_auth_context_derivation() {
    let credential = Credential::new("secret")
        .with_bot(BotId::new("bot-1"))
        .with_platform("WhatsApp");
    let auth = AuthContext::derive(&credential);

    assert_eq!(auth.bearer_header(), "Bearer secret");
    assert_eq!(auth.query_token(), "secret");
    assert_eq!(auth.bot_id(), Some(&BotId::new("bot-1")));
    assert_eq!(auth.bot_id_str(), "bot-1");
    assert_eq!(auth.platform(), Some("whatsapp"));
}

/// Verify a missing token yields an empty bearer value, not an error.
#[test]
fn test_auth_context_empty_token() {
    let credential = Credential::new("");
    let auth = AuthContext::derive(&credential);

    assert_eq!(auth.bearer_header(), "Bearer ");
    assert_eq!(auth.query_token(), "");
}

/// Verify an actor-less credential has an empty bot ID string.
#[test]
fn test_auth_context_without_actor() {
    let auth = AuthContext::derive(&Credential::new("token"));

    assert_eq!(auth.bot_id(), None);
    assert_eq!(auth.agent_id(), None);
    assert_eq!(auth.bot_id_str(), "");
    assert_eq!(auth.platform(), None);
}

/// Verify agent-scoped credentials expose the agent and no bot.
#[test]
fn test_auth_context_agent_scope() {
    let credential = Credential::new("token").with_agent(AgentId::new("agent-9"));
    let auth = AuthContext::derive(&credential);

    assert_eq!(auth.agent_id(), Some(&AgentId::new("agent-9")));
    assert_eq!(auth.bot_id_str(), "");
}
