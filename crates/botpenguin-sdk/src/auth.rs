//! Credential types and outbound authentication material.
//!
//! This module provides the credential model for BotPenguin integrations:
//! - ID types ([`BotId`], [`AgentId`])
//! - The stored credential record and its in-memory form ([`Credential`])
//! - The derived per-call authentication material ([`AuthContext`])
//!
//! Credentials are resolved and supplied by the host workflow runtime; this
//! module never performs network calls.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Core ID Types
// ============================================================================

/// Identifier of a BotPenguin bot.
///
/// Assigned by the platform when a bot is created and carried on most
/// outbound calls, either as a header, a query parameter, or a body field.
///
/// # Examples
///
/// ```
/// use botpenguin_sdk::auth::BotId;
///
/// let bot_id = BotId::new("64f1c0ffee");
/// assert_eq!(bot_id.as_str(), "64f1c0ffee");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BotId(String);

impl BotId {
    /// Create a new bot ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a BotPenguin live-chat agent.
///
/// Present instead of a [`BotId`] when the stored credential is scoped to an
/// agent seat rather than a bot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(String);

impl AgentId {
    /// Create a new agent ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Credential
// ============================================================================

/// The acting identity a credential is scoped to.
///
/// A stored credential record carries `botId`/`agentId` fields with a
/// `contextType` discriminant; in memory that is a proper tagged union so
/// exactly one identity is meaningful at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorContext {
    /// Credential acts as a bot.
    Bot(BotId),
    /// Credential acts as a live-chat agent.
    Agent(AgentId),
}

/// An API credential as supplied by the host workflow runtime.
///
/// Immutable for the duration of one execution. The access token is the only
/// required part; a missing token is tolerated here and rejected by the
/// remote service instead.
///
/// # Examples
///
/// ```
/// use botpenguin_sdk::auth::{BotId, Credential};
///
/// let credential = Credential::new("secret-token")
///     .with_bot(BotId::new("bot-1"))
///     .with_platform("WhatsApp");
/// assert_eq!(credential.platform.as_deref(), Some("WhatsApp"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Bearer token issued by the BotPenguin console.
    pub access_token: String,

    /// The bot or agent this credential is scoped to, when known.
    pub actor: Option<ActorContext>,

    /// Messaging platform tag (e.g. `"whatsapp"`, `"telegram"`).
    pub platform: Option<String>,
}

impl Credential {
    /// Create a credential from an access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            actor: None,
            platform: None,
        }
    }

    /// Scope the credential to a bot.
    pub fn with_bot(mut self, bot_id: BotId) -> Self {
        self.actor = Some(ActorContext::Bot(bot_id));
        self
    }

    /// Scope the credential to a live-chat agent.
    pub fn with_agent(mut self, agent_id: AgentId) -> Self {
        self.actor = Some(ActorContext::Agent(agent_id));
        self
    }

    /// Set the messaging platform tag.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// The bot ID, if this credential is bot-scoped.
    pub fn bot_id(&self) -> Option<&BotId> {
        match &self.actor {
            Some(ActorContext::Bot(id)) => Some(id),
            _ => None,
        }
    }

    /// The agent ID, if this credential is agent-scoped.
    pub fn agent_id(&self) -> Option<&AgentId> {
        match &self.actor {
            Some(ActorContext::Agent(id)) => Some(id),
            _ => None,
        }
    }
}

/// Flat on-disk shape of a stored credential record.
///
/// This is the document format the host runtime persists: optional
/// `botId`/`agentId` fields with a `contextType` string discriminant.
/// Convert into [`Credential`] to get the tagged form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CredentialRecord {
    /// API access token.
    pub access_token: String,

    /// Bot identifier, when the record is bot-scoped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<String>,

    /// Agent identifier, when the record is agent-scoped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,

    /// Discriminant: `"bot"` or `"agent"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_type: Option<String>,

    /// Messaging platform tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl From<CredentialRecord> for Credential {
    fn from(record: CredentialRecord) -> Self {
        // The discriminant wins; records without one fall back to whichever
        // identity field is present, preferring the bot.
        let actor = match record.context_type.as_deref() {
            Some("agent") => record.agent_id.map(|id| ActorContext::Agent(AgentId::new(id))),
            Some("bot") => record.bot_id.map(|id| ActorContext::Bot(BotId::new(id))),
            _ => record
                .bot_id
                .map(|id| ActorContext::Bot(BotId::new(id)))
                .or_else(|| record.agent_id.map(|id| ActorContext::Agent(AgentId::new(id)))),
        };

        Self {
            access_token: record.access_token,
            actor,
            platform: record.platform,
        }
    }
}

// ============================================================================
// Auth Context
// ============================================================================

/// Per-call authentication material derived from a [`Credential`].
///
/// Derivation is pure and never fails: a missing access token yields an empty
/// bearer value rather than an error, so the remote service makes the final
/// authorization decision.
///
/// # Examples
///
/// ```
/// use botpenguin_sdk::auth::{AuthContext, BotId, Credential};
///
/// let credential = Credential::new("token")
///     .with_bot(BotId::new("bot-1"))
///     .with_platform("WhatsApp");
/// let auth = AuthContext::derive(&credential);
///
/// assert_eq!(auth.bearer_header(), "Bearer token");
/// assert_eq!(auth.query_token(), "token");
/// assert_eq!(auth.bot_id_str(), "bot-1");
/// assert_eq!(auth.platform(), Some("whatsapp"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    bearer_header: String,
    query_token: String,
    bot_id: Option<BotId>,
    agent_id: Option<AgentId>,
    platform: Option<String>,
}

impl AuthContext {
    /// Derive the outbound authentication material from a credential.
    pub fn derive(credential: &Credential) -> Self {
        Self {
            bearer_header: format!("Bearer {}", credential.access_token),
            query_token: credential.access_token.clone(),
            bot_id: credential.bot_id().cloned(),
            agent_id: credential.agent_id().cloned(),
            platform: credential.platform.as_deref().map(str::to_lowercase),
        }
    }

    /// Value for the `Authorization` header.
    pub fn bearer_header(&self) -> &str {
        &self.bearer_header
    }

    /// Token value for the `access_token` query parameter.
    pub fn query_token(&self) -> &str {
        &self.query_token
    }

    /// The bot ID, when the credential is bot-scoped.
    pub fn bot_id(&self) -> Option<&BotId> {
        self.bot_id.as_ref()
    }

    /// The agent ID, when the credential is agent-scoped.
    pub fn agent_id(&self) -> Option<&AgentId> {
        self.agent_id.as_ref()
    }

    /// Bot ID as a plain string, empty when absent.
    ///
    /// The remote API expects the identifier field to be present (possibly
    /// empty) in queries and bodies, so this never returns `None`.
    pub fn bot_id_str(&self) -> &str {
        self.bot_id.as_ref().map(BotId::as_str).unwrap_or("")
    }

    /// Lowercased messaging platform tag.
    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
