//! Subscription reconciliation against the remote webhook registry.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::auth::{AuthContext, Credential};
use crate::client::{OperationRequest, RemoteApi};
use crate::error::{ApiError, SubscriptionError};
use crate::events::TriggerEvent;

// The remote spells it this way.
const SUBSCRIBED_WEBHOOKS_PATH: &str = "/integrations/custom-app/subscribed-webhoook-urls";
const SUBSCRIBE_TRIGGER_PATH: &str = "/integrations/custom-app/subscribe-trigger-event";

/// Default integration identifier sent as both `slug` and `category`.
const DEFAULT_INTEGRATION: &str = "custom-app";

// ============================================================================
// Configuration and Intent
// ============================================================================

/// Identity the reconciler registers subscriptions under.
///
/// The remote registry keys subscriptions by integration `slug` and
/// `category` in addition to the event type; both default to the custom-app
/// integration identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerConfig {
    /// Integration slug sent on every subscription call
    pub slug: String,
    /// Integration category sent on every subscription call
    pub category: String,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            slug: DEFAULT_INTEGRATION.to_string(),
            category: DEFAULT_INTEGRATION.to_string(),
        }
    }
}

impl ReconcilerConfig {
    /// Use one identifier for both slug and category.
    pub fn with_integration(integration: impl Into<String>) -> Self {
        let integration = integration.into();
        Self {
            slug: integration.clone(),
            category: integration,
        }
    }
}

/// The declarative subscription state pushed to the remote service.
///
/// Serialized as the body of the subscribe call; `subscribe` discriminates
/// registration from teardown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionIntent {
    /// Callback URL the remote service should push events to
    #[serde(rename = "webhookUrl")]
    pub webhook_url: String,

    /// Bot the subscription is scoped to
    #[serde(rename = "botId")]
    pub bot_id: String,

    /// Event type hook name (e.g. `newLeadHook`)
    pub event: String,

    /// Integration slug
    pub slug: String,

    /// Integration category
    pub category: String,

    /// Messaging platform tag, as stored on the credential
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    /// `true` to register, `false` to tear down
    pub subscribe: bool,
}

#[derive(Debug, Serialize)]
struct CheckRequest {
    #[serde(rename = "botId")]
    bot_id: String,
    event: String,
    slug: String,
    category: String,
}

// ============================================================================
// Check Response Schema
// ============================================================================

// The registry answer is a loosely-structured document; only the pieces the
// scan relies on are modeled, everything else is ignored and every field is
// optional so shape drift reads as "no match" instead of an error.

#[derive(Debug, Deserialize)]
struct SubscribedWebhooksResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Vec<SubscriptionEntry>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionEntry {
    #[serde(rename = "integrationCredentials", default)]
    integration_credentials: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct WebhookBinding {
    #[serde(default)]
    url: Option<String>,
}

fn contains_webhook(response: &SubscribedWebhooksResponse, event_key: &str, url: &str) -> bool {
    if !response.success {
        return false;
    }

    for entry in &response.data {
        let Some(bindings) = entry.integration_credentials.get(event_key) else {
            continue;
        };
        let Some(bindings) = bindings.as_array() else {
            continue;
        };
        for binding in bindings {
            if let Ok(binding) = serde_json::from_value::<WebhookBinding>(binding.clone()) {
                if binding.url.as_deref() == Some(url) {
                    return true;
                }
            }
        }
    }

    false
}

// ============================================================================
// Reconciler
// ============================================================================

/// Drives remote webhook subscription state toward a declared intent.
///
/// One logical subscription is keyed by `(event, webhook_url)`. The
/// reconciler holds no local state and no lock; the host lifecycle never runs
/// the three entry points concurrently for the same subscription.
///
/// # Examples
///
/// ```no_run
/// use botpenguin_sdk::auth::{BotId, Credential};
/// use botpenguin_sdk::client::{ApiClient, ClientConfig};
/// use botpenguin_sdk::events::TriggerEvent;
/// use botpenguin_sdk::webhook::SubscriptionReconciler;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Arc::new(ApiClient::new(ClientConfig::default())?);
/// let reconciler = SubscriptionReconciler::new(client);
/// let credential = Credential::new("token").with_bot(BotId::new("bot-1"));
///
/// let url = "https://workflows.example.com/hooks/abc";
/// if !reconciler.check_exists(TriggerEvent::NewLead, url, &credential).await {
///     reconciler.create(TriggerEvent::NewLead, url, &credential).await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SubscriptionReconciler {
    api: Arc<dyn RemoteApi>,
    config: ReconcilerConfig,
}

impl SubscriptionReconciler {
    /// Create a reconciler with the default integration identity.
    pub fn new(api: Arc<dyn RemoteApi>) -> Self {
        Self {
            api,
            config: ReconcilerConfig::default(),
        }
    }

    /// Replace the integration identity.
    pub fn with_config(mut self, config: ReconcilerConfig) -> Self {
        self.config = config;
        self
    }

    /// Check whether a subscription for `(event, webhook_url)` already exists.
    ///
    /// Scans the registry answer for the event's binding list and compares
    /// URLs. Returns `false` when the scan completes without a match, and
    /// also `false` when the call fails or the response shape is unexpected:
    /// an unverifiable subscription is assumed absent so that `create` can
    /// proceed. The cost of that assumption is a possible duplicate
    /// subscription on the remote side.
    pub async fn check_exists(
        &self,
        event: TriggerEvent,
        webhook_url: &str,
        credential: &Credential,
    ) -> bool {
        info!(event = %event, webhook_url, "Checking webhook subscription");

        let auth = AuthContext::derive(credential);
        let body = CheckRequest {
            bot_id: auth.bot_id_str().to_string(),
            event: event.hook_name().to_string(),
            slug: self.config.slug.clone(),
            category: self.config.category.clone(),
        };
        let Ok(body) = serde_json::to_value(&body) else {
            return false;
        };

        let request = OperationRequest::new(Method::POST, SUBSCRIBED_WEBHOOKS_PATH)
            .with_header("Authorization", auth.bearer_header())
            .with_body(body);

        match self.api.send(request).await {
            Ok(response) => match serde_json::from_value::<SubscribedWebhooksResponse>(response) {
                Ok(parsed) => {
                    let exists = contains_webhook(&parsed, event.hook_name(), webhook_url);
                    info!(event = %event, exists, "Webhook subscription check completed");
                    exists
                }
                Err(e) => {
                    warn!(event = %event, error = %e, "Subscription check response had unexpected shape, assuming absent");
                    false
                }
            },
            Err(e) => {
                error!(event = %event, error = %e, "Subscription check failed, assuming absent");
                false
            }
        }
    }

    /// Register the subscription.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionError`] when the subscribe call fails;
    /// registration must never silently no-op.
    pub async fn create(
        &self,
        event: TriggerEvent,
        webhook_url: &str,
        credential: &Credential,
    ) -> Result<(), SubscriptionError> {
        info!(event = %event, webhook_url, "Subscribing webhook");

        let auth = AuthContext::derive(credential);
        let intent = self.intent(event, webhook_url, &auth, credential, true);
        let request = self
            .subscribe_request(&intent, &auth)
            .map_err(|source| SubscriptionError::SubscribeFailed {
                event: event.hook_name().to_string(),
                source,
            })?;

        match self.api.send(request).await {
            Ok(_) => {
                info!(event = %event, webhook_url, "Webhook subscribed");
                Ok(())
            }
            Err(source) => {
                error!(event = %event, error = %source, "Webhook subscribe call failed");
                Err(SubscriptionError::SubscribeFailed {
                    event: event.hook_name().to_string(),
                    source,
                })
            }
        }
    }

    /// Tear the subscription down.
    ///
    /// Failures are logged and swallowed; teardown must never block workflow
    /// deactivation. A dangling subscription is recovered on the next
    /// activation cycle.
    pub async fn delete(&self, event: TriggerEvent, webhook_url: &str, credential: &Credential) {
        info!(event = %event, webhook_url, "Unsubscribing webhook");

        let auth = AuthContext::derive(credential);
        let intent = self.intent(event, webhook_url, &auth, credential, false);
        let request = match self.subscribe_request(&intent, &auth) {
            Ok(request) => request,
            Err(e) => {
                warn!(event = %event, error = %e, "Could not build unsubscribe request, ignoring");
                return;
            }
        };

        if let Err(e) = self.api.send(request).await {
            warn!(event = %event, error = %e, "Webhook unsubscribe call failed, ignoring");
        }
    }

    fn intent(
        &self,
        event: TriggerEvent,
        webhook_url: &str,
        auth: &AuthContext,
        credential: &Credential,
        subscribe: bool,
    ) -> SubscriptionIntent {
        SubscriptionIntent {
            webhook_url: webhook_url.to_string(),
            bot_id: auth.bot_id_str().to_string(),
            event: event.hook_name().to_string(),
            slug: self.config.slug.clone(),
            category: self.config.category.clone(),
            platform: credential.platform.clone(),
            subscribe,
        }
    }

    fn subscribe_request(
        &self,
        intent: &SubscriptionIntent,
        auth: &AuthContext,
    ) -> Result<OperationRequest, ApiError> {
        Ok(OperationRequest::new(Method::POST, SUBSCRIBE_TRIGGER_PATH)
            .with_header("Authorization", auth.bearer_header())
            .with_body(serde_json::to_value(intent)?))
    }
}

impl std::fmt::Debug for SubscriptionReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionReconciler")
            .field("config", &self.config)
            .field("api", &"<RemoteApi>")
            .finish()
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
