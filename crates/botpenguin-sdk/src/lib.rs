//! # BotPenguin SDK
//!
//! SDK for bridging workflow engines to the BotPenguin messaging platform:
//! contact management, attribute updates, session and template messaging,
//! and event webhook subscriptions.
//!
//! This SDK provides:
//! - Credential handling and derived per-call authentication material
//! - An API client over the BotPenguin REST surface
//! - Batch operation dispatch with per-item failure isolation
//! - Idempotent webhook subscription reconciliation (check/create/delete)
//! - Inbound event translation to normalized envelopes
//!
//! # Examples
//!
//! ## Dispatching operations
//!
//! ```rust,no_run
//! use botpenguin_sdk::auth::{BotId, Credential};
//! use botpenguin_sdk::client::{ApiClient, ClientConfig};
//! use botpenguin_sdk::dispatch::{
//!     CreateContactParams, Dispatcher, DispatchPolicy, OperationParams, WorkItem,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(ApiClient::new(ClientConfig::default())?);
//! let dispatcher = Dispatcher::new(client).with_policy(DispatchPolicy::continue_on_error());
//!
//! let credential = Credential::new("access-token")
//!     .with_bot(BotId::new("bot-1"))
//!     .with_platform("whatsapp");
//!
//! let items = vec![
//!     WorkItem::new(OperationParams::CreateContact(
//!         CreateContactParams::new("Jane Doe").with_email("jane@example.com"),
//!     )),
//! ];
//!
//! for record in dispatcher.run(&items, &credential).await? {
//!     println!("item {}: {}", record.source_item_index, record.data);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Translating an inbound event
//!
//! ```rust
//! use botpenguin_sdk::events::translate;
//! use serde_json::json;
//!
//! let body = json!({"botId": "b1", "platform": "whatsapp", "data": {"name": "Jane"}});
//! let envelope = translate("newLeadHook", &body);
//! assert_eq!(envelope.event, "contact.created");
//! ```

// Public modules
pub mod auth;
pub mod client;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod webhook;

// Re-export commonly used types at crate root for convenience
pub use error::{ApiError, DispatchError, SubscriptionError, ValidationError};

pub use auth::{ActorContext, AgentId, AuthContext, BotId, Credential, CredentialRecord};
pub use client::{
    ApiClient, ClientConfig, ClientConfigBuilder, OperationRequest, RemoteApi, SelectOption,
    TemplateField, DEFAULT_BASE_URL,
};
pub use dispatch::{
    CreateContactParams, DispatchPolicy, Dispatcher, ErrorPolicy, OperationParams, OutputRecord,
    SessionMessageParams, TemplateMessageParams, UpdateAttributesParams, WorkItem,
};
pub use events::{translate, translate_delivery, EventEnvelope, TriggerEvent, APP_NAME};
pub use webhook::{ReconcilerConfig, SubscriptionIntent, SubscriptionReconciler};
