//! Operation dispatch over batches of work items.
//!
//! The dispatcher consumes an ordered batch of work items, builds one
//! outbound request per item, and emits a flat sequence of output records.
//! Items are processed strictly sequentially: each remote call fully
//! completes before the next item starts, and output order always matches
//! input order.
//!
//! Failure handling is policy-driven and per item. In
//! [`ErrorPolicy::Continue`] mode a failing item contributes exactly one
//! error record and processing moves on; in [`ErrorPolicy::Abort`] mode the
//! first failure stops the batch and surfaces the failing item's index
//! together with the records produced so far.
//!
//! # Examples
//!
//! ```no_run
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
//! let credential = Credential::new("token").with_bot(BotId::new("bot-1"));
//! let items = vec![WorkItem::new(OperationParams::CreateContact(
//!     CreateContactParams::new("Jane Doe"),
//! ))];
//!
//! let records = dispatcher.run(&items, &credential).await?;
//! for record in records {
//!     println!("item {} error={}: {}", record.source_item_index, record.is_error, record.data);
//! }
//! # Ok(())
//! # }
//! ```

pub mod normalize;
mod operations;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::auth::{AuthContext, Credential};
use crate::client::RemoteApi;
use crate::error::{ApiError, DispatchError};

pub use operations::{
    CreateContactParams, OperationParams, SessionMessageParams, TemplateMessageParams,
    UpdateAttributesParams,
};

// ============================================================================
// Work Items and Output Records
// ============================================================================

/// One unit of input data the dispatcher processes independently.
///
/// Work items are owned by the host runtime and read-only here; their
/// position in the batch is their identity in the output.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    params: OperationParams,
}

impl WorkItem {
    /// Create a work item carrying the given operation parameters.
    pub fn new(params: OperationParams) -> Self {
        Self { params }
    }

    /// The operation parameters for this item.
    pub fn params(&self) -> &OperationParams {
        &self.params
    }
}

/// One record of dispatch output.
///
/// Success responses expand to one record per response element; a failure in
/// continue mode contributes a single record with `is_error` set. Records are
/// appended in the order items were processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    /// Response element, or `{"error": message}` for failures
    pub data: Value,
    /// Index of the work item this record originated from
    pub source_item_index: usize,
    /// Whether this record captures an isolated failure
    pub is_error: bool,
}

impl OutputRecord {
    fn success(data: Value, source_item_index: usize) -> Self {
        Self {
            data,
            source_item_index,
            is_error: false,
        }
    }

    fn failure(message: String, source_item_index: usize) -> Self {
        Self {
            data: json!({ "error": message }),
            source_item_index,
            is_error: true,
        }
    }
}

// ============================================================================
// Dispatch Policy
// ============================================================================

/// What to do when one item's remote call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Capture the failure as an error record and keep going.
    Continue,
    /// Stop the batch at the first failure.
    Abort,
}

/// Failure-handling policy for one dispatch run.
///
/// Passed to the dispatcher as a value so runs stay reentrant; there is no
/// global toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPolicy {
    /// Per-item failure behavior
    pub on_error: ErrorPolicy,
}

impl DispatchPolicy {
    /// Policy that isolates failures and continues with the next item.
    pub fn continue_on_error() -> Self {
        Self {
            on_error: ErrorPolicy::Continue,
        }
    }

    /// Policy that aborts the batch at the first failure.
    pub fn abort_on_error() -> Self {
        Self {
            on_error: ErrorPolicy::Abort,
        }
    }
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self::abort_on_error()
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Routes work items to the BotPenguin API one at a time.
///
/// Holds the transport and the failure policy; credentials arrive per run so
/// one dispatcher can serve many executions.
#[derive(Clone)]
pub struct Dispatcher {
    api: Arc<dyn RemoteApi>,
    policy: DispatchPolicy,
}

impl Dispatcher {
    /// Create a dispatcher with the default (abort-on-error) policy.
    pub fn new(api: Arc<dyn RemoteApi>) -> Self {
        Self {
            api,
            policy: DispatchPolicy::default(),
        }
    }

    /// Replace the failure policy.
    pub fn with_policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The active failure policy.
    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    /// Process a batch of work items in input order.
    ///
    /// Each item's response is normalized into one or more records tagged
    /// with the item's index. A failing item either becomes a single error
    /// record (continue mode) or aborts the batch (abort mode).
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] in abort mode when an item's call fails; the
    /// error carries the failing index and the records produced before it.
    pub async fn run(
        &self,
        items: &[WorkItem],
        credential: &Credential,
    ) -> Result<Vec<OutputRecord>, DispatchError> {
        let auth = AuthContext::derive(credential);
        let mut records = Vec::new();

        for (index, item) in items.iter().enumerate() {
            match self.dispatch_one(item, &auth).await {
                Ok(response) => {
                    for entry in normalize::expand(response) {
                        records.push(OutputRecord::success(entry, index));
                    }
                }
                Err(source) => match self.policy.on_error {
                    ErrorPolicy::Continue => {
                        warn!(item_index = index, error = %source, "Work item failed, continuing");
                        records.push(OutputRecord::failure(source.to_string(), index));
                    }
                    ErrorPolicy::Abort => {
                        return Err(DispatchError {
                            item_index: index,
                            completed: records,
                            source,
                        });
                    }
                },
            }
        }

        Ok(records)
    }

    async fn dispatch_one(&self, item: &WorkItem, auth: &AuthContext) -> Result<Value, ApiError> {
        let request = operations::build_request(item.params(), auth)?;
        debug!(method = %request.method, path = %request.path, "Dispatching work item");
        self.api.send(request).await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("policy", &self.policy)
            .field("api", &"<RemoteApi>")
            .finish()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
