//! Webhook subscription management against the BotPenguin API.
//!
//! The host runtime drives three lifecycle hooks when a trigger is activated
//! or deactivated: verify that a push subscription exists, create it, and
//! tear it down. [`SubscriptionReconciler`] implements those hooks as
//! idempotent reconciliation primitives over the remote subscription state.
//!
//! The three entry points deliberately fail differently:
//! - `check_exists` fails **open** (an unreachable or malformed check reads
//!   as "absent" so activation can proceed);
//! - `create` fails **fatally** (registration must not silently no-op);
//! - `delete` fails **silently** (teardown must never block deactivation).
//!
//! No state is held locally; idempotency rests entirely on the remote
//! service plus this asymmetry.

mod subscription;

pub use subscription::{ReconcilerConfig, SubscriptionIntent, SubscriptionReconciler};
