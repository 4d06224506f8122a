//! Tests for the operation dispatcher.

use super::*;
use crate::client::OperationRequest;
use std::collections::VecDeque;
use std::sync::Mutex;

// ============================================================================
// Scripted Remote API
// ============================================================================

/// Remote API double that answers from a script and records every request.
struct ScriptedApi {
    responses: Mutex<VecDeque<Result<Value, ApiError>>>,
    requests: Mutex<Vec<OperationRequest>>,
}

impl ScriptedApi {
    fn new(responses: Vec<Result<Value, ApiError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn recorded_requests(&self) -> Vec<OperationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RemoteApi for ScriptedApi {
    async fn send(&self, request: OperationRequest) -> Result<Value, ApiError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}

fn credential() -> Credential {
    Credential::new("token")
        .with_bot(crate::auth::BotId::new("bot-1"))
        .with_platform("whatsapp")
}

fn session_item(text: &str) -> WorkItem {
    WorkItem::new(OperationParams::SendSessionMessage(SessionMessageParams {
        search: "919876543210".to_string(),
        text: text.to_string(),
    }))
}

fn remote_failure(status: u16) -> ApiError {
    ApiError::Remote {
        status,
        message: "boom".to_string(),
    }
}

// ============================================================================
// Ordering and Expansion
// ============================================================================

/// Verify records come back in input order, tagged with their item index.
#[tokio::test]
async fn test_run_preserves_input_order() {
    let api = ScriptedApi::new(vec![
        Ok(json!({"reply": "a"})),
        Ok(json!({"reply": "b"})),
        Ok(json!({"reply": "c"})),
    ]);
    let dispatcher = Dispatcher::new(api.clone());

    let items = vec![session_item("a"), session_item("b"), session_item("c")];
    let records = dispatcher.run(&items, &credential()).await.unwrap();

    assert_eq!(records.len(), 3);
    for (index, record) in records.iter().enumerate() {
        assert_eq!(record.source_item_index, index);
        assert!(!record.is_error);
    }
    assert_eq!(records[1].data, json!({"reply": "b"}));
}

/// Verify an array response expands into one record per element, all
/// attributed to the originating item, in the remote's element order.
#[tokio::test]
async fn test_run_expands_array_response() {
    let api = ScriptedApi::new(vec![Ok(json!([{"id": 1}, {"id": 2}]))]);
    let dispatcher = Dispatcher::new(api);

    let items = vec![WorkItem::new(OperationParams::CreateContact(
        CreateContactParams::new("Jane Doe"),
    ))];
    let records = dispatcher.run(&items, &credential()).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].data, json!({"id": 1}));
    assert_eq!(records[1].data, json!({"id": 2}));
    assert_eq!(records[0].source_item_index, 0);
    assert_eq!(records[1].source_item_index, 0);
}

/// Verify an empty batch produces no records and no remote calls.
#[tokio::test]
async fn test_run_empty_batch() {
    let api = ScriptedApi::new(vec![]);
    let dispatcher = Dispatcher::new(api.clone());

    let records = dispatcher.run(&[], &credential()).await.unwrap();

    assert!(records.is_empty());
    assert!(api.recorded_requests().is_empty());
}

// ============================================================================
// Failure Policies
// ============================================================================

/// Verify continue mode turns a failing item into a single error record and
/// keeps processing the rest.
#[tokio::test]
async fn test_continue_mode_isolates_failures() {
    let api = ScriptedApi::new(vec![
        Ok(json!({"reply": "a"})),
        Err(remote_failure(500)),
        Ok(json!({"reply": "c"})),
    ]);
    let dispatcher =
        Dispatcher::new(api.clone()).with_policy(DispatchPolicy::continue_on_error());

    let items = vec![session_item("a"), session_item("b"), session_item("c")];
    let records = dispatcher.run(&items, &credential()).await.unwrap();

    assert_eq!(records.len(), 3);
    assert!(!records[0].is_error);
    assert!(records[1].is_error);
    assert!(!records[2].is_error);

    assert_eq!(records[1].source_item_index, 1);
    let message = records[1].data["error"].as_str().unwrap();
    assert!(message.contains("500"));

    // All three items reached the remote.
    assert_eq!(api.recorded_requests().len(), 3);
}

/// Verify abort mode surfaces the failing index and the records produced
/// before it, and stops issuing calls.
#[tokio::test]
async fn test_abort_mode_stops_batch() {
    let api = ScriptedApi::new(vec![Ok(json!({"reply": "a"})), Err(remote_failure(502))]);
    let dispatcher = Dispatcher::new(api.clone());

    let items = vec![session_item("a"), session_item("b"), session_item("c")];
    let error = dispatcher.run(&items, &credential()).await.unwrap_err();

    assert_eq!(error.item_index, 1);
    assert_eq!(error.completed.len(), 1);
    assert_eq!(error.completed[0].source_item_index, 0);
    assert!(matches!(error.source, ApiError::Remote { status: 502, .. }));

    // The third item was never dispatched.
    assert_eq!(api.recorded_requests().len(), 2);
}

/// Verify the default policy aborts.
#[test]
fn test_default_policy_aborts() {
    assert_eq!(DispatchPolicy::default().on_error, ErrorPolicy::Abort);
}

// ============================================================================
// End to End Request Shapes
// ============================================================================

/// Dispatch two contact creations: one bare, one with full contact details.
/// The first body must omit the contact object entirely, the second must
/// carry email and phone.
#[tokio::test]
async fn test_create_contact_batch_bodies() {
    let api = ScriptedApi::new(vec![Ok(json!({"ok": 1})), Ok(json!({"ok": 2}))]);
    let dispatcher = Dispatcher::new(api.clone());

    let items = vec![
        WorkItem::new(OperationParams::CreateContact(CreateContactParams::new(
            "Name Only",
        ))),
        WorkItem::new(OperationParams::CreateContact(
            CreateContactParams::new("Full Contact")
                .with_email("full@example.com")
                .with_phone("9876543210", "91"),
        )),
    ];

    let records = dispatcher.run(&items, &credential()).await.unwrap();
    assert_eq!(records.len(), 2);

    let requests = api.recorded_requests();
    assert_eq!(requests.len(), 2);

    let first = requests[0].body.as_ref().unwrap();
    assert!(first[0]["profile"]["userDetails"].get("contact").is_none());

    let second = requests[1].body.as_ref().unwrap();
    let contact = &second[0]["profile"]["userDetails"]["contact"];
    assert_eq!(contact["email"], json!("full@example.com"));
    assert_eq!(contact["phone"]["number"], json!("9876543210"));
    assert_eq!(contact["phone"]["prefix"], json!("91"));
}

/// Verify mixed operations in one batch each build their own request.
#[tokio::test]
async fn test_mixed_batch_routes_per_item() {
    let api = ScriptedApi::new(vec![Ok(json!({})), Ok(json!({}))]);
    let dispatcher = Dispatcher::new(api.clone());

    let items = vec![
        WorkItem::new(OperationParams::UpdateAttributes(UpdateAttributesParams {
            search: "jane@example.com".to_string(),
            key: "plan".to_string(),
            value: "pro".to_string(),
        })),
        session_item("hello"),
    ];

    dispatcher.run(&items, &credential()).await.unwrap();

    let requests = api.recorded_requests();
    assert_eq!(
        requests[0].path,
        "/integrations/custom-app/update-user-attributes"
    );
    assert_eq!(
        requests[1].path,
        "/integrations/custom-app/send-message-to-plugin"
    );
}
