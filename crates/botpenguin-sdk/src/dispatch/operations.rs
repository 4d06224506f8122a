//! Request construction for the dispatch operations.
//!
//! Each operation maps its parameters and the derived [`AuthContext`] to one
//! [`OperationRequest`]. Construction is pure; nothing here touches the
//! network. Optional fields that are empty are omitted from the outgoing
//! body entirely so the remote service applies its own defaults.

use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::auth::{AuthContext, BotId};
use crate::client::OperationRequest;
use crate::error::ApiError;

pub(crate) const IMPORT_CONTACTS_PATH: &str = "/inbox/users/import";
pub(crate) const UPDATE_ATTRIBUTES_PATH: &str = "/integrations/custom-app/update-user-attributes";
pub(crate) const SEND_SESSION_MESSAGE_PATH: &str =
    "/integrations/custom-app/send-message-to-plugin";
pub(crate) const SEND_TEMPLATE_MESSAGE_PATH: &str =
    "/whatsapp-automation/plugin/send-template-message";

// ============================================================================
// Operation Parameters
// ============================================================================

/// Parameters for one dispatch operation, tagged by operation kind.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationParams {
    /// Create a contact in the bot inbox.
    CreateContact(CreateContactParams),
    /// Update a named attribute on a matched contact.
    UpdateAttributes(UpdateAttributesParams),
    /// Send a freeform message inside an open session.
    SendSessionMessage(SessionMessageParams),
    /// Send a WhatsApp template message with parameter bindings.
    SendTemplateMessage(TemplateMessageParams),
}

/// Parameters for contact creation.
///
/// Only the name is required. Email, phone, tags, and attributes are sent
/// exactly when they carry a value; blank strings and empty lists never reach
/// the wire.
///
/// # Examples
///
/// ```
/// use botpenguin_sdk::dispatch::CreateContactParams;
///
/// let params = CreateContactParams::new("Jane Doe")
///     .with_email("jane@example.com")
///     .with_phone("9876543210", "91");
/// assert_eq!(params.name, "Jane Doe");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateContactParams {
    /// Full name of the contact
    pub name: String,
    /// Email address, when supplied
    pub email: Option<String>,
    /// Phone number without country code, when supplied
    pub phone_number: Option<String>,
    /// Country calling code for the phone number
    pub phone_prefix: Option<String>,
    /// Tags to attach to the contact
    pub tags: Vec<String>,
    /// Custom attributes to attach to the contact
    pub attributes: Vec<Value>,
}

impl CreateContactParams {
    /// Create parameters for a contact with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the phone number and its country calling code.
    pub fn with_phone(mut self, number: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.phone_number = Some(number.into());
        self.phone_prefix = Some(prefix.into());
        self
    }

    /// Set the contact tags.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Set the contact attributes.
    pub fn with_attributes(mut self, attributes: Vec<Value>) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Parameters for a contact attribute update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateAttributesParams {
    /// Email, WhatsApp number with country code, or UUID identifying the contact
    pub search: String,
    /// Key of the attribute to update
    pub key: String,
    /// New attribute value
    pub value: String,
}

/// Parameters for a session (freeform) message.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionMessageParams {
    /// Email, WhatsApp number with country code, or UUID identifying the contact
    pub search: String,
    /// Message text to send
    pub text: String,
}

/// Parameters for a WhatsApp template message.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateMessageParams {
    /// WhatsApp bot to send from
    pub bot_id: BotId,
    /// Approved template to instantiate
    pub template_id: String,
    /// Recipient number with country code, without plus sign
    pub whatsapp_number: String,
    /// Bindings for the template's dynamic fields
    pub template_params: Map<String, Value>,
}

impl TemplateMessageParams {
    /// Build parameters from a field-mapping document.
    ///
    /// Mapping surfaces hand over their state as `{"value": {key: binding}}`;
    /// the inner object becomes `template_params`. A missing or non-object
    /// `value` yields an empty binding set.
    pub fn from_field_mapping(
        bot_id: BotId,
        template_id: impl Into<String>,
        whatsapp_number: impl Into<String>,
        mapping: &Value,
    ) -> Self {
        let template_params = mapping
            .get("value")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        Self {
            bot_id,
            template_id: template_id.into(),
            whatsapp_number: whatsapp_number.into(),
            template_params,
        }
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
struct ContactPhone {
    number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct ContactDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<ContactPhone>,
}

#[derive(Debug, Serialize)]
struct UserDetails {
    #[serde(rename = "userProvidedName")]
    user_provided_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact: Option<ContactDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attributes: Option<Vec<Value>>,
}

#[derive(Debug, Serialize)]
struct ContactProfile {
    #[serde(rename = "userDetails")]
    user_details: UserDetails,
}

#[derive(Debug, Serialize)]
struct ContactPayload {
    profile: ContactProfile,
}

#[derive(Debug, Serialize)]
struct UpdateAttributesBody {
    search: String,
    attributes: Map<String, Value>,
    #[serde(rename = "botId")]
    bot_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    platform: Option<String>,
}

#[derive(Debug, Serialize)]
struct SessionMessageBody {
    text: String,
    search: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<String>,
}

#[derive(Debug, Serialize)]
struct TemplateMessageBody {
    #[serde(rename = "botId")]
    bot_id: String,
    #[serde(rename = "templateId")]
    template_id: String,
    #[serde(rename = "whatsAppNumber")]
    whatsapp_number: String,
    #[serde(rename = "templateParams")]
    template_params: Map<String, Value>,
}

// ============================================================================
// Request Builders
// ============================================================================

/// Build the outbound request for one operation.
pub(crate) fn build_request(
    params: &OperationParams,
    auth: &AuthContext,
) -> Result<OperationRequest, ApiError> {
    match params {
        OperationParams::CreateContact(params) => build_create_contact(params, auth),
        OperationParams::UpdateAttributes(params) => build_update_attributes(params, auth),
        OperationParams::SendSessionMessage(params) => build_session_message(params, auth),
        OperationParams::SendTemplateMessage(params) => build_template_message(params, auth),
    }
}

fn build_create_contact(
    params: &CreateContactParams,
    auth: &AuthContext,
) -> Result<OperationRequest, ApiError> {
    let payload = ContactPayload {
        profile: ContactProfile {
            user_details: UserDetails {
                user_provided_name: params.name.clone(),
                contact: contact_details(params),
                tags: non_empty(&params.tags),
                attributes: non_empty(&params.attributes),
            },
        },
    };

    // The import endpoint takes a batch; one work item maps to a
    // single-element array.
    let body = serde_json::to_value(vec![payload])?;

    Ok(OperationRequest::new(Method::POST, IMPORT_CONTACTS_PATH)
        .with_header("Authorization", auth.bearer_header())
        .with_header("botId", auth.bot_id_str())
        .with_query("access_token", auth.query_token())
        .with_query("botId", auth.bot_id_str())
        .with_body(body))
}

fn build_update_attributes(
    params: &UpdateAttributesParams,
    auth: &AuthContext,
) -> Result<OperationRequest, ApiError> {
    let mut attributes = Map::new();
    attributes.insert(params.key.clone(), Value::String(params.value.clone()));

    let body = UpdateAttributesBody {
        search: params.search.clone(),
        attributes,
        bot_id: auth.bot_id_str().to_string(),
        platform: auth.platform().map(str::to_string),
    };

    Ok(OperationRequest::new(Method::PUT, UPDATE_ATTRIBUTES_PATH)
        .with_header("Authorization", auth.bearer_header())
        .with_body(serde_json::to_value(body)?))
}

fn build_session_message(
    params: &SessionMessageParams,
    auth: &AuthContext,
) -> Result<OperationRequest, ApiError> {
    let body = SessionMessageBody {
        text: params.text.clone(),
        search: params.search.clone(),
        channel: auth.platform().map(str::to_string),
    };

    Ok(
        OperationRequest::new(Method::POST, SEND_SESSION_MESSAGE_PATH)
            .with_header("Authorization", auth.bearer_header())
            .with_header("botId", auth.bot_id_str())
            .with_body(serde_json::to_value(body)?),
    )
}

fn build_template_message(
    params: &TemplateMessageParams,
    auth: &AuthContext,
) -> Result<OperationRequest, ApiError> {
    let body = TemplateMessageBody {
        bot_id: params.bot_id.as_str().to_string(),
        template_id: params.template_id.clone(),
        whatsapp_number: params.whatsapp_number.clone(),
        template_params: params.template_params.clone(),
    };

    Ok(
        OperationRequest::new(Method::POST, SEND_TEMPLATE_MESSAGE_PATH)
            .with_header("Authorization", auth.bearer_header())
            .with_body(serde_json::to_value(body)?),
    )
}

fn contact_details(params: &CreateContactParams) -> Option<ContactDetails> {
    let email = params
        .email
        .as_deref()
        .filter(|value| !value.is_empty())
        .map(String::from);

    let phone = params
        .phone_number
        .as_deref()
        .filter(|number| !number.is_empty())
        .map(|number| ContactPhone {
            number: number.to_string(),
            prefix: params
                .phone_prefix
                .as_deref()
                .filter(|prefix| !prefix.is_empty())
                .map(String::from),
        });

    if email.is_none() && phone.is_none() {
        return None;
    }

    Some(ContactDetails { email, phone })
}

fn non_empty<T: Clone>(values: &[T]) -> Option<Vec<T>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

#[cfg(test)]
#[path = "operations_tests.rs"]
mod tests;
