//! Read-only option discovery for WhatsApp automation.
//!
//! These calls back the selection lists an integration surface offers while
//! configuring a template message: available WhatsApp bots, the templates
//! approved for a bot, and the dynamic fields a template accepts. They are
//! plain authenticated GETs with no side effects.

use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;

use crate::auth::{AuthContext, BotId, Credential};
use crate::client::{ApiClient, OperationRequest, RemoteApi};
use crate::error::ApiError;

const WHATSAPP_AUTOMATION_PATH: &str = "/whatsapp-automation";
const TEMPLATES_PATH_PREFIX: &str = "/whatsapp-automation/plugin/templates";
const DYNAMIC_FIELDS_PATH_PREFIX: &str = "/whatsapp-automation/plugin/make-template-dynamic-fields";

/// One selectable option: display name plus the value to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Human-readable label
    pub name: String,
    /// Identifier submitted back to the API
    pub value: String,
}

/// A dynamic field a WhatsApp template accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateField {
    /// Parameter key used in `templateParams`
    pub key: String,
    /// Sample value or hint supplied by the template
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default)]
    data: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
struct BotSummary {
    #[serde(default)]
    name: String,
    #[serde(rename = "_id", default)]
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct TemplateSummary {
    #[serde(default)]
    configuration: TemplateConfiguration,
    #[serde(rename = "_id", default)]
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct TemplateConfiguration {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct FieldSummary {
    #[serde(default)]
    key: String,
    #[serde(default)]
    value: Option<String>,
}

impl ApiClient {
    /// List the WhatsApp bots available to this credential.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the call fails or the response cannot be parsed.
    pub async fn list_whatsapp_bots(
        &self,
        credential: &Credential,
    ) -> Result<Vec<SelectOption>, ApiError> {
        let response = self
            .get_with_auth(WHATSAPP_AUTOMATION_PATH, credential)
            .await?;
        let parsed: ListResponse<BotSummary> = serde_json::from_value(response)?;

        Ok(parsed
            .data
            .into_iter()
            .map(|bot| SelectOption {
                name: bot.name,
                value: bot.id,
            })
            .collect())
    }

    /// List the message templates approved for a WhatsApp bot.
    ///
    /// An empty bot ID yields an empty list without a network call, matching
    /// the configuration flow where no bot is selected yet.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the call fails or the response cannot be parsed.
    pub async fn list_whatsapp_templates(
        &self,
        credential: &Credential,
        bot_id: &BotId,
    ) -> Result<Vec<SelectOption>, ApiError> {
        if bot_id.as_str().is_empty() {
            return Ok(Vec::new());
        }

        let path = format!("{}/{}", TEMPLATES_PATH_PREFIX, bot_id);
        let response = self.get_with_auth(&path, credential).await?;
        let parsed: ListResponse<TemplateSummary> = serde_json::from_value(response)?;

        Ok(parsed
            .data
            .into_iter()
            .map(|template| SelectOption {
                name: template.configuration.name,
                value: template.id,
            })
            .collect())
    }

    /// Fetch the dynamic fields a message template accepts.
    ///
    /// An empty template ID yields an empty list without a network call.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the call fails or the response cannot be parsed.
    pub async fn template_dynamic_fields(
        &self,
        credential: &Credential,
        template_id: &str,
    ) -> Result<Vec<TemplateField>, ApiError> {
        if template_id.is_empty() {
            return Ok(Vec::new());
        }

        let path = format!("{}/{}", DYNAMIC_FIELDS_PATH_PREFIX, template_id);
        let response = self.get_with_auth(&path, credential).await?;
        let parsed: ListResponse<FieldSummary> = serde_json::from_value(response)?;

        Ok(parsed
            .data
            .into_iter()
            .map(|field| TemplateField {
                key: field.key,
                description: field.value,
            })
            .collect())
    }

    async fn get_with_auth(&self, path: &str, credential: &Credential) -> Result<Value, ApiError> {
        let auth = AuthContext::derive(credential);
        let request = OperationRequest::new(Method::GET, path)
            .with_header("Authorization", auth.bearer_header());
        self.send(request).await
    }
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
