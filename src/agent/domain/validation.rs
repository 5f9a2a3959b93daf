//! Form validation owned by the agent domain.
//!
//! A form holds raw text exactly as typed. `validate` either produces a
//! complete record or names the first field that failed; a failed form
//! never reaches the store.

use super::record::{AgentField, AgentRecord};
use crate::error::ApiError;
use serde_json::Map;

/// Raw, unvalidated values of the agent edit form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentForm {
    pub id: String,
    pub name: String,
    pub api_key_variable_name: String,
    pub api_url: String,
    pub model: String,
    pub system_prompt: String,
    pub temperature: String,
    pub max_tokens: String,
    pub welcome_message: String,
}

impl From<&AgentRecord> for AgentForm {
    fn from(record: &AgentRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            api_key_variable_name: record.api_key_variable_name.clone(),
            api_url: record.api_url.clone(),
            model: record.model.clone(),
            system_prompt: record.system_prompt.clone(),
            temperature: record.temperature.to_string(),
            max_tokens: record.max_tokens.to_string(),
            welcome_message: record.welcome_message.clone(),
        }
    }
}

/// Validate form values into a record.
///
/// Checks run in form order: id, name, temperature, max_tokens. Single-line
/// fields are trimmed; prompt texts are kept verbatim. No range is imposed on
/// temperature or max_tokens.
pub fn validate(form: &AgentForm) -> Result<AgentRecord, ApiError> {
    let id = form.id.trim();
    if id.is_empty() {
        return Err(ApiError::validation(AgentField::Id, "Agent ID cannot be empty"));
    }

    let name = form.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation(
            AgentField::Name,
            "Agent name cannot be empty",
        ));
    }

    let temperature: f64 = form.temperature.trim().parse().map_err(|_| {
        ApiError::validation(
            AgentField::Temperature,
            format!("'{}' is not a valid number", form.temperature.trim()),
        )
    })?;
    if !temperature.is_finite() {
        return Err(ApiError::validation(
            AgentField::Temperature,
            "Temperature must be a finite number",
        ));
    }

    let max_tokens: i64 = form.max_tokens.trim().parse().map_err(|_| {
        ApiError::validation(
            AgentField::MaxTokens,
            format!("'{}' is not a valid integer", form.max_tokens.trim()),
        )
    })?;

    Ok(AgentRecord {
        id: id.to_string(),
        name: name.to_string(),
        api_key_variable_name: form.api_key_variable_name.trim().to_string(),
        api_url: form.api_url.trim().to_string(),
        model: form.model.trim().to_string(),
        system_prompt: form.system_prompt.clone(),
        temperature,
        max_tokens,
        welcome_message: form.welcome_message.clone(),
        extra: Map::new(),
    })
}
