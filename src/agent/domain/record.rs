use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: i64 = 2048;

const PLACEHOLDER_API_KEY_VARIABLE: &str = "YOUR_API_KEY_HERE";
const PLACEHOLDER_API_URL: &str = "https://aihubmix.com/v1/chat/completions";
const PLACEHOLDER_MODEL: &str = "gemini-2.0-flash";
const PLACEHOLDER_WELCOME_MESSAGE: &str = "Ask me anything and I will answer.";

/// One agent configuration entry as stored in `agents.json`.
///
/// Every field is optional on read and decoded leniently: a number where
/// text is expected is kept as its text, and a `null` or otherwise unusable
/// value takes the field's default, so one odd field never rejects the
/// record. All fields are written on save, in declaration order, followed
/// by any keys this version does not know about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,

    /// Name of the variable holding the credential, not the secret itself.
    #[serde(
        rename = "apiKeyVariableName",
        default,
        deserialize_with = "lenient_text"
    )]
    pub api_key_variable_name: String,

    #[serde(rename = "apiUrl", default, deserialize_with = "lenient_text")]
    pub api_url: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub model: String,

    #[serde(rename = "systemPrompt", default, deserialize_with = "lenient_text")]
    pub system_prompt: String,

    #[serde(default = "default_temperature", deserialize_with = "lenient_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_tokens", deserialize_with = "lenient_max_tokens")]
    pub max_tokens: i64,

    #[serde(
        rename = "welcomeMessage",
        default,
        deserialize_with = "lenient_text"
    )]
    pub welcome_message: String,

    /// Keys not modelled above, kept so a round trip does not drop them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> i64 {
    DEFAULT_MAX_TOKENS
}

/// Strings as-is, numbers and booleans as their text, anything else empty.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

/// Finite numbers or numeric text; otherwise the default temperature.
fn lenient_temperature<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed
        .filter(|value| value.is_finite())
        .unwrap_or(DEFAULT_TEMPERATURE))
}

/// Integers, integral floats or integer text; otherwise the default.
fn lenient_max_tokens<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|value| value.fract() == 0.0)
                .filter(|value| *value >= i64::MIN as f64 && *value < i64::MAX as f64)
                .map(|value| value as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(parsed.unwrap_or(DEFAULT_MAX_TOKENS))
}

impl Default for AgentRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            api_key_variable_name: String::new(),
            api_url: String::new(),
            model: String::new(),
            system_prompt: String::new(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            welcome_message: String::new(),
            extra: Map::new(),
        }
    }
}

impl AgentRecord {
    /// Record appended by "new agent": generated id and editable placeholders.
    pub fn placeholder(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: format!("New Agent {}", id),
            id,
            api_key_variable_name: PLACEHOLDER_API_KEY_VARIABLE.to_string(),
            api_url: PLACEHOLDER_API_URL.to_string(),
            model: PLACEHOLDER_MODEL.to_string(),
            welcome_message: PLACEHOLDER_WELCOME_MESSAGE.to_string(),
            ..Self::default()
        }
    }

    /// Deep copy with `_copy` appended to the id and ` (copy)` to the name.
    ///
    /// No collision check is made: copying a copy yields `_copy_copy`, and
    /// copying the same record twice yields two identical ids.
    pub fn duplicated(&self) -> Self {
        let mut copy = self.clone();
        copy.id = format!("{}_copy", self.id);
        copy.name = format!("{} (copy)", self.name);
        copy
    }

    /// Label shown in list widgets.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Unnamed Agent"
        } else {
            &self.name
        }
    }
}

/// Form fields that carry validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentField {
    Id,
    Name,
    Temperature,
    MaxTokens,
}

impl fmt::Display for AgentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgentField::Id => "id",
            AgentField::Name => "name",
            AgentField::Temperature => "temperature",
            AgentField::MaxTokens => "max_tokens",
        };
        f.write_str(name)
    }
}
