//! Cross-context message model
//!
//! Everything on the bus is a JSON object with a `type` discriminant.
//! `Message` models the recognized tags as one tagged union; inbound
//! values that do not parse fall into `UnknownMessage` so handlers can
//! answer with a structured rejection instead of dropping the request.

use super::theme_types::{ThemeData, ThemeName};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wire tag for `Message::RequestCurrentThemeData`.
pub const MSG_REQUEST_CURRENT_THEME_DATA: &str = "requestCurrentThemeData";
/// Wire tag for `Message::RequestDynamicThemeUpdate`.
pub const MSG_REQUEST_DYNAMIC_THEME_UPDATE: &str = "requestDynamicThemeUpdate";
/// Wire tag for `Message::SettingsChanged`.
pub const MSG_SETTINGS_CHANGED: &str = "settingsChanged";
/// Wire tag for `Message::ThemeUpdate`.
pub const MSG_THEME_UPDATE: &str = "themeUpdate";

/// A message exchanged between execution contexts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    /// Tab asks the background for the currently-resolved theme.
    #[serde(rename = "requestCurrentThemeData")]
    RequestCurrentThemeData,

    /// Background tells tabs (or a tab tells the background) that the
    /// dynamic theme should be re-evaluated.
    #[serde(rename = "requestDynamicThemeUpdate")]
    RequestDynamicThemeUpdate {
        #[serde(
            rename = "themeName",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        theme_name: Option<ThemeName>,
    },

    /// A single setting changed in the store.
    #[serde(rename = "settingsChanged")]
    SettingsChanged { payload: SettingsChangedPayload },

    /// Background pushes a freshly resolved theme to tabs.
    #[serde(rename = "themeUpdate")]
    ThemeUpdate { data: ThemePayload },
}

/// Payload of `settingsChanged`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsChangedPayload {
    pub changed_key: String,
    pub new_value: Value,
}

/// Resolved theme as carried on the wire and in responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePayload {
    pub theme_data: ThemeData,
    pub effective_theme_name: ThemeName,
}

/// Error response shape: `{ "error": "..." }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// An inbound value whose `type` tag is missing or unrecognized.
#[derive(Debug, Clone)]
pub struct UnknownMessage {
    pub type_tag: Option<String>,
}

impl Message {
    /// Serialize for transmission. Message construction is infallible, so
    /// this never produces anything but an object with a `type` field.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Parse an inbound envelope. Unrecognized or malformed values come
    /// back as `UnknownMessage` - recipients must not treat them as fatal.
    pub fn from_value(value: &Value) -> Result<Message, UnknownMessage> {
        serde_json::from_value(value.clone()).map_err(|_| UnknownMessage {
            type_tag: value
                .get("type")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

impl UnknownMessage {
    /// Structured rejection sent back when a response is expected, so
    /// senders never hang on an unhandled tag.
    pub fn rejection(&self) -> Value {
        let tag = self.type_tag.as_deref().unwrap_or("<missing>");
        serde_json::to_value(ErrorResponse {
            error: format!("unhandled message type: {tag}"),
        })
        .unwrap_or(Value::Null)
    }
}
