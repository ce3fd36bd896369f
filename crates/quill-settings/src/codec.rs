//! Conversion between the persisted string form and [`Settings`].
//!
//! The persisted form is a compact JSON object carrying the five wire
//! names. Loading never fails: missing data yields defaults, and a record
//! written by an older release is repaired one field at a time.

use serde_json::{json, Map, Value};
use tracing::warn;

use crate::model::{SettingField, Settings};

/// Build a [`Settings`] from the raw persisted value.
///
/// - `None` returns the defaults.
/// - Input that is not a JSON object returns the defaults.
/// - Otherwise each field takes the persisted value when it is present and
///   of the right type, and its default when it is absent, `null`, or
///   mistyped. Unknown keys are ignored.
pub fn load(raw: Option<&str>) -> Settings {
    let Some(raw) = raw else {
        return Settings::default();
    };

    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "persisted settings are not valid JSON, using defaults");
            return Settings::default();
        }
    };

    match value {
        Value::Object(map) => from_object(&map),
        other => {
            warn!(kind = json_kind(&other), "persisted settings are not an object, using defaults");
            Settings::default()
        }
    }
}

/// Encode the full record as compact JSON.
pub fn dump(settings: &Settings) -> String {
    json!({
        "theme": settings.theme,
        "language": settings.language,
        "fontSize": settings.font_size,
        "fontFamily": settings.font_family,
        "showGitHubCorner": settings.show_github_corner,
    })
    .to_string()
}

fn from_object(map: &Map<String, Value>) -> Settings {
    let defaults = Settings::default();
    Settings {
        theme: field(map, SettingField::Theme, as_string).unwrap_or(defaults.theme),
        language: field(map, SettingField::Language, as_string).unwrap_or(defaults.language),
        font_size: field(map, SettingField::FontSize, as_font_size)
            .unwrap_or(defaults.font_size),
        font_family: field(map, SettingField::FontFamily, as_string)
            .unwrap_or(defaults.font_family),
        show_github_corner: field(map, SettingField::ShowGitHubCorner, Value::as_bool)
            .unwrap_or(defaults.show_github_corner),
    }
}

/// Extract one field, treating `null` as absent and logging mistyped values.
fn field<T>(
    map: &Map<String, Value>,
    field: SettingField,
    extract: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    match map.get(field.wire_name()) {
        None | Some(Value::Null) => None,
        Some(value) => {
            let extracted = extract(value);
            if extracted.is_none() {
                warn!(%field, kind = json_kind(value), "persisted setting has the wrong type, using default");
            }
            extracted
        }
    }
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn as_font_size(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
