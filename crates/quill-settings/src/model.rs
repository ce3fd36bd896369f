//! The [`Settings`] record and its field-level vocabulary.

use std::fmt;
use std::str::FromStr;

use crate::error::{SettingsError, SettingsResult};

/// Default visual theme.
pub const DEFAULT_THEME: &str = "Dracula";
/// Default editor language.
pub const DEFAULT_LANGUAGE: &str = "Cpp";
/// Default font size in points.
pub const DEFAULT_FONT_SIZE: u32 = 16;
/// Default font family.
pub const DEFAULT_FONT_FAMILY: &str = "Space Mono";
/// Default visibility of the GitHub corner.
pub const DEFAULT_SHOW_GITHUB_CORNER: bool = true;

/// User preferences. Every field is always populated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Name of the visual theme.
    pub theme: String,
    /// Editor language identifier.
    pub language: String,
    /// Font size in points.
    pub font_size: u32,
    /// Font family name.
    pub font_family: String,
    /// Whether the GitHub corner is shown.
    pub show_github_corner: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            show_github_corner: DEFAULT_SHOW_GITHUB_CORNER,
        }
    }
}

impl Settings {
    /// Read one field as a typed value.
    pub fn get(&self, field: SettingField) -> SettingValue {
        match field {
            SettingField::Theme => SettingValue::Theme(self.theme.clone()),
            SettingField::Language => SettingValue::Language(self.language.clone()),
            SettingField::FontSize => SettingValue::FontSize(self.font_size),
            SettingField::FontFamily => SettingValue::FontFamily(self.font_family.clone()),
            SettingField::ShowGitHubCorner => {
                SettingValue::ShowGitHubCorner(self.show_github_corner)
            }
        }
    }

    /// Overwrite the single field named by `value`.
    pub fn apply(&mut self, value: SettingValue) {
        match value {
            SettingValue::Theme(v) => self.theme = v,
            SettingValue::Language(v) => self.language = v,
            SettingValue::FontSize(v) => self.font_size = v,
            SettingValue::FontFamily(v) => self.font_family = v,
            SettingValue::ShowGitHubCorner(v) => self.show_github_corner = v,
        }
    }
}

/// Names the five settings fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SettingField {
    Theme,
    Language,
    FontSize,
    FontFamily,
    ShowGitHubCorner,
}

impl SettingField {
    /// Every field, in wire order.
    pub const ALL: [SettingField; 5] = [
        SettingField::Theme,
        SettingField::Language,
        SettingField::FontSize,
        SettingField::FontFamily,
        SettingField::ShowGitHubCorner,
    ];

    /// Key used for this field in the persisted JSON object.
    pub fn wire_name(self) -> &'static str {
        match self {
            SettingField::Theme => "theme",
            SettingField::Language => "language",
            SettingField::FontSize => "fontSize",
            SettingField::FontFamily => "fontFamily",
            SettingField::ShowGitHubCorner => "showGitHubCorner",
        }
    }

    fn kebab_name(self) -> &'static str {
        match self {
            SettingField::Theme => "theme",
            SettingField::Language => "language",
            SettingField::FontSize => "font-size",
            SettingField::FontFamily => "font-family",
            SettingField::ShowGitHubCorner => "show-github-corner",
        }
    }
}

impl fmt::Display for SettingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Accepts the wire name (`fontSize`) or the kebab-case form (`font-size`).
impl FromStr for SettingField {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingField::ALL
            .into_iter()
            .find(|f| f.wire_name() == s || f.kebab_name() == s)
            .ok_or_else(|| SettingsError::UnknownField(s.to_string()))
    }
}

/// A typed value for exactly one field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettingValue {
    Theme(String),
    Language(String),
    FontSize(u32),
    FontFamily(String),
    ShowGitHubCorner(bool),
}

impl SettingValue {
    /// Parse `text` as a value for `field`.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill_settings::{SettingField, SettingValue};
    ///
    /// let v = SettingValue::parse(SettingField::FontSize, "24").unwrap();
    /// assert_eq!(v, SettingValue::FontSize(24));
    /// assert!(SettingValue::parse(SettingField::FontSize, "big").is_err());
    /// ```
    pub fn parse(field: SettingField, text: &str) -> SettingsResult<Self> {
        let invalid = |reason: String| SettingsError::InvalidValue {
            field,
            value: text.to_string(),
            reason,
        };
        Ok(match field {
            SettingField::Theme => SettingValue::Theme(text.to_string()),
            SettingField::Language => SettingValue::Language(text.to_string()),
            SettingField::FontFamily => SettingValue::FontFamily(text.to_string()),
            SettingField::FontSize => SettingValue::FontSize(
                text.trim()
                    .parse::<u32>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            SettingField::ShowGitHubCorner => SettingValue::ShowGitHubCorner(
                text.trim()
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
        })
    }

    /// The field this value belongs to.
    pub fn field(&self) -> SettingField {
        match self {
            SettingValue::Theme(_) => SettingField::Theme,
            SettingValue::Language(_) => SettingField::Language,
            SettingValue::FontSize(_) => SettingField::FontSize,
            SettingValue::FontFamily(_) => SettingField::FontFamily,
            SettingValue::ShowGitHubCorner(_) => SettingField::ShowGitHubCorner,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Theme(v) | SettingValue::Language(v) | SettingValue::FontFamily(v) => {
                f.write_str(v)
            }
            SettingValue::FontSize(v) => write!(f, "{v}"),
            SettingValue::ShowGitHubCorner(v) => write!(f, "{v}"),
        }
    }
}
