// ABOUTME: Value renderers mapping a setting's declared type to its widget and encoding rules
// ABOUTME: Validates raw edits and produces the canonical string encoding stored remotely
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Value Renderers
//!
//! Every setting value travels as a canonical string. A [`ValueRenderer`] is
//! selected from the setting's declared [`SettingType`] and owns the rules for
//! that type:
//!
//! | type | accepted input | canonical encoding |
//! |---|---|---|
//! | text, textarea | any string | unchanged |
//! | number | integer, decimal or `1.5e3` text | shortest decimal text, every digit kept |
//! | boolean | `true`/`false` (any case), `1`/`0`, `on`/`off` | `true`/`false` |
//! | color | `#rgb` or `#rrggbb`, `#` optional | lowercase `#rrggbb` |
//! | image | URL from the asset pipeline | unchanged |
//!
//! Invalid input yields a [`ValidationError`] at edit time, so nothing that
//! fails these rules ever reaches the change buffer.

use super::types::{Setting, SettingType};
use crate::errors::ValidationError;
use regex::Regex;
use serde::Serialize;
use std::ops::Range;
use std::sync::LazyLock;

/// Hex color, 3 or 6 digits, optional leading `#`
/// Stored as Option to handle compilation failures gracefully (should never fail for static patterns)
static COLOR_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^#?([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").ok());

/// Edit widget the dashboard shows for a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    /// Single-line input
    TextInput,
    /// Multi-line input
    TextArea,
    /// Numeric input
    NumberInput,
    /// On/off switch
    Toggle,
    /// Color picker with hex field
    ColorPicker,
    /// Image upload with preview
    ImagePicker,
}

/// Decoded, typed view of a canonical setting value
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    /// Single-line text
    Text(String),
    /// Multi-line text
    Textarea(String),
    /// Decimal number
    Number(f64),
    /// Toggle state
    Boolean(bool),
    /// RGB components
    Color([u8; 3]),
    /// Asset URL
    Image(String),
}

impl SettingValue {
    /// Setting type this value belongs to
    #[must_use]
    pub const fn setting_type(&self) -> SettingType {
        match self {
            Self::Text(_) => SettingType::Text,
            Self::Textarea(_) => SettingType::Textarea,
            Self::Number(_) => SettingType::Number,
            Self::Boolean(_) => SettingType::Boolean,
            Self::Color(_) => SettingType::Color,
            Self::Image(_) => SettingType::Image,
        }
    }
}

/// Type-specific validation and encoding for one setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueRenderer {
    /// Single-line text, stored unchanged
    Text,
    /// Multi-line text, stored unchanged
    Textarea,
    /// Decimal number; empty input falls back to `default` when one exists
    Number {
        /// Value substituted for empty input
        default: Option<String>,
    },
    /// Toggle stored as `true`/`false`
    Boolean,
    /// Hex color stored as lowercase `#rrggbb`
    Color,
    /// Asset URL stored unchanged; existence is the asset pipeline's concern
    Image,
}

impl ValueRenderer {
    /// Renderer for a declared type; `default` only matters for numbers
    #[must_use]
    pub fn for_type(setting_type: SettingType, default: Option<&str>) -> Self {
        match setting_type {
            SettingType::Text => Self::Text,
            SettingType::Textarea => Self::Textarea,
            SettingType::Number => Self::Number {
                default: default.map(str::to_owned),
            },
            SettingType::Boolean => Self::Boolean,
            SettingType::Color => Self::Color,
            SettingType::Image => Self::Image,
        }
    }

    /// Renderer for a loaded setting
    #[must_use]
    pub fn for_setting(setting: &Setting, default: Option<&str>) -> Self {
        Self::for_type(setting.setting_type, default)
    }

    /// Declared type this renderer handles
    #[must_use]
    pub const fn setting_type(&self) -> SettingType {
        match self {
            Self::Text => SettingType::Text,
            Self::Textarea => SettingType::Textarea,
            Self::Number { .. } => SettingType::Number,
            Self::Boolean => SettingType::Boolean,
            Self::Color => SettingType::Color,
            Self::Image => SettingType::Image,
        }
    }

    /// Widget used to edit values of this type
    #[must_use]
    pub const fn widget(&self) -> Widget {
        match self {
            Self::Text => Widget::TextInput,
            Self::Textarea => Widget::TextArea,
            Self::Number { .. } => Widget::NumberInput,
            Self::Boolean => Widget::Toggle,
            Self::Color => Widget::ColorPicker,
            Self::Image => Widget::ImagePicker,
        }
    }

    /// Validate raw input for `key` and return its canonical encoding
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` when the input does not satisfy the type's rules
    pub fn encode(&self, key: &str, raw: &str) -> Result<String, ValidationError> {
        match self {
            Self::Text | Self::Textarea | Self::Image => Ok(raw.to_owned()),
            Self::Number { default } => {
                if raw.trim().is_empty() {
                    return default
                        .as_deref()
                        .and_then(canonical_number)
                        .ok_or_else(|| ValidationError::MissingNumber {
                            key: key.to_owned(),
                        });
                }
                canonical_number(raw).ok_or_else(|| ValidationError::NotNumeric {
                    key: key.to_owned(),
                    input: raw.to_owned(),
                })
            }
            Self::Boolean => parse_toggle(raw)
                .map(|flag| encode_bool(flag).to_owned())
                .ok_or_else(|| ValidationError::InvalidBoolean {
                    key: key.to_owned(),
                    input: raw.to_owned(),
                }),
            Self::Color => canonical_color(raw).ok_or_else(|| ValidationError::InvalidColor {
                key: key.to_owned(),
                input: raw.to_owned(),
            }),
        }
    }

    /// Encode a typed value, rejecting values of another setting type
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::TypeMismatch` when the value's type differs from
    /// the renderer's, or the type's own validation error
    pub fn encode_value(&self, key: &str, value: &SettingValue) -> Result<String, ValidationError> {
        let expected = self.setting_type();
        let provided = value.setting_type();
        if expected != provided {
            return Err(ValidationError::TypeMismatch {
                key: key.to_owned(),
                expected: expected.as_str(),
                provided: provided.as_str(),
            });
        }

        match value {
            SettingValue::Text(text) | SettingValue::Textarea(text) | SettingValue::Image(text) => {
                Ok(text.clone())
            }
            SettingValue::Number(number) => self.encode(key, &number.to_string()),
            SettingValue::Boolean(flag) => Ok(encode_bool(*flag).to_owned()),
            SettingValue::Color([r, g, b]) => Ok(format!("#{r:02x}{g:02x}{b:02x}")),
        }
    }

    /// Decode a canonical value into its typed form
    ///
    /// Returns `None` when `encoded` is not a valid canonical value for this type
    /// (an empty number, for instance).
    #[must_use]
    pub fn decode(&self, encoded: &str) -> Option<SettingValue> {
        match self {
            Self::Text => Some(SettingValue::Text(encoded.to_owned())),
            Self::Textarea => Some(SettingValue::Textarea(encoded.to_owned())),
            Self::Image => Some(SettingValue::Image(encoded.to_owned())),
            Self::Number { .. } => canonical_number(encoded)
                .and_then(|canonical| canonical.parse().ok())
                .map(SettingValue::Number),
            Self::Boolean => parse_toggle(encoded).map(SettingValue::Boolean),
            Self::Color => canonical_color(encoded).and_then(|hex| {
                let channel =
                    |range: Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
                Some(SettingValue::Color([
                    channel(1..3)?,
                    channel(3..5)?,
                    channel(5..7)?,
                ]))
            }),
        }
    }
}

const fn encode_bool(flag: bool) -> &'static str {
    if flag {
        "true"
    } else {
        "false"
    }
}

fn parse_toggle(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" => Some(true),
        "false" | "0" | "off" => Some(false),
        _ => None,
    }
}

/// Largest exponent accepted in `1.5e3` style input
const MAX_EXPONENT: i64 = 64;

/// Normalize decimal text without a float round trip, so every digit typed is kept
fn canonical_number(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => {
            let exponent: i64 = exponent.parse().ok()?;
            if !(-MAX_EXPONENT..=MAX_EXPONENT).contains(&exponent) {
                return None;
            }
            (mantissa, exponent)
        }
        None => (unsigned, 0),
    };

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    // shift the decimal point by the exponent
    let digits = format!("{whole}{fraction}");
    let point = i64::try_from(whole.len()).ok()? + exponent;
    let (whole, fraction) = if point <= 0 {
        let zeros = usize::try_from(-point).ok()?;
        (String::new(), format!("{}{digits}", "0".repeat(zeros)))
    } else {
        let point = usize::try_from(point).ok()?;
        if point >= digits.len() {
            (format!("{digits}{}", "0".repeat(point - digits.len())), String::new())
        } else {
            let (whole, fraction) = digits.split_at(point);
            (whole.to_owned(), fraction.to_owned())
        }
    };

    let whole = match whole.trim_start_matches('0') {
        "" => "0",
        digits => digits,
    };
    let fraction = fraction.trim_end_matches('0');

    let mut canonical = String::with_capacity(whole.len() + fraction.len() + 2);
    if negative && (whole != "0" || !fraction.is_empty()) {
        canonical.push('-');
    }
    canonical.push_str(whole);
    if !fraction.is_empty() {
        canonical.push('.');
        canonical.push_str(fraction);
    }
    Some(canonical)
}

fn canonical_color(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let matches = COLOR_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(trimmed));
    if !matches {
        return None;
    }

    let digits = trimmed.trim_start_matches('#').to_ascii_lowercase();
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits
    };
    Some(format!("#{expanded}"))
}
