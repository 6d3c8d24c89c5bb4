// ABOUTME: Serde helpers for loosely typed model output
// ABOUTME: Accepts rep counts as strings or numbers and whole counts written as floats
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::de::{Error, Unexpected};
use serde::{Deserialize, Deserializer};
use serde_json::Number;

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Number(Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::Text(text) => text,
            StringOrNumber::Number(number) => number.to_string(),
        }
    }
}

/// Deserialize a string, stringifying a bare number (`10` becomes `"10"`)
///
/// # Errors
///
/// Returns an error if the value is neither a string nor a number.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

/// Optional variant of [`string_or_number`]
///
/// # Errors
///
/// Returns an error if the value is present and neither a string nor a number.
pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(deserializer).map(|value| value.map(String::from))
}

/// Deserialize a non-negative whole count, accepting `150.0` as `150`
///
/// # Errors
///
/// Returns an error if the value is not a number, has a fractional part, is
/// negative, or does not fit in a `u32`.
pub fn whole_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    number
        .as_u64()
        .or_else(|| {
            number
                .as_f64()
                .filter(|value| *value >= 0.0 && value.fract().abs() < f64::EPSILON)
                .map(|value| value as u64)
        })
        .and_then(|value| u32::try_from(value).ok())
        .ok_or_else(|| {
            let text = number.to_string();
            D::Error::invalid_value(Unexpected::Other(&text), &"a non-negative whole number")
        })
}
