//! Tolerant field decoders for values the server stores as SQLite integers
//! and for numbers read straight out of form inputs.

use std::fmt::Display;
use std::str::FromStr;

use serde::de::Error;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrInt {
    Bool(bool),
    Int(i64),
}

impl From<BoolOrInt> for bool {
    fn from(value: BoolOrInt) -> Self {
        match value {
            BoolOrInt::Bool(value) => value,
            BoolOrInt::Int(value) => value != 0,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText<T> {
    Number(T),
    Text(String),
}

/// Accepts `true`/`false` as well as `0`/`1` (any non-zero integer is `true`).
pub fn bool_from_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    BoolOrInt::deserialize(deserializer).map(bool::from)
}

/// [`bool_from_int`] for optional fields; `null` is `None`.
pub fn option_bool_from_int<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BoolOrInt>::deserialize(deserializer)?.map(bool::from))
}

/// Optional number given either as a number or as its decimal text, the
/// way input values arrive. Blank text is `None`.
pub fn option_number_from_str<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Option::<NumberOrText<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(value)) => Ok(Some(value)),
        Some(NumberOrText::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse()
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid number {:?}: {}", text, e)))
        }
    }
}
