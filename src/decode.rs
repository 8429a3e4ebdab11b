use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{EnrichError, Result};

/// Successful response payload: either coerced into the operation's declared
/// result shape, or the raw decoded JSON when coercion fails.
///
/// A shape mismatch is not an error. The API evolves ahead of the typed
/// models, so a response that decodes as JSON but not as `T` degrades to
/// [`Decoded::Raw`] instead of failing the call.
#[derive(Clone, Debug, PartialEq)]
pub enum Decoded<T> {
    /// Payload matched the declared result shape.
    Typed(T),
    /// Payload was valid JSON but did not match the shape.
    Raw(Value),
}

impl<T> Decoded<T> {
    /// Returns the typed payload, discarding a raw fallback.
    pub fn typed(self) -> Option<T> {
        match self {
            Self::Typed(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    /// Returns the payload as plain JSON, re-encoding the typed form.
    pub fn into_raw(self) -> Value
    where
        T: serde::Serialize,
    {
        match self {
            Self::Typed(value) => {
                serde_json::to_value(value).unwrap_or(Value::Null)
            }
            Self::Raw(value) => value,
        }
    }

    pub fn is_typed(&self) -> bool {
        matches!(self, Self::Typed(_))
    }
}

/// Decodes a 200/202 body. Invalid JSON is a hard error; a JSON payload that
/// fails shape coercion falls back to the raw value.
pub(crate) fn decode_payload<T: DeserializeOwned>(body: &str) -> Result<Decoded<T>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|err| EnrichError::Decode(format!("invalid JSON response: {err}; body: {body}")))?;

    match serde_json::from_value::<T>(value.clone()) {
        Ok(typed) => Ok(Decoded::Typed(typed)),
        Err(_) => Ok(Decoded::Raw(value)),
    }
}
