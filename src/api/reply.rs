//! Reply extraction from the response body.
//!
//! The body may carry stray transport bytes on either side of the JSON
//! payload. Extraction slices at the first `{` and decodes without
//! requiring the value to exhaust the input, so trailing junk is
//! tolerated. Bytes before the first brace never reach the codec.

use serde::Deserialize;

use crate::api::client::ApiError;
use crate::models::ChatReply;

/// Returned when the reply decoded fine but carried no content.
///
/// A structurally valid, content-less reply is a legitimate (if
/// degenerate) outcome, distinct from a parse failure.
pub const NO_REPLY_FALLBACK: &str = "No valid response.";

/// Extract the assistant's text from a raw response body.
///
/// Navigates `choices[0].message.content`; if any step is absent or
/// null the result is [`NO_REPLY_FALLBACK`], not an error.
///
/// # Errors
///
/// [`ApiError::MalformedPayload`] if the body contains no `{` at all,
/// or the slice starting there does not decode as a chat reply. The
/// offending body travels with the error for diagnostics.
pub fn extract(body: &str) -> Result<String, ApiError> {
    let start = body.find('{').ok_or_else(|| ApiError::MalformedPayload {
        detail: "no JSON object start in response body".to_string(),
        body: body.to_string(),
    })?;
    let payload = &body[start..];

    // Deserializer (not from_str) stops after the first complete value
    // instead of demanding exact termination.
    let mut deserializer = serde_json::Deserializer::from_str(payload);
    let reply = ChatReply::deserialize(&mut deserializer).map_err(|err| {
        ApiError::MalformedPayload {
            detail: err.to_string(),
            body: payload.to_string(),
        }
    })?;

    Ok(reply
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .unwrap_or_else(|| NO_REPLY_FALLBACK.to_string()))
}
