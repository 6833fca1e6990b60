//! Scalar codec for intrinsic call envelopes
//!
//! A catalog entry renders canonical call text such as
//! `{ "Ref" : "Bucket" }`, text full of quotes and braces that any
//! enclosing serializer would mangle or double-escape. The codec wraps that
//! text into an envelope containing only prefix letters and Base64
//! characters, so the result embeds as a plain string value at any nesting
//! depth. The envelope is opaque: nothing recognizes it as a function call
//! until [`decode`] inverts it during final rendering.
//!
//! `decode(encode(text)) == text` holds for every input.

use thiserror::Error;

/// Marker prefix identifying an encoded call envelope
pub const ENVELOPE_PREFIX: &str = "fn64.";

/// Envelope decode failure
///
/// Raised when an alleged envelope is not a valid output of [`encode`].
/// Carries the offending envelope for diagnostics.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    /// The input does not carry the envelope prefix
    #[error("not an encoded function call: {envelope}")]
    MissingPrefix { envelope: String },
    /// The payload after the prefix is not valid Base64 or not UTF-8 text
    #[error("invalid envelope payload in {envelope}: {reason}")]
    InvalidPayload { envelope: String, reason: String },
}

/// Encode canonical call text into an embeddable envelope
///
/// Deterministic and total; the output contains no characters with
/// structural meaning to JSON or YAML serializers.
pub fn encode(text: &str) -> String {
    let payload =
        base64::Engine::encode(&base64::engine::general_purpose::STANDARD, text.as_bytes());
    format!("{}{}", ENVELOPE_PREFIX, payload)
}

/// Invert [`encode`], recovering the canonical call text
pub fn decode(envelope: &str) -> Result<String, DecodeError> {
    let payload = envelope
        .strip_prefix(ENVELOPE_PREFIX)
        .ok_or_else(|| DecodeError::MissingPrefix {
            envelope: envelope.to_string(),
        })?;
    let bytes = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, payload)
        .map_err(|e| DecodeError::InvalidPayload {
            envelope: envelope.to_string(),
            reason: e.to_string(),
        })?;
    String::from_utf8(bytes).map_err(|e| DecodeError::InvalidPayload {
        envelope: envelope.to_string(),
        reason: e.to_string(),
    })
}

/// Check whether a string is a well-formed envelope
pub fn is_envelope(candidate: &str) -> bool {
    decode(candidate).is_ok()
}
