//! Decode-side resolution and final envelope expansion
//!
//! Two passes bracket a template's life cycle. [`resolve`] runs right after
//! document decode: it walks the generic value tree bottom-up and replaces
//! every single-field record whose field name is a registered intrinsic
//! (and whose argument shape matches) with the envelope the catalog
//! produces. [`expand`] runs last, on serialized output: it splices decoded
//! canonical call text over every quoted envelope until none remain, so
//! nested calls unwrap outside-in as each decode exposes the envelopes
//! embedded one level down.

use std::sync::OnceLock;

use regex::Regex;

use crate::codec::{self, DecodeError, ENVELOPE_PREFIX};
use crate::registry::IntrinsicRegistry;
use crate::value::TemplateValue;

/// Replace decoded intrinsic-call records with encoded envelopes
///
/// Children resolve before their parents, so a call nested inside another
/// call's argument list is already an envelope (an ordinary scalar) by the
/// time the outer record is matched. Records that miss the registry or the
/// expected argument shape pass through untouched: they are literal data.
pub fn resolve(registry: &IntrinsicRegistry, value: TemplateValue) -> TemplateValue {
    match value {
        TemplateValue::List(items) => TemplateValue::List(
            items
                .into_iter()
                .map(|item| resolve(registry, item))
                .collect(),
        ),
        TemplateValue::Record(fields) => {
            let fields: Vec<(String, TemplateValue)> = fields
                .into_iter()
                .map(|(key, value)| (key, resolve(registry, value)))
                .collect();
            if let [(name, argument)] = fields.as_slice() {
                if let Some(encoded) = registry.dispatch(name, argument) {
                    return TemplateValue::String(encoded);
                }
            }
            TemplateValue::Record(fields)
        }
        scalar => scalar,
    }
}

/// `"fn64...."`: a whole JSON string literal holding one envelope
fn envelope_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!(
            "\"{}[A-Za-z0-9+/=]*\"",
            regex::escape(ENVELOPE_PREFIX)
        ))
        .expect("envelope pattern is valid")
    })
}

/// Expand every envelope in serialized JSON output to canonical call syntax
///
/// Each replacement removes the surrounding quotes along with the envelope,
/// so `"fn64..."` becomes `{ "Ref" : ".." }` in place. Expansion repeats
/// until no envelope remains; an envelope that fails to decode aborts with
/// the offending text in the error.
pub fn expand(text: &str) -> Result<String, DecodeError> {
    let pattern = envelope_pattern();
    let mut output = text.to_string();
    while let Some(range) = pattern.find(&output).map(|found| found.range()) {
        let decoded = codec::decode(&output[range.start + 1..range.end - 1])?;
        output.replace_range(range, &decoded);
    }
    Ok(output)
}
