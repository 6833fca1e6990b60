//! Intrinsic function catalog
//!
//! Pure encoder functions, one per intrinsic. Each renders its arguments
//! into the fixed canonical JSON call form for that function and runs the
//! whole text through the envelope codec as its final step. No escaping of
//! interpolated values happens here; embedding safety is entirely the
//! codec's job.
//!
//! The returned string is opaque until a renderer decodes it, so it can be
//! assigned anywhere a plain value is expected, including inside the
//! argument list of another call.

use crate::codec;

/// `{ "Name" : "value" }`
fn unary_call(name: &str, value: &str) -> String {
    codec::encode(&format!("{{ \"{}\" : \"{}\" }}", name, value))
}

/// `{ "Name" : [ "a", "b", .. ] }`
fn list_call(name: &str, values: &[String]) -> String {
    codec::encode(&format!("{{ \"{}\" : {} }}", name, quoted_list(values)))
}

/// `[ "a", "b" ]`: every element quoted, `[ ]` when empty
fn quoted_list(values: &[String]) -> String {
    if values.is_empty() {
        "[ ]".to_string()
    } else {
        format!("[ \"{}\" ]", values.join("\", \""))
    }
}

/// Reference another resource or parameter by logical name
pub fn reference(logical_name: &str) -> String {
    unary_call("Ref", logical_name)
}

/// Import a value exported by another stack
pub fn import_value(name: &str) -> String {
    unary_call("Fn::ImportValue", name)
}

/// Base64-encode a value at stack evaluation time
pub fn base64(value: &str) -> String {
    unary_call("Fn::Base64", value)
}

/// List the availability zones of a region
pub fn get_azs(region: &str) -> String {
    unary_call("Fn::GetAZs", region)
}

/// Substitute `${..}` variables inside a string
pub fn sub(template: &str) -> String {
    unary_call("Fn::Sub", template)
}

/// Read an attribute of another resource; argument order is preserved
pub fn get_att(logical_name: &str, attribute: &str) -> String {
    list_call(
        "Fn::GetAtt",
        &[logical_name.to_string(), attribute.to_string()],
    )
}

/// Split a string into a list on a delimiter
pub fn split(delimiter: &str, source: &str) -> String {
    list_call("Fn::Split", &[delimiter.to_string(), source.to_string()])
}

/// Compare two values for equality
pub fn equals(left: &str, right: &str) -> String {
    list_call("Fn::Equals", &[left.to_string(), right.to_string()])
}

/// Choose between two values based on a named condition
pub fn if_value(condition: &str, if_true: &str, if_false: &str) -> String {
    list_call(
        "Fn::If",
        &[
            condition.to_string(),
            if_true.to_string(),
            if_false.to_string(),
        ],
    )
}

/// Carve CIDR blocks out of an IP block
pub fn cidr(ip_block: &str, count: &str, cidr_bits: &str) -> String {
    list_call(
        "Fn::Cidr",
        &[ip_block.to_string(), count.to_string(), cidr_bits.to_string()],
    )
}

/// Look up a value in a two-level template mapping
pub fn find_in_map(map_name: &str, top_level_key: &str, second_level_key: &str) -> String {
    list_call(
        "Fn::FindInMap",
        &[
            map_name.to_string(),
            top_level_key.to_string(),
            second_level_key.to_string(),
        ],
    )
}

/// Join a list of values with a delimiter
pub fn join(delimiter: &str, values: &[String]) -> String {
    codec::encode(&format!(
        "{{ \"Fn::Join\" : [ \"{}\", {} ] }}",
        delimiter,
        quoted_list(values)
    ))
}

/// Select one element of a list by index
///
/// A single-element list renders its sole element as a scalar rather than a
/// one-element list. Consumers distinguish the two wire forms, so the
/// asymmetry is load-bearing.
pub fn select(index: &str, values: &[String]) -> String {
    let rendered = if values.len() == 1 {
        format!("\"{}\"", values[0])
    } else {
        quoted_list(values)
    };
    codec::encode(&format!(
        "{{ \"Fn::Select\" : [ \"{}\", {} ] }}",
        index, rendered
    ))
}

/// Logical AND over a list of conditions
///
/// The service accepts 2 to 10 operands; the bounds are not checked here.
pub fn and(conditions: &[String]) -> String {
    list_call("Fn::And", conditions)
}

/// Logical OR over a list of conditions
///
/// The service accepts 2 to 10 operands; the bounds are not checked here.
pub fn or(conditions: &[String]) -> String {
    list_call("Fn::Or", conditions)
}

/// Logical NOT of a single condition
pub fn not(conditions: &[String]) -> String {
    list_call("Fn::Not", conditions)
}
