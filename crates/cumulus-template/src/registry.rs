//! Arity-tagged intrinsic handlers and the name-indexed registry
//!
//! A document decoder produces values of unknown shape; an intrinsic node
//! arrives as a single-field record whose field name is the function name
//! and whose field value is the raw argument. [`Intrinsic`] pins each
//! catalog entry to one of five argument shapes, so shape validation is a
//! match on the variant instead of a runtime type switch, and a mismatch is
//! the sentinel `None` rather than a fault: a value that merely resembles a
//! call must stay a literal.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::intrinsics;
use crate::value::TemplateValue;

/// A catalog entry tagged with its argument shape
///
/// Each variant carries a pure function from projected string arguments to
/// an encoded call envelope.
#[derive(Debug, Clone, Copy)]
pub enum Intrinsic {
    /// One scalar argument; a one-element list is coerced to its element
    Unary(fn(&str) -> String),
    /// Exactly a two-element list
    Binary(fn(&str, &str) -> String),
    /// Exactly a three-element list
    Ternary(fn(&str, &str, &str) -> String),
    /// A scalar plus an optional list: `[scalar]` or `[scalar, [..]]`
    ScalarList(fn(&str, &[String]) -> String),
    /// Any list, converted element-wise
    List(fn(&[String]) -> String),
}

impl Intrinsic {
    /// Match a decoded argument against this handler's shape
    ///
    /// Returns the encoded call on a match and `None` on any shape
    /// mismatch. Arguments are never truncated or padded to fit.
    pub fn apply(&self, argument: &TemplateValue) -> Option<String> {
        match self {
            Intrinsic::Unary(call) => Some(call(&scalar_of(argument))),
            Intrinsic::Binary(call) => match argument {
                TemplateValue::List(items) if items.len() == 2 => Some(call(
                    &items[0].to_display_string(),
                    &items[1].to_display_string(),
                )),
                _ => None,
            },
            Intrinsic::Ternary(call) => match argument {
                TemplateValue::List(items) if items.len() == 3 => Some(call(
                    &items[0].to_display_string(),
                    &items[1].to_display_string(),
                    &items[2].to_display_string(),
                )),
                _ => None,
            },
            Intrinsic::ScalarList(call) => match argument {
                TemplateValue::List(items) if items.len() == 1 => {
                    Some(call(&items[0].to_display_string(), &[]))
                }
                TemplateValue::List(items) if items.len() == 2 => match &items[1] {
                    TemplateValue::List(values) => {
                        Some(call(&items[0].to_display_string(), &strings_of(values)))
                    }
                    _ => None,
                },
                _ => None,
            },
            Intrinsic::List(call) => match argument {
                TemplateValue::List(items) => Some(call(&strings_of(items))),
                _ => None,
            },
        }
    }
}

/// Project a unary argument to its scalar text
///
/// A one-element list stands in for its sole element; everything else
/// passes through the uniform string projection unchanged.
fn scalar_of(argument: &TemplateValue) -> String {
    match argument {
        TemplateValue::List(items) if items.len() == 1 => items[0].to_display_string(),
        other => other.to_display_string(),
    }
}

/// Element-wise permissive conversion; stringifies, never fails
fn strings_of(values: &[TemplateValue]) -> Vec<String> {
    values.iter().map(|v| v.to_display_string()).collect()
}

/// Name-indexed mapping over the closed intrinsic function set
///
/// Built once and never mutated; safe for unsynchronized concurrent reads.
/// Lookup by an unrecognized name returns `None`; absence means "not an
/// intrinsic function", not an error.
#[derive(Debug, Clone)]
pub struct IntrinsicRegistry {
    handlers: HashMap<&'static str, Intrinsic>,
}

impl IntrinsicRegistry {
    /// Build the registry over the full function catalog
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Intrinsic> = HashMap::new();
        handlers.insert("Ref", Intrinsic::Unary(intrinsics::reference));
        handlers.insert("Fn::ImportValue", Intrinsic::Unary(intrinsics::import_value));
        handlers.insert("Fn::Base64", Intrinsic::Unary(intrinsics::base64));
        handlers.insert("Fn::GetAZs", Intrinsic::Unary(intrinsics::get_azs));
        handlers.insert("Fn::Sub", Intrinsic::Unary(intrinsics::sub));
        handlers.insert("Fn::GetAtt", Intrinsic::Binary(intrinsics::get_att));
        handlers.insert("Fn::Split", Intrinsic::Binary(intrinsics::split));
        handlers.insert("Fn::Equals", Intrinsic::Binary(intrinsics::equals));
        handlers.insert("Fn::If", Intrinsic::Ternary(intrinsics::if_value));
        handlers.insert("Fn::Cidr", Intrinsic::Ternary(intrinsics::cidr));
        handlers.insert("Fn::FindInMap", Intrinsic::Ternary(intrinsics::find_in_map));
        handlers.insert("Fn::Join", Intrinsic::ScalarList(intrinsics::join));
        handlers.insert("Fn::Select", Intrinsic::ScalarList(intrinsics::select));
        handlers.insert("Fn::And", Intrinsic::List(intrinsics::and));
        handlers.insert("Fn::Or", Intrinsic::List(intrinsics::or));
        handlers.insert("Fn::Not", Intrinsic::List(intrinsics::not));
        IntrinsicRegistry { handlers }
    }

    /// Shared process-wide registry, built on first use
    pub fn global() -> &'static IntrinsicRegistry {
        static REGISTRY: OnceLock<IntrinsicRegistry> = OnceLock::new();
        REGISTRY.get_or_init(IntrinsicRegistry::new)
    }

    /// Look up a handler by function name
    pub fn lookup(&self, name: &str) -> Option<&Intrinsic> {
        self.handlers.get(name)
    }

    /// Check if a name belongs to the intrinsic function set
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Look up and apply in one step
    ///
    /// `None` covers both an unrecognized name and a shape mismatch; either
    /// way the caller treats the node as a literal value.
    pub fn dispatch(&self, name: &str, argument: &TemplateValue) -> Option<String> {
        self.lookup(name)?.apply(argument)
    }

    /// Iterate the registered function names
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for IntrinsicRegistry {
    fn default() -> Self {
        Self::new()
    }
}
