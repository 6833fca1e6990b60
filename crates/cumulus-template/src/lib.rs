//! Cumulus Template - intrinsic function layer for infrastructure templates
//!
//! This library lets template authors express CloudFormation-style intrinsic
//! function calls (references, attribute lookups, conditionals, string
//! substitution, list manipulation) as ordinary values inside a typed
//! document tree, and lets a template processor later re-materialize those
//! calls into canonical wire syntax:
//! - Envelope codec for embedding call text without escaping collisions
//! - Function catalog producing encoded calls
//! - Arity-tagged handler registry for decode-side dispatch
//! - Resource collection with kind-filtered lookup

/// Cumulus template library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod codec;
pub mod intrinsics;
pub mod processor;
pub mod registry;
pub mod resources;
pub mod template;
pub mod value;

// Re-export commonly used types
pub use codec::DecodeError;
pub use registry::{Intrinsic, IntrinsicRegistry};
pub use resources::{Resource, ResourceMap, ResourceNotFound};
pub use template::{Template, TemplateError};
pub use value::TemplateValue;
