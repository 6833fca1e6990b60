//! Template document model
//!
//! A plain-data container for the sections an infrastructure template
//! declares. Only the resource section gets structural treatment (ordered
//! collection, kind-filtered lookup); parameters, mappings, conditions, and
//! outputs ride along as generic values. Serialization uses the document's
//! PascalCase key names and omits empty sections.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::DecodeError;
use crate::processor;
use crate::registry::IntrinsicRegistry;
use crate::resources::ResourceMap;
use crate::value::TemplateValue;

/// Format version stamped on newly built templates
pub const DEFAULT_FORMAT_VERSION: &str = "2010-09-09";

/// Template document failure
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The document is not valid JSON or does not match the template shape
    #[error("invalid template document: {0}")]
    Document(#[from] serde_json::Error),
    /// An embedded call envelope failed to decode during rendering
    #[error(transparent)]
    Envelope(#[from] DecodeError),
}

/// An infrastructure template document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(
        rename = "AWSTemplateFormatVersion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub format_version: Option<String>,

    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "Metadata", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, TemplateValue>,

    #[serde(rename = "Parameters", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, TemplateValue>,

    #[serde(rename = "Mappings", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mappings: BTreeMap<String, TemplateValue>,

    #[serde(rename = "Conditions", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub conditions: BTreeMap<String, TemplateValue>,

    #[serde(rename = "Resources", default)]
    pub resources: ResourceMap,

    #[serde(rename = "Outputs", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, TemplateValue>,
}

impl Template {
    /// Build an empty template with the current format version
    pub fn new() -> Self {
        Template {
            format_version: Some(DEFAULT_FORMAT_VERSION.to_string()),
            ..Default::default()
        }
    }

    /// Decode a template from JSON text
    pub fn from_json(text: &str) -> Result<Self, TemplateError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize to pretty-printed JSON, envelopes left intact
    pub fn to_json(&self) -> Result<String, TemplateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Normalize decoded intrinsic-call records into encoded envelopes
    ///
    /// Runs [`processor::resolve`] over every section that can hold
    /// document values. Call this after [`Template::from_json`] when the
    /// source document spells calls out as `{"Fn::..": ..}` records.
    pub fn resolve_intrinsics(&mut self, registry: &IntrinsicRegistry) {
        for section in [
            &mut self.metadata,
            &mut self.parameters,
            &mut self.mappings,
            &mut self.conditions,
            &mut self.outputs,
        ] {
            for value in section.values_mut() {
                *value = processor::resolve(registry, std::mem::take(value));
            }
        }
        for (_, resource) in self.resources.iter_mut() {
            resource.properties = processor::resolve(registry, std::mem::take(&mut resource.properties));
            if let Some(metadata) = resource.metadata.take() {
                resource.metadata = Some(processor::resolve(registry, metadata));
            }
        }
    }

    /// Produce the final wire document
    ///
    /// Resolves intrinsic records, serializes, then expands every envelope
    /// into canonical call syntax. The output contains no envelopes and is
    /// ready for the consuming service.
    pub fn render_json(&self) -> Result<String, TemplateError> {
        let mut resolved = self.clone();
        resolved.resolve_intrinsics(IntrinsicRegistry::global());
        let text = serde_json::to_string_pretty(&resolved)?;
        Ok(processor::expand(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intrinsics;
    use crate::resources::Resource;

    #[test]
    fn test_new_template_carries_format_version() {
        let template = Template::new();
        assert_eq!(template.format_version.as_deref(), Some(DEFAULT_FORMAT_VERSION));
        assert!(template.resources.is_empty());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Template::from_json("not json"),
            Err(TemplateError::Document(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let text = r#"{
  "AWSTemplateFormatVersion": "2010-09-09",
  "Description": "demo stack",
  "Resources": {
    "Table1": {
      "Type": "AWS::DynamoDB::Table"
    },
    "Bucket1": {
      "Type": "AWS::S3::Bucket",
      "DependsOn": [
        "Table1"
      ]
    }
  }
}"#;
        let template = Template::from_json(text).unwrap();
        assert_eq!(template.resources.len(), 2);
        assert_eq!(template.to_json().unwrap(), text);
    }

    #[test]
    fn test_render_authored_template() {
        let mut template = Template::new();
        let mut bucket = Resource::new("AWS::S3::Bucket");
        bucket.properties = TemplateValue::record(vec![(
            "BucketName".to_string(),
            TemplateValue::String(intrinsics::reference("NameParam")),
        )]);
        template.resources.insert("Bucket1", bucket);

        let rendered = template.render_json().unwrap();
        assert!(rendered.contains(r#""BucketName": { "Ref" : "NameParam" }"#));
        assert!(!rendered.contains("fn64."));
    }

    #[test]
    fn test_render_decoded_template() {
        let text = r#"{
  "Resources": {
    "Bucket1": {
      "Type": "AWS::S3::Bucket",
      "Properties": {
        "BucketName": { "Fn::Join": ["-", ["prefix", { "Ref": "NameParam" }]] }
      }
    }
  }
}"#;
        let template = Template::from_json(text).unwrap();
        let rendered = template.render_json().unwrap();
        assert!(rendered.contains(
            r#""BucketName": { "Fn::Join" : [ "-", [ "prefix", { "Ref" : "NameParam" } ] ] }"#
        ));
        assert!(!rendered.contains("fn64."));
    }

    #[test]
    fn test_render_leaves_literal_values() {
        let text = r#"{"Resources":{"Q":{"Type":"AWS::SQS::Queue","Properties":{"Named":{"BucketName":"plain"}}}}}"#;
        let template = Template::from_json(text).unwrap();
        let rendered = template.render_json().unwrap();
        assert!(rendered.contains(r#""Named": {"#));
        assert!(rendered.contains(r#""BucketName": "plain""#));
    }
}
