//! Resource collection and lookup facade
//!
//! Resources are plain data: the core never interprets properties, it only
//! needs name-indexed retrieval and a kind-filtered subset query. The
//! collection preserves document insertion order; it is populated once
//! while the document decodes and is read-only afterwards.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::value::TemplateValue;

/// A declared template resource
///
/// The kind tag (the `Type` field, e.g. `AWS::DynamoDB::Table`) is the only
/// field this layer inspects; everything else rides along as opaque data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Resource {
    /// Resource type identifier, e.g. `AWS::S3::Bucket`
    #[serde(rename = "Type")]
    pub kind: String,
    /// Resource properties, shape defined by the kind
    #[serde(rename = "Properties", default, skip_serializing_if = "TemplateValue::is_null")]
    pub properties: TemplateValue,
    /// Logical names this resource depends on; a scalar in the document is
    /// accepted as a one-element list
    #[serde(
        rename = "DependsOn",
        default,
        deserialize_with = "string_or_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub depends_on: Vec<String>,
    /// Retain/Delete/Snapshot behavior on stack deletion
    #[serde(rename = "DeletionPolicy", default, skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<String>,
    /// Arbitrary metadata attached to the resource
    #[serde(rename = "Metadata", default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TemplateValue>,
}

impl Resource {
    /// Build a resource of the given kind with no properties
    pub fn new(kind: impl Into<String>) -> Self {
        Resource {
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// Build a resource of the given kind with properties
    pub fn with_properties(kind: impl Into<String>, properties: TemplateValue) -> Self {
        Resource {
            kind: kind.into(),
            properties,
            ..Default::default()
        }
    }
}

/// Failed single-resource lookup
///
/// Identifies both the requested logical name and the expected kind;
/// raised for an absent name and for a present name of the wrong kind.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("no resource named {name} with type {kind}")]
pub struct ResourceNotFound {
    pub name: String,
    pub kind: String,
}

/// Insertion-ordered mapping from logical name to resource
///
/// Logical names are unique within a template; inserting an existing name
/// replaces the resource in place without changing its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceMap {
    entries: Vec<(String, Resource)>,
}

impl ResourceMap {
    pub fn new() -> Self {
        ResourceMap::default()
    }

    /// Insert or replace a resource under a logical name
    pub fn insert(&mut self, name: impl Into<String>, resource: Resource) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = resource,
            None => self.entries.push((name, resource)),
        }
    }

    /// Look up a resource by logical name
    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, resource)| resource)
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.entries
            .iter()
            .map(|(name, resource)| (name.as_str(), resource))
    }

    /// Iterate entries mutably in insertion order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Resource)> {
        self.entries
            .iter_mut()
            .map(|(name, resource)| (name.as_str(), resource))
    }

    /// Iterate logical names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every resource whose kind tag matches, as a name-keyed mapping
    ///
    /// An empty result is an ordinary outcome, not an error.
    pub fn all_of_kind(&self, kind: &str) -> BTreeMap<&str, &Resource> {
        self.entries
            .iter()
            .filter(|(_, resource)| resource.kind == kind)
            .map(|(name, resource)| (name.as_str(), resource))
            .collect()
    }

    /// The single resource at `name`, required to be of `kind`
    pub fn get_with_kind(&self, name: &str, kind: &str) -> Result<&Resource, ResourceNotFound> {
        match self.get(name) {
            Some(resource) if resource.kind == kind => Ok(resource),
            _ => Err(ResourceNotFound {
                name: name.to_string(),
                kind: kind.to_string(),
            }),
        }
    }
}

impl Serialize for ResourceMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, resource) in &self.entries {
            map.serialize_entry(name, resource)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ResourceMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ResourceMapVisitor;

        impl<'de> Visitor<'de> for ResourceMapVisitor {
            type Value = ResourceMap;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of logical names to resources")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                // Entries land in document order
                let mut resources = ResourceMap::new();
                while let Some((name, resource)) = map.next_entry::<String, Resource>()? {
                    resources.insert(name, resource);
                }
                Ok(resources)
            }
        }

        deserializer.deserialize_map(ResourceMapVisitor)
    }
}

/// Accept `DependsOn` as either a single logical name or a list of them
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrList;

    impl<'de> Visitor<'de> for StringOrList {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a logical name or a list of logical names")
        }

        fn visit_str<E>(self, name: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(vec![name.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut names = Vec::new();
            while let Some(name) = seq.next_element()? {
                names.push(name);
            }
            Ok(names)
        }
    }

    deserializer.deserialize_any(StringOrList)
}
