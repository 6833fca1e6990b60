//! pipeline.rs — end-to-end template pipeline tests
//!
//! Exercises both directions through the public API:
//!
//! - authoring: build a template in code with catalog calls, render, and
//!   check the final wire document
//! - decoding: parse a JSON document that spells calls out as records,
//!   resolve, render, and check the same wire syntax comes back

use cumulus_template::{codec, intrinsics, processor};
use cumulus_template::{IntrinsicRegistry, Resource, Template, TemplateValue};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

// ============================================================================
// Authoring path
// ============================================================================

#[test]
fn authored_template_renders_canonical_calls() {
    let mut template = Template::new();
    template.description = Some("demo stack".to_string());

    let mut table = Resource::new("AWS::DynamoDB::Table");
    table.properties = TemplateValue::record(vec![(
        "TableName".to_string(),
        TemplateValue::String(intrinsics::join(
            "-",
            &[intrinsics::reference("StageParam"), "events".to_string()],
        )),
    )]);
    template.resources.insert("Table1", table);

    let mut bucket = Resource::new("AWS::S3::Bucket");
    bucket.depends_on = vec!["Table1".to_string()];
    bucket.properties = TemplateValue::record(vec![(
        "BucketArn".to_string(),
        TemplateValue::String(intrinsics::get_att("Table1", "Arn")),
    )]);
    template.resources.insert("Bucket1", bucket);

    let rendered = template.render_json().unwrap();
    assert_eq!(
        rendered,
        r#"{
  "AWSTemplateFormatVersion": "2010-09-09",
  "Description": "demo stack",
  "Resources": {
    "Table1": {
      "Type": "AWS::DynamoDB::Table",
      "Properties": {
        "TableName": { "Fn::Join" : [ "-", [ { "Ref" : "StageParam" }, "events" ] ] }
      }
    },
    "Bucket1": {
      "Type": "AWS::S3::Bucket",
      "Properties": {
        "BucketArn": { "Fn::GetAtt" : [ "Table1", "Arn" ] }
      },
      "DependsOn": [
        "Table1"
      ]
    }
  }
}"#
    );
}

// ============================================================================
// Decoding path
// ============================================================================

#[test]
fn decoded_template_round_trips_to_same_wire_syntax() {
    let source = r#"{
  "Resources": {
    "Subnet1": {
      "Type": "AWS::EC2::Subnet",
      "Properties": {
        "AvailabilityZone": { "Fn::Select": ["0", [{ "Fn::GetAZs": "us-east-1" }]] },
        "CidrBlock": { "Fn::Cidr": ["10.0.0.0/16", "6", "5"] }
      }
    }
  }
}"#;
    let template = Template::from_json(source).unwrap();
    let rendered = template.render_json().unwrap();

    // Singleton select renders its sole (nested-call) element as a scalar
    assert!(rendered.contains(
        r#""AvailabilityZone": { "Fn::Select" : [ "0", { "Fn::GetAZs" : "us-east-1" } ] }"#
    ));
    assert!(rendered.contains(r#""CidrBlock": { "Fn::Cidr" : [ "10.0.0.0/16", "6", "5" ] }"#));
    assert!(!rendered.contains("fn64."));
}

#[test]
fn literal_lookalike_values_survive_untouched() {
    // A record with an intrinsic-like name but the wrong shape is data
    let source = r#"{
  "Resources": {
    "Doc1": {
      "Type": "AWS::SSM::Document",
      "Properties": {
        "Content": { "Fn::GetAtt": "not-a-pair" },
        "Routing": { "Fn::Unknown": ["a", "b"] }
      }
    }
  }
}"#;
    let template = Template::from_json(source).unwrap();
    let rendered = template.render_json().unwrap();
    assert!(rendered.contains(r#""Fn::GetAtt": "not-a-pair""#));
    assert!(rendered.contains(r#""Fn::Unknown": ["#));
}

// ============================================================================
// Resolution and lookup working together
// ============================================================================

#[test]
fn resource_lookup_drives_authoring() {
    let mut template = Template::new();
    template
        .resources
        .insert("Table1", Resource::new("AWS::DynamoDB::Table"));
    template
        .resources
        .insert("Table2", Resource::new("AWS::DynamoDB::Table"));
    template
        .resources
        .insert("Bucket1", Resource::new("AWS::S3::Bucket"));

    // Reference every table found by the kind-filtered query
    let tables = template.resources.all_of_kind("AWS::DynamoDB::Table");
    let refs: Vec<String> = tables.keys().map(|name| intrinsics::reference(name)).collect();
    let mut output = Template::new();
    output
        .resources
        .insert("Policy1", Resource::with_properties(
            "AWS::IAM::Policy",
            TemplateValue::record(vec![(
                "Targets".to_string(),
                TemplateValue::List(refs.into_iter().map(TemplateValue::String).collect()),
            )]),
        ));

    let rendered = output.render_json().unwrap();
    assert!(rendered.contains(r#"{ "Ref" : "Table1" }"#));
    assert!(rendered.contains(r#"{ "Ref" : "Table2" }"#));
    assert!(!rendered.contains("Bucket1"));
}

// ============================================================================
// Arity grid: every mismatching shape is a sentinel, never a partial call
// ============================================================================

#[rstest]
#[case("Fn::GetAtt", serde_json::json!("scalar"))]
#[case("Fn::GetAtt", serde_json::json!(["one"]))]
#[case("Fn::GetAtt", serde_json::json!(["a", "b", "c"]))]
#[case("Fn::Equals", serde_json::json!(["only"]))]
#[case("Fn::If", serde_json::json!(["cond", "true-branch"]))]
#[case("Fn::If", serde_json::json!(["a", "b", "c", "d"]))]
#[case("Fn::FindInMap", serde_json::json!("scalar"))]
#[case("Fn::Join", serde_json::json!("scalar"))]
#[case("Fn::Join", serde_json::json!([",", "not-a-list"]))]
#[case("Fn::Join", serde_json::json!([",", [], "extra"]))]
#[case("Fn::Select", serde_json::json!(["0", "not-a-list"]))]
#[case("Fn::And", serde_json::json!("scalar"))]
#[case("Fn::Not", serde_json::json!({"Condition": "x"}))]
fn arity_mismatch_yields_no_match(#[case] name: &str, #[case] argument: serde_json::Value) {
    let registry = IntrinsicRegistry::global();
    let argument = TemplateValue::from(argument);
    assert_eq!(registry.dispatch(name, &argument), None);
}

#[rstest]
#[case("Ref", serde_json::json!("MyBucket"))]
#[case("Fn::GetAtt", serde_json::json!(["MyBucket", "Arn"]))]
#[case("Fn::If", serde_json::json!(["IsProd", "yes", "no"]))]
#[case("Fn::Join", serde_json::json!([",", ["a", "b"]]))]
#[case("Fn::Select", serde_json::json!(["1", ["a", "b"]]))]
#[case("Fn::Or", serde_json::json!(["CondA", "CondB"]))]
fn matching_shape_produces_an_envelope(#[case] name: &str, #[case] argument: serde_json::Value) {
    let registry = IntrinsicRegistry::global();
    let argument = TemplateValue::from(argument);
    let encoded = registry.dispatch(name, &argument).unwrap();
    assert!(codec::is_envelope(&encoded));
}

// ============================================================================
// Codec properties
// ============================================================================

proptest! {
    #[test]
    fn codec_round_trips_arbitrary_text(text in ".*") {
        let envelope = codec::encode(&text);
        prop_assert_eq!(codec::decode(&envelope).unwrap(), text);
    }

    #[test]
    fn envelopes_never_contain_structural_characters(text in ".*") {
        let envelope = codec::encode(&text);
        prop_assert!(!envelope.contains('"'), "envelope contains double quote");
        prop_assert!(!envelope.contains('{'), "envelope contains open brace");
        prop_assert!(!envelope.contains('}'), "envelope contains close brace");
    }
}

#[test]
fn expansion_is_exact_inverse_of_catalog_encoding() {
    let call = intrinsics::equals("us-east-1", "us-west-2");
    let embedded = format!(r#"{{"IsEast": "{}"}}"#, call);
    let expanded = processor::expand(&embedded).unwrap();
    assert_eq!(
        expanded,
        r#"{"IsEast": { "Fn::Equals" : [ "us-east-1", "us-west-2" ] }}"#
    );
}
