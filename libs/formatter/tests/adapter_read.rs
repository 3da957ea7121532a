//! Read-path coverage through the bound format adapter.
//!
//! Requests are bound the way a host binds them, payload bytes go in, and
//! every assertion runs against the returned domain values or the failure
//! the read surfaces. Nothing on this path substitutes: a bad payload is
//! always an `Err`.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use edm::{Model, ModelBuilder, PrimitiveKind, Record, Scalar, TypeRef, Value};
use formatter::{
    FormatAdapter, FormatError, FormatterConfig, OperationRequest, PathSegment, ResourcePath,
};
use url::Url;
use uuid::Uuid;
use wire::MessageQuotas;

fn sample_model() -> Arc<Model> {
    let mut builder = ModelBuilder::new("Demo");
    builder
        .complex_type("Address")
        .property("Street", PrimitiveKind::String)
        .property("City", PrimitiveKind::String);
    builder
        .entity_type("Person")
        .key("PerId")
        .required_property("PerId", PrimitiveKind::Int32)
        .property("Name", PrimitiveKind::String)
        .property("HomeAddress", TypeRef::complex("Demo.Address"))
        .property("UpdatedAt", PrimitiveKind::DateTime)
        .property("ExternalId", PrimitiveKind::Guid)
        .property("Avatar", PrimitiveKind::Binary)
        .navigation_single("Order", "Order")
        .navigation_many("Friends", "Person");
    builder
        .entity_type("Order")
        .key("OrderId")
        .required_property("OrderId", PrimitiveKind::Int32);
    builder.entity_set("People", "Person");
    builder.entity_set("Orders", "Order");
    Arc::new(builder.build().expect("well formed schema"))
}

fn bound(request: OperationRequest) -> FormatAdapter {
    FormatAdapter::for_all_kinds(sample_model(), FormatterConfig::default())
        .per_operation_instance(request)
}

fn entry_request() -> OperationRequest {
    OperationRequest::new(Url::parse("http://localhost:8080/svc/People(7)").unwrap())
        .with_route_prefix("svc")
        .with_path(ResourcePath::new(vec![
            PathSegment::EntitySet("People".into()),
            PathSegment::Key("7".into()),
        ]))
        .with_target(TypeRef::entity("Demo.Person"))
}

fn property_request(name: &str, target: TypeRef) -> OperationRequest {
    let url = format!("http://localhost:8080/svc/People(7)/{name}");
    OperationRequest::new(Url::parse(&url).unwrap())
        .with_route_prefix("svc")
        .with_path(ResourcePath::new(vec![
            PathSegment::EntitySet("People".into()),
            PathSegment::Key("7".into()),
            PathSegment::Property(name.into()),
        ]))
        .with_target(target)
}

fn raw_request(name: &str, target: TypeRef) -> OperationRequest {
    let url = format!("http://localhost:8080/svc/People(7)/{name}/$value");
    OperationRequest::new(Url::parse(&url).unwrap())
        .with_route_prefix("svc")
        .with_path(ResourcePath::new(vec![
            PathSegment::EntitySet("People".into()),
            PathSegment::Key("7".into()),
            PathSegment::Property(name.into()),
            PathSegment::RawValue,
        ]))
        .with_target(target)
}

fn links_request(navigation: &str) -> OperationRequest {
    let url = format!("http://localhost:8080/svc/People(7)/$links/{navigation}");
    OperationRequest::new(Url::parse(&url).unwrap())
        .with_route_prefix("svc")
        .with_path(ResourcePath::new(vec![
            PathSegment::EntitySet("People".into()),
            PathSegment::Key("7".into()),
            PathSegment::Links,
            PathSegment::Navigation(navigation.into()),
        ]))
}

fn as_record(value: Value) -> Record {
    match value {
        Value::Record(record) => record,
        other => panic!("expected a record, got {}", other.shape()),
    }
}

#[test]
fn test_entry_read_materializes_declared_defaults() {
    let record = as_record(
        bound(entry_request())
            .read_value(br#"{"Name": "Ada"}"#)
            .unwrap(),
    );

    assert_eq!(record.type_name().unwrap().qualified(), "Demo.Person");
    assert_eq!(record.len(), 6);
    assert_eq!(record.field("PerId"), Some(&Value::Scalar(Scalar::Int32(0))));
    assert_eq!(record.field("Name"), Some(&Value::from("Ada")));
    assert_eq!(record.field("HomeAddress"), Some(&Value::Null));
    assert_eq!(record.field("UpdatedAt"), Some(&Value::Null));
    assert_eq!(record.field("Avatar"), Some(&Value::Null));
}

#[test]
fn test_lexical_strings_parse_under_declared_kinds() {
    let payload = br#"{
        "PerId": 7,
        "UpdatedAt": "2013-04-01T16:30:00Z",
        "ExternalId": "0e01ff1e-8f90-49b2-a30c-8a8d12bd305a",
        "Avatar": "AQID"
    }"#;
    let record = as_record(bound(entry_request()).read_value(payload).unwrap());

    assert_eq!(
        record.field("UpdatedAt"),
        Some(&Value::Scalar(Scalar::DateTime(
            Utc.with_ymd_and_hms(2013, 4, 1, 16, 30, 0).unwrap()
        )))
    );
    assert_eq!(
        record.field("ExternalId"),
        Some(&Value::Scalar(Scalar::Guid(
            Uuid::parse_str("0e01ff1e-8f90-49b2-a30c-8a8d12bd305a").unwrap()
        )))
    );
    assert_eq!(
        record.field("Avatar"),
        Some(&Value::Scalar(Scalar::Binary(vec![1, 2, 3])))
    );
}

#[test]
fn test_undeclared_wire_property_is_rejected() {
    let err = bound(entry_request())
        .read_value(br#"{"PerId": 7, "Nickname": "A"}"#)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "The property 'Nickname' does not exist on type 'Demo.Person'. \
         Make sure to only use property names that are defined by the type."
    );
}

#[test]
fn test_wire_type_assertion_must_match() {
    let err = bound(entry_request())
        .read_value(br#"{"@type": "Demo.Order", "PerId": 7}"#)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "A payload with type name 'Demo.Order' was found, but a payload of type \
         'Demo.Person' was expected."
    );
}

#[test]
fn test_explicit_null_for_non_nullable_is_rejected() {
    let err = bound(entry_request())
        .read_value(br#"{"PerId": null}"#)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "The property 'PerId' on type 'Demo.Person' is not nullable and cannot carry a null value."
    );
}

#[test]
fn test_integer_narrowing_is_range_checked() {
    let record = as_record(
        bound(entry_request())
            .read_value(br#"{"PerId": 29}"#)
            .unwrap(),
    );
    assert_eq!(record.field("PerId"), Some(&Value::from(29)));

    let err = bound(entry_request())
        .read_value(br#"{"PerId": 2147483648}"#)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "A value of 'integer' cannot be converted to the schema kind 'Edm.Int32'."
    );
}

#[test]
fn test_scalar_standing_in_for_complex_is_rejected() {
    let err = bound(entry_request())
        .read_value(br#"{"PerId": 7, "HomeAddress": "downtown"}"#)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid value for argument 'item': a complex value requires a structured value, \
         found string"
    );

    let complex = property_request("HomeAddress", TypeRef::complex("Demo.Address"));
    let err = bound(complex)
        .read_value(br#"{"HomeAddress": "downtown"}"#)
        .unwrap_err();
    assert!(matches!(err, FormatError::InvalidArgument { parameter: "item", .. }));
}

#[test]
fn test_complex_property_payload_round_trips() {
    let request = property_request("HomeAddress", TypeRef::complex("Demo.Address"));
    let record = as_record(
        bound(request)
            .read_value(br#"{"HomeAddress": {"Street": "110 Main St", "City": "Redmond"}}"#)
            .unwrap(),
    );

    assert_eq!(record.type_name().unwrap().qualified(), "Demo.Address");
    assert_eq!(record.field("Street"), Some(&Value::from("110 Main St")));
    assert_eq!(record.field("City"), Some(&Value::from("Redmond")));
}

#[test]
fn test_single_property_payload_reads_by_declared_type() {
    let request = property_request("Name", TypeRef::Primitive(PrimitiveKind::String));
    let value = bound(request).read_value(br#"{"Name": "Ada"}"#).unwrap();
    assert_eq!(value, Value::from("Ada"));
}

#[test]
fn test_feed_members_materialize_in_order() {
    let request = OperationRequest::new(Url::parse("http://localhost:8080/svc/People").unwrap())
        .with_route_prefix("svc")
        .with_path(ResourcePath::new(vec![PathSegment::EntitySet("People".into())]))
        .with_target(TypeRef::collection_of(TypeRef::entity("Demo.Person")));

    let payload = br#"{"value": [{"PerId": 1}, {"PerId": 2}]}"#;
    let members = match bound(request).read_value(payload).unwrap() {
        Value::Collection(members) => members,
        other => panic!("expected a collection, got {}", other.shape()),
    };

    assert_eq!(members.len(), 2);
    let ids: Vec<&Value> = members
        .iter()
        .map(|member| match member {
            Value::Record(record) => record.field("PerId").unwrap(),
            other => panic!("expected a record, got {}", other.shape()),
        })
        .collect();
    assert_eq!(ids, [&Value::from(1), &Value::from(2)]);
}

#[test]
fn test_reference_link_requires_a_navigation_path() {
    let payload = br#"{"url": "http://localhost/samplelink"}"#;

    let pathless = OperationRequest::new(Url::parse("http://localhost:8080/svc").unwrap())
        .with_route_prefix("svc");
    let err = bound(pathless).read_reference_link(payload).unwrap_err();
    assert!(err.to_string().contains("no resource path is available"));

    let dangling = OperationRequest::new(
        Url::parse("http://localhost:8080/svc/People(7)/$links/Enemies").unwrap(),
    )
    .with_route_prefix("svc")
    .with_path(ResourcePath::new(vec![
        PathSegment::EntitySet("People".into()),
        PathSegment::Key("7".into()),
        PathSegment::Links,
        PathSegment::Navigation("Enemies".into()),
    ]));
    let err = bound(dangling).read_reference_link(payload).unwrap_err();
    assert!(err
        .to_string()
        .contains("The related navigation property could not be found"));
}

#[test]
fn test_reference_link_reads_the_exact_uri() {
    let url = bound(links_request("Order"))
        .read_reference_link(br#"{"url": "http://localhost/samplelink"}"#)
        .unwrap();
    assert_eq!(url.as_str(), "http://localhost/samplelink");
}

#[test]
fn test_reference_link_collection_preserves_order() {
    let payload = br#"{"value": [
        {"url": "http://localhost/People(1)"},
        {"url": "http://localhost/People(2)"}
    ]}"#;
    let urls = bound(links_request("Friends"))
        .read_reference_links(payload)
        .unwrap();
    let urls: Vec<&str> = urls.iter().map(Url::as_str).collect();
    assert_eq!(urls, ["http://localhost/People(1)", "http://localhost/People(2)"]);
}

#[test]
fn test_raw_value_reads_under_the_target_kind() {
    let value = bound(raw_request("PerId", TypeRef::Primitive(PrimitiveKind::Int32)))
        .read_raw_value(b"29")
        .unwrap();
    assert_eq!(value, Value::from(29));

    let value = bound(raw_request("Name", TypeRef::Primitive(PrimitiveKind::String)))
        .read_raw_value(b"Redmond")
        .unwrap();
    assert_eq!(value, Value::from("Redmond"));

    let untargeted = OperationRequest::new(
        Url::parse("http://localhost:8080/svc/People(7)/Name/$value").unwrap(),
    )
    .with_route_prefix("svc");
    let err = bound(untargeted).read_raw_value(b"Redmond").unwrap_err();
    assert!(err.to_string().contains("does not resolve to a target schema type"));
}

#[test]
fn test_byte_quota_rejects_before_parsing() {
    let config = FormatterConfig {
        reader_quotas: MessageQuotas::default().with_max_message_bytes(4),
        ..FormatterConfig::production()
    };
    let err = FormatAdapter::for_all_kinds(sample_model(), config)
        .per_operation_instance(entry_request())
        .read_value(br#"{"PerId": 7}"#)
        .unwrap_err();

    assert!(matches!(err, FormatError::QuotaExceeded { .. }));
    assert!(err.to_string().contains("read from the stream"));
}

#[test]
fn test_relationship_payloads_are_not_domain_values() {
    let err = bound(links_request("Order"))
        .read_value(br#"{"url": "http://localhost/samplelink"}"#)
        .unwrap_err();
    assert!(err
        .to_string()
        .contains("payload is not read as a domain value"));
}
