// crates/flagcheck-core/src/tests/value.rs
// ============================================================================
// Module: Value Unit Tests
// Description: Kind conversions and origin classification.
// ============================================================================

//! ## Overview
//! Unit tests for parameter value conversions and origin classification.

use crate::ParamKind;
use crate::ParamValue;
use crate::ValueOrigin;

#[test]
fn from_integer_respects_kind_width() {
    assert_eq!(ParamValue::from_integer(ParamKind::Int, -5), Some(ParamValue::Int(-5)));
    assert_eq!(ParamValue::from_integer(ParamKind::Uint, -5), None);
    assert_eq!(
        ParamValue::from_integer(ParamKind::Packed, i128::from(u32::MAX)),
        Some(ParamValue::Packed(u32::MAX))
    );
    assert_eq!(ParamValue::from_integer(ParamKind::Packed, i128::from(u32::MAX) + 1), None);
    assert_eq!(ParamValue::from_integer(ParamKind::Bool, 1), None);
}

#[test]
fn integer_view_widens_every_integer_kind() {
    assert_eq!(ParamValue::Uint(u64::MAX).as_integer(), Some(i128::from(u64::MAX)));
    assert_eq!(ParamValue::Packed(121).as_integer(), Some(121));
    assert_eq!(ParamValue::Bool(true).as_integer(), None);
    assert_eq!(ParamValue::List("_min".to_string()).as_list(), Some("_min"));
}

#[test]
fn values_report_their_kind() {
    assert_eq!(ParamValue::Int(0).kind(), ParamKind::Int);
    assert_eq!(ParamValue::List(String::new()).kind().as_str(), "list");
    assert!(ParamKind::Packed.is_integer());
    assert!(!ParamKind::Bool.is_integer());
}

#[test]
fn only_caller_origins_are_explicit() {
    assert!(ValueOrigin::CommandLine.is_explicit());
    assert!(ValueOrigin::Management.is_explicit());
    assert!(!ValueOrigin::Ergonomic.is_explicit());
    assert!(!ValueOrigin::default().is_explicit());
}

#[test]
fn values_serialize_with_kind_tags() {
    let json = serde_json::to_value(ParamValue::Packed(222)).unwrap();
    assert_eq!(json["kind"], "packed");
    assert_eq!(json["value"], 222);
}
