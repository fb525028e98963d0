use super::*;
use crate::error::ErrorClass;
use odsgraph_primitives::ALL_DATA_TYPES;

#[test]
fn empty_value_reports_requested_kind() {
    for dt in ALL_DATA_TYPES {
        assert_eq!(Value::empty(dt).data_type(), dt, "empty value for {dt}");
    }
}

#[test]
fn len_counts_sequence_elements() {
    assert_eq!(Value::Unknown.len(), 0);
    assert_eq!(Value::Long(3).len(), 1);
    assert_eq!(Value::DoubleSeq(vec![1.0, 2.0, 3.0]).len(), 3);
    assert!(Value::StringSeq(Vec::new()).is_empty());
}

#[test]
fn fits_accepts_unknown_on_either_side() {
    assert!(Value::Long(1).fits(DataType::Long));
    assert!(Value::Long(1).fits(DataType::Unknown));
    assert!(Value::Unknown.fits(DataType::Double));
    assert!(!Value::Long(1).fits(DataType::LongLong));
    assert!(!Value::LongSeq(vec![1]).fits(DataType::Long));
}

#[test]
fn long_long_prefers_wide_payload_then_widens() {
    assert_eq!(Value::LongLong(i64::MAX).as_long_long().unwrap(), i64::MAX);
    assert_eq!(Value::Id(7).as_long_long().unwrap(), 7);
    assert_eq!(Value::Long(-5).as_long_long().unwrap(), -5);
    assert_eq!(Value::Short(12).as_long_long().unwrap(), 12);

    let err = Value::Double(1.0).as_long_long().unwrap_err();
    assert_eq!(err.class, ErrorClass::UnsupportedType);
}

#[test]
fn long_widens_narrow_integers_only() {
    assert_eq!(Value::Long(40).as_long().unwrap(), 40);
    assert_eq!(Value::Byte(255).as_long().unwrap(), 255);
    assert_eq!(Value::Short(-3).as_long().unwrap(), -3);
    assert!(Value::LongLong(1).as_long().is_err());
}

#[test]
fn sequence_and_float_widening() {
    assert_eq!(
        Value::LongSeq(vec![1, -2]).as_long_long_seq().unwrap(),
        vec![1i64, -2]
    );
    assert_eq!(Value::Float(0.5).as_double().unwrap(), 0.5);
    assert!(Value::ShortSeq(vec![1]).as_long_long_seq().is_err());
}

#[test]
fn name_value_unit_validity() {
    let nvu = NameValueUnit::new("factor", Value::Double(1.5)).with_unit("m");
    assert!(nvu.has_valid_value());
    assert_eq!(nvu.unit.as_deref(), Some("m"));

    let missing = NameValueUnit::new("factor", Value::Unknown);
    assert!(!missing.valid);

    let placeholder = NameValueUnit::empty("offset", DataType::Double);
    assert_eq!(placeholder.data_type(), DataType::Double);
    assert!(!placeholder.has_valid_value());
}

#[test]
fn value_serializes_with_variant_tag() {
    let json = serde_json::to_string(&Value::Long(3)).unwrap();
    assert_eq!(json, r#"{"Long":3}"#);

    let back: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Value::Long(3));
}
