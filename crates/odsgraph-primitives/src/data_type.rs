use std::{
    fmt::{self, Display},
    str::FromStr,
};
use thiserror::Error as ThisError;

/// Number of kinds in the registry.
pub const DATA_TYPE_COUNT: usize = 31;

data_type_registry!(define_data_type_from_registry);

///
/// SEQUENCE_PAIRS
///
/// Explicit (scalar, sequence) pairing. Kinds absent from this table have no
/// counterpart and map to themselves in both directions.
///

pub const SEQUENCE_PAIRS: [(DataType, DataType); 14] = [
    (DataType::String, DataType::StringSeq),
    (DataType::Short, DataType::ShortSeq),
    (DataType::Float, DataType::FloatSeq),
    (DataType::Boolean, DataType::BooleanSeq),
    (DataType::Byte, DataType::ByteSeq),
    (DataType::Long, DataType::LongSeq),
    (DataType::Double, DataType::DoubleSeq),
    (DataType::LongLong, DataType::LongLongSeq),
    (DataType::Date, DataType::DateSeq),
    (DataType::ByteStr, DataType::ByteStrSeq),
    (DataType::Complex, DataType::ComplexSeq),
    (DataType::DComplex, DataType::DComplexSeq),
    (DataType::ExternalReference, DataType::ExternalReferenceSeq),
    (DataType::Enum, DataType::EnumSeq),
];

impl DataType {
    /// Map a scalar kind to its sequence form. Sequence kinds and unpaired
    /// kinds are returned unchanged.
    #[must_use]
    pub const fn to_sequence(self) -> Self {
        match self {
            Self::String => Self::StringSeq,
            Self::Short => Self::ShortSeq,
            Self::Float => Self::FloatSeq,
            Self::Boolean => Self::BooleanSeq,
            Self::Byte => Self::ByteSeq,
            Self::Long => Self::LongSeq,
            Self::Double => Self::DoubleSeq,
            Self::LongLong => Self::LongLongSeq,
            Self::Date => Self::DateSeq,
            Self::ByteStr => Self::ByteStrSeq,
            Self::Complex => Self::ComplexSeq,
            Self::DComplex => Self::DComplexSeq,
            Self::ExternalReference => Self::ExternalReferenceSeq,
            Self::Enum => Self::EnumSeq,
            other => other,
        }
    }

    /// Map a sequence kind to its scalar form. Scalar kinds and unpaired
    /// kinds are returned unchanged.
    #[must_use]
    pub const fn to_scalar(self) -> Self {
        match self {
            Self::StringSeq => Self::String,
            Self::ShortSeq => Self::Short,
            Self::FloatSeq => Self::Float,
            Self::BooleanSeq => Self::Boolean,
            Self::ByteSeq => Self::Byte,
            Self::LongSeq => Self::Long,
            Self::DoubleSeq => Self::Double,
            Self::LongLongSeq => Self::LongLong,
            Self::DateSeq => Self::Date,
            Self::ByteStrSeq => Self::ByteStr,
            Self::ComplexSeq => Self::Complex,
            Self::DComplexSeq => Self::DComplex,
            Self::ExternalReferenceSeq => Self::ExternalReference,
            Self::EnumSeq => Self::Enum,
            other => other,
        }
    }

    /// Whether the kind has a counterpart in the other form.
    #[must_use]
    pub const fn has_pair(self) -> bool {
        !matches!(self, Self::Unknown | Self::Id | Self::Blob)
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

///
/// ParseDataTypeError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("unknown data type '{name}'")]
pub struct ParseDataTypeError {
    pub name: String,
}

impl FromStr for DataType {
    type Err = ParseDataTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ParseDataTypeError {
            name: s.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SEQUENCE_KINDS: [DataType; 14] = [
        DataType::StringSeq,
        DataType::ShortSeq,
        DataType::FloatSeq,
        DataType::BooleanSeq,
        DataType::ByteSeq,
        DataType::LongSeq,
        DataType::DoubleSeq,
        DataType::LongLongSeq,
        DataType::DateSeq,
        DataType::ByteStrSeq,
        DataType::ComplexSeq,
        DataType::DComplexSeq,
        DataType::ExternalReferenceSeq,
        DataType::EnumSeq,
    ];

    const NON_NUMERIC: [DataType; 12] = [
        DataType::Boolean,
        DataType::BooleanSeq,
        DataType::ByteStr,
        DataType::ByteStrSeq,
        DataType::Date,
        DataType::DateSeq,
        DataType::ExternalReference,
        DataType::ExternalReferenceSeq,
        DataType::String,
        DataType::StringSeq,
        DataType::Blob,
        DataType::Unknown,
    ];

    fn any_data_type() -> impl Strategy<Value = DataType> {
        (0..DATA_TYPE_COUNT).prop_map(|i| ALL_DATA_TYPES[i])
    }

    #[test]
    fn registry_holds_every_kind_once() {
        let mut names: Vec<_> = ALL_DATA_TYPES.iter().map(|dt| dt.name()).collect();
        names.sort_unstable();
        names.dedup();

        assert_eq!(names.len(), DATA_TYPE_COUNT);
    }

    #[test]
    fn sequence_flag_matches_exhaustive_list() {
        for dt in ALL_DATA_TYPES {
            assert_eq!(
                dt.is_sequence(),
                SEQUENCE_KINDS.contains(&dt),
                "sequence flag mismatch for {dt}"
            );
        }
    }

    #[test]
    fn numeric_flag_excludes_exactly_the_textual_kinds() {
        for dt in ALL_DATA_TYPES {
            assert_eq!(
                dt.is_numeric(),
                !NON_NUMERIC.contains(&dt),
                "numeric flag mismatch for {dt}"
            );
        }
    }

    #[test]
    fn pair_table_agrees_with_conversions() {
        for (scalar, seq) in SEQUENCE_PAIRS {
            assert!(!scalar.is_sequence());
            assert!(seq.is_sequence());
            assert_eq!(scalar.to_sequence(), seq);
            assert_eq!(seq.to_scalar(), scalar);
        }
    }

    #[test]
    fn unpaired_kinds_map_to_themselves() {
        for dt in [DataType::Unknown, DataType::Id, DataType::Blob] {
            assert!(!dt.has_pair());
            assert_eq!(dt.to_sequence(), dt);
            assert_eq!(dt.to_scalar(), dt);
        }
    }

    #[test]
    fn names_round_trip_and_unknown_text_is_rejected() {
        for dt in ALL_DATA_TYPES {
            assert_eq!(DataType::from_name(dt.name()), Some(dt));
        }

        assert_eq!(DataType::from_name("DT_QUATERNION"), None);
        assert_eq!(DataType::from_name("dt_long"), None);
    }

    #[test]
    fn from_str_reports_the_rejected_name() {
        assert_eq!("DS_DATE".parse::<DataType>(), Ok(DataType::DateSeq));

        let err = "DT_NOPE".parse::<DataType>().unwrap_err();
        assert_eq!(err.name, "DT_NOPE");
        assert_eq!(err.to_string(), "unknown data type 'DT_NOPE'");
    }

    proptest! {
        #[test]
        fn pairing_is_self_inverse(dt in any_data_type()) {
            let seq = dt.to_sequence();
            prop_assert_eq!(seq.to_scalar().to_sequence(), seq);

            if !dt.is_sequence() {
                prop_assert_eq!(seq.to_scalar(), dt);
            } else {
                prop_assert_eq!(dt.to_scalar().to_sequence(), dt);
            }
        }
    }
}
