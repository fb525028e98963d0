///
/// data_type_registry
///
/// Single source of truth for every value kind: variant, standard name,
/// whether it is a sequence form, and whether it participates in numeric
/// formatting/aggregation. Callers pass a macro that expands the entries.
///

macro_rules! data_type_registry {
    ($macro:ident) => {
        $macro! {
            (Unknown, "DT_UNKNOWN", sequence = false, numeric = false),
            (String, "DT_STRING", sequence = false, numeric = false),
            (Short, "DT_SHORT", sequence = false, numeric = true),
            (Float, "DT_FLOAT", sequence = false, numeric = true),
            (Boolean, "DT_BOOLEAN", sequence = false, numeric = false),
            (Byte, "DT_BYTE", sequence = false, numeric = true),
            (Long, "DT_LONG", sequence = false, numeric = true),
            (Double, "DT_DOUBLE", sequence = false, numeric = true),
            (LongLong, "DT_LONGLONG", sequence = false, numeric = true),
            (Id, "DT_ID", sequence = false, numeric = true),
            (Date, "DT_DATE", sequence = false, numeric = false),
            (ByteStr, "DT_BYTESTR", sequence = false, numeric = false),
            (Blob, "DT_BLOB", sequence = false, numeric = false),
            (Complex, "DT_COMPLEX", sequence = false, numeric = true),
            (DComplex, "DT_DCOMPLEX", sequence = false, numeric = true),
            (ExternalReference, "DT_EXTERNALREFERENCE", sequence = false, numeric = false),
            (Enum, "DT_ENUM", sequence = false, numeric = true),
            (StringSeq, "DS_STRING", sequence = true, numeric = false),
            (ShortSeq, "DS_SHORT", sequence = true, numeric = true),
            (FloatSeq, "DS_FLOAT", sequence = true, numeric = true),
            (BooleanSeq, "DS_BOOLEAN", sequence = true, numeric = false),
            (ByteSeq, "DS_BYTE", sequence = true, numeric = true),
            (LongSeq, "DS_LONG", sequence = true, numeric = true),
            (DoubleSeq, "DS_DOUBLE", sequence = true, numeric = true),
            (LongLongSeq, "DS_LONGLONG", sequence = true, numeric = true),
            (DateSeq, "DS_DATE", sequence = true, numeric = false),
            (ByteStrSeq, "DS_BYTESTR", sequence = true, numeric = false),
            (ComplexSeq, "DS_COMPLEX", sequence = true, numeric = true),
            (DComplexSeq, "DS_DCOMPLEX", sequence = true, numeric = true),
            (ExternalReferenceSeq, "DS_EXTERNALREFERENCE", sequence = true, numeric = false),
            (EnumSeq, "DS_ENUM", sequence = true, numeric = true),
        }
    };
}

macro_rules! define_data_type_from_registry {
    ( $( ($variant:ident, $name:literal, sequence = $seq:expr, numeric = $num:expr) ),* $(,)? ) => {
        ///
        /// DataType
        ///
        /// Closed set of value kinds. Scalar kinds are prefixed `DT_` in their
        /// standard names, sequence kinds `DS_`.
        ///

        #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        pub enum DataType {
            $( $variant, )*
        }

        impl DataType {
            /// Standard textual name, e.g. `DT_LONG`.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )*
                }
            }

            /// Parse a standard textual name. Matching is exact.
            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $name => Some(Self::$variant), )*
                    _ => None,
                }
            }

            #[must_use]
            pub const fn is_sequence(self) -> bool {
                match self {
                    $( Self::$variant => $seq, )*
                }
            }

            #[must_use]
            pub const fn is_numeric(self) -> bool {
                match self {
                    $( Self::$variant => $num, )*
                }
            }
        }

        /// Every kind in registry order.
        pub const ALL_DATA_TYPES: [DataType; DATA_TYPE_COUNT] = [ $( DataType::$variant, )* ];
    };
}
