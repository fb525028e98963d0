//! Bundled standard catalogues as static data.
//!
//! Each version is a [`BaseModelDef`] tree of `'static` slices; it is turned
//! into a checked [`BaseModel`] by [`BaseModelDef::build`]. Relation entries
//! list the role of the *target* as seen from the owning element, so a
//! `Father` relation points at the parent and carries a max of one.

use super::{BaseAttribute, BaseElement, BaseModel, BaseModelBuilder, BaseRelation};
use crate::{enumeration::EnumerationDefinition, error::InternalError};
use odsgraph_primitives::{
    DataType, RelationRange,
    Relationship::{self, Child, Father, InfoFrom, InfoRel, InfoTo},
};

/// Versions bundled with this crate.
pub const SUPPORTED_VERSIONS: [&str; 1] = ["asam31"];

///
/// BaseModelDef
///

#[derive(Clone, Copy, Debug)]
pub struct BaseModelDef {
    pub version: &'static str,
    pub elements: &'static [BaseElementDef],
    pub enumerations: &'static [BaseEnumDef],
}

impl BaseModelDef {
    pub fn build(&self) -> Result<BaseModel, InternalError> {
        let mut builder = BaseModelBuilder::new(self.version);

        for def in self.enumerations {
            builder = builder.enumeration(EnumerationDefinition::from_items(def.name, def.items)?);
        }
        for def in self.elements {
            builder = builder.element(def.to_element());
        }

        builder.build()
    }
}

///
/// BaseElementDef
///

#[derive(Clone, Copy, Debug)]
pub struct BaseElementDef {
    pub type_name: &'static str,
    pub top_level: bool,
    pub attributes: &'static [BaseAttributeDef],
    pub relations: &'static [BaseRelationDef],
}

impl BaseElementDef {
    fn to_element(&self) -> BaseElement {
        let mut element = BaseElement::new(self.type_name, self.top_level);

        for attr in self.attributes {
            let mut built = BaseAttribute::new(attr.name, attr.data_type);
            built.obligatory = attr.obligatory;
            built.unique = attr.unique;
            built.enumeration = attr.enumeration.map(str::to_string);
            element = element.with_attribute(built);
        }

        for rel in self.relations {
            let built = rel.targets.iter().fold(
                BaseRelation::new(rel.name, rel.relationship, rel.range, rel.inverse_range),
                |r, (elem2, inverse)| r.with_target(*elem2, *inverse),
            );
            element = element.with_relation(built);
        }

        element
    }
}

///
/// BaseAttributeDef
///

#[derive(Clone, Copy, Debug)]
pub struct BaseAttributeDef {
    pub name: &'static str,
    pub data_type: DataType,
    pub obligatory: bool,
    pub unique: bool,
    pub enumeration: Option<&'static str>,
}

///
/// BaseRelationDef
///
/// `targets` pairs each legal target type with the inverse relation name on
/// that target.
///

#[derive(Clone, Copy, Debug)]
pub struct BaseRelationDef {
    pub name: &'static str,
    pub relationship: Relationship,
    pub range: RelationRange,
    pub inverse_range: RelationRange,
    pub targets: &'static [(&'static str, &'static str)],
}

///
/// BaseEnumDef
///

#[derive(Clone, Copy, Debug)]
pub struct BaseEnumDef {
    pub name: &'static str,
    pub items: &'static [(i32, &'static str)],
}

/// Static definition for a bundled version.
#[must_use]
pub fn definition(version: &str) -> Option<&'static BaseModelDef> {
    if version.eq_ignore_ascii_case(ASAM31.version) {
        Some(&ASAM31)
    } else {
        None
    }
}

//
// Definition helpers
//

const fn attr(name: &'static str, data_type: DataType) -> BaseAttributeDef {
    BaseAttributeDef {
        name,
        data_type,
        obligatory: false,
        unique: false,
        enumeration: None,
    }
}

const fn required(name: &'static str, data_type: DataType) -> BaseAttributeDef {
    BaseAttributeDef {
        obligatory: true,
        ..attr(name, data_type)
    }
}

const fn enum_attr(name: &'static str, enumeration: &'static str, obligatory: bool) -> BaseAttributeDef {
    BaseAttributeDef {
        obligatory,
        enumeration: Some(enumeration),
        ..attr(name, DataType::Enum)
    }
}

const fn rel(
    name: &'static str,
    relationship: Relationship,
    range: RelationRange,
    inverse_range: RelationRange,
    targets: &'static [(&'static str, &'static str)],
) -> BaseRelationDef {
    BaseRelationDef {
        name,
        relationship,
        range,
        inverse_range,
        targets,
    }
}

const ID: BaseAttributeDef = BaseAttributeDef {
    unique: true,
    ..required("id", DataType::LongLong)
};
const NAME: BaseAttributeDef = required("name", DataType::String);
const VERSION: BaseAttributeDef = attr("version", DataType::String);
const DESCRIPTION: BaseAttributeDef = attr("description", DataType::String);
const VERSION_DATE: BaseAttributeDef = attr("version_date", DataType::Date);
const MIME_TYPE: BaseAttributeDef = attr("mime_type", DataType::String);
const EXTERNAL_REFERENCE: BaseAttributeDef =
    attr("external_reference", DataType::ExternalReferenceSeq);

const ONE: RelationRange = RelationRange::ONE_TO_ONE;
const OPT: RelationRange = RelationRange::ZERO_TO_ONE;
const MANY: RelationRange = RelationRange::ZERO_TO_MANY;

//
// ASAM ODS 5.3 subset
//

static ASAM31: BaseModelDef = BaseModelDef {
    version: "asam31",
    elements: &[
        BaseElementDef {
            type_name: "AoEnvironment",
            top_level: true,
            attributes: &[
                ID,
                NAME,
                VERSION,
                DESCRIPTION,
                VERSION_DATE,
                attr("max_test_level", DataType::Long),
                attr("base_model_version", DataType::String),
                attr("application_model_type", DataType::String),
                attr("application_model_version", DataType::String),
                attr("timezone", DataType::String),
            ],
            relations: &[],
        },
        BaseElementDef {
            type_name: "AoTest",
            top_level: true,
            attributes: &[
                ID,
                NAME,
                VERSION,
                DESCRIPTION,
                VERSION_DATE,
                MIME_TYPE,
                EXTERNAL_REFERENCE,
            ],
            relations: &[rel(
                "children",
                Child,
                MANY,
                ONE,
                &[("AoSubTest", "parent_test")],
            )],
        },
        BaseElementDef {
            type_name: "AoSubTest",
            top_level: false,
            attributes: &[
                ID,
                NAME,
                VERSION,
                DESCRIPTION,
                VERSION_DATE,
                MIME_TYPE,
                EXTERNAL_REFERENCE,
            ],
            relations: &[
                rel(
                    "parent_test",
                    Father,
                    ONE,
                    MANY,
                    &[("AoTest", "children"), ("AoSubTest", "children")],
                ),
                rel(
                    "children",
                    Child,
                    MANY,
                    ONE,
                    &[("AoSubTest", "parent_test"), ("AoMeasurement", "test")],
                ),
                rel(
                    "units_under_test",
                    InfoRel,
                    MANY,
                    MANY,
                    &[("AoUnitUnderTest", "sub_tests")],
                ),
            ],
        },
        BaseElementDef {
            type_name: "AoMeasurement",
            top_level: false,
            attributes: &[
                ID,
                NAME,
                VERSION,
                DESCRIPTION,
                VERSION_DATE,
                MIME_TYPE,
                EXTERNAL_REFERENCE,
                attr("measurement_begin", DataType::Date),
                attr("measurement_end", DataType::Date),
            ],
            relations: &[
                rel("test", Father, ONE, MANY, &[("AoSubTest", "children")]),
                rel(
                    "measurement_quantities",
                    Child,
                    MANY,
                    ONE,
                    &[("AoMeasurementQuantity", "measurement")],
                ),
                rel(
                    "submatrices",
                    Child,
                    MANY,
                    ONE,
                    &[("AoSubmatrix", "measurement")],
                ),
                rel(
                    "units_under_test",
                    InfoRel,
                    MANY,
                    MANY,
                    &[("AoUnitUnderTest", "measurements")],
                ),
            ],
        },
        BaseElementDef {
            type_name: "AoMeasurementQuantity",
            top_level: false,
            attributes: &[
                ID,
                NAME,
                VERSION,
                DESCRIPTION,
                VERSION_DATE,
                MIME_TYPE,
                enum_attr("datatype", "datatype_enum", false),
                attr("rank", DataType::Short),
                attr("dimension", DataType::LongSeq),
                attr("type_size", DataType::Short),
                enum_attr("interpolation", "interpolation_enum", false),
                attr("minimum", DataType::Double),
                attr("maximum", DataType::Double),
                attr("average", DataType::Double),
                attr("standard_deviation", DataType::Double),
            ],
            relations: &[
                rel(
                    "measurement",
                    Father,
                    ONE,
                    MANY,
                    &[("AoMeasurement", "measurement_quantities")],
                ),
                rel(
                    "unit",
                    InfoTo,
                    OPT,
                    MANY,
                    &[("AoUnit", "measurement_quantities")],
                ),
                rel(
                    "quantity",
                    InfoTo,
                    OPT,
                    MANY,
                    &[("AoQuantity", "measurement_quantities")],
                ),
                rel(
                    "local_columns",
                    InfoFrom,
                    MANY,
                    ONE,
                    &[("AoLocalColumn", "measurement_quantity")],
                ),
            ],
        },
        BaseElementDef {
            type_name: "AoSubmatrix",
            top_level: false,
            attributes: &[
                ID,
                NAME,
                VERSION,
                DESCRIPTION,
                MIME_TYPE,
                required("number_of_rows", DataType::Long),
            ],
            relations: &[
                rel(
                    "measurement",
                    Father,
                    ONE,
                    MANY,
                    &[("AoMeasurement", "submatrices")],
                ),
                rel(
                    "local_columns",
                    Child,
                    MANY,
                    ONE,
                    &[("AoLocalColumn", "submatrix")],
                ),
            ],
        },
        BaseElementDef {
            type_name: "AoLocalColumn",
            top_level: false,
            attributes: &[
                ID,
                NAME,
                MIME_TYPE,
                attr("flags", DataType::ShortSeq),
                attr("global_flag", DataType::Short),
                attr("independent", DataType::Short),
                attr("minimum", DataType::Double),
                attr("maximum", DataType::Double),
                enum_attr("sequence_representation", "seq_rep_enum", true),
                attr("generation_parameters", DataType::DoubleSeq),
                enum_attr("raw_datatype", "datatype_enum", false),
                required("values", DataType::Unknown),
            ],
            relations: &[
                rel(
                    "submatrix",
                    Father,
                    ONE,
                    MANY,
                    &[("AoSubmatrix", "local_columns")],
                ),
                rel(
                    "measurement_quantity",
                    InfoTo,
                    ONE,
                    MANY,
                    &[("AoMeasurementQuantity", "local_columns")],
                ),
            ],
        },
        BaseElementDef {
            type_name: "AoUnit",
            top_level: true,
            attributes: &[
                ID,
                NAME,
                VERSION,
                DESCRIPTION,
                VERSION_DATE,
                MIME_TYPE,
                required("factor", DataType::Double),
                required("offset", DataType::Double),
                attr("db", DataType::Float),
            ],
            relations: &[
                rel(
                    "phys_dimension",
                    InfoTo,
                    ONE,
                    MANY,
                    &[("AoPhysicalDimension", "units")],
                ),
                rel(
                    "measurement_quantities",
                    InfoFrom,
                    MANY,
                    OPT,
                    &[("AoMeasurementQuantity", "unit")],
                ),
                rel(
                    "quantities",
                    InfoFrom,
                    MANY,
                    OPT,
                    &[("AoQuantity", "default_unit")],
                ),
            ],
        },
        BaseElementDef {
            type_name: "AoPhysicalDimension",
            top_level: true,
            attributes: &[
                ID,
                NAME,
                VERSION,
                DESCRIPTION,
                MIME_TYPE,
                required("length_exp", DataType::Long),
                required("mass_exp", DataType::Long),
                required("time_exp", DataType::Long),
                required("current_exp", DataType::Long),
                required("temperature_exp", DataType::Long),
                required("molar_amount_exp", DataType::Long),
                required("luminous_intensity_exp", DataType::Long),
            ],
            relations: &[rel(
                "units",
                InfoFrom,
                MANY,
                ONE,
                &[("AoUnit", "phys_dimension")],
            )],
        },
        BaseElementDef {
            type_name: "AoQuantity",
            top_level: true,
            attributes: &[
                ID,
                NAME,
                VERSION,
                DESCRIPTION,
                VERSION_DATE,
                MIME_TYPE,
                attr("default_rank", DataType::Short),
                attr("default_dimension", DataType::LongSeq),
                enum_attr("default_datatype", "datatype_enum", false),
                attr("default_type_size", DataType::Short),
                attr("default_mq_name", DataType::String),
            ],
            relations: &[
                rel(
                    "default_unit",
                    InfoTo,
                    OPT,
                    MANY,
                    &[("AoUnit", "quantities")],
                ),
                rel(
                    "measurement_quantities",
                    InfoFrom,
                    MANY,
                    OPT,
                    &[("AoMeasurementQuantity", "quantity")],
                ),
            ],
        },
        BaseElementDef {
            type_name: "AoUnitUnderTest",
            top_level: true,
            attributes: &[
                ID,
                NAME,
                VERSION,
                DESCRIPTION,
                VERSION_DATE,
                MIME_TYPE,
                EXTERNAL_REFERENCE,
            ],
            relations: &[
                rel(
                    "sub_tests",
                    InfoRel,
                    MANY,
                    MANY,
                    &[("AoSubTest", "units_under_test")],
                ),
                rel(
                    "measurements",
                    InfoRel,
                    MANY,
                    MANY,
                    &[("AoMeasurement", "units_under_test")],
                ),
            ],
        },
        BaseElementDef {
            type_name: "AoParameterSet",
            top_level: true,
            attributes: &[ID, NAME, VERSION, DESCRIPTION, MIME_TYPE],
            relations: &[rel(
                "parameters",
                Child,
                MANY,
                ONE,
                &[("AoParameter", "parameter_set")],
            )],
        },
        BaseElementDef {
            type_name: "AoParameter",
            top_level: false,
            attributes: &[
                ID,
                NAME,
                enum_attr("parameter_datatype", "datatype_enum", true),
                required("pvalue", DataType::String),
            ],
            relations: &[rel(
                "parameter_set",
                Father,
                ONE,
                MANY,
                &[("AoParameterSet", "parameters")],
            )],
        },
        BaseElementDef {
            type_name: "AoAny",
            top_level: true,
            attributes: &[ID, NAME, VERSION, DESCRIPTION, VERSION_DATE, MIME_TYPE],
            relations: &[],
        },
    ],
    enumerations: &[
        BaseEnumDef {
            name: "datatype_enum",
            items: &[
                (0, "DT_UNKNOWN"),
                (1, "DT_STRING"),
                (2, "DT_SHORT"),
                (3, "DT_FLOAT"),
                (4, "DT_BOOLEAN"),
                (5, "DT_BYTE"),
                (6, "DT_LONG"),
                (7, "DT_DOUBLE"),
                (8, "DT_LONGLONG"),
                (10, "DT_DATE"),
                (11, "DT_BYTESTR"),
                (13, "DT_COMPLEX"),
                (14, "DT_DCOMPLEX"),
                (28, "DT_EXTERNALREFERENCE"),
                (30, "DT_ENUM"),
            ],
        },
        BaseEnumDef {
            name: "seq_rep_enum",
            items: &[
                (0, "explicit"),
                (1, "implicit_constant"),
                (2, "implicit_linear"),
                (3, "implicit_saw"),
                (4, "raw_linear"),
                (5, "raw_polynomial"),
                (6, "formula"),
                (7, "external_component"),
                (8, "raw_linear_external"),
                (9, "raw_polynomial_external"),
                (10, "raw_linear_calibrated"),
                (11, "raw_linear_calibrated_external"),
            ],
        },
        BaseEnumDef {
            name: "interpolation_enum",
            items: &[
                (0, "no_interpolation"),
                (1, "linear_interpolation"),
                (2, "application_specific"),
            ],
        },
        BaseEnumDef {
            name: "typespec_enum",
            items: &[
                (0, "dt_boolean"),
                (1, "dt_byte"),
                (2, "dt_short"),
                (3, "dt_long"),
                (4, "dt_longlong"),
                (5, "ieeefloat4"),
                (6, "ieeefloat8"),
                (7, "dt_short_beo"),
                (8, "dt_long_beo"),
                (9, "dt_longlong_beo"),
                (10, "ieeefloat4_beo"),
                (11, "ieeefloat8_beo"),
                (12, "dt_string"),
                (13, "dt_bytestr"),
                (14, "dt_blob"),
            ],
        },
    ],
};
