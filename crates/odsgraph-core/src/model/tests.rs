use super::*;
use crate::{
    base::{BaseAttribute, BaseElement, BaseModelBuilder, BaseRelation},
    enumeration::EnumerationDefinition,
    error::ErrorClass,
};
use odsgraph_primitives::{RelationRange, Relationship};

fn base() -> Arc<BaseModel> {
    let base = BaseModelBuilder::new("test")
        .enumeration(EnumerationDefinition::from_items("state", &[(0, "open"), (1, "closed")]).unwrap())
        .element(
            BaseElement::new("Unit", true)
                .with_attribute(BaseAttribute::new("id", DataType::LongLong).obligatory().unique())
                .with_attribute(BaseAttribute::new("name", DataType::String).obligatory())
                .with_attribute(BaseAttribute::new("factor", DataType::Double))
                .with_attribute(BaseAttribute::new("state", DataType::Enum).enumeration("state")),
        )
        .element(
            BaseElement::new("Folder", true)
                .with_attribute(BaseAttribute::new("id", DataType::LongLong).obligatory())
                .with_relation(
                    BaseRelation::new(
                        "files",
                        Relationship::Child,
                        RelationRange::ZERO_TO_MANY,
                        RelationRange::ONE_TO_ONE,
                    )
                    .with_target("File", "folder"),
                ),
        )
        .element(
            BaseElement::new("File", false)
                .with_attribute(BaseAttribute::new("id", DataType::LongLong).obligatory())
                .with_relation(
                    BaseRelation::new(
                        "folder",
                        Relationship::Father,
                        RelationRange::ONE_TO_ONE,
                        RelationRange::ZERO_TO_MANY,
                    )
                    .with_target("Folder", "files"),
                ),
        )
        .build()
        .unwrap();

    Arc::new(base)
}

fn model() -> ApplicationModel {
    ApplicationModel::new(base())
}

// Folder/File pair mapped to the base relations.
fn folders(model: &mut ApplicationModel) -> (Aid, Aid, RelNo) {
    let folder = model.create_element("Folder", Some("Folder")).unwrap();
    let file = model.create_element("File", Some("File")).unwrap();
    let rel = model
        .create_relation(RelationDef::new(folder, file, "files", "folder").base("files"))
        .unwrap();

    (folder, file, rel)
}

//
// Elements
//

#[test]
fn element_ids_are_never_reused() {
    let mut model = model();
    let a = model.create_element("A", None).unwrap();
    model.remove_element(a).unwrap();
    let b = model.create_element("A", None).unwrap();

    assert_ne!(a, b);
    assert!(model.element(a).unwrap_err().is_not_found());
}

#[test]
fn element_names_are_unique_and_case_sensitive() {
    let mut model = model();
    model.create_element("MyUnit", Some("Unit")).unwrap();

    let err = model.create_element("MyUnit", None).unwrap_err();
    assert_eq!(err.class, ErrorClass::Duplicate);

    model.create_element("myunit", None).unwrap();
    assert!(model.element_by_name("MYUNIT").unwrap_err().is_not_found());
}

#[test]
fn base_type_is_canonical_and_drives_top_level() {
    let mut model = model();
    let unit = model.create_element("MyUnit", Some("unit")).unwrap();
    let file = model.create_element("MyFile", Some("FILE")).unwrap();
    let free = model.create_element("Loose", None).unwrap();

    assert_eq!(model.element(unit).unwrap().base_type(), Some("Unit"));
    assert!(!model.element(file).unwrap().is_top_level());
    assert!(model.element(free).unwrap().is_top_level());
    assert!(model.element(free).unwrap().base_type().is_none());

    let err = model.create_element("X", Some("Nope")).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn element_queries() {
    let mut model = model();
    model.create_element("UnitA", Some("Unit")).unwrap();
    model.create_element("UnitB", Some("Unit")).unwrap();
    model.create_element("MyFile", Some("File")).unwrap();

    assert_eq!(model.elements("Unit*").unwrap().len(), 2);
    assert_eq!(model.elements("unit*").unwrap().len(), 0);
    assert_eq!(model.elements_by_base_type("UNIT").len(), 2);
    assert_eq!(model.top_level_elements().len(), 2);
    assert_eq!(model.element_count(), 3);
}

#[test]
fn rename_element_checks_collisions() {
    let mut model = model();
    let a = model.create_element("A", None).unwrap();
    model.create_element("B", None).unwrap();

    assert_eq!(model.rename_element(a, "B").unwrap_err().class, ErrorClass::Duplicate);
    model.rename_element(a, "C").unwrap();
    assert_eq!(model.element_by_name("C").unwrap().aid(), a);
}

//
// Attributes
//

#[test]
fn attr_no_by_base_name_resolves_mapped_attribute() {
    let mut model = model();
    let unit = model.create_element("MyUnit", Some("Unit")).unwrap();
    let no = model.add_attribute(unit, AttributeDef::new("id").base("id")).unwrap();

    assert_eq!(no, AttrNo(1));
    assert_eq!(model.element(unit).unwrap().attr_no_by_base_name("id").unwrap(), AttrNo(1));
    assert_eq!(model.element(unit).unwrap().attr_no_by_base_name("ID").unwrap(), AttrNo(1));
}

#[test]
fn attribute_numbers_are_stable_and_not_reused() {
    let mut model = model();
    let unit = model.create_element("MyUnit", Some("Unit")).unwrap();

    let id = model.add_attribute(unit, AttributeDef::new("Id").base("id")).unwrap();
    let name = model.add_attribute(unit, AttributeDef::new("Name").base("name")).unwrap();
    assert!(model.remove_attribute(unit, "Name").unwrap());
    let factor = model.add_attribute(unit, AttributeDef::new("Factor").base("factor")).unwrap();

    assert_eq!((id, name, factor), (AttrNo(1), AttrNo(2), AttrNo(3)));
    let element = model.element(unit).unwrap();
    assert_eq!(element.attr_no("Id").unwrap(), AttrNo(1));
    assert_eq!(element.attr_no("Factor").unwrap(), AttrNo(3));
    assert!(element.attribute_by_no(AttrNo(2)).unwrap_err().is_not_found());
}

#[test]
fn mapped_attribute_inherits_base_definition() {
    let mut model = model();
    let unit = model.create_element("MyUnit", Some("Unit")).unwrap();
    model.add_attribute(unit, AttributeDef::new("Id").base("id")).unwrap();
    model
        .add_attribute(unit, AttributeDef::new("Label").data_type(DataType::String).unit("m"))
        .unwrap();

    let element = model.element(unit).unwrap();
    let id = element.attribute("Id").unwrap();
    assert_eq!(id.data_type(), DataType::LongLong);
    assert!(id.is_obligatory());
    assert!(id.is_unique());
    assert_eq!(id.base_name(), Some("id"));

    let label = element.attribute("Label").unwrap();
    assert_eq!(label.base_name(), None);
    assert_eq!(label.unit(), Some("m"));
    assert_eq!(element.base_attribute("Id").unwrap().name, "id");
}

#[test]
fn attribute_errors() {
    let mut model = model();
    let unit = model.create_element("MyUnit", Some("Unit")).unwrap();
    let loose = model.create_element("Loose", None).unwrap();
    model.add_attribute(unit, AttributeDef::new("Id").base("id")).unwrap();

    let dup_name = model.add_attribute(unit, AttributeDef::new("Id")).unwrap_err();
    assert_eq!(dup_name.class, ErrorClass::Duplicate);

    let dup_base = model.add_attribute(unit, AttributeDef::new("Id2").base("ID")).unwrap_err();
    assert_eq!(dup_base.class, ErrorClass::Duplicate);

    let no_base = model.add_attribute(unit, AttributeDef::new("X").base("nope")).unwrap_err();
    assert!(no_base.is_not_found());

    let unbound = model.add_attribute(loose, AttributeDef::new("Id").base("id")).unwrap_err();
    assert_eq!(unbound.class, ErrorClass::BadParameter);
}

#[test]
fn remove_attribute_is_silent_when_absent() {
    let mut model = model();
    let unit = model.create_element("MyUnit", Some("Unit")).unwrap();
    let revision = model.revision();

    assert!(!model.remove_attribute(unit, "ghost").unwrap());
    assert_eq!(model.revision(), revision);
    assert!(model.remove_attribute(Aid(999), "ghost").unwrap_err().is_not_found());
}

#[test]
fn rename_attribute_keeps_number() {
    let mut model = model();
    let unit = model.create_element("MyUnit", Some("Unit")).unwrap();
    model.add_attribute(unit, AttributeDef::new("Id").base("id")).unwrap();
    model.add_attribute(unit, AttributeDef::new("Factor").base("factor")).unwrap();

    model.rename_attribute(unit, "Factor", "Scale").unwrap();
    assert_eq!(model.element(unit).unwrap().attr_no("Scale").unwrap(), AttrNo(2));

    let err = model.rename_attribute(unit, "Scale", "Id").unwrap_err();
    assert_eq!(err.class, ErrorClass::Duplicate);
    assert!(model.rename_attribute(unit, "Nope", "X").unwrap_err().is_not_found());
}

#[test]
fn enum_attributes_resolve_document_then_base() {
    let mut model = model();
    let unit = model.create_element("MyUnit", Some("Unit")).unwrap();

    // inherited from the base attribute, found in the base registry
    model.add_attribute(unit, AttributeDef::new("State").base("state")).unwrap();

    model.enumerations_mut().create("colors").unwrap().add_next_item("red").unwrap();
    model
        .add_attribute(
            unit,
            AttributeDef::new("Color").data_type(DataType::Enum).enumeration("colors"),
        )
        .unwrap();

    let missing = model
        .add_attribute(unit, AttributeDef::new("Bad").data_type(DataType::Enum))
        .unwrap_err();
    assert_eq!(missing.class, ErrorClass::BadParameter);

    let unknown = model
        .add_attribute(
            unit,
            AttributeDef::new("Bad").data_type(DataType::Enum).enumeration("nope"),
        )
        .unwrap_err();
    assert!(unknown.is_not_found());

    assert_eq!(model.resolve_enumeration("state").unwrap().get_item("closed").unwrap(), 1);
    assert_eq!(model.resolve_enumeration("colors").unwrap().get_item("red").unwrap(), 0);
}

//
// Relations
//

#[test]
fn inverse_of_inverse_is_itself() {
    let mut model = model();
    let parent = model.create_element("Parent", None).unwrap();
    let child = model.create_element("Child", None).unwrap();
    let rel = model
        .create_relation(
            RelationDef::new(parent, child, "children", "parent")
                .range(RelationRange::ZERO_TO_MANY)
                .inverse_range(RelationRange::ONE_TO_ONE),
        )
        .unwrap();

    let view = model.element(parent).unwrap();
    let children = view.relation_by_name("children").unwrap();
    assert_eq!(children.inverse_relation_name(), "parent");
    assert_eq!(children.inverse_relation().unwrap().inverse_relation().unwrap().number(), rel);
    assert_eq!(model.inverse_relation(rel).unwrap().elem1(), child);
    assert_eq!(children.relationship(), Relationship::InfoFrom);
    assert!(children.range().is_many());
}

#[test]
fn base_mapped_relation_takes_role_and_ranges() {
    let mut model = model();
    let (folder, file, rel) = folders(&mut model);

    let files = model.relation(rel).unwrap();
    assert_eq!(files.relationship(), Relationship::Child);
    assert_eq!(files.range(), RelationRange::ZERO_TO_MANY);
    assert_eq!(files.base_name(), Some("files"));

    let back = model.element(file).unwrap().relation_by_name("folder").unwrap();
    assert_eq!(back.relationship(), Relationship::Father);
    assert_eq!(back.max(), 1);
    assert_eq!(back.base_name(), Some("folder"));
    assert_eq!(back.elem2(), folder);

    let related = model.element(folder).unwrap().related_elements(Relationship::Child);
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].aid(), file);
}

#[test]
fn relation_declaration_errors() {
    let mut model = model();
    let (folder, file, _) = folders(&mut model);

    let dup = model
        .create_relation(RelationDef::new(folder, file, "files", "other"))
        .unwrap_err();
    assert_eq!(dup.class, ErrorClass::Duplicate);

    let father_many = model
        .create_relation(
            RelationDef::new(folder, file, "x", "y")
                .relationship(Relationship::Father)
                .range(RelationRange::ZERO_TO_MANY),
        )
        .unwrap_err();
    assert_eq!(father_many.class, ErrorClass::BadParameter);

    let role_clash = model
        .create_relation(
            RelationDef::new(folder, file, "x", "y")
                .base("files")
                .relationship(Relationship::InfoRel),
        )
        .unwrap_err();
    assert_eq!(role_clash.class, ErrorClass::BadParameter);

    let no_base = model
        .create_relation(RelationDef::new(folder, file, "x", "y").base("nope"))
        .unwrap_err();
    assert!(no_base.is_not_found());

    let selfish = model
        .create_relation(RelationDef::new(folder, folder, "peer", "peer"))
        .unwrap_err();
    assert_eq!(selfish.class, ErrorClass::Duplicate);
}

#[test]
fn remove_relation_removes_both_sides() {
    let mut model = model();
    let (folder, file, rel) = folders(&mut model);

    assert!(model.remove_relation(folder, "files").unwrap());
    assert!(model.relation(rel).unwrap_err().is_not_found());
    assert!(model.element(file).unwrap().relations().is_empty());
    assert!(!model.remove_relation(folder, "files").unwrap());
}

#[test]
fn remove_element_drops_touching_relations() {
    let mut model = model();
    let (folder, file, _) = folders(&mut model);

    model.remove_element(file).unwrap();
    assert!(model.element(folder).unwrap().relations().is_empty());
    assert_eq!(model.all_relations().count(), 0);
}

#[test]
fn update_base_relation_keeps_identity() {
    let mut model = model();
    let folder = model.create_element("Folder", Some("Folder")).unwrap();
    let file = model.create_element("File", Some("File")).unwrap();
    let rel = model
        .create_relation(
            RelationDef::new(folder, file, "content", "owner")
                .range(RelationRange::ZERO_TO_MANY)
                .inverse_range(RelationRange::ONE_TO_ONE),
        )
        .unwrap();
    assert_eq!(model.relation(rel).unwrap().base_name(), None);
    let before = model.revision();

    model.update_base_relation(folder, "content", Some("files")).unwrap();

    let content = model.relation(rel).unwrap();
    assert_eq!(content.number(), rel);
    assert_eq!(content.name(), "content");
    assert_eq!(content.base_name(), Some("files"));
    assert_eq!(content.relationship(), Relationship::Child);
    assert_eq!(model.inverse_relation(rel).unwrap().base_name(), Some("folder"));
    assert!(model.revision() > before);

    model.update_base_relation(folder, "content", None).unwrap();
    assert_eq!(model.relation(rel).unwrap().base_name(), None);
    assert!(model.update_base_relation(folder, "ghost", None).unwrap_err().is_not_found());
}

#[test]
fn relation_lookups_by_pattern_base_name_and_number() {
    let mut model = model();
    let (folder, _, rel) = folders(&mut model);
    let view = model.element(folder).unwrap();

    assert_eq!(view.relations_matching("fi*").unwrap().len(), 1);
    assert_eq!(view.relation_by_base_name("FILES").unwrap().number(), rel);
    assert_eq!(view.relation_by_no(rel).unwrap().name(), "files");
    assert_eq!(view.relations_by_relationship(Relationship::AllRel).len(), 1);
    assert!(view.relations_by_relationship(Relationship::Father).is_empty());
}

//
// Validation
//

#[test]
fn validate_reports_missing_coverage() {
    let mut model = model();
    let unit = model.create_element("MyUnit", Some("Unit")).unwrap();
    model.add_attribute(unit, AttributeDef::new("Id").base("id")).unwrap();
    let file = model.create_element("File", Some("File")).unwrap();
    model.add_attribute(file, AttributeDef::new("Id").base("id")).unwrap();

    let err = model.validate().unwrap_err();
    assert_eq!(err.class, ErrorClass::ImplementationConstraint);
    assert!(err.message.contains("obligatory base attribute 'name'"));
    assert!(err.message.contains("mandatory base relation 'folder'"));
}

#[test]
fn validate_accepts_complete_model() {
    let mut model = model();
    let unit = model.create_element("MyUnit", Some("Unit")).unwrap();
    model.add_attribute(unit, AttributeDef::new("Id").base("id")).unwrap();
    model.add_attribute(unit, AttributeDef::new("Name").base("name")).unwrap();
    let (folder, file, _) = folders(&mut model);
    model.add_attribute(folder, AttributeDef::new("Id").base("id")).unwrap();
    model.add_attribute(file, AttributeDef::new("Id").base("id")).unwrap();

    model.validate().unwrap();
}

//
// Builder
//

#[test]
fn builder_links_forward_references() {
    let mut model = model();
    let mut builder = ModelBuilder::new(&mut model);

    builder
        .relation(TempRelation::new("Folder", "File", "files", "folder").base("files"))
        .unwrap();
    builder
        .relation(TempRelation::new("File", "Folder", "folder", "files").cardinality("1", "1"))
        .unwrap();
    assert_eq!(builder.pending_count(), 2);

    builder.element("Folder", Some("Folder")).unwrap();
    assert_eq!(builder.pending_count(), 2);
    builder.element("File", Some("File")).unwrap();
    assert_eq!(builder.pending_count(), 0);
    builder.finish().unwrap();

    let folder = model.element_by_name("Folder").unwrap();
    let files = folder.relation_by_name("files").unwrap();
    assert_eq!(files.inverse_relation_name(), "folder");
    assert_eq!(files.relationship(), Relationship::Child);
    assert_eq!(files.inverse_relation().unwrap().range(), RelationRange::ONE_TO_ONE);
}

#[test]
fn builder_is_order_independent() {
    fn build(elements_first: bool) -> ApplicationModel {
        let mut model = model();
        let mut builder = ModelBuilder::new(&mut model);
        let declare = |b: &mut ModelBuilder<'_>| {
            b.relation(TempRelation::new("Parent", "Child", "children", "parent").cardinality("0", "Many"))
                .unwrap();
            b.relation(TempRelation::new("Child", "Parent", "parent", "children").cardinality("1", "1"))
                .unwrap();
        };

        if elements_first {
            builder.element("Parent", None).unwrap();
            builder.element("Child", None).unwrap();
            declare(&mut builder);
        } else {
            declare(&mut builder);
            builder.element("Child", None).unwrap();
            builder.element("Parent", None).unwrap();
        }
        builder.finish().unwrap();

        model
    }

    for model in [build(true), build(false)] {
        let parent = model.element_by_name("Parent").unwrap();
        let children = parent.relation_by_name("children").unwrap();
        assert_eq!(children.inverse_relation_name(), "parent");
        assert!(children.range().is_many());
        assert_eq!(children.inverse_relation().unwrap().range(), RelationRange::ONE_TO_ONE);
    }
}

#[test]
fn builder_collapses_duplicate_declarations() {
    let mut model = model();
    let mut builder = ModelBuilder::new(&mut model);

    builder.relation(TempRelation::new("A", "B", "to_b", "")).unwrap();
    builder
        .relation(TempRelation::new("A", "B", "to_b", "to_a").cardinality("0", "1"))
        .unwrap();
    assert_eq!(builder.pending_count(), 1);

    let pending = builder.pending().next().unwrap();
    assert_eq!(pending.inverse_name, "to_a");
    assert_eq!(pending.max, "1");
}

#[test]
fn builder_finish_uses_base_defaults_for_one_sided_declarations() {
    let mut model = model();
    let mut builder = ModelBuilder::new(&mut model);

    builder.element("Folder", Some("Folder")).unwrap();
    builder.element("File", Some("File")).unwrap();
    builder
        .relation(TempRelation::new("File", "Folder", "folder", "").base("folder"))
        .unwrap();
    assert_eq!(builder.pending_count(), 1);
    builder.finish().unwrap();

    let file = model.element_by_name("File").unwrap();
    let folder_rel = file.relation_by_name("folder").unwrap();
    assert_eq!(folder_rel.inverse_relation_name(), "files");
    assert_eq!(folder_rel.range(), RelationRange::ONE_TO_ONE);
    assert!(folder_rel.inverse_relation().unwrap().range().is_many());
}

#[test]
fn builder_finish_reports_missing_elements() {
    let mut model = model();
    let mut builder = ModelBuilder::new(&mut model);

    builder.element("A", None).unwrap();
    builder.relation(TempRelation::new("A", "Ghost", "to_ghost", "to_a")).unwrap();

    let err = builder.finish().unwrap_err();
    assert!(err.is_not_found());
    assert!(err.message.contains("A.to_ghost -> Ghost"));
}

#[test]
fn builder_rejects_bad_cardinality() {
    let mut model = model();
    let mut builder = ModelBuilder::new(&mut model);

    let err = builder
        .relation(TempRelation::new("A", "B", "r", "s").cardinality("0", "lots"))
        .unwrap_err();
    assert_eq!(err.class, ErrorClass::BadParameter);

    let err = builder
        .relation(TempRelation::new("A", "B", "r", "s").cardinality("2", "1"))
        .unwrap_err();
    assert_eq!(err.class, ErrorClass::BadParameter);
}

#[test]
fn builder_enumeration_items() {
    let mut model = model();
    let mut builder = ModelBuilder::new(&mut model);

    assert_eq!(builder.enumeration_item("colors", None, "red").unwrap(), 0);
    assert_eq!(builder.enumeration_item("colors", Some(4), "blue").unwrap(), 4);
    assert_eq!(builder.enumeration_item("colors", None, "green").unwrap(), 5);
    assert_eq!(
        builder.enumeration_item("colors", None, "red").unwrap_err().class,
        ErrorClass::Duplicate
    );

    let colors = model.enumerations().get("colors").unwrap();
    assert_eq!(colors.list_item_names(), vec!["red", "blue", "green"]);
}

#[test]
fn revision_advances_on_structural_change() {
    let mut model = model();
    let r0 = model.revision();
    let unit = model.create_element("MyUnit", Some("Unit")).unwrap();
    let r1 = model.revision();
    model.add_attribute(unit, AttributeDef::new("Id").base("id")).unwrap();
    let r2 = model.revision();

    assert!(r0 < r1 && r1 < r2);
}
