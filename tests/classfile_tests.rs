use classgen::codegen::attribute::AttributeInfo;
use classgen::codegen::{lower, ClassFileBuilder, Constant, GeneratedClass, LoweringContext, SharedTables};
use classgen::decl::{ClassKind, ConstantValue, DeclId, FieldDeclaration, Modality, SourcePosition, Span, TypeParam, TypeRef, Visibility};
use classgen::verify::{verify, VerifyError};
use classgen::{Config, Error, JvmTarget};

mod common;
use common::*;

fn build(decl: &classgen::decl::ClassDeclaration, shared: &SharedTables) -> Vec<GeneratedClass> {
    let mut ctx = LoweringContext::new(shared);
    let mut builder = ClassFileBuilder::new();
    lower(decl, &mut ctx, &mut builder).expect("lowering failed");
    builder.finish().expect("unbalanced writer commands")
}

fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([bytes[offset], bytes[offset + 1]])
}

#[test]
fn class_file_bytes_start_with_magic_and_target_version() {
    for target in JvmTarget::ALL {
        let shared = SharedTables::new(Config { target, ..Default::default() }, Default::default());
        let classes = build(&widget(), &shared);
        let bytes = classes[0].to_bytes();

        assert_eq!(&bytes[0..4], &[0xCA, 0xFE, 0xBA, 0xBE]);
        assert_eq!(u16_at(&bytes, 4), 0);
        assert_eq!(u16_at(&bytes, 6), target.major_version());
        assert_eq!(u16_at(&bytes, 8) as usize, classes[0].class_file.constant_pool.len() + 1);
    }
}

#[test]
fn generated_widget_verifies() {
    let shared = SharedTables::default();
    let classes = build(&widget(), &shared);
    let class = &classes[0];
    assert_eq!(class.name, "com/example/Widget");
    assert!(verify(&class.class_file, 52).is_ok());

    let cf = &class.class_file;
    assert_eq!(cf.name(), Some("com/example/Widget"));
    assert_eq!(cf.super_name(), Some("java/lang/Object"));
    assert!(cf.field_named("count").is_some());
    assert_eq!(cf.method_named("render").and_then(|m| m.code()).map(|c| c.code.clone()), Some(vec![0xb1]));
}

#[test]
fn version_mismatch_is_reported() {
    let shared = SharedTables::default();
    let classes = build(&widget(), &shared);
    assert!(matches!(
        verify(&classes[0].class_file, 61),
        Err(VerifyError::VersionMismatch { found: 52, expected: 61 })
    ));
}

#[test]
fn nested_classes_are_finished_before_their_parent() {
    let decl = class("p", "Outer", ClassKind::Class)
        .with_member(nested(class("p", "Outer.Inner", ClassKind::Class)))
        .with_member(nested(class("p", "Outer.<no name provided>", ClassKind::AnonymousObject)));
    let names: Vec<String> = build(&decl, &SharedTables::default()).into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["p/Outer$Inner", "p/Outer$1", "p/Outer"]);
}

#[test]
fn static_constants_and_generic_signatures_reach_the_class_file() {
    let decl = class("p", "Holder", ClassKind::Class)
        .with_type_param(TypeParam::new("T"))
        .with_member(field(
            FieldDeclaration::new("NAME", TypeRef::class("java.lang", "String"))
                .with_visibility(Visibility::Public)
                .into_static()
                .with_constant(ConstantValue::String("holder".to_string())),
        ))
        .with_member(field(FieldDeclaration::new("value", TypeRef::TypeParameter("T".to_string()))));

    let classes = build(&decl, &SharedTables::default());
    let cf = &classes[0].class_file;
    assert!(verify(cf, 52).is_ok());

    let class_signature = cf.attributes.iter().find_map(|a| match a.info {
        AttributeInfo::Signature { signature_index } => cf.constant_pool.utf8_at(signature_index),
        _ => None,
    });
    assert_eq!(class_signature, Some("<T:Ljava/lang/Object;>Ljava/lang/Object;"));

    let name_field = cf.field_named("NAME").unwrap();
    match name_field.attributes[0].info {
        AttributeInfo::ConstantValue { value_index } => match cf.constant_pool.get(value_index) {
            Some(Constant::String(utf8)) => assert_eq!(cf.constant_pool.utf8_at(*utf8), Some("holder")),
            other => panic!("unexpected constant {:?}", other),
        },
        ref other => panic!("unexpected attribute {:?}", other),
    }

    let value_field = cf.field_named("value").unwrap();
    assert_eq!(cf.constant_pool.utf8_at(value_field.descriptor_index), Some("Ljava/lang/Object;"));
    assert!(matches!(value_field.attributes[0].info, AttributeInfo::Signature { .. }));
}

#[test]
fn source_file_attribute_written_in_debug_mode() {
    let decl = widget().with_id(DeclId(5));
    let mut shared = SharedTables::default();
    shared.positions.insert(DeclId(5), SourcePosition::new("src/com/example/Widget.kt", Span::from_to(1, 1, 20, 1)));

    let classes = build(&decl, &shared);
    let cf = &classes[0].class_file;
    let source = cf.attributes.iter().find_map(|a| match a.info {
        AttributeInfo::SourceFile { sourcefile_index } => cf.constant_pool.utf8_at(sourcefile_index),
        _ => None,
    });
    assert_eq!(source, Some("Widget.kt"));
}

#[test]
fn interface_default_methods_fail_verification_on_old_targets() {
    let decl = class("p", "Greeter", ClassKind::Interface)
        .with_member(method(concrete_method("greet").with_modality(Modality::Open)));

    let old = SharedTables::new(Config { target: JvmTarget::Jvm1_6, ..Default::default() }, Default::default());
    let classes = build(&decl, &old);
    assert!(matches!(verify(&classes[0].class_file, 50), Err(VerifyError::Methods(_))));

    let current = SharedTables::default();
    let classes = build(&decl, &current);
    assert!(verify(&classes[0].class_file, 52).is_ok());
}

#[test]
fn verify_generated_wraps_errors_with_class_name() {
    let classes = build(&widget(), &SharedTables::default());
    match classgen::verify::verify_generated(&classes[0], 55) {
        Err(Error::Verify { class, message }) => {
            assert_eq!(class, "com/example/Widget");
            assert!(message.contains("55"));
        }
        other => panic!("expected verify error, got {:?}", other),
    }
}

#[test]
fn annotation_class_file_lists_annotation_interface() {
    let decl = class("p", "Marker", ClassKind::Annotation);
    let classes = build(&decl, &SharedTables::default());
    let cf = &classes[0].class_file;
    assert_eq!(cf.interface_names(), vec!["java/lang/annotation/Annotation"]);
    assert_eq!(cf.super_name(), Some("java/lang/Object"));
    assert!(verify(cf, 52).is_ok());
}

#[test]
fn string_constants_use_modified_utf8() {
    let decl = class("p", "Text", ClassKind::Class).with_member(field(
        FieldDeclaration::new("MIXED", TypeRef::class("java.lang", "String"))
            .with_visibility(Visibility::Public)
            .into_static()
            .with_constant(ConstantValue::String("a\u{0}\u{1F600}".to_string())),
    ));
    let classes = build(&decl, &SharedTables::default());
    assert!(verify(&classes[0].class_file, 52).is_ok());

    let bytes = classes[0].to_bytes();
    let encoded = [0x00, 0x09, b'a', 0xC0, 0x80, 0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80];
    assert!(bytes.windows(encoded.len()).any(|w| w == encoded));
    assert!(!bytes.windows(4).any(|w| w == [0xF0, 0x9F, 0x98, 0x80]));
    assert!(!bytes.windows(2).any(|w| w == [b'a', 0x00]));
}
