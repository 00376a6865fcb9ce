use classgen::codegen::flag::access_flags::*;
use classgen::codegen::{class_flags, member_flags};
use classgen::decl::{ClassKind, FieldDeclaration, MemberDeclaration, MethodDeclaration, Modality, Visibility};
use classgen::Error;

mod common;
use common::*;

const VISIBILITIES: [Visibility; 6] = [
    Visibility::Public,
    Visibility::Protected,
    Visibility::Internal,
    Visibility::Private,
    Visibility::Package,
    Visibility::Local,
];

const KINDS: [ClassKind; 6] = [
    ClassKind::Class,
    ClassKind::Interface,
    ClassKind::Enum,
    ClassKind::Annotation,
    ClassKind::AnonymousObject,
    ClassKind::FileSynthetic,
];

const MODALITIES: [Modality; 4] = [Modality::Final, Modality::Sealed, Modality::Open, Modality::Abstract];

#[test]
fn class_flags_have_at_most_one_visibility_and_never_abstract_final() {
    for kind in KINDS {
        for visibility in VISIBILITIES {
            for modality in MODALITIES {
                let decl = class("p", "C", kind).with_visibility(visibility).with_modality(modality);
                let flags = match class_flags(&decl) {
                    Ok(flags) => flags,
                    // open private is the only rejected combination here
                    Err(_) => {
                        assert_eq!((visibility, modality), (Visibility::Private, Modality::Open));
                        continue;
                    }
                };
                assert!(flags.visibility_count() <= 1, "{:?} {:?} {:?} -> {}", kind, visibility, modality, flags);
                assert!(!flags.contains(ACC_ABSTRACT | ACC_FINAL), "{:?} {:?} {:?} -> {}", kind, visibility, modality, flags);
            }
        }
    }
}

#[test]
fn package_visibility_sets_no_visibility_flag() {
    let decl = class("p", "C", ClassKind::Class).with_visibility(Visibility::Package);
    assert_eq!(class_flags(&decl).unwrap().visibility_count(), 0);
}

#[test]
fn enum_is_never_final_and_abstract_when_member_is_abstract() {
    let plain = class("p", "Color", ClassKind::Enum).with_modality(Modality::Final);
    let flags = class_flags(&plain).unwrap();
    assert!(!flags.contains(ACC_FINAL));
    assert!(flags.contains(ACC_ENUM | ACC_SUPER));
    assert!(!flags.contains(ACC_ABSTRACT));

    let with_abstract = plain.with_member(method(MethodDeclaration::new("apply").with_modality(Modality::Abstract)));
    let flags = class_flags(&with_abstract).unwrap();
    assert!(flags.contains(ACC_ABSTRACT));
    assert!(!flags.contains(ACC_FINAL));
}

#[test]
fn interface_is_abstract_and_never_final() {
    for modality in [Modality::Final, Modality::Open, Modality::Abstract] {
        let decl = class("p", "Shape", ClassKind::Interface).with_modality(modality);
        let flags = class_flags(&decl).unwrap();
        assert!(flags.contains(ACC_INTERFACE | ACC_ABSTRACT));
        assert!(!flags.contains(ACC_FINAL));
        assert!(!flags.contains(ACC_SUPER));
    }
}

#[test]
fn static_iff_no_receiver_and_not_constructor() {
    let instance = concrete_method("run").with_modality(Modality::Open);
    let top_level = concrete_method("run").with_modality(Modality::Open).without_receiver();
    let constructor = MethodDeclaration::constructor().with_body(return_body());

    let flags = |m: MethodDeclaration| member_flags(&MemberDeclaration::Method(m)).unwrap();
    assert!(!flags(instance).contains(ACC_STATIC));
    assert!(flags(top_level).contains(ACC_STATIC));
    assert!(!flags(constructor.clone()).contains(ACC_STATIC));
    assert!(!flags(constructor.without_receiver()).contains(ACC_STATIC));
}

#[test]
fn constructors_never_carry_final() {
    let constructor = MethodDeclaration::constructor().with_modality(Modality::Final);
    let flags = member_flags(&MemberDeclaration::Method(constructor)).unwrap();
    assert_eq!(flags.bits(), ACC_PUBLIC);
}

#[test]
fn open_private_member_is_an_invariant_violation() {
    let f: FieldDeclaration = int_field("x").with_visibility(Visibility::Private).with_modality(Modality::Open);
    assert!(matches!(member_flags(&MemberDeclaration::Field(f)), Err(Error::InvariantViolation { .. })));
}

#[test]
fn unrepresentable_visibilities_are_rejected() {
    for visibility in [Visibility::Inherited, Visibility::InvisibleFake, Visibility::Unknown] {
        let decl = class("p", "C", ClassKind::Class).with_visibility(visibility);
        assert!(matches!(class_flags(&decl), Err(Error::InvariantViolation { .. })), "{:?}", visibility);
    }
}

#[test]
fn internal_and_local_lower_to_public() {
    for visibility in [Visibility::Internal, Visibility::Local] {
        let m = concrete_method("f").with_visibility(visibility);
        let flags = member_flags(&MemberDeclaration::Method(m)).unwrap();
        assert!(flags.contains(ACC_PUBLIC));
    }
}

#[test]
fn field_modifiers() {
    let mut f = int_field("counter").with_visibility(Visibility::Protected).with_modality(Modality::Open);
    f.is_volatile = true;
    f.is_transient = true;
    let flags = member_flags(&MemberDeclaration::Field(f.into_static())).unwrap();
    assert_eq!(flags.bits(), ACC_PROTECTED | ACC_STATIC | ACC_VOLATILE | ACC_TRANSIENT);
}
