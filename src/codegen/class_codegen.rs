//! Class lowering engine
//!
//! Walks one class declaration tree depth-first and issues the writer
//! commands for every class in it. Nested classes are lowered while their
//! enclosing class is still open, so each nested `begin_class`..`end_class`
//! block sits inside the parent's block in declaration order.

use super::context::LoweringContext;
use super::descriptor::{field_descriptor, TypeParamScope};
use super::flag::access_flags::*;
use super::flag::{class_flags, field_flags, AccessFlags};
use super::naming::{binary_class_name, BinaryClassName};
use super::signature::{class_signature, field_signature};
use super::writer::{ClassArtifactWriter, ClassHeader, FieldEntry};
use crate::consts::{JAVA_LANG_ANNOTATION_ANNOTATION, JAVA_LANG_ENUM, JAVA_LANG_OBJECT};
use crate::decl::{
    ClassDeclaration, ClassId, ClassKind, ClassType, EnumEntryDeclaration, FieldDeclaration, MemberDeclaration,
    TypeArg, TypeRef,
};
use crate::error::{Error, Result};

/// Lower a top-level class declaration tree into `writer`.
///
/// A declaration the front-end marked as erroneous, or left without a name,
/// is reported to `ctx.diagnostics` and skipped together with its nested
/// classes. Any other problem is an error and aborts the whole tree.
pub fn lower(decl: &ClassDeclaration, ctx: &mut LoweringContext<'_>, writer: &mut dyn ClassArtifactWriter) -> Result<()> {
    lower_class(decl, None, &TypeParamScope::root(), None, ctx, writer)
}

fn lower_class(
    decl: &ClassDeclaration,
    enclosing: Option<&BinaryClassName>,
    outer_scope: &TypeParamScope<'_>,
    inherited_source: Option<&str>,
    ctx: &mut LoweringContext<'_>,
    writer: &mut dyn ClassArtifactWriter,
) -> Result<()> {
    if let Some(reason) = bad_declaration_reason(decl) {
        // a skipped anonymous object keeps its index so later siblings are not renumbered
        if let (ClassKind::AnonymousObject, Some(outer)) = (decl.kind, enclosing) {
            ctx.namer.next_name(outer);
        }
        let position = ctx.shared().position(decl.id).cloned();
        ctx.diagnostics.report_bad_declaration(format!("{}: {}", decl, reason), position);
        return Ok(());
    }

    let name = binary_class_name(decl, enclosing, &mut ctx.namer)?;
    let access_flags = class_flags(decl)?;
    let scope = outer_scope.child(&decl.type_params);

    let (superclass, interfaces) = supertypes(decl);
    let signature = class_signature(&decl.type_params, &superclass, &interfaces);

    let own_source = ctx.shared().position(decl.id).map(|p| p.file_name());
    let source_file = own_source.or(inherited_source);

    log::debug!("lowering {} as {} ({})", decl, name, access_flags);

    writer.begin_class(ClassHeader {
        version: ctx.config().class_file_version(),
        access_flags,
        name: name.to_string(),
        signature,
        super_name: superclass.class_id.binary_name(),
        interfaces: interfaces.iter().map(|i| i.class_id.binary_name()).collect(),
        source_file: if ctx.config().debug { source_file.map(str::to_string) } else { None },
    })?;

    for member in &decl.members {
        match member {
            MemberDeclaration::Field(field) => lower_field(field, &scope, writer)?,
            MemberDeclaration::Method(method) => ctx.body_lowering().lower_method(method, &name, &scope, writer)?,
            MemberDeclaration::NestedClass(nested) => {
                lower_class(nested, Some(&name), &scope, source_file, ctx, writer)?
            }
            MemberDeclaration::EnumEntry(entry) => lower_enum_entry(entry, decl, &name, writer)?,
            MemberDeclaration::Initializer(_) | MemberDeclaration::TypeAlias(_) => {}
            MemberDeclaration::Property(_) | MemberDeclaration::Script(_) => {
                return Err(Error::unsupported(member.kind_name(), name.as_str()));
            }
        }
    }

    writer.end_class()?;
    log::debug!("finished {}", name);
    Ok(())
}

fn bad_declaration_reason(decl: &ClassDeclaration) -> Option<&'static str> {
    if decl.has_error {
        Some("declaration has front-end errors")
    } else if decl.class_id.is_no_name() && decl.kind != ClassKind::AnonymousObject {
        Some("declaration has no name")
    } else {
        None
    }
}

/// Superclass and interfaces as they appear in the artifact
fn supertypes(decl: &ClassDeclaration) -> (ClassType, Vec<ClassType>) {
    let mut interfaces = decl.interfaces.clone();
    let superclass = match decl.kind {
        ClassKind::Interface => well_known(JAVA_LANG_OBJECT),
        ClassKind::Annotation => {
            let annotation = well_known(JAVA_LANG_ANNOTATION_ANNOTATION);
            if !interfaces.iter().any(|i| i.class_id == annotation.class_id) {
                interfaces.push(ClassType { is_interface: true, ..annotation });
            }
            well_known(JAVA_LANG_OBJECT)
        }
        ClassKind::Enum => decl.superclass.clone().unwrap_or_else(|| {
            let self_type = TypeRef::Class(ClassType::new(decl.class_id.clone()));
            well_known(JAVA_LANG_ENUM).with_args(vec![TypeArg::Type(self_type)])
        }),
        ClassKind::Class | ClassKind::AnonymousObject | ClassKind::FileSynthetic => {
            decl.superclass.clone().unwrap_or_else(|| well_known(JAVA_LANG_OBJECT))
        }
    };
    (superclass, interfaces)
}

/// Class type for an internal name such as `java/lang/Object`
fn well_known(internal_name: &str) -> ClassType {
    let (package, simple) = internal_name.rsplit_once('/').unwrap_or(("", internal_name));
    ClassType::new(ClassId::new(package.replace('/', "."), simple))
}

fn lower_field(field: &FieldDeclaration, scope: &TypeParamScope<'_>, writer: &mut dyn ClassArtifactWriter) -> Result<()> {
    let access_flags = field_flags(field)?;
    let descriptor = field_descriptor(&field.type_ref, scope)?;

    // only static fields are initialized from ConstantValue
    let constant_value = if field.is_static { field.constant.clone() } else { None };
    if field.constant.is_some() && constant_value.is_none() {
        log::debug!("dropping constant initializer of instance field {}", field.name);
    }

    writer.add_field(FieldEntry {
        access_flags,
        name: field.name.clone(),
        descriptor,
        signature: field_signature(&field.type_ref),
        constant_value,
    })
}

fn lower_enum_entry(
    entry: &EnumEntryDeclaration,
    owner: &ClassDeclaration,
    owner_name: &BinaryClassName,
    writer: &mut dyn ClassArtifactWriter,
) -> Result<()> {
    if owner.kind != ClassKind::Enum {
        return Err(Error::invariant(format!("enum entry {} declared in non-enum {}", entry.name, owner_name)));
    }
    writer.add_field(FieldEntry {
        access_flags: AccessFlags::from_bits(ACC_PUBLIC | ACC_STATIC | ACC_FINAL | ACC_ENUM),
        name: entry.name.clone(),
        descriptor: format!("L{};", owner_name),
        signature: None,
        constant_value: None,
    })
}
