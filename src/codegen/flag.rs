//! Access flags and the flag/modality calculator
//!
//! `class_flags` and `member_flags` are pure functions of a declaration.
//! Every result carries exactly one visibility (PUBLIC, PROTECTED, PRIVATE,
//! or none for package-default) and never both ABSTRACT and FINAL.

use crate::decl::{ClassDeclaration, ClassKind, FieldDeclaration, MemberDeclaration, MethodDeclaration, Modality, Visibility};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Access flags for classes, fields, and methods
pub mod access_flags {
    pub const ACC_PUBLIC: u16 = 0x0001;
    pub const ACC_PRIVATE: u16 = 0x0002;
    pub const ACC_PROTECTED: u16 = 0x0004;
    pub const ACC_STATIC: u16 = 0x0008;
    pub const ACC_FINAL: u16 = 0x0010;
    pub const ACC_SUPER: u16 = 0x0020;
    pub const ACC_SYNCHRONIZED: u16 = 0x0020;
    pub const ACC_VOLATILE: u16 = 0x0040;
    pub const ACC_BRIDGE: u16 = 0x0040;
    pub const ACC_TRANSIENT: u16 = 0x0080;
    pub const ACC_VARARGS: u16 = 0x0080;
    pub const ACC_NATIVE: u16 = 0x0100;
    pub const ACC_INTERFACE: u16 = 0x0200;
    pub const ACC_ABSTRACT: u16 = 0x0400;
    pub const ACC_STRICT: u16 = 0x0800;
    pub const ACC_SYNTHETIC: u16 = 0x1000;
    pub const ACC_ANNOTATION: u16 = 0x2000;
    pub const ACC_ENUM: u16 = 0x4000;
    pub const ACC_MODULE: u16 = 0x8000;
}

use access_flags::*;

/// Bitmask written into the access_flags slot of a class, field or method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessFlags(u16);

impl AccessFlags {
    pub const EMPTY: AccessFlags = AccessFlags(0);

    pub const fn from_bits(bits: u16) -> Self {
        AccessFlags(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, bits: u16) -> bool {
        self.0 & bits == bits
    }

    pub const fn with(self, bits: u16) -> Self {
        AccessFlags(self.0 | bits)
    }

    /// Number of visibility bits set; 0 is package-default
    pub fn visibility_count(self) -> u32 {
        (self.0 & (ACC_PUBLIC | ACC_PROTECTED | ACC_PRIVATE)).count_ones()
    }
}

impl BitOr<u16> for AccessFlags {
    type Output = AccessFlags;

    fn bitor(self, rhs: u16) -> AccessFlags {
        self.with(rhs)
    }
}

impl BitOrAssign<u16> for AccessFlags {
    fn bitor_assign(&mut self, rhs: u16) {
        self.0 |= rhs;
    }
}

impl From<AccessFlags> for u16 {
    fn from(flags: AccessFlags) -> u16 {
        flags.0
    }
}

impl fmt::Display for AccessFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}

/// Which kind of declaration the common flag rules are applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagTarget {
    Class(ClassKind),
    Constructor,
    Member,
}

/// Compute the access flags of a class declaration
pub fn class_flags(decl: &ClassDeclaration) -> Result<AccessFlags> {
    let modality = effective_class_modality(decl);
    let mut flags = common_flags(decl.visibility, modality, FlagTarget::Class(decl.kind), &decl.class_id.to_string())?;

    match decl.kind {
        ClassKind::Interface => flags |= ACC_INTERFACE,
        ClassKind::Annotation => flags |= ACC_INTERFACE | ACC_ANNOTATION,
        ClassKind::Enum => flags |= ACC_SUPER | ACC_ENUM,
        ClassKind::Class | ClassKind::AnonymousObject | ClassKind::FileSynthetic => flags |= ACC_SUPER,
    }

    Ok(flags)
}

/// Modality the class is lowered with.
///
/// Interfaces are always abstract. An enum class declaring an abstract
/// member cannot be concrete at the binary level, whatever it was declared as.
pub fn effective_class_modality(decl: &ClassDeclaration) -> Modality {
    if decl.kind.is_interface_like() {
        return Modality::Abstract;
    }
    match decl.kind {
        ClassKind::Enum if decl.has_abstract_member() => Modality::Abstract,
        _ => decl.modality,
    }
}

/// Compute the access flags of a field or method member
pub fn member_flags(decl: &MemberDeclaration) -> Result<AccessFlags> {
    match decl {
        MemberDeclaration::Field(field) => field_flags(field),
        MemberDeclaration::Method(method) => method_flags(method),
        MemberDeclaration::NestedClass(class) => class_flags(class),
        other => Err(Error::invariant(format!("{} declarations carry no access flags", other.kind_name()))),
    }
}

pub fn field_flags(field: &FieldDeclaration) -> Result<AccessFlags> {
    let mut flags = common_flags(field.visibility, field.modality, FlagTarget::Member, &field.name)?;
    if field.is_static {
        flags |= ACC_STATIC;
    }
    if field.is_volatile {
        flags |= ACC_VOLATILE;
    }
    if field.is_transient {
        flags |= ACC_TRANSIENT;
    }
    Ok(flags)
}

pub fn method_flags(method: &MethodDeclaration) -> Result<AccessFlags> {
    let target = if method.is_constructor() { FlagTarget::Constructor } else { FlagTarget::Member };
    let mut flags = common_flags(method.visibility, method.modality, target, &method.name)?;
    if !method.has_receiver && !method.is_constructor() {
        flags |= ACC_STATIC;
    }
    Ok(flags)
}

fn common_flags(visibility: Visibility, modality: Modality, target: FlagTarget, owner: &str) -> Result<AccessFlags> {
    let mut flags = AccessFlags::EMPTY;

    flags |= match visibility {
        Visibility::Public | Visibility::Internal | Visibility::Local => ACC_PUBLIC,
        Visibility::Protected => ACC_PROTECTED,
        Visibility::Private => ACC_PRIVATE,
        Visibility::Package => 0,
        Visibility::Inherited | Visibility::InvisibleFake | Visibility::Unknown => {
            return Err(Error::invariant(format!("unsupported visibility {:?} for {}", visibility, owner)));
        }
    };

    match modality {
        Modality::Abstract | Modality::Sealed => flags |= ACC_ABSTRACT,
        Modality::Final => {
            let suppressed = matches!(target, FlagTarget::Constructor | FlagTarget::Class(ClassKind::Enum));
            if !suppressed {
                flags |= ACC_FINAL;
            }
        }
        Modality::Open => {
            if visibility == Visibility::Private {
                return Err(Error::invariant(format!("{} cannot be both open and private", owner)));
            }
        }
    }

    Ok(flags)
}
