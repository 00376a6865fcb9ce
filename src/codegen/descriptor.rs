//! Utilities to build method/field descriptors
//!
//! Descriptors use erased types: a type parameter erases to the erasure of
//! its first bound, or `java/lang/Object` when it has none.

use crate::consts::JAVA_LANG_OBJECT;
use crate::decl::{PrimitiveType, TypeParam, TypeRef};
use crate::error::{Error, Result};

// Bound chains longer than this are treated as cyclic
const MAX_ERASURE_DEPTH: usize = 64;

/// Type parameters visible at a point of the declaration tree, innermost first
#[derive(Debug, Clone, Copy)]
pub struct TypeParamScope<'a> {
    params: &'a [TypeParam],
    parent: Option<&'a TypeParamScope<'a>>,
}

impl<'a> TypeParamScope<'a> {
    pub fn root() -> TypeParamScope<'static> {
        TypeParamScope { params: &[], parent: None }
    }

    pub fn new(params: &'a [TypeParam]) -> Self {
        Self { params, parent: None }
    }

    pub fn child(&'a self, params: &'a [TypeParam]) -> TypeParamScope<'a> {
        TypeParamScope { params, parent: Some(self) }
    }

    pub fn lookup(&self, name: &str) -> Option<&'a TypeParam> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .or_else(|| self.parent.and_then(|parent| parent.lookup(name)))
    }
}

pub fn primitive_descriptor(primitive: PrimitiveType) -> char {
    match primitive {
        PrimitiveType::Boolean => 'Z',
        PrimitiveType::Byte => 'B',
        PrimitiveType::Char => 'C',
        PrimitiveType::Short => 'S',
        PrimitiveType::Int => 'I',
        PrimitiveType::Long => 'J',
        PrimitiveType::Float => 'F',
        PrimitiveType::Double => 'D',
        PrimitiveType::Void => 'V',
    }
}

/// Descriptor of any type, `void` included
pub fn type_to_descriptor(ty: &TypeRef, scope: &TypeParamScope<'_>) -> Result<String> {
    let mut desc = String::new();
    push_descriptor(&mut desc, ty, scope, 0)?;
    Ok(desc)
}

/// Descriptor of a field type; `void` and arrays of `void` are rejected
pub fn field_descriptor(ty: &TypeRef, scope: &TypeParamScope<'_>) -> Result<String> {
    if contains_void(ty) {
        return Err(Error::invariant("field type cannot be void"));
    }
    type_to_descriptor(ty, scope)
}

pub fn method_descriptor(params: &[TypeRef], ret: &TypeRef, scope: &TypeParamScope<'_>) -> Result<String> {
    let mut d = String::new();
    d.push('(');
    for p in params {
        if contains_void(p) {
            return Err(Error::invariant("parameter type cannot be void"));
        }
        push_descriptor(&mut d, p, scope, 0)?;
    }
    d.push(')');
    if matches!(ret, TypeRef::Array(_)) && contains_void(ret) {
        return Err(Error::invariant("array of void is not a type"));
    }
    push_descriptor(&mut d, ret, scope, 0)?;
    Ok(d)
}

fn contains_void(ty: &TypeRef) -> bool {
    match ty {
        TypeRef::Primitive(PrimitiveType::Void) => true,
        TypeRef::Array(element) => contains_void(element),
        _ => false,
    }
}

fn push_descriptor(desc: &mut String, ty: &TypeRef, scope: &TypeParamScope<'_>, depth: usize) -> Result<()> {
    if depth > MAX_ERASURE_DEPTH {
        return Err(Error::invariant("cyclic type parameter bounds"));
    }
    match ty {
        TypeRef::Primitive(p) => desc.push(primitive_descriptor(*p)),
        TypeRef::Class(ct) => {
            desc.push('L');
            desc.push_str(&ct.class_id.binary_name());
            desc.push(';');
        }
        TypeRef::Array(element) => {
            desc.push('[');
            push_descriptor(desc, element, scope, depth)?;
        }
        TypeRef::TypeParameter(name) => {
            let param = scope
                .lookup(name)
                .ok_or_else(|| Error::invariant(format!("type parameter '{}' is not in scope", name)))?;
            match param.bounds.first() {
                Some(bound) => push_descriptor(desc, bound, scope, depth + 1)?,
                None => {
                    desc.push('L');
                    desc.push_str(JAVA_LANG_OBJECT);
                    desc.push(';');
                }
            }
        }
    }
    Ok(())
}
