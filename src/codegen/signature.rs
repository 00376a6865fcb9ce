//! JVM Signature attribute generation for generic types
//!
//! Signatures are only produced when the erased descriptor loses
//! information: a declaration with type parameters, or a type that mentions
//! type arguments or type variables.

use crate::decl::{ClassType, MethodDeclaration, TypeArg, TypeParam, TypeRef};
use super::descriptor::primitive_descriptor;

/// Generate a JVM signature string for a type reference
pub fn type_ref_to_signature(type_ref: &TypeRef) -> String {
    let mut signature = String::new();
    push_type(&mut signature, type_ref);
    signature
}

fn push_type(signature: &mut String, type_ref: &TypeRef) {
    match type_ref {
        TypeRef::Primitive(p) => signature.push(primitive_descriptor(*p)),
        TypeRef::Class(ct) => push_class_type(signature, ct),
        TypeRef::TypeParameter(name) => {
            signature.push('T');
            signature.push_str(name);
            signature.push(';');
        }
        TypeRef::Array(element) => {
            // Array dimensions come before the element: [LType<Args>;
            signature.push('[');
            push_type(signature, element);
        }
    }
}

fn push_class_type(signature: &mut String, class_type: &ClassType) {
    signature.push('L');
    signature.push_str(&class_type.class_id.binary_name());
    if !class_type.args.is_empty() {
        signature.push('<');
        for arg in &class_type.args {
            match arg {
                TypeArg::Type(t) => push_type(signature, t),
                TypeArg::Star => signature.push('*'),
                TypeArg::Extends(t) => {
                    signature.push('+');
                    push_type(signature, t);
                }
                TypeArg::Super(t) => {
                    signature.push('-');
                    push_type(signature, t);
                }
            }
        }
        signature.push('>');
    }
    signature.push(';');
}

/// `<T:Ljava/lang/Object;U::Ljava/lang/Comparable<TU;>;>`
fn push_type_params(signature: &mut String, params: &[TypeParam]) {
    if params.is_empty() {
        return;
    }
    signature.push('<');
    for param in params {
        signature.push_str(&param.name);
        match param.bounds.split_first() {
            None => signature.push_str(":Ljava/lang/Object;"),
            Some((first, rest)) => {
                // An interface first bound leaves the class bound empty
                let first_is_interface = matches!(first, TypeRef::Class(ct) if ct.is_interface);
                signature.push(':');
                if first_is_interface {
                    signature.push(':');
                }
                push_type(signature, first);
                for bound in rest {
                    signature.push(':');
                    push_type(signature, bound);
                }
            }
        }
    }
    signature.push('>');
}

/// Class signature, or None when the class needs none
pub fn class_signature(type_params: &[TypeParam], superclass: &ClassType, interfaces: &[ClassType]) -> Option<String> {
    let generic = !type_params.is_empty() || superclass.is_generic() || interfaces.iter().any(ClassType::is_generic);
    if !generic {
        return None;
    }
    let mut signature = String::new();
    push_type_params(&mut signature, type_params);
    push_class_type(&mut signature, superclass);
    for interface in interfaces {
        push_class_type(&mut signature, interface);
    }
    Some(signature)
}

/// Field signature, or None for types the descriptor fully describes
pub fn field_signature(type_ref: &TypeRef) -> Option<String> {
    if type_ref.needs_signature() {
        Some(type_ref_to_signature(type_ref))
    } else {
        None
    }
}

/// Method signature, or None when the descriptor fully describes the method
pub fn method_signature(method: &MethodDeclaration) -> Option<String> {
    let generic = !method.type_params.is_empty()
        || method.return_type.needs_signature()
        || method.parameters.iter().any(|p| p.type_ref.needs_signature());
    if !generic {
        return None;
    }
    let mut signature = String::new();
    push_type_params(&mut signature, &method.type_params);
    signature.push('(');
    for param in &method.parameters {
        push_type(&mut signature, &param.type_ref);
    }
    signature.push(')');
    push_type(&mut signature, &method.return_type);
    Some(signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{ClassId, PrimitiveType, ValueParameter};

    fn object() -> ClassType {
        ClassType::new(ClassId::new("java.lang", "Object"))
    }

    fn comparable_of(arg: TypeRef) -> ClassType {
        ClassType::interface(ClassId::new("java.lang", "Comparable")).with_args(vec![TypeArg::Type(arg)])
    }

    #[test]
    fn test_plain_class_has_no_signature() {
        let runnable = ClassType::interface(ClassId::new("java.lang", "Runnable"));
        assert_eq!(class_signature(&[], &object(), &[runnable]), None);
    }

    #[test]
    fn test_generic_class_signature() {
        let params = vec![TypeParam::new("T")];
        let sig = class_signature(&params, &object(), &[comparable_of(TypeRef::TypeParameter("T".into()))]);
        assert_eq!(sig.as_deref(), Some("<T:Ljava/lang/Object;>Ljava/lang/Object;Ljava/lang/Comparable<TT;>;"));
    }

    #[test]
    fn test_interface_bound_leaves_class_bound_empty() {
        let bound = TypeRef::Class(comparable_of(TypeRef::TypeParameter("U".into())));
        let params = vec![TypeParam::bounded("U", vec![bound])];
        let sig = class_signature(&params, &object(), &[]).unwrap();
        assert_eq!(sig, "<U::Ljava/lang/Comparable<TU;>;>Ljava/lang/Object;");
    }

    #[test]
    fn test_generic_superclass_alone_triggers_signature() {
        let enum_super = ClassType::new(ClassId::new("java.lang", "Enum"))
            .with_args(vec![TypeArg::Type(TypeRef::class("p", "Color"))]);
        assert_eq!(class_signature(&[], &enum_super, &[]).as_deref(), Some("Ljava/lang/Enum<Lp/Color;>;"));
    }

    #[test]
    fn test_wildcards_and_arrays() {
        let list = TypeRef::Class(
            ClassType::interface(ClassId::new("java.util", "List"))
                .with_args(vec![TypeArg::Extends(TypeRef::class("java.lang", "Number"))]),
        );
        assert_eq!(field_signature(&TypeRef::array_of(list)).as_deref(), Some("[Ljava/util/List<+Ljava/lang/Number;>;"));

        let map = TypeRef::Class(
            ClassType::interface(ClassId::new("java.util", "Map")).with_args(vec![TypeArg::Star, TypeArg::Super(TypeRef::TypeParameter("K".into()))]),
        );
        assert_eq!(type_ref_to_signature(&map), "Ljava/util/Map<*-TK;>;");
        assert_eq!(field_signature(&TypeRef::Primitive(PrimitiveType::Int)), None);
    }

    #[test]
    fn test_method_signature() {
        let method = MethodDeclaration::new("first")
            .with_type_param(TypeParam::new("E"))
            .with_parameter(ValueParameter::new("items", TypeRef::array_of(TypeRef::TypeParameter("E".into()))))
            .with_return_type(TypeRef::TypeParameter("E".into()));
        assert_eq!(method_signature(&method).as_deref(), Some("<E:Ljava/lang/Object;>([TE;)TE;"));

        let plain = MethodDeclaration::new("run");
        assert_eq!(method_signature(&plain), None);
    }
}
