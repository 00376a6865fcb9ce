//! Method body lowering
//!
//! Called once per method member while its class is open on the writer.
//! The default implementation does not select instructions; it packages the
//! instructions already attached to the declaration.

use super::descriptor::{method_descriptor, TypeParamScope};
use super::flag::access_flags::ACC_ABSTRACT;
use super::flag::method_flags;
use super::naming::BinaryClassName;
use super::signature::method_signature;
use super::writer::{ClassArtifactWriter, MethodEntry};
use crate::consts::CONSTRUCTOR_METHOD_NAME;
use crate::decl::{MethodDeclaration, TypeRef};
use crate::error::{Error, Result};

pub trait MethodBodyLowering: Send + Sync {
    /// Emit one complete method entry for `method` into the open class `owner`
    fn lower_method(
        &self,
        method: &MethodDeclaration,
        owner: &BinaryClassName,
        scope: &TypeParamScope<'_>,
        writer: &mut dyn ClassArtifactWriter,
    ) -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultMethodLowering;

impl MethodBodyLowering for DefaultMethodLowering {
    fn lower_method(
        &self,
        method: &MethodDeclaration,
        owner: &BinaryClassName,
        scope: &TypeParamScope<'_>,
        writer: &mut dyn ClassArtifactWriter,
    ) -> Result<()> {
        let access_flags = method_flags(method)?;
        let method_scope = scope.child(&method.type_params);

        let params: Vec<TypeRef> = method.parameters.iter().map(|p| p.type_ref.clone()).collect();
        let descriptor = method_descriptor(&params, &method.return_type, &method_scope)?;

        let is_abstract = access_flags.contains(ACC_ABSTRACT);
        let code = match (&method.body, is_abstract) {
            (None, true) => None,
            (Some(body), false) => Some(body.clone()),
            (Some(_), true) => {
                return Err(Error::invariant(format!("abstract method {}.{} has a body", owner, method.name)));
            }
            (None, false) => {
                return Err(Error::invariant(format!("method {}.{} has no body", owner, method.name)));
            }
        };

        // constructors keep their source name in the tree
        let name = if method.is_constructor() { CONSTRUCTOR_METHOD_NAME.to_string() } else { method.name.clone() };

        writer.add_method(MethodEntry {
            access_flags,
            name,
            descriptor,
            signature: method_signature(method),
            code,
        })
    }
}
