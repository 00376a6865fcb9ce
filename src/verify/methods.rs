use std::collections::HashSet;

use crate::codegen::attribute::AttributeInfo;
use crate::codegen::class::ClassFile;
use crate::codegen::flag::access_flags;
use crate::codegen::method::MethodInfo;
use super::constant_pool::{expect_utf8, ConstantPoolVerifyError};
use super::method_access_flags::{self, MethodAccessFlagsError};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MethodVerifyError {
    #[error(transparent)]
    ConstantPool(#[from] ConstantPoolVerifyError),
    #[error("Method {method}: {source}")]
    AccessFlags { method: String, source: MethodAccessFlagsError },
    #[error("Method {0} is declared more than once")]
    Duplicate(String),
    #[error("Abstract method {0} has a Code attribute")]
    AbstractWithCode(String),
    #[error("Method {0} has no Code attribute")]
    MissingCode(String),
    #[error("Method {0} has an empty Code attribute")]
    EmptyCode(String),
    #[error("Attribute {attribute} is not allowed on method {method}")]
    InvalidMethodAttribute { method: String, attribute: String },
}

pub type Result<T> = std::result::Result<T, MethodVerifyError>;

pub fn verify(class_file: &ClassFile) -> Result<()> {
    let mut seen = HashSet::new();
    for method in &class_file.methods {
        let name = expect_utf8(class_file, method.name_index)?;
        let descriptor = expect_utf8(class_file, method.descriptor_index)?;
        if !seen.insert((name, descriptor)) {
            return Err(MethodVerifyError::Duplicate(format!("{}{}", name, descriptor)));
        }
        method_access_flags::verify(class_file, method, name)
            .map_err(|source| MethodVerifyError::AccessFlags { method: name.to_string(), source })?;
        verify_attributes(class_file, name, method)?;
    }
    Ok(())
}

fn verify_attributes(class_file: &ClassFile, name: &str, method: &MethodInfo) -> Result<()> {
    let mut code_count = 0;
    for attribute in &method.attributes {
        match &attribute.info {
            AttributeInfo::Code(code) => {
                code_count += 1;
                if code.code.is_empty() {
                    return Err(MethodVerifyError::EmptyCode(name.to_string()));
                }
            }
            AttributeInfo::Signature { signature_index } => {
                expect_utf8(class_file, *signature_index)?;
            }
            other @ (AttributeInfo::ConstantValue { .. } | AttributeInfo::SourceFile { .. }) => {
                return Err(MethodVerifyError::InvalidMethodAttribute {
                    method: name.to_string(),
                    attribute: other.name().to_string(),
                });
            }
        }
    }
    if code_count > 1 {
        return Err(MethodVerifyError::InvalidMethodAttribute { method: name.to_string(), attribute: "Code".to_string() });
    }

    let is_abstract = method.access_flags & access_flags::ACC_ABSTRACT != 0;
    let is_native = method.access_flags & access_flags::ACC_NATIVE != 0;
    match (is_abstract || is_native, code_count == 1) {
        (true, true) => Err(MethodVerifyError::AbstractWithCode(name.to_string())),
        (false, false) => Err(MethodVerifyError::MissingCode(name.to_string())),
        _ => Ok(()),
    }
}
