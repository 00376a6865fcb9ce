use crate::codegen::attribute::AttributeInfo;
use crate::codegen::class::ClassFile;
use crate::codegen::field::FieldInfo;
use crate::codegen::flag::{access_flags, AccessFlags};
use crate::consts::JAVA_LANG_STRING;
use super::constant_pool::{expect_utf8, ConstantPoolVerifyError};
use crate::codegen::constpool::Constant;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FieldVerifyError {
    #[error(transparent)]
    ConstantPool(#[from] ConstantPoolVerifyError),
    #[error("Invalid access flags 0x{flags:04x} on field {field}")]
    InvalidFieldAccessFlags { field: String, flags: u16 },
    #[error("Attribute {attribute} is not allowed on field {field}")]
    InvalidFieldAttribute { field: String, attribute: String },
    #[error("Duplicate {attribute} attribute on field {field}")]
    DuplicateFieldAttribute { field: String, attribute: String },
    #[error("ConstantValue on non-static field {0}")]
    ConstantValueOnNonStatic(String),
    #[error("ConstantValue of field {field} does not match descriptor {descriptor}")]
    InvalidConstantValueKind { field: String, descriptor: String },
    #[error("Field {0} is declared more than once")]
    Duplicate(String),
}

pub type Result<T> = std::result::Result<T, FieldVerifyError>;

pub fn verify(class_file: &ClassFile) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for field in &class_file.fields {
        let name = expect_utf8(class_file, field.name_index)?;
        let descriptor = expect_utf8(class_file, field.descriptor_index)?;
        if !seen.insert((name, descriptor)) {
            return Err(FieldVerifyError::Duplicate(name.to_string()));
        }
        verify_access_flags(class_file, name, field.access_flags)?;
        verify_attributes(class_file, name, descriptor, field)?;
    }
    Ok(())
}

fn verify_access_flags(class_file: &ClassFile, name: &str, flags: u16) -> Result<()> {
    let invalid = || FieldVerifyError::InvalidFieldAccessFlags { field: name.to_string(), flags };

    if AccessFlags::from_bits(flags).visibility_count() > 1 {
        return Err(invalid());
    }

    if class_file.access_flags & access_flags::ACC_INTERFACE != 0 {
        let must = access_flags::ACC_PUBLIC | access_flags::ACC_STATIC | access_flags::ACC_FINAL;
        let illegal = access_flags::ACC_PRIVATE
            | access_flags::ACC_PROTECTED
            | access_flags::ACC_VOLATILE
            | access_flags::ACC_TRANSIENT
            | access_flags::ACC_ENUM;
        if flags & must != must || flags & illegal != 0 {
            return Err(invalid());
        }
    } else if flags & access_flags::ACC_FINAL != 0 && flags & access_flags::ACC_VOLATILE != 0 {
        return Err(invalid());
    }
    Ok(())
}

fn verify_attributes(class_file: &ClassFile, name: &str, descriptor: &str, field: &FieldInfo) -> Result<()> {
    let mut has_constant_value = false;
    let mut has_signature = false;

    for attribute in &field.attributes {
        match &attribute.info {
            AttributeInfo::ConstantValue { value_index } => {
                if has_constant_value {
                    return Err(FieldVerifyError::DuplicateFieldAttribute {
                        field: name.to_string(),
                        attribute: "ConstantValue".to_string(),
                    });
                }
                has_constant_value = true;
                if field.access_flags & access_flags::ACC_STATIC == 0 {
                    return Err(FieldVerifyError::ConstantValueOnNonStatic(name.to_string()));
                }
                let constant = class_file.constant_pool.get(*value_index);
                if !constant_matches_descriptor(constant, descriptor) {
                    return Err(FieldVerifyError::InvalidConstantValueKind {
                        field: name.to_string(),
                        descriptor: descriptor.to_string(),
                    });
                }
            }
            AttributeInfo::Signature { signature_index } => {
                if has_signature {
                    return Err(FieldVerifyError::DuplicateFieldAttribute {
                        field: name.to_string(),
                        attribute: "Signature".to_string(),
                    });
                }
                has_signature = true;
                expect_utf8(class_file, *signature_index)?;
            }
            other @ (AttributeInfo::Code(_) | AttributeInfo::SourceFile { .. }) => {
                return Err(FieldVerifyError::InvalidFieldAttribute {
                    field: name.to_string(),
                    attribute: other.name().to_string(),
                });
            }
        }
    }
    Ok(())
}

// JVMS 4.7.2: the constant kind is fixed by the field descriptor
fn constant_matches_descriptor(constant: Option<&Constant>, descriptor: &str) -> bool {
    match constant {
        Some(Constant::Integer(_)) => matches!(descriptor, "I" | "S" | "C" | "B" | "Z"),
        Some(Constant::Long(_)) => descriptor == "J",
        Some(Constant::Float(_)) => descriptor == "F",
        Some(Constant::Double(_)) => descriptor == "D",
        Some(Constant::String(_)) => descriptor.strip_prefix('L').and_then(|d| d.strip_suffix(';')) == Some(JAVA_LANG_STRING),
        _ => false,
    }
}
