use crate::codegen::class::ClassFile;
use crate::codegen::constpool::Constant;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConstantPoolVerifyError {
    #[error("Invalid constant pool index {0}")]
    InvalidConstantPoolIndex(u16),
    #[error("Invalid constant pool index type {0}")]
    InvalidConstantPoolIndexType(u16),
    #[error("Long or Double at {0} is not followed by an unusable slot")]
    MissingWideSlot(u16),
}

pub type Result<T> = std::result::Result<T, ConstantPoolVerifyError>;

/// Verify the ClassFile ConstantPool
pub fn verify(class_file: &ClassFile) -> Result<()> {
    let pool = &class_file.constant_pool;
    for (i, constant) in pool.constants.iter().enumerate() {
        let index = (i + 1) as u16;
        match constant {
            Constant::Class(name_index) | Constant::String(name_index) => match pool.get(*name_index) {
                Some(Constant::Utf8(_)) => {}
                None => return Err(ConstantPoolVerifyError::InvalidConstantPoolIndex(index)),
                _ => return Err(ConstantPoolVerifyError::InvalidConstantPoolIndexType(index)),
            },
            Constant::Long(_) | Constant::Double(_) => {
                if pool.get(index + 1) != Some(&Constant::Unusable) {
                    return Err(ConstantPoolVerifyError::MissingWideSlot(index));
                }
            }
            Constant::Utf8(_) | Constant::Integer(_) | Constant::Float(_) | Constant::Unusable => {}
        }
    }
    Ok(())
}

/// Check that `index` points at a Utf8 entry
pub(crate) fn expect_utf8(class_file: &ClassFile, index: u16) -> Result<&str> {
    match class_file.constant_pool.get(index) {
        Some(Constant::Utf8(s)) => Ok(s),
        None => Err(ConstantPoolVerifyError::InvalidConstantPoolIndex(index)),
        _ => Err(ConstantPoolVerifyError::InvalidConstantPoolIndexType(index)),
    }
}
