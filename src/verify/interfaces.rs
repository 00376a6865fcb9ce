use std::collections::HashSet;

use crate::codegen::class::ClassFile;
use crate::codegen::constpool::Constant;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum InterfacesVerifyError {
    #[error("Invalid constant pool index {0}")]
    InvalidConstantPoolIndex(u16),
    #[error("Invalid constant pool index type {0}")]
    InvalidConstantPoolIndexType(u16),
    #[error("Interface {0} listed more than once")]
    Duplicate(String),
}

pub type Result<T> = std::result::Result<T, InterfacesVerifyError>;

/// Verify the ClassFile interfaces
pub fn verify(class_file: &ClassFile) -> Result<()> {
    let mut seen = HashSet::new();
    for &interface in &class_file.interfaces {
        match class_file.constant_pool.get(interface) {
            Some(Constant::Class(_)) => {}
            None => return Err(InterfacesVerifyError::InvalidConstantPoolIndex(interface)),
            _ => return Err(InterfacesVerifyError::InvalidConstantPoolIndexType(interface)),
        }
        if !seen.insert(interface) {
            let name = class_file.constant_pool.class_name_at(interface).unwrap_or_default().to_string();
            return Err(InterfacesVerifyError::Duplicate(name));
        }
    }
    Ok(())
}
