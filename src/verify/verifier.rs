use crate::codegen::class::{ClassFile, MAGIC};
use crate::codegen::constpool::Constant;
use super::{class_access_flags, constant_pool, fields, interfaces, methods};

pub type VerifyResult<T> = Result<T, VerifyError>;

#[derive(thiserror::Error, Debug)]
pub enum VerifyError {
    #[error("Bad magic number 0x{0:08x}")]
    BadMagic(u32),
    #[error("Class file version {found} does not match target version {expected}")]
    VersionMismatch { found: u16, expected: u16 },
    #[error("this_class {0} is not a Class constant")]
    InvalidThisClass(u16),
    #[error("super_class {0} is not a Class constant")]
    InvalidSuperClass(u16),
    #[error(transparent)]
    ConstantPool(#[from] constant_pool::ConstantPoolVerifyError),
    #[error(transparent)]
    ClassAccessFlags(#[from] class_access_flags::ClassAccessFlagsError),
    #[error(transparent)]
    Interfaces(#[from] interfaces::InterfacesVerifyError),
    #[error(transparent)]
    Fields(#[from] fields::FieldVerifyError),
    #[error(transparent)]
    Methods(#[from] methods::MethodVerifyError),
}

/// Verify the ClassFile by orchestrating all sub-verifiers
pub fn verify(class_file: &ClassFile, expected_major: u16) -> VerifyResult<()> {
    if class_file.magic != MAGIC {
        return Err(VerifyError::BadMagic(class_file.magic));
    }
    if class_file.major_version != expected_major {
        return Err(VerifyError::VersionMismatch { found: class_file.major_version, expected: expected_major });
    }
    constant_pool::verify(class_file)?;
    class_access_flags::verify(class_file, class_file.name())?;
    verify_this_class(class_file)?;
    verify_super_class(class_file)?;
    interfaces::verify(class_file)?;
    fields::verify(class_file)?;
    methods::verify(class_file)?;
    Ok(())
}

fn verify_this_class(class_file: &ClassFile) -> VerifyResult<()> {
    match class_file.constant_pool.get(class_file.this_class) {
        Some(Constant::Class(_)) => Ok(()),
        _ => Err(VerifyError::InvalidThisClass(class_file.this_class)),
    }
}

// Every generated class has a superclass; only java/lang/Object may have none
fn verify_super_class(class_file: &ClassFile) -> VerifyResult<()> {
    match class_file.constant_pool.get(class_file.super_class) {
        Some(Constant::Class(_)) => Ok(()),
        _ => Err(VerifyError::InvalidSuperClass(class_file.super_class)),
    }
}
