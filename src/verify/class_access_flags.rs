use crate::codegen::class::ClassFile;
use crate::codegen::flag::{access_flags, AccessFlags};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ClassAccessFlagsError {
    #[error("Invalid class access flags: 0x{0:04x}")]
    Invalid(u16),
    #[error("Class access flags 0x{0:04x} set more than one visibility")]
    MultipleVisibilities(u16),
}

pub type Result<T> = std::result::Result<T, ClassAccessFlagsError>;

/// Verify the ClassFile access flags
pub fn verify(class_file: &ClassFile, class_name: Option<&str>) -> Result<()> {
    let flags = class_file.access_flags;
    let has = |bit: u16| flags & bit != 0;

    if AccessFlags::from_bits(flags).visibility_count() > 1 {
        return Err(ClassAccessFlagsError::MultipleVisibilities(flags));
    }

    // @interface must also be interface
    if has(access_flags::ACC_ANNOTATION) && !has(access_flags::ACC_INTERFACE) {
        return Err(ClassAccessFlagsError::Invalid(flags));
    }

    if has(access_flags::ACC_INTERFACE) {
        // package-info is the only interface allowed to be concrete
        if !has(access_flags::ACC_ABSTRACT) {
            let is_package_info = class_name.map(|n| n.rsplit('/').next() == Some("package-info")).unwrap_or(false);
            if !is_package_info {
                return Err(ClassAccessFlagsError::Invalid(flags));
            }
        }
        if has(access_flags::ACC_FINAL) || has(access_flags::ACC_SUPER) || has(access_flags::ACC_ENUM) || has(access_flags::ACC_MODULE) {
            return Err(ClassAccessFlagsError::Invalid(flags));
        }
    } else if has(access_flags::ACC_FINAL) && has(access_flags::ACC_ABSTRACT) {
        return Err(ClassAccessFlagsError::Invalid(flags));
    }

    Ok(())
}
