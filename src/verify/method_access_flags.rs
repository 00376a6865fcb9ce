use crate::codegen::class::ClassFile;
use crate::codegen::flag::{access_flags, AccessFlags};
use crate::codegen::method::MethodInfo;
use crate::config::major_versions::JAVA_8;
use crate::consts::{CONSTRUCTOR_METHOD_NAME, STATIC_INITIALIZER_METHOD_NAME};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MethodAccessFlagsError {
    #[error("Invalid method access flags: 0x{0:04x}")]
    Invalid(u16),
}

pub type Result<T> = std::result::Result<T, MethodAccessFlagsError>;

/// Verify method access flags
pub fn verify(class_file: &ClassFile, method: &MethodInfo, name: &str) -> Result<()> {
    let flags = method.access_flags;
    let has = |bit: u16| flags & bit != 0;
    let invalid = Err(MethodAccessFlagsError::Invalid(flags));

    if AccessFlags::from_bits(flags).visibility_count() > 1 {
        return invalid;
    }

    if name == STATIC_INITIALIZER_METHOD_NAME {
        return if has(access_flags::ACC_STATIC) { Ok(()) } else { invalid };
    }

    let class_is_interface = class_file.access_flags & access_flags::ACC_INTERFACE != 0;
    if class_is_interface {
        if has(access_flags::ACC_PROTECTED)
            || has(access_flags::ACC_FINAL)
            || has(access_flags::ACC_SYNCHRONIZED)
            || has(access_flags::ACC_NATIVE)
        {
            return invalid;
        }
        // interfaces gained default, static and private methods in Java 8
        if class_file.major_version < JAVA_8 && !(has(access_flags::ACC_PUBLIC) && has(access_flags::ACC_ABSTRACT)) {
            return invalid;
        }
    }

    if name == CONSTRUCTOR_METHOD_NAME
        && (has(access_flags::ACC_STATIC)
            || has(access_flags::ACC_FINAL)
            || has(access_flags::ACC_ABSTRACT)
            || class_is_interface)
    {
        return invalid;
    }

    if has(access_flags::ACC_ABSTRACT)
        && (has(access_flags::ACC_PRIVATE)
            || has(access_flags::ACC_STATIC)
            || has(access_flags::ACC_FINAL)
            || has(access_flags::ACC_SYNCHRONIZED)
            || has(access_flags::ACC_NATIVE)
            || has(access_flags::ACC_STRICT))
    {
        return invalid;
    }

    Ok(())
}
