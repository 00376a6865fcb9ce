//! Structural verification of generated class files
//!
//! Runs before class files are written to disk and catches combinations the
//! JVM would reject at load time: illegal flag sets, dangling or mistyped
//! constant pool references, misplaced attributes, and a version that does
//! not match the configured target.

mod verifier;
pub mod class_access_flags;
pub mod constant_pool;
pub mod fields;
pub mod interfaces;
pub mod method_access_flags;
pub mod methods;

pub use verifier::{verify, VerifyError, VerifyResult};

use crate::codegen::builder::GeneratedClass;
use crate::error::{Error, Result};

/// Verify a finished class against the expected class file version
pub fn verify_generated(class: &GeneratedClass, expected_major: u16) -> Result<()> {
    verify(&class.class_file, expected_major).map_err(|e| Error::Verify {
        class: class.name.clone(),
        message: e.to_string(),
    })
}
