//! Class artifact writer protocol and classfile serialization
//!
//! The lowering engine talks to a [`ClassArtifactWriter`] through four
//! ordered commands. For one class the order is `begin_class`, then any
//! number of `add_field`/`add_method`, then `end_class`. A nested class's
//! complete `begin_class`..`end_class` block may appear between its parent's
//! `begin_class` and `end_class`.

use std::fmt;
use std::io::Write;

use serde::Serialize;

use super::class::ClassFile;
use super::constpool::ConstantPool;
use super::flag::AccessFlags;
use crate::decl::{ConstantValue, MethodBody};
use crate::error::Result;

/// Arguments of `begin_class`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassHeader {
    pub version: u16,
    pub access_flags: AccessFlags,
    pub name: String,
    pub signature: Option<String>,
    pub super_name: String,
    pub interfaces: Vec<String>,
    /// Set only when debug information is requested
    pub source_file: Option<String>,
}

/// Arguments of `add_field`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldEntry {
    pub access_flags: AccessFlags,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    pub constant_value: Option<ConstantValue>,
}

/// Arguments of `add_method`. `code` is absent for abstract methods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodEntry {
    pub access_flags: AccessFlags,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    pub code: Option<MethodBody>,
}

/// Receiver of structural commands produced by the lowering engine
pub trait ClassArtifactWriter {
    fn begin_class(&mut self, header: ClassHeader) -> Result<()>;

    fn add_field(&mut self, field: FieldEntry) -> Result<()>;

    fn add_method(&mut self, method: MethodEntry) -> Result<()>;

    fn end_class(&mut self) -> Result<()>;
}

impl fmt::Display for ClassHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} v{} extends {}", self.access_flags, self.name, self.version, self.super_name)?;
        if !self.interfaces.is_empty() {
            write!(f, " implements {}", self.interfaces.join(", "))?;
        }
        if let Some(signature) = &self.signature {
            write!(f, " signature {}", signature)?;
        }
        if let Some(source_file) = &self.source_file {
            write!(f, " source {}", source_file)?;
        }
        Ok(())
    }
}

impl fmt::Display for FieldEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.access_flags, self.name, self.descriptor)?;
        if let Some(signature) = &self.signature {
            write!(f, " signature {}", signature)?;
        }
        if let Some(value) = &self.constant_value {
            write!(f, " = {:?}", value)?;
        }
        Ok(())
    }
}

impl fmt::Display for MethodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}{}", self.access_flags, self.name, self.descriptor)?;
        if let Some(signature) = &self.signature {
            write!(f, " signature {}", signature)?;
        }
        match &self.code {
            Some(body) => write!(f, " code[{}] stack={} locals={}", body.code.len(), body.max_stack, body.max_locals),
            None => write!(f, " no code"),
        }
    }
}

/// An object which can be written into a classfile.
pub trait ClassfileWritable {
    /// Writes the bytes of this object into the given buffer.
    fn write_to_classfile<W: Write>(&self, buffer: &mut W) -> std::io::Result<()>;

    /// Writes the bytes of this object into a newly created buffer.
    fn to_classfile_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        // writing into a Vec cannot fail
        let _ = self.write_to_classfile(&mut buffer);
        buffer
    }
}

impl ClassfileWritable for ClassFile {
    fn write_to_classfile<W: Write>(&self, buffer: &mut W) -> std::io::Result<()> {
        buffer.write_all(&self.magic.to_be_bytes())?;
        buffer.write_all(&self.minor_version.to_be_bytes())?;
        buffer.write_all(&self.major_version.to_be_bytes())?;

        self.constant_pool.write_to_classfile(buffer)?;

        buffer.write_all(&self.access_flags.to_be_bytes())?;
        buffer.write_all(&self.this_class.to_be_bytes())?;
        buffer.write_all(&self.super_class.to_be_bytes())?;

        // ClassFileBuilder keeps every table within u16 counts
        buffer.write_all(&(self.interfaces.len() as u16).to_be_bytes())?;
        for interface in &self.interfaces {
            buffer.write_all(&interface.to_be_bytes())?;
        }

        buffer.write_all(&(self.fields.len() as u16).to_be_bytes())?;
        for field in &self.fields {
            buffer.write_all(&field.to_bytes())?;
        }

        buffer.write_all(&(self.methods.len() as u16).to_be_bytes())?;
        for method in &self.methods {
            buffer.write_all(&method.to_bytes())?;
        }

        buffer.write_all(&(self.attributes.len() as u16).to_be_bytes())?;
        for attribute in &self.attributes {
            buffer.write_all(&attribute.to_bytes())?;
        }
        Ok(())
    }
}

impl ClassfileWritable for ConstantPool {
    fn write_to_classfile<W: Write>(&self, buffer: &mut W) -> std::io::Result<()> {
        // constant_pool_count is one more than the number of slots
        buffer.write_all(&((self.len() + 1) as u16).to_be_bytes())?;
        for constant in &self.constants {
            buffer.write_all(&constant.to_bytes())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::flag::access_flags::*;

    #[test]
    fn test_empty_pool_count() {
        let pool = ConstantPool::new();
        assert_eq!(pool.to_classfile_bytes(), vec![0, 1]);
    }

    #[test]
    fn test_wide_constant_counts_two_slots() {
        let mut pool = ConstantPool::new();
        pool.add_long(1).unwrap();
        let bytes = pool.to_classfile_bytes();
        assert_eq!(&bytes[0..2], &[0, 3]);
        // tag + 8 value bytes, placeholder slot writes nothing
        assert_eq!(bytes.len(), 2 + 9);
    }

    #[test]
    fn test_class_file_header_bytes() {
        let mut class = ClassFile::new();
        class.this_class = class.constant_pool.add_class("p/A").unwrap();
        class.super_class = class.constant_pool.add_class("java/lang/Object").unwrap();
        class.access_flags = ACC_PUBLIC | ACC_SUPER;
        let bytes = class.to_classfile_bytes();
        assert_eq!(&bytes[0..4], &[0xCA, 0xFE, 0xBA, 0xBE]);
        assert_eq!(&bytes[6..8], &52u16.to_be_bytes());
        // trailing interfaces, fields, methods, attributes counts
        assert_eq!(&bytes[bytes.len() - 8..], &[0; 8]);
    }

    #[test]
    fn test_entry_display() {
        let header = ClassHeader {
            version: 52,
            access_flags: AccessFlags::from_bits(ACC_PUBLIC | ACC_SUPER),
            name: "p/A".to_string(),
            signature: None,
            super_name: "java/lang/Object".to_string(),
            interfaces: vec!["p/I".to_string()],
            source_file: None,
        };
        assert_eq!(header.to_string(), "0x0021 p/A v52 extends java/lang/Object implements p/I");

        let method = MethodEntry {
            access_flags: AccessFlags::from_bits(ACC_PUBLIC | ACC_ABSTRACT),
            name: "run".to_string(),
            descriptor: "()V".to_string(),
            signature: None,
            code: None,
        };
        assert_eq!(method.to_string(), "0x0401 run()V no code");
    }
}
