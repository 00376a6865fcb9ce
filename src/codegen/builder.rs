//! Class file builder: the writer implementation producing `ClassFile`s

use std::path::PathBuf;

use super::attribute::{AttributeInfo, CodeAttribute, NamedAttribute};
use super::class::ClassFile;
use super::constpool::ConstantPool;
use super::field::FieldInfo;
use super::method::MethodInfo;
use super::writer::{ClassArtifactWriter, ClassHeader, ClassfileWritable, FieldEntry, MethodEntry};
use crate::decl::ConstantValue;
use crate::error::{Error, Result};

/// A finished class file and its binary name
#[derive(Debug)]
pub struct GeneratedClass {
    pub name: String,
    pub class_file: ClassFile,
}

impl GeneratedClass {
    pub fn to_bytes(&self) -> Vec<u8> {
        self.class_file.to_classfile_bytes()
    }

    /// `<binary name>.class`, package segments becoming directories
    pub fn relative_path(&self) -> PathBuf {
        let mut path: PathBuf = self.name.split('/').collect();
        path.set_extension("class");
        path
    }
}

/// Builds class files from writer commands.
///
/// Classes opened by `begin_class` are kept on a stack so a nested class can
/// be emitted completely while its outer class is still open. Classes are
/// collected in the order they are closed.
#[derive(Debug, Default)]
pub struct ClassFileBuilder {
    in_progress: Vec<ClassFile>,
    finished: Vec<GeneratedClass>,
}

impl ClassFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of classes begun but not yet ended
    pub fn depth(&self) -> usize {
        self.in_progress.len()
    }

    /// Discard classes left open by an aborted lowering
    pub fn abandon_open_classes(&mut self) -> usize {
        let open = self.in_progress.len();
        self.in_progress.clear();
        open
    }

    /// Consume the builder, failing if a class was left open
    pub fn finish(self) -> Result<Vec<GeneratedClass>> {
        if let Some(open) = self.in_progress.last() {
            let name = open.name().unwrap_or("<unnamed>").to_string();
            return Err(Error::writer(format!("class {} was begun but never ended", name)));
        }
        Ok(self.finished)
    }

    fn current(&mut self, command: &str) -> Result<&mut ClassFile> {
        self.in_progress
            .last_mut()
            .ok_or_else(|| Error::writer(format!("{} issued outside of begin_class/end_class", command)))
    }
}

impl ClassArtifactWriter for ClassFileBuilder {
    fn begin_class(&mut self, header: ClassHeader) -> Result<()> {
        let mut class = ClassFile::new();
        class.major_version = header.version;
        class.access_flags = header.access_flags.bits();

        let pool = &mut class.constant_pool;
        class.this_class = pool.add_class(&header.name)?;
        class.super_class = pool.add_class(&header.super_name)?;
        for interface in &header.interfaces {
            let idx = pool.add_class(interface)?;
            push_counted(&mut class.interfaces, idx, "interfaces")?;
        }
        if let Some(signature) = &header.signature {
            let attr = signature_attribute(pool, signature)?;
            push_counted(&mut class.attributes, attr, "class attributes")?;
        }
        if let Some(source_file) = &header.source_file {
            let name_index = pool.add_utf8("SourceFile")?;
            let sourcefile_index = pool.add_utf8(source_file)?;
            let attr = NamedAttribute::new(name_index, AttributeInfo::SourceFile { sourcefile_index });
            push_counted(&mut class.attributes, attr, "class attributes")?;
        }

        log::debug!("begin class {} (depth {})", header.name, self.in_progress.len());
        self.in_progress.push(class);
        Ok(())
    }

    fn add_field(&mut self, field: FieldEntry) -> Result<()> {
        let class = self.current("add_field")?;
        let pool = &mut class.constant_pool;

        let name_index = pool.add_utf8(&field.name)?;
        let descriptor_index = pool.add_utf8(&field.descriptor)?;
        let mut info = FieldInfo::new(field.access_flags.bits(), name_index, descriptor_index);

        if let Some(value) = &field.constant_value {
            let attr_name = pool.add_utf8("ConstantValue")?;
            let value_index = constant_value_index(pool, value)?;
            let attr = NamedAttribute::new(attr_name, AttributeInfo::ConstantValue { value_index });
            push_counted(&mut info.attributes, attr, "field attributes")?;
        }
        if let Some(signature) = &field.signature {
            push_counted(&mut info.attributes, signature_attribute(pool, signature)?, "field attributes")?;
        }

        push_counted(&mut class.fields, info, "fields")
    }

    fn add_method(&mut self, method: MethodEntry) -> Result<()> {
        let class = self.current("add_method")?;
        let pool = &mut class.constant_pool;

        let name_index = pool.add_utf8(&method.name)?;
        let descriptor_index = pool.add_utf8(&method.descriptor)?;
        let mut info = MethodInfo::new(method.access_flags.bits(), name_index, descriptor_index);

        if let Some(body) = method.code {
            let attr_name = pool.add_utf8("Code")?;
            let code = CodeAttribute::new(body.max_stack, body.max_locals, body.code);
            push_counted(&mut info.attributes, NamedAttribute::new(attr_name, AttributeInfo::Code(code)), "method attributes")?;
        }
        if let Some(signature) = &method.signature {
            push_counted(&mut info.attributes, signature_attribute(pool, signature)?, "method attributes")?;
        }

        push_counted(&mut class.methods, info, "methods")
    }

    fn end_class(&mut self) -> Result<()> {
        let class = self
            .in_progress
            .pop()
            .ok_or_else(|| Error::writer("end_class issued without a matching begin_class"))?;
        let name = class
            .name()
            .ok_or_else(|| Error::writer("class being ended has no name"))?
            .to_string();
        log::debug!("end class {}", name);
        self.finished.push(GeneratedClass { name, class_file: class });
        Ok(())
    }
}

/// Push onto a table whose length is written as a u16 count
fn push_counted<T>(items: &mut Vec<T>, item: T, what: &str) -> Result<()> {
    if items.len() >= u16::MAX as usize {
        return Err(Error::writer(format!("class file cannot hold more than {} {}", u16::MAX, what)));
    }
    items.push(item);
    Ok(())
}

fn signature_attribute(pool: &mut ConstantPool, signature: &str) -> Result<NamedAttribute> {
    let name_index = pool.add_utf8("Signature")?;
    let signature_index = pool.add_utf8(signature)?;
    Ok(NamedAttribute::new(name_index, AttributeInfo::Signature { signature_index }))
}

fn constant_value_index(pool: &mut ConstantPool, value: &ConstantValue) -> Result<u16> {
    match value {
        ConstantValue::Int(v) => pool.add_integer(*v),
        ConstantValue::Long(v) => pool.add_long(*v),
        ConstantValue::Float(v) => pool.add_float(*v),
        ConstantValue::Double(v) => pool.add_double(*v),
        ConstantValue::String(v) => pool.add_string(v),
    }
}
