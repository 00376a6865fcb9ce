//! Core classfile structures: ClassFile, FieldInfo, MethodInfo

use super::attribute::NamedAttribute;
use super::constpool::ConstantPool;
use super::field::FieldInfo;
use super::method::MethodInfo;
use crate::config::major_versions::JAVA_8;

/// Java class file magic number (0xCAFEBABE)
pub const MAGIC: u32 = 0xCAFEBABE;

#[derive(Debug)]
pub struct ClassFile {
    pub magic: u32,
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: ConstantPool,
    pub access_flags: u16,
    pub this_class: u16,
    pub super_class: u16,
    pub interfaces: Vec<u16>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub attributes: Vec<NamedAttribute>,
}

impl ClassFile {
    pub fn new() -> Self {
        Self {
            magic: MAGIC,
            minor_version: 0,
            major_version: JAVA_8,
            constant_pool: ConstantPool::new(),
            access_flags: 0,
            this_class: 0,
            super_class: 0,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Internal name of this class, if `this_class` resolves
    pub fn name(&self) -> Option<&str> {
        self.constant_pool.class_name_at(self.this_class)
    }

    pub fn super_name(&self) -> Option<&str> {
        self.constant_pool.class_name_at(self.super_class)
    }

    pub fn interface_names(&self) -> Vec<&str> {
        self.interfaces
            .iter()
            .filter_map(|&idx| self.constant_pool.class_name_at(idx))
            .collect()
    }

    pub fn field_named(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| self.constant_pool.utf8_at(f.name_index) == Some(name))
    }

    pub fn method_named(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| self.constant_pool.utf8_at(m.name_index) == Some(name))
    }
}

impl Default for ClassFile {
    fn default() -> Self {
        Self::new()
    }
}
