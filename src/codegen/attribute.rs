//! Attributes emitted on classes, fields and methods

/// An attribute together with the pool index of its name
#[derive(Debug, Clone, PartialEq)]
pub struct NamedAttribute {
    pub name_index: u16,
    pub info: AttributeInfo,
}

impl NamedAttribute {
    pub fn new(name_index: u16, info: AttributeInfo) -> Self {
        Self { name_index, info }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let payload = self.info.to_bytes();
        let mut bytes = Vec::with_capacity(6 + payload.len());
        bytes.extend_from_slice(&self.name_index.to_be_bytes());
        bytes.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&payload);
        bytes
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeInfo {
    Code(CodeAttribute),
    Signature { signature_index: u16 },
    ConstantValue { value_index: u16 },
    SourceFile { sourcefile_index: u16 },
}

impl AttributeInfo {
    /// Name the attribute is stored under
    pub fn name(&self) -> &'static str {
        match self {
            AttributeInfo::Code(_) => "Code",
            AttributeInfo::Signature { .. } => "Signature",
            AttributeInfo::ConstantValue { .. } => "ConstantValue",
            AttributeInfo::SourceFile { .. } => "SourceFile",
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            AttributeInfo::Code(code) => code.to_bytes(),
            AttributeInfo::Signature { signature_index } => signature_index.to_be_bytes().to_vec(),
            AttributeInfo::ConstantValue { value_index } => value_index.to_be_bytes().to_vec(),
            AttributeInfo::SourceFile { sourcefile_index } => sourcefile_index.to_be_bytes().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeAttribute {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
}

impl CodeAttribute {
    pub fn new(max_stack: u16, max_locals: u16, code: Vec<u8>) -> Self {
        Self { max_stack, max_locals, code }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&self.max_stack.to_be_bytes());
        bytes.extend_from_slice(&self.max_locals.to_be_bytes());
        bytes.extend_from_slice(&(self.code.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&self.code);
        // no exception table, no nested attributes
        bytes.extend_from_slice(&0u16.to_be_bytes());
        bytes.extend_from_slice(&0u16.to_be_bytes());
        bytes
    }
}
