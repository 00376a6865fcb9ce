//! Constant pool and constants for Java class files

use crate::error::{Error, Result};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class(u16),
    String(u16),
    /// Second slot taken by a Long or Double; never serialized
    Unusable,
}

pub(crate) mod constant_tags {
    pub const CONSTANT_UTF8: u8 = 1;
    pub const CONSTANT_INTEGER: u8 = 3;
    pub const CONSTANT_FLOAT: u8 = 4;
    pub const CONSTANT_LONG: u8 = 5;
    pub const CONSTANT_DOUBLE: u8 = 6;
    pub const CONSTANT_CLASS: u8 = 7;
    pub const CONSTANT_STRING: u8 = 8;
}

impl Constant {
    pub fn to_bytes(&self) -> Vec<u8> {
        use constant_tags::*;
        let mut bytes = Vec::new();
        match self {
            Constant::Utf8(value) => {
                bytes.push(CONSTANT_UTF8);
                // add_utf8 has already bounded the encoded length
                let encoded = modified_utf8(value);
                bytes.extend_from_slice(&(encoded.len() as u16).to_be_bytes());
                bytes.extend_from_slice(&encoded);
            }
            Constant::Integer(value) => {
                bytes.push(CONSTANT_INTEGER);
                bytes.extend_from_slice(&value.to_be_bytes());
            }
            Constant::Float(value) => {
                bytes.push(CONSTANT_FLOAT);
                bytes.extend_from_slice(&value.to_be_bytes());
            }
            Constant::Long(value) => {
                bytes.push(CONSTANT_LONG);
                bytes.extend_from_slice(&value.to_be_bytes());
            }
            Constant::Double(value) => {
                bytes.push(CONSTANT_DOUBLE);
                bytes.extend_from_slice(&value.to_be_bytes());
            }
            Constant::Class(name_index) => {
                bytes.push(CONSTANT_CLASS);
                bytes.extend_from_slice(&name_index.to_be_bytes());
            }
            Constant::String(string_index) => {
                bytes.push(CONSTANT_STRING);
                bytes.extend_from_slice(&string_index.to_be_bytes());
            }
            Constant::Unusable => {}
        }
        bytes
    }

    /// Whether the constant can back a ConstantValue attribute
    pub fn is_loadable_value(&self) -> bool {
        matches!(
            self,
            Constant::Integer(_) | Constant::Float(_) | Constant::Long(_) | Constant::Double(_) | Constant::String(_)
        )
    }
}

/// Encode a string the way class files store it: NUL as `C0 80`, and
/// supplementary characters as two 3-byte surrogates.
pub fn modified_utf8(value: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    for unit in value.encode_utf16() {
        match unit {
            0x0001..=0x007F => out.push(unit as u8),
            0x0000 | 0x0080..=0x07FF => {
                out.push(0xC0 | (unit >> 6) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                out.push(0xE0 | (unit >> 12) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
    out
}

// Hashable identity of a constant, floats keyed by their bits
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PoolKey {
    Utf8(String),
    Integer(i32),
    Float(u32),
    Long(i64),
    Double(u64),
    Class(u16),
    String(u16),
}

/// Constant pool with de-duplication. Indices are 1-based, as in the
/// class file; Long and Double entries take two slots.
#[derive(Debug, Default)]
pub struct ConstantPool {
    pub(crate) constants: Vec<Constant>,
    index: HashMap<PoolKey, u16>,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry at a 1-based index
    pub fn get(&self, index: u16) -> Option<&Constant> {
        (index as usize).checked_sub(1).and_then(|i| self.constants.get(i))
    }

    pub fn utf8_at(&self, index: u16) -> Option<&str> {
        match self.get(index) {
            Some(Constant::Utf8(s)) => Some(s),
            _ => None,
        }
    }

    /// Name referenced by the Class entry at `index`
    pub fn class_name_at(&self, index: u16) -> Option<&str> {
        match self.get(index) {
            Some(Constant::Class(name_index)) => self.utf8_at(*name_index),
            _ => None,
        }
    }

    /// Number of slots in use
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    fn insert(&mut self, key: PoolKey, constant: Constant) -> Result<u16> {
        if let Some(&existing) = self.index.get(&key) {
            return Ok(existing);
        }
        let wide = matches!(constant, Constant::Long(_) | Constant::Double(_));
        let needed = if wide { 2 } else { 1 };
        // constant_pool_count is a u16 and counts one past the last slot
        if self.constants.len() + needed > u16::MAX as usize - 1 {
            return Err(Error::writer("constant pool is out of space"));
        }
        self.constants.push(constant);
        let idx = self.constants.len() as u16;
        if wide {
            self.constants.push(Constant::Unusable);
        }
        self.index.insert(key, idx);
        Ok(idx)
    }

    pub fn add_utf8(&mut self, value: &str) -> Result<u16> {
        let encoded_len = modified_utf8(value).len();
        if encoded_len > u16::MAX as usize {
            return Err(Error::writer(format!("UTF8 constant of {} bytes is too long", encoded_len)));
        }
        self.insert(PoolKey::Utf8(value.to_string()), Constant::Utf8(value.to_string()))
    }

    pub fn add_class(&mut self, name: &str) -> Result<u16> {
        let name_index = self.add_utf8(name)?;
        self.insert(PoolKey::Class(name_index), Constant::Class(name_index))
    }

    pub fn add_string(&mut self, value: &str) -> Result<u16> {
        let utf8_index = self.add_utf8(value)?;
        self.insert(PoolKey::String(utf8_index), Constant::String(utf8_index))
    }

    pub fn add_integer(&mut self, value: i32) -> Result<u16> {
        self.insert(PoolKey::Integer(value), Constant::Integer(value))
    }

    pub fn add_float(&mut self, value: f32) -> Result<u16> {
        self.insert(PoolKey::Float(value.to_bits()), Constant::Float(value))
    }

    pub fn add_long(&mut self, value: i64) -> Result<u16> {
        self.insert(PoolKey::Long(value), Constant::Long(value))
    }

    pub fn add_double(&mut self, value: f64) -> Result<u16> {
        self.insert(PoolKey::Double(value.to_bits()), Constant::Double(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_one_based_and_deduplicated() {
        let mut pool = ConstantPool::new();
        let a = pool.add_utf8("Foo").unwrap();
        let b = pool.add_utf8("Foo").unwrap();
        assert_eq!(a, 1);
        assert_eq!(a, b);

        let class = pool.add_class("Foo").unwrap();
        assert_eq!(class, 2);
        assert_eq!(pool.class_name_at(class), Some("Foo"));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_wide_constants_take_two_slots() {
        let mut pool = ConstantPool::new();
        let long = pool.add_long(7).unwrap();
        let next = pool.add_integer(7).unwrap();
        assert_eq!(long, 1);
        assert_eq!(next, 3);
        assert_eq!(pool.get(2), Some(&Constant::Unusable));
        assert_eq!(pool.add_double(1.5).unwrap(), 4);
        assert_eq!(pool.add_integer(8).unwrap(), 6);
    }

    #[test]
    fn test_string_constant() {
        let mut pool = ConstantPool::new();
        let s = pool.add_string("hello").unwrap();
        assert!(matches!(pool.get(s), Some(Constant::String(1))));
        assert!(pool.get(s).unwrap().is_loadable_value());
        assert!(pool.get(0).is_none());
    }

    #[test]
    fn test_modified_utf8_encoding() {
        assert_eq!(modified_utf8("abc"), b"abc".to_vec());
        assert_eq!(modified_utf8("\u{0}"), vec![0xC0, 0x80]);
        assert_eq!(modified_utf8("é"), vec![0xC3, 0xA9]);
        assert_eq!(modified_utf8("€"), vec![0xE2, 0x82, 0xAC]);
        // U+1F600 is the surrogate pair D83D DE00
        assert_eq!(modified_utf8("\u{1F600}"), vec![0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80]);
    }

    #[test]
    fn test_utf8_constant_bytes_use_modified_encoding() {
        let bytes = Constant::Utf8("a\u{0}\u{1F600}".to_string()).to_bytes();
        assert_eq!(
            bytes,
            vec![1, 0x00, 0x09, b'a', 0xC0, 0x80, 0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80]
        );
        assert!(!bytes[3..].contains(&0x00));
        assert!(!bytes.iter().any(|b| *b >= 0xF0));
    }

    #[test]
    fn test_utf8_length_limit_counts_encoded_bytes() {
        let mut pool = ConstantPool::new();
        // 30000 NULs fit as UTF-8 but need 60000 bytes encoded
        assert!(pool.add_utf8(&"\u{0}".repeat(30_000)).is_ok());
        assert!(pool.add_utf8(&"\u{0}".repeat(40_000)).is_err());
    }
}
