//! Binary class names and the anonymous class naming scheme

use crate::consts::NESTED_CLASS_SEPARATOR;
use crate::decl::{ClassDeclaration, ClassKind};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// Internal class name as it appears in the artifact (`com/example/Outer$1`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BinaryClassName(String);

impl BinaryClassName {
    pub fn new(name: impl Into<String>) -> Self {
        BinaryClassName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of a class nested in this one
    pub fn nested(&self, simple_name: &str) -> Self {
        BinaryClassName(format!("{}{}{}", self.0, NESTED_CLASS_SEPARATOR, simple_name))
    }

    /// Package part in internal form, empty for the default package
    pub fn package(&self) -> &str {
        self.0.rsplit_once('/').map(|(pkg, _)| pkg).unwrap_or("")
    }

    /// Last path segment, including any `$` nesting
    pub fn simple_name(&self) -> &str {
        self.0.rsplit_once('/').map(|(_, name)| name).unwrap_or(&self.0)
    }
}

impl fmt::Display for BinaryClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BinaryClassName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Hands out `Outer$1`, `Outer$2`, ... per enclosing class.
///
/// Indices depend only on the position of the anonymous object among its
/// enclosing class's anonymous members, so two compilations of the same tree
/// produce the same names. Anonymous objects skipped as bad declarations
/// still take their index.
#[derive(Debug, Default)]
pub struct AnonymousNamer {
    counters: HashMap<BinaryClassName, u32>,
}

impl AnonymousNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_name(&mut self, enclosing: &BinaryClassName) -> BinaryClassName {
        let counter = self.counters.entry(enclosing.clone()).or_insert(0);
        *counter += 1;
        enclosing.nested(&counter.to_string())
    }
}

/// Resolve the binary name of `decl`, given the binary name of its enclosing
/// class (None for top-level declarations).
pub fn binary_class_name(
    decl: &ClassDeclaration,
    enclosing: Option<&BinaryClassName>,
    namer: &mut AnonymousNamer,
) -> Result<BinaryClassName> {
    match (decl.kind, enclosing) {
        (ClassKind::AnonymousObject, Some(outer)) => Ok(namer.next_name(outer)),
        (ClassKind::AnonymousObject, None) => Err(Error::invariant(format!(
            "anonymous object in package '{}' has no enclosing class",
            decl.class_id.package
        ))),
        (_, Some(outer)) => Ok(outer.nested(decl.class_id.short_name())),
        (_, None) => Ok(BinaryClassName::new(decl.class_id.binary_name())),
    }
}
