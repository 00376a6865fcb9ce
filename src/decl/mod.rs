//! Declaration model consumed by the lowering engine
//!
//! The front-end produces a resolved, fully typed tree of class declarations.
//! The lowering engine only reads it. Source positions are not stored on the
//! nodes; they live in the [`SourcePositions`] side table keyed by [`DeclId`].

mod nodes;

pub use nodes::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Source location information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Location {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

/// Span of source code (start and end locations)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    pub fn from_to(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            start: Location::new(start_line, start_col, 0),
            end: Location::new(end_line, end_col, 0),
        }
    }
}

/// Identity of a declaration, assigned by the front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclId(pub u32);

/// Where a declaration came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePosition {
    /// Path of the source file as the front-end saw it
    pub file: String,
    pub span: Span,
}

impl SourcePosition {
    pub fn new(file: impl Into<String>, span: Span) -> Self {
        Self { file: file.into(), span }
    }

    /// Bare file name, as recorded in the SourceFile attribute
    pub fn file_name(&self) -> &str {
        self.file.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(&self.file)
    }
}

impl std::fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.span.start.line, self.span.start.column)
    }
}

/// Read-only side table from declaration identity to source position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourcePositions {
    entries: HashMap<DeclId, SourcePosition>,
}

impl SourcePositions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: DeclId, position: SourcePosition) {
        self.entries.insert(id, position);
    }

    pub fn get(&self, id: DeclId) -> Option<&SourcePosition> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What the front-end hands over: top-level class trees plus their positions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeclarationBundle {
    pub classes: Vec<ClassDeclaration>,
    #[serde(default)]
    pub positions: SourcePositions,
}

impl DeclarationBundle {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Fold another bundle into this one, keeping declaration order.
    ///
    /// Declaration ids must be unique across the merged bundles; an id that
    /// already maps to a different position is rejected and leaves `self`
    /// unchanged.
    pub fn merge(&mut self, other: DeclarationBundle) -> Result<()> {
        for (id, position) in &other.positions.entries {
            if let Some(existing) = self.positions.get(*id) {
                if existing != position {
                    return Err(Error::invariant(format!(
                        "declaration id {} maps to both {} and {}",
                        id.0, existing, position
                    )));
                }
            }
        }
        self.classes.extend(other.classes);
        self.positions.entries.extend(other.positions.entries);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        let pos = SourcePosition::new("src/main/kotlin/com/example/Foo.kt", Span::from_to(3, 1, 9, 2));
        assert_eq!(pos.file_name(), "Foo.kt");
        assert_eq!(pos.to_string(), "src/main/kotlin/com/example/Foo.kt:3:1");
        let bare = SourcePosition::new("Bar.kt", Span::from_to(1, 1, 1, 1));
        assert_eq!(bare.file_name(), "Bar.kt");
    }

    #[test]
    fn test_bundle_json() {
        let mut bundle = DeclarationBundle::default();
        bundle.classes.push(ClassDeclaration::new(ClassId::new("com.example", "Foo"), ClassKind::Class).with_id(DeclId(7)));
        bundle.positions.insert(DeclId(7), SourcePosition::new("Foo.kt", Span::from_to(1, 1, 4, 1)));

        let json = bundle.to_json().unwrap();
        let decoded = DeclarationBundle::from_json(&json).unwrap();
        assert_eq!(decoded.classes, bundle.classes);
        assert_eq!(decoded.positions.get(DeclId(7)).map(|p| p.file_name()), Some("Foo.kt"));
    }

    #[test]
    fn test_bundle_rejects_garbage() {
        assert!(DeclarationBundle::from_json("{\"classes\": 3}").is_err());
    }

    #[test]
    fn test_merge_rejects_conflicting_ids() {
        let bundle_for = |name: &str, file: &str| {
            let mut bundle = DeclarationBundle::default();
            bundle.classes.push(ClassDeclaration::new(ClassId::new("p", name), ClassKind::Class).with_id(DeclId(1)));
            bundle.positions.insert(DeclId(1), SourcePosition::new(file, Span::from_to(1, 1, 2, 1)));
            bundle
        };

        let mut merged = bundle_for("A", "A.kt");
        let err = merged.merge(bundle_for("B", "B.kt")).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation { .. }));
        assert_eq!(merged.classes.len(), 1);
        assert_eq!(merged.positions.get(DeclId(1)).map(|p| p.file_name()), Some("A.kt"));

        // the same id with the same position is a repeated declaration, not a conflict
        merged.merge(bundle_for("A", "A.kt")).unwrap();
        assert_eq!(merged.classes.len(), 2);
        assert_eq!(merged.positions.len(), 1);
    }
}
