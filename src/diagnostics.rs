//! Diagnostics for declarations that are skipped instead of lowered

use std::fmt;

use serde::Serialize;

use crate::decl::SourcePosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The front-end marked the declaration as erroneous or left it unnamed
    BadDeclaration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub position: Option<SourcePosition>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.position {
            Some(position) => write!(f, "{}: {}", position, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Collected diagnostics of one lowering worker
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report_bad_declaration(&mut self, message: impl Into<String>, position: Option<SourcePosition>) {
        let diagnostic = Diagnostic { kind: DiagnosticKind::BadDeclaration, message: message.into(), position };
        log::warn!("skipping bad declaration: {}", diagnostic);
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }
}
