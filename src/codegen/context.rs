//! Per-worker lowering context and the tables shared between workers

use super::body::{DefaultMethodLowering, MethodBodyLowering};
use super::naming::AnonymousNamer;
use crate::config::Config;
use crate::decl::{DeclId, SourcePosition, SourcePositions};
use crate::diagnostics::Diagnostics;

/// Read-only data shared by every lowering worker
#[derive(Debug, Clone, Default)]
pub struct SharedTables {
    pub config: Config,
    pub positions: SourcePositions,
}

impl SharedTables {
    pub fn new(config: Config, positions: SourcePositions) -> Self {
        Self { config, positions }
    }

    pub fn position(&self, id: DeclId) -> Option<&SourcePosition> {
        self.positions.get(id)
    }
}

/// State owned by one lowering worker
pub struct LoweringContext<'a> {
    shared: &'a SharedTables,
    pub diagnostics: Diagnostics,
    pub(crate) namer: AnonymousNamer,
    body_lowering: Box<dyn MethodBodyLowering + 'a>,
}

impl<'a> LoweringContext<'a> {
    pub fn new(shared: &'a SharedTables) -> Self {
        Self::new_with_body_lowering(shared, Box::new(DefaultMethodLowering))
    }

    pub fn new_with_body_lowering(shared: &'a SharedTables, body_lowering: Box<dyn MethodBodyLowering + 'a>) -> Self {
        Self {
            shared,
            diagnostics: Diagnostics::new(),
            namer: AnonymousNamer::new(),
            body_lowering,
        }
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    pub fn shared(&self) -> &'a SharedTables {
        self.shared
    }

    pub fn body_lowering(&self) -> &dyn MethodBodyLowering {
        self.body_lowering.as_ref()
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}
