//! classgen: lowering of resolved class declarations into JVM class files
//!
//! ## Architecture
//!
//! - **decl**: the resolved declaration tree handed over by a front-end,
//!   plus the source-position side table
//! - **codegen**: flag calculation, naming, descriptors and signatures, the
//!   class lowering engine, and the class file builder behind the writer
//!   protocol
//! - **verify**: structural checks on generated class files
//! - **diagnostics**: declarations skipped instead of lowered
//! - **bin**: command-line interface
//!
//! ## Lowering Flow
//!
//! ```text
//! DeclarationBundle → lower (per top-level tree, in parallel) → writer commands
//!                                                                  ↓
//!                              .class files ← verify ← ClassFileBuilder
//! ```

pub mod codegen;
pub mod config;
pub mod consts;
pub mod decl;
pub mod diagnostics;
pub mod error;
pub mod verify;

pub use config::{Config, JvmTarget};
pub use error::{Error, Result};

use std::path::{Path, PathBuf};

use codegen::{lower, LoweredUnit, LoweringContext, RecordingWriter, SharedTables, WriterCommand};
use decl::DeclarationBundle;

/// Lower every tree of a bundle in memory.
///
/// Trees are lowered in parallel according to `config.jobs`. If any tree
/// fails, the first failure in bundle order is returned.
pub fn compile(bundle: &DeclarationBundle, config: &Config) -> Result<LoweredUnit> {
    let shared = SharedTables::new(config.clone(), bundle.positions.clone());
    let results = codegen::lower_units_parallel(&bundle.classes, &shared, config.jobs);

    let mut output = LoweredUnit::default();
    for result in results {
        output.merge(result?);
    }
    log::debug!(
        "lowered {} classes with {} diagnostics",
        output.classes.len(),
        output.diagnostics.len()
    );
    Ok(output)
}

/// Lower a bundle and write the class files under `output_dir`
pub fn compile2file(bundle: &DeclarationBundle, output_dir: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    let output = compile(bundle, config)?;
    codegen::write_class_files(&output.classes, output_dir, config)
}

/// Writer commands the engine issues for a bundle, in order
pub fn dump_commands(bundle: &DeclarationBundle, config: &Config) -> Result<Vec<WriterCommand>> {
    let shared = SharedTables::new(config.clone(), bundle.positions.clone());
    let mut ctx = LoweringContext::new(&shared);
    let mut writer = RecordingWriter::new();
    for decl in &bundle.classes {
        lower(decl, &mut ctx, &mut writer)?;
    }
    Ok(writer.into_commands())
}
