//! Drivers that lower batches of top-level declarations and write the results

use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_deque::{Injector, Steal};

use super::builder::{ClassFileBuilder, GeneratedClass};
use super::class_codegen::lower;
use super::context::{LoweringContext, SharedTables};
use crate::config::Config;
use crate::decl::ClassDeclaration;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::verify::verify_generated;

/// Classes and diagnostics produced by lowering one or more trees
#[derive(Debug, Default)]
pub struct LoweredUnit {
    pub classes: Vec<GeneratedClass>,
    pub diagnostics: Diagnostics,
}

impl LoweredUnit {
    pub fn merge(&mut self, other: LoweredUnit) {
        self.classes.extend(other.classes);
        self.diagnostics.extend(other.diagnostics);
    }
}

/// Lower one top-level tree with its own builder and context
pub fn lower_unit(decl: &ClassDeclaration, shared: &SharedTables) -> Result<LoweredUnit> {
    let mut ctx = LoweringContext::new(shared);
    let mut builder = ClassFileBuilder::new();
    if let Err(e) = lower(decl, &mut ctx, &mut builder) {
        log::error!("lowering {} aborted: {}", decl, e);
        return Err(e);
    }
    Ok(LoweredUnit { classes: builder.finish()?, diagnostics: ctx.into_diagnostics() })
}

/// Lower all trees in order into a single builder. The first fatal error
/// stops the batch.
pub fn lower_units(units: &[ClassDeclaration], shared: &SharedTables) -> Result<LoweredUnit> {
    let mut ctx = LoweringContext::new(shared);
    let mut builder = ClassFileBuilder::new();
    for decl in units {
        if let Err(e) = lower(decl, &mut ctx, &mut builder) {
            let abandoned = builder.abandon_open_classes();
            log::error!("lowering {} aborted with {} open classes: {}", decl, abandoned, e);
            return Err(e);
        }
    }
    Ok(LoweredUnit { classes: builder.finish()?, diagnostics: ctx.into_diagnostics() })
}

/// Lower trees on `jobs` worker threads (0 picks one per CPU).
///
/// Workers pull trees from a shared injector; each owns its builder,
/// diagnostics and anonymous namer, and only `shared` is read concurrently.
/// A failing tree does not affect the others. Results are in input order.
pub fn lower_units_parallel(units: &[ClassDeclaration], shared: &SharedTables, jobs: usize) -> Vec<Result<LoweredUnit>> {
    let requested = if jobs == 0 { num_cpus::get() } else { jobs };
    let workers = requested.clamp(1, units.len().max(1));
    log::debug!("lowering {} trees on {} workers", units.len(), workers);

    let injector = Injector::new();
    for (index, decl) in units.iter().enumerate() {
        injector.push((index, decl));
    }

    let mut slots: Vec<Option<Result<LoweredUnit>>> = units.iter().map(|_| None).collect();
    thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let injector = &injector;
                scope.spawn(move || {
                    let mut done = Vec::new();
                    loop {
                        match injector.steal() {
                            Steal::Success((index, decl)) => done.push((index, lower_unit(decl, shared))),
                            Steal::Empty => break,
                            Steal::Retry => continue,
                        }
                    }
                    done
                })
            })
            .collect();

        for handle in handles {
            match handle.join() {
                Ok(done) => {
                    for (index, result) in done {
                        slots[index] = Some(result);
                    }
                }
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
    });

    slots
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| Err(Error::invariant("lowering worker dropped a tree"))))
        .collect()
}

/// Verify (when configured) and write each class to
/// `<output_dir>/<package dirs>/<Name>.class`. Returns the written paths.
pub fn write_class_files(classes: &[GeneratedClass], output_dir: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    if config.verify {
        for class in classes {
            verify_generated(class, config.class_file_version())?;
        }
    }

    let mut written = Vec::with_capacity(classes.len());
    for class in classes {
        let path = output_dir.join(class.relative_path());
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, class.to_bytes())?;
        log::debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
