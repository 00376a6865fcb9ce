// Common test utilities
#![allow(dead_code)]

use classgen::codegen::{lower, LoweringContext, RecordingWriter, SharedTables, WriterCommand};
use classgen::decl::{
    ClassDeclaration, ClassId, ClassKind, FieldDeclaration, MemberDeclaration, MethodBody, MethodDeclaration,
    Modality, PrimitiveType, TypeRef, Visibility,
};
use classgen::Result;

/// Initialize logger for diagnostics; safe to call from every test
pub fn init_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

pub fn class(package: &str, relative: &str, kind: ClassKind) -> ClassDeclaration {
    ClassDeclaration::new(ClassId::new(package, relative), kind)
}

/// `return` as the whole body
pub fn return_body() -> MethodBody {
    MethodBody::new(0, 1, vec![0xb1])
}

pub fn concrete_method(name: &str) -> MethodDeclaration {
    MethodDeclaration::new(name).with_body(return_body())
}

pub fn int_field(name: &str) -> FieldDeclaration {
    FieldDeclaration::new(name, TypeRef::Primitive(PrimitiveType::Int))
}

pub fn field(f: FieldDeclaration) -> MemberDeclaration {
    MemberDeclaration::Field(f)
}

pub fn method(m: MethodDeclaration) -> MemberDeclaration {
    MemberDeclaration::Method(m)
}

pub fn nested(c: ClassDeclaration) -> MemberDeclaration {
    MemberDeclaration::NestedClass(c)
}

/// Public final class `com.example.Widget` with a private field and a
/// public method
pub fn widget() -> ClassDeclaration {
    class("com.example", "Widget", ClassKind::Class)
        .with_visibility(Visibility::Public)
        .with_modality(Modality::Final)
        .with_member(field(int_field("count")))
        .with_member(method(concrete_method("render").with_modality(Modality::Open)))
}

/// Lower one tree through a recording writer with default configuration
pub fn record(decl: &ClassDeclaration) -> Result<Vec<WriterCommand>> {
    record_with(decl, &SharedTables::default()).map(|(commands, _)| commands)
}

/// Lower one tree and also return the number of diagnostics reported
pub fn record_with(decl: &ClassDeclaration, shared: &SharedTables) -> Result<(Vec<WriterCommand>, usize)> {
    let mut ctx = LoweringContext::new(shared);
    let mut writer = RecordingWriter::new();
    lower(decl, &mut ctx, &mut writer)?;
    assert_eq!(writer.depth(), 0, "lowering left a class open");
    let diagnostics = ctx.diagnostics.len();
    Ok((writer.into_commands(), diagnostics))
}

/// Names of begun classes, in command order
pub fn begun_classes(commands: &[WriterCommand]) -> Vec<String> {
    commands
        .iter()
        .filter_map(|c| match c {
            WriterCommand::BeginClass(header) => Some(header.name.clone()),
            _ => None,
        })
        .collect()
}

/// Deepest begin_class nesting reached, 0 for a single class
pub fn max_nesting(commands: &[WriterCommand]) -> usize {
    let mut depth = 0usize;
    let mut max = 0usize;
    for command in commands {
        match command {
            WriterCommand::BeginClass(_) => {
                max = max.max(depth);
                depth += 1;
            }
            WriterCommand::EndClass => depth -= 1,
            _ => {}
        }
    }
    max
}

/// Compact shape of a command sequence: `B:<name>`, `F:<name>`, `M:<name>`, `E`
pub fn shape(commands: &[WriterCommand]) -> Vec<String> {
    commands
        .iter()
        .map(|c| match c {
            WriterCommand::BeginClass(h) => format!("B:{}", h.name),
            WriterCommand::AddField(f) => format!("F:{}", f.name),
            WriterCommand::AddMethod(m) => format!("M:{}", m.name),
            WriterCommand::EndClass => "E".to_string(),
        })
        .collect()
}
