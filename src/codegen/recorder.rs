//! Writer that records the command sequence instead of building classes

use std::fmt;

use serde::Serialize;

use super::writer::{ClassArtifactWriter, ClassHeader, FieldEntry, MethodEntry};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WriterCommand {
    BeginClass(ClassHeader),
    AddField(FieldEntry),
    AddMethod(MethodEntry),
    EndClass,
}

impl fmt::Display for WriterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriterCommand::BeginClass(header) => write!(f, "begin_class {}", header),
            WriterCommand::AddField(field) => write!(f, "add_field {}", field),
            WriterCommand::AddMethod(method) => write!(f, "add_method {}", method),
            WriterCommand::EndClass => write!(f, "end_class"),
        }
    }
}

/// Render commands one per line, indenting each class body
pub fn render_commands(commands: &[WriterCommand]) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    for command in commands {
        if matches!(command, WriterCommand::EndClass) {
            depth = depth.saturating_sub(1);
        }
        out.push_str(&"  ".repeat(depth));
        out.push_str(&command.to_string());
        out.push('\n');
        if matches!(command, WriterCommand::BeginClass(_)) {
            depth += 1;
        }
    }
    out
}

/// Records every command; checks begin/end pairing as it goes
#[derive(Debug, Default)]
pub struct RecordingWriter {
    commands: Vec<WriterCommand>,
    depth: usize,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[WriterCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<WriterCommand> {
        self.commands
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Names of begun classes, in command order
    pub fn class_names(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                WriterCommand::BeginClass(header) => Some(header.name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Print the commands one per line, indented by nesting depth
    pub fn render(&self) -> String {
        render_commands(&self.commands)
    }

    fn require_open(&self, command: &str) -> Result<()> {
        if self.depth == 0 {
            return Err(Error::writer(format!("{} issued outside of begin_class/end_class", command)));
        }
        Ok(())
    }
}

impl ClassArtifactWriter for RecordingWriter {
    fn begin_class(&mut self, header: ClassHeader) -> Result<()> {
        self.depth += 1;
        self.commands.push(WriterCommand::BeginClass(header));
        Ok(())
    }

    fn add_field(&mut self, field: FieldEntry) -> Result<()> {
        self.require_open("add_field")?;
        self.commands.push(WriterCommand::AddField(field));
        Ok(())
    }

    fn add_method(&mut self, method: MethodEntry) -> Result<()> {
        self.require_open("add_method")?;
        self.commands.push(WriterCommand::AddMethod(method));
        Ok(())
    }

    fn end_class(&mut self) -> Result<()> {
        self.require_open("end_class")?;
        self.depth -= 1;
        self.commands.push(WriterCommand::EndClass);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::flag::AccessFlags;

    fn header(name: &str) -> ClassHeader {
        ClassHeader {
            version: 52,
            access_flags: AccessFlags::from_bits(0x21),
            name: name.to_string(),
            signature: None,
            super_name: "java/lang/Object".to_string(),
            interfaces: Vec::new(),
            source_file: None,
        }
    }

    #[test]
    fn test_render_indents_nested_blocks() {
        let mut writer = RecordingWriter::new();
        writer.begin_class(header("A")).unwrap();
        writer.begin_class(header("A$B")).unwrap();
        writer.end_class().unwrap();
        writer.end_class().unwrap();

        let rendered = writer.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].starts_with("begin_class"));
        assert!(lines[1].starts_with("  begin_class"));
        assert_eq!(lines[2], "  end_class");
        assert_eq!(lines[3], "end_class");
        assert_eq!(writer.class_names(), vec!["A", "A$B"]);
    }

    #[test]
    fn test_unbalanced_end() {
        let mut writer = RecordingWriter::new();
        assert!(writer.end_class().is_err());
    }
}
