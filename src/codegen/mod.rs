//! Code generation: lowering class declarations into JVM class files
//!
//! The engine in [`class_codegen`] turns one declaration tree into an ordered
//! stream of writer commands. [`builder::ClassFileBuilder`] turns that stream
//! into [`class::ClassFile`] structures, which [`writer::ClassfileWritable`]
//! serializes.

pub mod attribute;
pub mod body;
pub mod builder;
pub mod class;
pub mod class_codegen;
pub mod constpool;
pub mod context;
pub mod descriptor;
pub mod driver;
pub mod field;
pub mod flag;
pub mod method;
pub mod naming;
pub mod recorder;
pub mod signature;
pub mod writer;

// Re-export commonly used types
pub use body::{DefaultMethodLowering, MethodBodyLowering};
pub use builder::{ClassFileBuilder, GeneratedClass};
pub use class::ClassFile;
pub use class_codegen::lower;
pub use constpool::{Constant, ConstantPool};
pub use context::{LoweringContext, SharedTables};
pub use driver::{lower_unit, lower_units, lower_units_parallel, write_class_files, LoweredUnit};
pub use flag::{class_flags, member_flags, AccessFlags};
pub use naming::{AnonymousNamer, BinaryClassName};
pub use recorder::{RecordingWriter, WriterCommand};
pub use writer::{ClassArtifactWriter, ClassHeader, ClassfileWritable, FieldEntry, MethodEntry};
