// Well-known names shared by the lowering engine and the class-file writer

/// Name the front-end gives declarations it could not name.
pub const NO_NAME_PROVIDED: &str = "<no name provided>";

pub const CONSTRUCTOR_METHOD_NAME: &str = "<init>";
pub const STATIC_INITIALIZER_METHOD_NAME: &str = "<clinit>";

pub const JAVA_LANG_OBJECT: &str = "java/lang/Object";
pub const JAVA_LANG_ENUM: &str = "java/lang/Enum";
pub const JAVA_LANG_STRING: &str = "java/lang/String";
pub const JAVA_LANG_ANNOTATION_ANNOTATION: &str = "java/lang/annotation/Annotation";

/// Separator between an enclosing class and its nested or anonymous classes.
pub const NESTED_CLASS_SEPARATOR: char = '$';

// Environment overrides read by Config::from_env
pub const ENV_TARGET: &str = "CLASSGEN_TARGET";
pub const ENV_JOBS: &str = "CLASSGEN_JOBS";
pub const ENV_DEBUG: &str = "CLASSGEN_DEBUG";
pub const ENV_VERIFY: &str = "CLASSGEN_VERIFY";
