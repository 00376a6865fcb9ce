use super::DeclId;
use crate::consts::{NESTED_CLASS_SEPARATOR, NO_NAME_PROVIDED};
use serde::{Deserialize, Serialize};
use std::fmt;

// Class identity

/// Qualified class identity: a dotted package plus a dotted relative name.
/// `Outer.Inner` in package `com.example` is `com/example/Outer$Inner`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassId {
    #[serde(default)]
    pub package: String,
    pub relative: String,
}

impl ClassId {
    pub fn new(package: impl Into<String>, relative: impl Into<String>) -> Self {
        Self { package: package.into(), relative: relative.into() }
    }

    /// Identity for a class the front-end could not name
    pub fn no_name(package: impl Into<String>) -> Self {
        Self::new(package, NO_NAME_PROVIDED)
    }

    pub fn short_name(&self) -> &str {
        self.relative.rsplit('.').next().unwrap_or(&self.relative)
    }

    pub fn is_no_name(&self) -> bool {
        self.short_name() == NO_NAME_PROVIDED
    }

    /// Internal (slash separated) name
    pub fn binary_name(&self) -> String {
        let relative = self.relative.replace('.', &NESTED_CLASS_SEPARATOR.to_string());
        if self.package.is_empty() {
            relative
        } else {
            format!("{}/{}", self.package.replace('.', "/"), relative)
        }
    }

    pub fn nested(&self, name: &str) -> Self {
        Self::new(self.package.clone(), format!("{}.{}", self.relative, name))
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package.is_empty() {
            write!(f, "{}", self.relative)
        } else {
            write!(f, "{}.{}", self.package, self.relative)
        }
    }
}

// Kinds, visibilities, modalities

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
    AnonymousObject,
    /// Facade class the front-end synthesizes for top-level file members
    FileSynthetic,
}

impl ClassKind {
    pub fn is_interface_like(self) -> bool {
        matches!(self, ClassKind::Interface | ClassKind::Annotation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Protected,
    /// Module-scoped
    Internal,
    Private,
    /// Java package-private
    Package,
    /// Local and anonymous declarations
    Local,
    // Front-end placeholders that must be resolved before lowering
    Inherited,
    InvisibleFake,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Final,
    Sealed,
    Open,
    Abstract,
}

// Types

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

/// Reference to a class type, possibly parameterized
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassType {
    pub class_id: ClassId,
    #[serde(default)]
    pub args: Vec<TypeArg>,
    #[serde(default)]
    pub is_interface: bool,
}

impl ClassType {
    pub fn new(class_id: ClassId) -> Self {
        Self { class_id, args: Vec::new(), is_interface: false }
    }

    pub fn interface(class_id: ClassId) -> Self {
        Self { class_id, args: Vec::new(), is_interface: true }
    }

    pub fn with_args(mut self, args: Vec<TypeArg>) -> Self {
        self.args = args;
        self
    }

    pub fn is_generic(&self) -> bool {
        !self.args.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    Primitive(PrimitiveType),
    Class(ClassType),
    TypeParameter(String),
    Array(Box<TypeRef>),
}

impl TypeRef {
    pub fn class(package: &str, relative: &str) -> Self {
        TypeRef::Class(ClassType::new(ClassId::new(package, relative)))
    }

    pub fn array_of(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    /// Whether the type needs a generic signature to be fully described
    pub fn needs_signature(&self) -> bool {
        match self {
            TypeRef::Primitive(_) => false,
            TypeRef::Class(ct) => ct.is_generic(),
            TypeRef::TypeParameter(_) => true,
            TypeRef::Array(element) => element.needs_signature(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeArg {
    Type(TypeRef),
    Star,
    Extends(TypeRef),
    Super(TypeRef),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeParam {
    pub name: String,
    #[serde(default)]
    pub bounds: Vec<TypeRef>,
}

impl TypeParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), bounds: Vec::new() }
    }

    pub fn bounded(name: impl Into<String>, bounds: Vec<TypeRef>) -> Self {
        Self { name: name.into(), bounds }
    }
}

// Class declarations

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDeclaration {
    #[serde(default)]
    pub id: DeclId,
    pub class_id: ClassId,
    pub kind: ClassKind,
    pub visibility: Visibility,
    pub modality: Modality,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    #[serde(default)]
    pub superclass: Option<ClassType>,
    #[serde(default)]
    pub interfaces: Vec<ClassType>,
    #[serde(default)]
    pub members: Vec<MemberDeclaration>,
    /// Set by the front-end when the declaration failed to resolve
    #[serde(default)]
    pub has_error: bool,
}

impl ClassDeclaration {
    /// A public final class with no members
    pub fn new(class_id: ClassId, kind: ClassKind) -> Self {
        Self {
            id: DeclId::default(),
            class_id,
            kind,
            visibility: Visibility::Public,
            modality: Modality::Final,
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            members: Vec::new(),
            has_error: false,
        }
    }

    pub fn with_id(mut self, id: DeclId) -> Self {
        self.id = id;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_modality(mut self, modality: Modality) -> Self {
        self.modality = modality;
        self
    }

    pub fn with_superclass(mut self, superclass: ClassType) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub fn with_interface(mut self, interface: ClassType) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_type_param(mut self, param: TypeParam) -> Self {
        self.type_params.push(param);
        self
    }

    pub fn with_member(mut self, member: MemberDeclaration) -> Self {
        self.members.push(member);
        self
    }

    /// Whether any directly declared method is abstract
    pub fn has_abstract_member(&self) -> bool {
        self.members.iter().any(|m| matches!(m, MemberDeclaration::Method(method) if method.modality == Modality::Abstract))
    }
}

impl fmt::Display for ClassDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self.kind {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum class",
            ClassKind::Annotation => "annotation class",
            ClassKind::AnonymousObject => "object",
            ClassKind::FileSynthetic => "file class",
        };
        write!(f, "{} {}", keyword, self.class_id)
    }
}

// Members

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberDeclaration {
    Field(FieldDeclaration),
    Method(MethodDeclaration),
    NestedClass(ClassDeclaration),
    Initializer(InitializerDeclaration),
    TypeAlias(TypeAliasDeclaration),
    EnumEntry(EnumEntryDeclaration),
    /// Properties must be split into fields and accessors before lowering
    Property(PropertyDeclaration),
    Script(ScriptDeclaration),
}

impl MemberDeclaration {
    /// Short kind name used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            MemberDeclaration::Field(_) => "field",
            MemberDeclaration::Method(_) => "method",
            MemberDeclaration::NestedClass(_) => "nested class",
            MemberDeclaration::Initializer(_) => "initializer",
            MemberDeclaration::TypeAlias(_) => "type alias",
            MemberDeclaration::EnumEntry(_) => "enum entry",
            MemberDeclaration::Property(_) => "property",
            MemberDeclaration::Script(_) => "script",
        }
    }
}

/// Compile-time constant carried by a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstantValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    #[serde(default)]
    pub id: DeclId,
    pub name: String,
    pub type_ref: TypeRef,
    pub visibility: Visibility,
    pub modality: Modality,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_volatile: bool,
    #[serde(default)]
    pub is_transient: bool,
    #[serde(default)]
    pub constant: Option<ConstantValue>,
}

impl FieldDeclaration {
    /// A private final instance field
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            id: DeclId::default(),
            name: name.into(),
            type_ref,
            visibility: Visibility::Private,
            modality: Modality::Final,
            is_static: false,
            is_volatile: false,
            is_transient: false,
            constant: None,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_modality(mut self, modality: Modality) -> Self {
        self.modality = modality;
        self
    }

    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_constant(mut self, constant: ConstantValue) -> Self {
        self.constant = Some(constant);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    Regular,
    Constructor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueParameter {
    pub name: String,
    pub type_ref: TypeRef,
}

impl ValueParameter {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self { name: name.into(), type_ref }
    }
}

/// Instructions already selected for a method by the body lowering stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodBody {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
}

impl MethodBody {
    pub fn new(max_stack: u16, max_locals: u16, code: Vec<u8>) -> Self {
        Self { max_stack, max_locals, code }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDeclaration {
    #[serde(default)]
    pub id: DeclId,
    pub name: String,
    #[serde(default = "default_method_kind")]
    pub kind: MethodKind,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    #[serde(default)]
    pub parameters: Vec<ValueParameter>,
    pub return_type: TypeRef,
    pub visibility: Visibility,
    pub modality: Modality,
    /// Instance methods and constructors have a dispatch receiver
    pub has_receiver: bool,
    #[serde(default)]
    pub body: Option<MethodBody>,
}

fn default_method_kind() -> MethodKind {
    MethodKind::Regular
}

impl MethodDeclaration {
    /// A public final instance method returning void, without a body
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DeclId::default(),
            name: name.into(),
            kind: MethodKind::Regular,
            type_params: Vec::new(),
            parameters: Vec::new(),
            return_type: TypeRef::Primitive(PrimitiveType::Void),
            visibility: Visibility::Public,
            modality: Modality::Final,
            has_receiver: true,
            body: None,
        }
    }

    /// A public constructor
    pub fn constructor() -> Self {
        Self { kind: MethodKind::Constructor, ..Self::new(crate::consts::CONSTRUCTOR_METHOD_NAME) }
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == MethodKind::Constructor
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_modality(mut self, modality: Modality) -> Self {
        self.modality = modality;
        self
    }

    pub fn with_parameter(mut self, parameter: ValueParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_return_type(mut self, return_type: TypeRef) -> Self {
        self.return_type = return_type;
        self
    }

    pub fn with_type_param(mut self, param: TypeParam) -> Self {
        self.type_params.push(param);
        self
    }

    pub fn with_body(mut self, body: MethodBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn without_receiver(mut self) -> Self {
        self.has_receiver = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializerDeclaration {
    #[serde(default)]
    pub id: DeclId,
    #[serde(default)]
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAliasDeclaration {
    #[serde(default)]
    pub id: DeclId,
    pub name: String,
    pub expanded: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumEntryDeclaration {
    #[serde(default)]
    pub id: DeclId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDeclaration {
    #[serde(default)]
    pub id: DeclId,
    pub name: String,
    pub type_ref: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptDeclaration {
    #[serde(default)]
    pub id: DeclId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_names() {
        assert_eq!(ClassId::new("com.example", "Foo").binary_name(), "com/example/Foo");
        assert_eq!(ClassId::new("com.example", "Outer.Inner").binary_name(), "com/example/Outer$Inner");
        assert_eq!(ClassId::new("", "Root").binary_name(), "Root");
        assert_eq!(ClassId::new("a.b", "Outer").nested("Deep").binary_name(), "a/b/Outer$Deep");
    }

    #[test]
    fn test_no_name_sentinel() {
        assert!(ClassId::no_name("com.example").is_no_name());
        assert!(ClassId::new("p", "Outer.<no name provided>").is_no_name());
        assert!(!ClassId::new("p", "Named").is_no_name());
    }

    #[test]
    fn test_abstract_member_detection() {
        let plain = ClassDeclaration::new(ClassId::new("p", "E"), ClassKind::Enum)
            .with_member(MemberDeclaration::Method(MethodDeclaration::new("describe")));
        assert!(!plain.has_abstract_member());

        let with_abstract = plain.clone().with_member(MemberDeclaration::Method(
            MethodDeclaration::new("apply").with_modality(Modality::Abstract),
        ));
        assert!(with_abstract.has_abstract_member());
    }

    #[test]
    fn test_needs_signature() {
        let list = TypeRef::Class(
            ClassType::interface(ClassId::new("java.util", "List"))
                .with_args(vec![TypeArg::Type(TypeRef::class("java.lang", "String"))]),
        );
        assert!(list.needs_signature());
        assert!(TypeRef::array_of(TypeRef::TypeParameter("T".into())).needs_signature());
        assert!(!TypeRef::class("java.lang", "String").needs_signature());
        assert!(!TypeRef::Primitive(PrimitiveType::Int).needs_signature());
    }
}
