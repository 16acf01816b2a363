use std::collections::BTreeMap;
use std::ops::Deref;

use crate::error::Position;

#[cfg(feature = "serde")]
use serde::Serialize;

/// One of the fifteen built-in field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "lowercase"))]
pub enum ScalarType {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
}

impl ScalarType {
    /// The keyword spelling of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarType::Double => "double",
            ScalarType::Float => "float",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::Uint32 => "uint32",
            ScalarType::Uint64 => "uint64",
            ScalarType::Sint32 => "sint32",
            ScalarType::Sint64 => "sint64",
            ScalarType::Fixed32 => "fixed32",
            ScalarType::Fixed64 => "fixed64",
            ScalarType::Sfixed32 => "sfixed32",
            ScalarType::Sfixed64 => "sfixed64",
            ScalarType::Bool => "bool",
            ScalarType::String => "string",
            ScalarType::Bytes => "bytes",
        }
    }
}

/// Index of a message in [`Proto`]'s message arena. Stable across sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MessageId(pub usize);

/// Index of an enum in [`Proto`]'s enum arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EnumId(pub usize);

/// The declaration a complex type reference resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum TypeRef {
    Message(MessageId),
    Enum(EnumId),
}

/// The base type of a field or rpc payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum TypeKind {
    Scalar(ScalarType),
    /// A user-declared message or enum, referenced by name.
    Complex {
        /// The name exactly as written in the source.
        name: String,
        /// The package active when the reference was parsed.
        package: String,
        /// Filled in by the resolver.
        resolved: Option<TypeRef>,
    },
}

/// A field or rpc payload type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TypeInfo {
    pub kind: TypeKind,
    pub repeated: bool,
    /// Where the type name was written.
    pub pos: Position,
}

impl TypeInfo {
    pub fn scalar(scalar: ScalarType, pos: Position) -> Self {
        TypeInfo {
            kind: TypeKind::Scalar(scalar),
            repeated: false,
            pos,
        }
    }

    pub fn complex(name: impl Into<String>, package: impl Into<String>, pos: Position) -> Self {
        TypeInfo {
            kind: TypeKind::Complex {
                name: name.into(),
                package: package.into(),
                resolved: None,
            },
            repeated: false,
            pos,
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self.kind, TypeKind::Complex { .. })
    }

    pub fn as_scalar(&self) -> Option<ScalarType> {
        match self.kind {
            TypeKind::Scalar(scalar) => Some(scalar),
            TypeKind::Complex { .. } => None,
        }
    }

    /// The type as written: a scalar keyword or the literal complex name.
    pub fn type_name(&self) -> &str {
        match &self.kind {
            TypeKind::Scalar(scalar) => scalar.as_str(),
            TypeKind::Complex { name, .. } => name,
        }
    }

    /// The package-qualified name used for lookup. Scalars return their
    /// keyword.
    pub fn qualified_name(&self) -> String {
        match &self.kind {
            TypeKind::Scalar(scalar) => scalar.as_str().to_string(),
            TypeKind::Complex { name, package, .. } => qualify(package, name),
        }
    }

    pub fn resolution(&self) -> Option<TypeRef> {
        match &self.kind {
            TypeKind::Complex { resolved, .. } => *resolved,
            TypeKind::Scalar(_) => None,
        }
    }

    pub fn message_ref(&self) -> Option<MessageId> {
        match self.resolution() {
            Some(TypeRef::Message(id)) => Some(id),
            _ => None,
        }
    }

    pub fn enum_ref(&self) -> Option<EnumId> {
        match self.resolution() {
            Some(TypeRef::Enum(id)) => Some(id),
            _ => None,
        }
    }
}

/// Join a package and a local name with `.`; an empty package leaves the
/// name unchanged.
pub fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", package, name)
    }
}

/// The syntactic kind of an option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "lowercase"))]
pub enum OptionKind {
    Identifier,
    String,
    Integer,
    Boolean,
}

/// A single `name = value` option.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct OptionEntry {
    pub name: String,
    pub kind: OptionKind,
    /// The value as written, without quotes for strings.
    pub value: String,
    pub line: usize,
}

/// Options keyed by name. A later option with the same name replaces the
/// earlier one.
pub type OptionMap = BTreeMap<String, OptionEntry>;

/// A field definition within a message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Field {
    pub name: String,
    /// Field index, unique within the message.
    pub index: u32,
    pub type_info: TypeInfo,
    pub options: OptionMap,
    pub pos: Position,
}

/// A `message` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Message {
    pub name: String,
    pub qualified_name: String,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
    pub options: OptionMap,
    pub pos: Position,
}

impl Message {
    pub fn find_field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn find_field_by_index(&self, index: u32) -> Option<&Field> {
        self.fields.iter().find(|f| f.index == index)
    }
}

/// A named enum value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Constant {
    pub name: String,
    pub value: i32,
    pub pos: Position,
}

/// An `enum` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Enum {
    pub name: String,
    pub qualified_name: String,
    pub constants: Vec<Constant>,
    pub options: OptionMap,
    pub pos: Position,
}

/// An `rpc` inside a service.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Procedure {
    pub name: String,
    pub request: TypeInfo,
    pub response: TypeInfo,
    pub pos: Position,
}

/// A `service` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Service {
    pub name: String,
    pub qualified_name: String,
    pub procedures: Vec<Procedure>,
    pub pos: Position,
}

/// A resolved complex type, borrowed from its [`Proto`].
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    Message(&'a Message),
    Enum(&'a Enum),
}

impl Resolved<'_> {
    pub fn qualified_name(&self) -> &str {
        match self {
            Resolved::Message(m) => &m.qualified_name,
            Resolved::Enum(e) => &e.qualified_name,
        }
    }
}

/// The root of a parsed schema file.
///
/// Messages and enums are stored in arenas indexed by [`MessageId`] and
/// [`EnumId`]; type references hold those ids rather than owning handles.
/// The arenas never shrink or reorder. Dependency sorting only rewrites
/// `order`, the sequence in which [`Proto::messages`] yields messages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Proto {
    pub file_name: String,
    /// The version from the `syntax` statement, if one was present.
    pub syntax: Option<String>,
    /// The last package declared in the file.
    pub package: String,
    pub(crate) messages: Vec<Message>,
    pub(crate) order: Vec<MessageId>,
    pub enums: Vec<Enum>,
    pub services: Vec<Service>,
    pub options: OptionMap,
}

impl Proto {
    pub fn new(file_name: impl Into<String>) -> Self {
        Proto {
            file_name: file_name.into(),
            ..Proto::default()
        }
    }

    /// Messages in output order: dependency order once sorted, declaration
    /// order before that.
    pub fn messages(&self) -> impl Iterator<Item = &Message> + '_ {
        self.order.iter().map(move |&id| &self.messages[id.0])
    }

    /// Messages in the order they were declared.
    pub fn declared_messages(&self) -> &[Message] {
        &self.messages
    }

    /// Message ids in output order.
    pub fn message_order(&self) -> &[MessageId] {
        &self.order
    }

    pub fn message(&self, id: MessageId) -> &Message {
        &self.messages[id.0]
    }

    pub fn enumeration(&self, id: EnumId) -> &Enum {
        &self.enums[id.0]
    }

    /// Find the first message with the given qualified name.
    pub fn get_message(&self, qualified_name: &str) -> Option<&Message> {
        self.messages
            .iter()
            .find(|m| m.qualified_name == qualified_name)
    }

    pub fn get_message_id(&self, qualified_name: &str) -> Option<MessageId> {
        self.messages
            .iter()
            .position(|m| m.qualified_name == qualified_name)
            .map(MessageId)
    }

    /// Find the first enum with the given qualified name.
    pub fn get_enum(&self, qualified_name: &str) -> Option<&Enum> {
        self.enums.iter().find(|e| e.qualified_name == qualified_name)
    }

    pub fn get_service(&self, qualified_name: &str) -> Option<&Service> {
        self.services
            .iter()
            .find(|s| s.qualified_name == qualified_name)
    }

    /// Follow a resolved type reference into this file.
    pub fn resolve(&self, type_info: &TypeInfo) -> Option<Resolved<'_>> {
        match type_info.resolution()? {
            TypeRef::Message(id) => self.messages.get(id.0).map(Resolved::Message),
            TypeRef::Enum(id) => self.enums.get(id.0).map(Resolved::Enum),
        }
    }

    pub(crate) fn push_message(&mut self, message: Message) -> MessageId {
        let id = MessageId(self.messages.len());
        self.messages.push(message);
        self.order.push(id);
        id
    }
}

/// A freshly parsed file whose complex type references are not yet resolved.
#[derive(Debug, Clone)]
pub struct RawProto(pub(crate) Proto);

/// A file whose type references are all resolved but whose messages are
/// still in declaration order.
#[derive(Debug, Clone)]
pub struct ResolvedProto(pub(crate) Proto);

impl Deref for RawProto {
    type Target = Proto;

    fn deref(&self) -> &Proto {
        &self.0
    }
}

impl Deref for ResolvedProto {
    type Target = Proto;

    fn deref(&self) -> &Proto {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(name: &str) -> Message {
        Message {
            name: name.into(),
            qualified_name: qualify("demo", name),
            fields: Vec::new(),
            options: OptionMap::new(),
            pos: Position::default(),
        }
    }

    #[test]
    fn test_qualify() {
        assert_eq!(qualify("", "Point"), "Point");
        assert_eq!(qualify("a.b", "Point"), "a.b.Point");
    }

    #[test]
    fn test_type_info_accessors() {
        let mut info = TypeInfo::complex("Point", "demo", Position::new(2, 5));
        assert!(info.is_complex());
        assert_eq!(info.type_name(), "Point");
        assert_eq!(info.qualified_name(), "demo.Point");
        assert_eq!(info.resolution(), None);

        if let TypeKind::Complex { resolved, .. } = &mut info.kind {
            *resolved = Some(TypeRef::Enum(EnumId(0)));
        }
        assert_eq!(info.enum_ref(), Some(EnumId(0)));
        assert_eq!(info.message_ref(), None);

        let scalar = TypeInfo::scalar(ScalarType::Sfixed64, Position::default());
        assert_eq!(scalar.type_name(), "sfixed64");
        assert_eq!(scalar.as_scalar(), Some(ScalarType::Sfixed64));
    }

    #[test]
    fn test_message_order_is_separate_from_arena() {
        let mut proto = Proto::new("demo.proto");
        let a = proto.push_message(message("A"));
        let b = proto.push_message(message("B"));
        proto.order = vec![b, a];

        let names: Vec<_> = proto.messages().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
        assert_eq!(proto.declared_messages()[0].name, "A");
        assert_eq!(proto.get_message_id("demo.B"), Some(b));
        assert_eq!(proto.message(a).qualified_name, "demo.A");
    }
}
