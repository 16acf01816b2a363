use std::fmt;

/// A location in schema source text. Both fields are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new(1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Coarse classification of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed characters: bad symbols, unterminated strings or comments.
    Lexical,
    /// Well-formed tokens in an order the grammar does not accept.
    Syntax,
    /// Grammatical input that violates a schema rule.
    Semantic,
    /// Misuse of the single-slot pushback buffers.
    Internal,
}

/// Errors raised by any stage of the schema pipeline.
///
/// Every variant carries the position of the offending token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid symbol '{symbol}' at {pos}")]
    InvalidSymbol { symbol: char, pos: Position },

    #[error("unterminated string literal at {pos}")]
    UnterminatedString { pos: Position },

    #[error("unterminated block comment at {pos}")]
    UnterminatedComment { pos: Position },

    #[error("invalid identifier '{name}' at {pos}")]
    InvalidIdentifier { name: String, pos: Position },

    #[error("expected {expected}, found {found} at {pos}")]
    UnexpectedToken {
        expected: String,
        found: String,
        pos: Position,
    },

    #[error("qualified name '{name}' is not allowed as a {context} name at {pos}")]
    QualifiedName {
        name: String,
        context: &'static str,
        pos: Position,
    },

    #[error("unsupported syntax version \"{version}\" at {pos}")]
    UnsupportedSyntax { version: String, pos: Position },

    #[error("rpc '{name}' must have an empty body at {pos}")]
    NonEmptyRpcBody { name: String, pos: Position },

    #[error("invalid integer '{value}' ({reason}) at {pos}")]
    InvalidInteger {
        value: String,
        reason: &'static str,
        pos: Position,
    },

    #[error("invalid value {found} for option '{name}' at {pos}")]
    InvalidOptionValue {
        name: String,
        found: String,
        pos: Position,
    },

    #[error("field '{field}' has the same index {index} as '{previous}' in message '{message}' at {pos}")]
    DuplicateFieldIndex {
        message: String,
        field: String,
        previous: String,
        index: u32,
        pos: Position,
    },

    #[error("duplicate {member} name '{name}' in '{scope}' at {pos}")]
    DuplicateMemberName {
        member: &'static str,
        name: String,
        scope: String,
        pos: Position,
    },

    #[error("'{name}' is already declared at {previous} (redeclared at {pos})")]
    DuplicateDeclaration {
        name: String,
        previous: Position,
        pos: Position,
    },

    #[error("package '{package}' follows '{declaration}', which has no package, at {pos}")]
    PackageAfterUnpackaged {
        package: String,
        declaration: String,
        pos: Position,
    },

    #[error("unable to find type '{type_name}' at {pos}")]
    UnresolvedType { type_name: String, pos: Position },

    #[error("{role} type '{type_name}' of rpc '{procedure}' is not a message at {pos}")]
    RpcTypeNotMessage {
        procedure: String,
        role: &'static str,
        type_name: String,
        pos: Position,
    },

    #[error("circular reference to message '{message}' ({cycle}) at {pos}")]
    CircularReference {
        message: String,
        cycle: String,
        pos: Position,
    },

    #[error("internal error: {message} at {pos}")]
    Internal { message: &'static str, pos: Position },
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::InvalidSymbol { .. }
            | ParseError::UnterminatedString { .. }
            | ParseError::UnterminatedComment { .. }
            | ParseError::InvalidIdentifier { .. } => ErrorKind::Lexical,
            ParseError::UnexpectedToken { .. }
            | ParseError::QualifiedName { .. }
            | ParseError::UnsupportedSyntax { .. }
            | ParseError::NonEmptyRpcBody { .. }
            | ParseError::InvalidInteger { .. } => ErrorKind::Syntax,
            ParseError::InvalidOptionValue { .. }
            | ParseError::DuplicateFieldIndex { .. }
            | ParseError::DuplicateMemberName { .. }
            | ParseError::DuplicateDeclaration { .. }
            | ParseError::PackageAfterUnpackaged { .. }
            | ParseError::UnresolvedType { .. }
            | ParseError::RpcTypeNotMessage { .. }
            | ParseError::CircularReference { .. } => ErrorKind::Semantic,
            ParseError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Where in the source the fault was detected.
    pub fn position(&self) -> Position {
        match self {
            ParseError::InvalidSymbol { pos, .. }
            | ParseError::UnterminatedString { pos }
            | ParseError::UnterminatedComment { pos }
            | ParseError::InvalidIdentifier { pos, .. }
            | ParseError::UnexpectedToken { pos, .. }
            | ParseError::QualifiedName { pos, .. }
            | ParseError::UnsupportedSyntax { pos, .. }
            | ParseError::NonEmptyRpcBody { pos, .. }
            | ParseError::InvalidInteger { pos, .. }
            | ParseError::InvalidOptionValue { pos, .. }
            | ParseError::DuplicateFieldIndex { pos, .. }
            | ParseError::DuplicateMemberName { pos, .. }
            | ParseError::DuplicateDeclaration { pos, .. }
            | ParseError::PackageAfterUnpackaged { pos, .. }
            | ParseError::UnresolvedType { pos, .. }
            | ParseError::RpcTypeNotMessage { pos, .. }
            | ParseError::CircularReference { pos, .. }
            | ParseError::Internal { pos, .. } => *pos,
        }
    }
}
