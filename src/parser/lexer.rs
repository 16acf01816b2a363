use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use super::source::Source;
use crate::error::{ParseError, Position};
use crate::types::ScalarType;

/// Reserved words of the schema language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Message,
    Repeated,
    String,
    Enum,
    Double,
    Float,
    Bool,
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
    Bytes,
    Package,
    Syntax,
    Map,
    Option,
    True,
    False,
    Rpc,
    Service,
    Returns,
}

impl Keyword {
    pub const ALL: [Keyword; 27] = [
        Keyword::Message,
        Keyword::Repeated,
        Keyword::String,
        Keyword::Enum,
        Keyword::Double,
        Keyword::Float,
        Keyword::Bool,
        Keyword::Int32,
        Keyword::Int64,
        Keyword::Uint32,
        Keyword::Uint64,
        Keyword::Sint32,
        Keyword::Sint64,
        Keyword::Fixed32,
        Keyword::Fixed64,
        Keyword::Sfixed32,
        Keyword::Sfixed64,
        Keyword::Bytes,
        Keyword::Package,
        Keyword::Syntax,
        Keyword::Map,
        Keyword::Option,
        Keyword::True,
        Keyword::False,
        Keyword::Rpc,
        Keyword::Service,
        Keyword::Returns,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Message => "message",
            Keyword::Repeated => "repeated",
            Keyword::String => "string",
            Keyword::Enum => "enum",
            Keyword::Double => "double",
            Keyword::Float => "float",
            Keyword::Bool => "bool",
            Keyword::Int32 => "int32",
            Keyword::Int64 => "int64",
            Keyword::Uint32 => "uint32",
            Keyword::Uint64 => "uint64",
            Keyword::Sint32 => "sint32",
            Keyword::Sint64 => "sint64",
            Keyword::Fixed32 => "fixed32",
            Keyword::Fixed64 => "fixed64",
            Keyword::Sfixed32 => "sfixed32",
            Keyword::Sfixed64 => "sfixed64",
            Keyword::Bytes => "bytes",
            Keyword::Package => "package",
            Keyword::Syntax => "syntax",
            Keyword::Map => "map",
            Keyword::Option => "option",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Rpc => "rpc",
            Keyword::Service => "service",
            Keyword::Returns => "returns",
        }
    }

    /// Look up a single-segment identifier in the reserved-word table.
    pub fn lookup(name: &str) -> Option<Keyword> {
        KEYWORDS.get(name).copied()
    }

    /// The scalar type named by this keyword, if any.
    pub fn scalar(self) -> Option<ScalarType> {
        let scalar = match self {
            Keyword::Double => ScalarType::Double,
            Keyword::Float => ScalarType::Float,
            Keyword::Int32 => ScalarType::Int32,
            Keyword::Int64 => ScalarType::Int64,
            Keyword::Uint32 => ScalarType::Uint32,
            Keyword::Uint64 => ScalarType::Uint64,
            Keyword::Sint32 => ScalarType::Sint32,
            Keyword::Sint64 => ScalarType::Sint64,
            Keyword::Fixed32 => ScalarType::Fixed32,
            Keyword::Fixed64 => ScalarType::Fixed64,
            Keyword::Sfixed32 => ScalarType::Sfixed32,
            Keyword::Sfixed64 => ScalarType::Sfixed64,
            Keyword::Bool => ScalarType::Bool,
            Keyword::String => ScalarType::String,
            Keyword::Bytes => ScalarType::Bytes,
            _ => return None,
        };
        Some(scalar)
    }
}

static KEYWORDS: Lazy<HashMap<&'static str, Keyword>> =
    Lazy::new(|| Keyword::ALL.iter().map(|&k| (k.as_str(), k)).collect());

/// Token types produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `=`
    Equals,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `<`
    LAngle,
    /// `>`
    RAngle,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `-`, only meaningful before an enum value
    Minus,
    /// A bare identifier that is not a reserved word
    Name(String),
    /// A dot-separated identifier such as `google.protobuf.Empty`
    QName(String),
    /// An unsigned run of decimal digits, kept as written
    Integer(String),
    /// A double-quoted string without the quotes
    Str(String),
    Keyword(Keyword),
    /// End of input
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Equals => f.write_str("'='"),
            Token::LBrace => f.write_str("'{'"),
            Token::RBrace => f.write_str("'}'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::Semicolon => f.write_str("';'"),
            Token::Comma => f.write_str("','"),
            Token::LAngle => f.write_str("'<'"),
            Token::RAngle => f.write_str("'>'"),
            Token::LBracket => f.write_str("'['"),
            Token::RBracket => f.write_str("']'"),
            Token::Minus => f.write_str("'-'"),
            Token::Name(name) => write!(f, "identifier '{}'", name),
            Token::QName(name) => write!(f, "qualified name '{}'", name),
            Token::Integer(value) => write!(f, "integer '{}'", value),
            Token::Str(value) => write!(f, "string \"{}\"", value),
            Token::Keyword(keyword) => write!(f, "'{}'", keyword.as_str()),
            Token::Eof => f.write_str("end of file"),
        }
    }
}

/// A token with the position of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub token: Token,
    pub pos: Position,
}

/// Tokenizer for schema text with a single token of pushback.
pub struct Lexer<'a> {
    source: Source<'a>,
    last: Option<Located>,
    pushed_back: bool,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            source: Source::new(input),
            last: None,
            pushed_back: false,
        }
    }

    /// Read the next token. Comments are skipped.
    pub fn next(&mut self) -> Result<Located, ParseError> {
        if self.pushed_back {
            if let Some(tok) = &self.last {
                self.pushed_back = false;
                return Ok(tok.clone());
            }
        }

        let tok = self.scan()?;
        self.last = Some(tok.clone());
        Ok(tok)
    }

    /// Push the most recently returned token back.
    pub fn unget(&mut self) -> Result<(), ParseError> {
        match &self.last {
            Some(tok) if self.pushed_back => Err(ParseError::Internal {
                message: "token pushback is already occupied",
                pos: tok.pos,
            }),
            Some(_) => {
                self.pushed_back = true;
                Ok(())
            }
            None => Err(ParseError::Internal {
                message: "no token to push back",
                pos: self.source.position(),
            }),
        }
    }

    fn scan(&mut self) -> Result<Located, ParseError> {
        loop {
            self.source.skip_whitespace()?;
            let ch = self.source.get();
            let pos = self.source.position();

            let token = match ch {
                None => Token::Eof,
                Some('/') => {
                    self.skip_comment(pos)?;
                    continue;
                }
                Some('"') => self.read_string(pos)?,
                Some(c) if is_ident_start(c) => {
                    self.source.unget()?;
                    self.read_identifier(pos)?
                }
                Some(c) if c.is_ascii_digit() => self.read_integer(c)?,
                Some('=') => Token::Equals,
                Some('{') => Token::LBrace,
                Some('}') => Token::RBrace,
                Some('(') => Token::LParen,
                Some(')') => Token::RParen,
                Some(';') => Token::Semicolon,
                Some(',') => Token::Comma,
                Some('<') => Token::LAngle,
                Some('>') => Token::RAngle,
                Some('[') => Token::LBracket,
                Some(']') => Token::RBracket,
                Some('-') => Token::Minus,
                Some(symbol) => return Err(ParseError::InvalidSymbol { symbol, pos }),
            };

            return Ok(Located { token, pos });
        }
    }

    fn skip_comment(&mut self, start: Position) -> Result<(), ParseError> {
        match self.source.get() {
            Some('/') => {
                // Line comment: skip to end of line
                while let Some(c) = self.source.get() {
                    if c == '\n' {
                        break;
                    }
                }
                Ok(())
            }
            Some('*') => loop {
                match self.source.get() {
                    None => return Err(ParseError::UnterminatedComment { pos: start }),
                    Some('*') if self.source.expect('/')? => return Ok(()),
                    Some(_) => {}
                }
            },
            _ => Err(ParseError::InvalidSymbol {
                symbol: '/',
                pos: start,
            }),
        }
    }

    fn read_segment(&mut self) -> Result<String, ParseError> {
        let mut segment = String::new();
        while let Some(c) = self.source.get() {
            let accepted = if segment.is_empty() {
                is_ident_start(c)
            } else {
                is_ident_continue(c)
            };
            if !accepted {
                break;
            }
            segment.push(c);
        }
        self.source.unget()?;
        Ok(segment)
    }

    fn read_identifier(&mut self, pos: Position) -> Result<Token, ParseError> {
        let mut name = self.read_segment()?;
        let mut qualified = false;

        while self.source.expect('.')? {
            let segment = self.read_segment()?;
            if segment.is_empty() {
                name.push('.');
                return Err(ParseError::InvalidIdentifier { name, pos });
            }
            name.push('.');
            name.push_str(&segment);
            qualified = true;
        }

        if qualified {
            return Ok(Token::QName(name));
        }
        Ok(match Keyword::lookup(&name) {
            Some(keyword) => Token::Keyword(keyword),
            None => Token::Name(name),
        })
    }

    fn read_integer(&mut self, first: char) -> Result<Token, ParseError> {
        let mut digits = String::from(first);
        while let Some(c) = self.source.get() {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
        }
        self.source.unget()?;
        Ok(Token::Integer(digits))
    }

    fn read_string(&mut self, pos: Position) -> Result<Token, ParseError> {
        let mut value = String::new();
        loop {
            match self.source.get() {
                None | Some('\n') => return Err(ParseError::UnterminatedString { pos }),
                Some('"') => return Ok(Token::Str(value)),
                Some(c) => value.push(c),
            }
        }
    }
}
