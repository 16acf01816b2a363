use std::collections::HashMap;

use tracing::{debug, trace};

use super::lexer::{Keyword, Lexer, Located, Token};
use crate::config::Config;
use crate::error::{ParseError, Position};
use crate::types::*;

/// Largest field index accepted in a message.
pub const MAX_FIELD_INDEX: u32 = 536_870_911;

/// Parse schema text into a [`RawProto`] whose complex type references are
/// recorded by name only.
pub fn parse_proto(file_name: &str, input: &str, config: &Config) -> Result<RawProto, ParseError> {
    let mut parser = Parser {
        lexer: Lexer::new(input),
        config,
        package: String::new(),
        declared: HashMap::new(),
        unpackaged: None,
        proto: Proto::new(file_name),
    };
    parser.parse_file()?;

    let proto = parser.proto;
    debug!(
        file = %proto.file_name,
        messages = proto.messages.len(),
        enums = proto.enums.len(),
        services = proto.services.len(),
        "parsed schema"
    );
    Ok(RawProto(proto))
}

struct Parser<'a, 'c> {
    lexer: Lexer<'a>,
    config: &'c Config,
    /// The package used to qualify declarations and type references.
    package: String,
    /// Qualified names of top-level declarations seen so far.
    declared: HashMap<String, Position>,
    /// First top-level declaration made while no package was active.
    unpackaged: Option<String>,
    proto: Proto,
}

fn unexpected(expected: impl Into<String>, tok: &Located) -> ParseError {
    ParseError::UnexpectedToken {
        expected: expected.into(),
        found: tok.token.to_string(),
        pos: tok.pos,
    }
}

impl Parser<'_, '_> {
    fn parse_file(&mut self) -> Result<(), ParseError> {
        loop {
            let tok = self.lexer.next()?;
            match tok.token {
                Token::Keyword(Keyword::Syntax) => self.parse_syntax()?,
                Token::Keyword(Keyword::Package) => self.parse_package()?,
                Token::Keyword(Keyword::Option) => {
                    let entry = self.parse_option_statement(tok.pos)?;
                    self.proto.options.insert(entry.name.clone(), entry);
                }
                Token::Keyword(Keyword::Message) => self.parse_message(tok.pos)?,
                Token::Keyword(Keyword::Enum) => self.parse_enum(tok.pos)?,
                Token::Keyword(Keyword::Service) => self.parse_service(tok.pos)?,
                Token::Eof => break,
                _ => return Err(unexpected("a top-level declaration", &tok)),
            }
        }
        Ok(())
    }

    fn parse_syntax(&mut self) -> Result<(), ParseError> {
        self.expect_token(Token::Equals)?;
        let tok = self.lexer.next()?;
        let version = match tok.token {
            Token::Str(version) => version,
            _ => return Err(unexpected("syntax version string", &tok)),
        };
        self.expect_token(Token::Semicolon)?;

        if version != "proto3" {
            return Err(ParseError::UnsupportedSyntax {
                version,
                pos: tok.pos,
            });
        }
        self.proto.syntax = Some(version);
        Ok(())
    }

    fn parse_package(&mut self) -> Result<(), ParseError> {
        let tok = self.lexer.next()?;
        let package = match tok.token {
            Token::Name(name) | Token::QName(name) => name,
            _ => return Err(unexpected("package name", &tok)),
        };
        self.expect_token(Token::Semicolon)?;

        if let Some(declaration) = &self.unpackaged {
            return Err(ParseError::PackageAfterUnpackaged {
                package,
                declaration: declaration.clone(),
                pos: tok.pos,
            });
        }

        trace!(package = %package, "package");
        self.proto.package = package.clone();
        self.package = package;
        Ok(())
    }

    /// `name = value`, shared by standalone and bracketed options.
    fn parse_option(&mut self, line: usize) -> Result<OptionEntry, ParseError> {
        let tok = self.lexer.next()?;
        let name = match tok.token {
            Token::Name(name) | Token::QName(name) => name,
            _ => return Err(unexpected("option name", &tok)),
        };
        self.expect_token(Token::Equals)?;

        let tok = self.lexer.next()?;
        let (kind, value) = match tok.token {
            Token::Keyword(keyword @ (Keyword::True | Keyword::False)) => {
                (OptionKind::Boolean, keyword.as_str().to_string())
            }
            Token::Name(value) | Token::QName(value) => (OptionKind::Identifier, value),
            Token::Integer(value) => (OptionKind::Integer, value),
            Token::Str(value) => (OptionKind::String, value),
            other => {
                return Err(ParseError::InvalidOptionValue {
                    name,
                    found: other.to_string(),
                    pos: tok.pos,
                })
            }
        };

        Ok(OptionEntry {
            name,
            kind,
            value,
            line,
        })
    }

    /// `option name = value ;` with the `option` keyword already consumed.
    fn parse_option_statement(&mut self, start: Position) -> Result<OptionEntry, ParseError> {
        let entry = self.parse_option(start.line)?;
        self.expect_token(Token::Semicolon)?;
        Ok(entry)
    }

    /// `[ name = value, ... ]` with the `[` already consumed.
    fn parse_field_options(&mut self) -> Result<OptionMap, ParseError> {
        let mut options = OptionMap::new();

        let tok = self.lexer.next()?;
        if tok.token == Token::RBracket {
            return Ok(options);
        }
        self.lexer.unget()?;

        loop {
            let line = self.lexer.next()?.pos.line;
            self.lexer.unget()?;
            let entry = self.parse_option(line)?;
            options.insert(entry.name.clone(), entry);

            let tok = self.lexer.next()?;
            match tok.token {
                Token::Comma => continue,
                Token::RBracket => break,
                _ => return Err(unexpected("',' or ']'", &tok)),
            }
        }
        Ok(options)
    }

    fn parse_message(&mut self, start: Position) -> Result<(), ParseError> {
        let name = self.declaration_name("message")?;
        let qualified_name = qualify(&self.package, &name);
        self.declare(&qualified_name, start)?;
        self.expect_token(Token::LBrace)?;

        let mut message = Message {
            name,
            qualified_name,
            fields: Vec::new(),
            options: OptionMap::new(),
            pos: start,
        };

        loop {
            let tok = self.lexer.next()?;
            match tok.token {
                Token::RBrace => break,
                Token::Keyword(Keyword::Option) => {
                    let entry = self.parse_option_statement(tok.pos)?;
                    message.options.insert(entry.name.clone(), entry);
                }
                Token::Eof => return Err(unexpected("field, option or '}'", &tok)),
                _ => {
                    self.lexer.unget()?;
                    let field = self.parse_field(&message)?;
                    message.fields.push(field);
                }
            }
        }

        trace!(name = %message.qualified_name, fields = message.fields.len(), "message");
        self.proto.push_message(message);
        Ok(())
    }

    /// `[repeated] type name = index [options] ;`
    fn parse_field(&mut self, message: &Message) -> Result<Field, ParseError> {
        let mut tok = self.lexer.next()?;
        let repeated = tok.token == Token::Keyword(Keyword::Repeated);
        if repeated {
            tok = self.lexer.next()?;
        }

        let mut type_info = self.parse_type(&tok, "field type")?;
        type_info.repeated = repeated;

        let name_pos = self.peek_position()?;
        let name = self.declaration_name("field")?;
        self.expect_token(Token::Equals)?;
        let index = self.parse_field_index()?;

        let mut tok = self.lexer.next()?;
        let options = if tok.token == Token::LBracket {
            let options = self.parse_field_options()?;
            tok = self.lexer.next()?;
            options
        } else {
            OptionMap::new()
        };
        if tok.token != Token::Semicolon {
            return Err(unexpected("';'", &tok));
        }

        if let Some(previous) = message.find_field_by_index(index) {
            return Err(ParseError::DuplicateFieldIndex {
                message: message.qualified_name.clone(),
                field: name,
                previous: previous.name.clone(),
                index,
                pos: name_pos,
            });
        }
        if self.config.reject_duplicate_member_names && message.find_field_by_name(&name).is_some() {
            return Err(ParseError::DuplicateMemberName {
                member: "field",
                name,
                scope: message.qualified_name.clone(),
                pos: name_pos,
            });
        }

        Ok(Field {
            name,
            index,
            type_info,
            options,
            pos: name_pos,
        })
    }

    /// A scalar keyword or a (possibly qualified) complex type name.
    fn parse_type(&self, tok: &Located, expected: &str) -> Result<TypeInfo, ParseError> {
        match &tok.token {
            Token::Keyword(keyword) => match keyword.scalar() {
                Some(scalar) => Ok(TypeInfo::scalar(scalar, tok.pos)),
                None => Err(unexpected(expected, tok)),
            },
            Token::Name(name) | Token::QName(name) => {
                Ok(TypeInfo::complex(name.clone(), self.package.clone(), tok.pos))
            }
            _ => Err(unexpected(expected, tok)),
        }
    }

    fn parse_field_index(&mut self) -> Result<u32, ParseError> {
        let tok = self.lexer.next()?;
        let digits = match tok.token {
            Token::Integer(digits) => digits,
            _ => return Err(unexpected("field index", &tok)),
        };
        let index: u32 = digits.parse().map_err(|_| ParseError::InvalidInteger {
            value: digits.clone(),
            reason: "field index out of range",
            pos: tok.pos,
        })?;
        if index == 0 || index > MAX_FIELD_INDEX {
            return Err(ParseError::InvalidInteger {
                value: digits,
                reason: "field index out of range",
                pos: tok.pos,
            });
        }
        Ok(index)
    }

    fn parse_enum(&mut self, start: Position) -> Result<(), ParseError> {
        let name = self.declaration_name("enum")?;
        let qualified_name = qualify(&self.package, &name);
        self.declare(&qualified_name, start)?;
        self.expect_token(Token::LBrace)?;

        let mut entity = Enum {
            name,
            qualified_name,
            constants: Vec::new(),
            options: OptionMap::new(),
            pos: start,
        };

        loop {
            let tok = self.lexer.next()?;
            match tok.token {
                Token::RBrace => break,
                Token::Keyword(Keyword::Option) => {
                    let entry = self.parse_option_statement(tok.pos)?;
                    entity.options.insert(entry.name.clone(), entry);
                }
                Token::Eof => return Err(unexpected("constant, option or '}'", &tok)),
                _ => {
                    self.lexer.unget()?;
                    let constant = self.parse_constant(&entity)?;
                    entity.constants.push(constant);
                }
            }
        }

        trace!(name = %entity.qualified_name, constants = entity.constants.len(), "enum");
        self.proto.enums.push(entity);
        Ok(())
    }

    /// `NAME = [-]INTEGER ;`
    fn parse_constant(&mut self, entity: &Enum) -> Result<Constant, ParseError> {
        let pos = self.peek_position()?;
        let name = self.declaration_name("constant")?;
        self.expect_token(Token::Equals)?;

        let mut tok = self.lexer.next()?;
        let negative = tok.token == Token::Minus;
        if negative {
            tok = self.lexer.next()?;
        }
        let digits = match tok.token {
            Token::Integer(digits) => digits,
            _ => return Err(unexpected("constant value", &tok)),
        };
        let magnitude: i64 = digits.parse().map_err(|_| ParseError::InvalidInteger {
            value: digits.clone(),
            reason: "constant value out of range",
            pos: tok.pos,
        })?;
        let signed = if negative { -magnitude } else { magnitude };
        let value = i32::try_from(signed).map_err(|_| ParseError::InvalidInteger {
            value: signed.to_string(),
            reason: "constant value out of range",
            pos: tok.pos,
        })?;
        self.expect_token(Token::Semicolon)?;

        if self.config.reject_duplicate_member_names
            && entity.constants.iter().any(|c| c.name == name)
        {
            return Err(ParseError::DuplicateMemberName {
                member: "constant",
                name,
                scope: entity.qualified_name.clone(),
                pos,
            });
        }

        Ok(Constant { name, value, pos })
    }

    fn parse_service(&mut self, start: Position) -> Result<(), ParseError> {
        let name = self.declaration_name("service")?;
        let qualified_name = qualify(&self.package, &name);
        self.declare(&qualified_name, start)?;
        self.expect_token(Token::LBrace)?;

        let mut service = Service {
            name,
            qualified_name,
            procedures: Vec::new(),
            pos: start,
        };

        loop {
            let tok = self.lexer.next()?;
            match tok.token {
                Token::RBrace => break,
                Token::Keyword(Keyword::Rpc) => {
                    let procedure = self.parse_procedure(tok.pos)?;
                    service.procedures.push(procedure);
                }
                _ => return Err(unexpected("'rpc' or '}'", &tok)),
            }
        }

        trace!(name = %service.qualified_name, procedures = service.procedures.len(), "service");
        self.proto.services.push(service);
        Ok(())
    }

    /// `rpc NAME ( TYPE ) returns ( TYPE )` followed by `;` or `{ }`.
    fn parse_procedure(&mut self, start: Position) -> Result<Procedure, ParseError> {
        let name = self.declaration_name("rpc")?;

        self.expect_token(Token::LParen)?;
        let tok = self.lexer.next()?;
        let request = self.parse_type(&tok, "request type")?;
        self.expect_token(Token::RParen)?;

        self.expect_token(Token::Keyword(Keyword::Returns))?;

        self.expect_token(Token::LParen)?;
        let tok = self.lexer.next()?;
        let response = self.parse_type(&tok, "response type")?;
        self.expect_token(Token::RParen)?;

        let tok = self.lexer.next()?;
        match tok.token {
            Token::Semicolon => {}
            Token::LBrace => {
                let tok = self.lexer.next()?;
                if tok.token != Token::RBrace {
                    return Err(ParseError::NonEmptyRpcBody { name, pos: tok.pos });
                }
            }
            _ => return Err(unexpected("';' or '{'", &tok)),
        }

        Ok(Procedure {
            name,
            request,
            response,
            pos: start,
        })
    }

    // Helper functions

    /// An unqualified, non-reserved name for a new declaration.
    fn declaration_name(&mut self, context: &'static str) -> Result<String, ParseError> {
        let tok = self.lexer.next()?;
        match tok.token {
            Token::Name(name) => Ok(name),
            Token::QName(name) => Err(ParseError::QualifiedName {
                name,
                context,
                pos: tok.pos,
            }),
            _ => Err(unexpected(format!("{} name", context), &tok)),
        }
    }

    fn declare(&mut self, qualified_name: &str, pos: Position) -> Result<(), ParseError> {
        if self.package.is_empty() && self.unpackaged.is_none() {
            self.unpackaged = Some(qualified_name.to_string());
        }
        if let Some(&previous) = self.declared.get(qualified_name) {
            if self.config.reject_duplicate_declarations {
                return Err(ParseError::DuplicateDeclaration {
                    name: qualified_name.to_string(),
                    previous,
                    pos,
                });
            }
            return Ok(());
        }
        self.declared.insert(qualified_name.to_string(), pos);
        Ok(())
    }

    fn peek_position(&mut self) -> Result<Position, ParseError> {
        let pos = self.lexer.next()?.pos;
        self.lexer.unget()?;
        Ok(pos)
    }

    fn expect_token(&mut self, expected: Token) -> Result<(), ParseError> {
        let tok = self.lexer.next()?;
        if tok.token == expected {
            Ok(())
        } else {
            Err(unexpected(expected.to_string(), &tok))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn parse(input: &str) -> Result<RawProto, ParseError> {
        parse_proto("test.proto", input, &Config::default())
    }

    #[test]
    fn test_parse_simple_message() {
        let raw = parse(r#"syntax = "proto3"; package demo; message Point { double x = 1; double y = 2; }"#)
            .unwrap();
        assert_eq!(raw.syntax.as_deref(), Some("proto3"));
        assert_eq!(raw.package, "demo");
        let point = &raw.declared_messages()[0];
        assert_eq!(point.name, "Point");
        assert_eq!(point.qualified_name, "demo.Point");
        assert_eq!(point.fields.len(), 2);
        assert_eq!(point.fields[0].name, "x");
        assert_eq!(point.fields[0].index, 1);
        assert_eq!(point.fields[0].type_info.as_scalar(), Some(ScalarType::Double));
        assert_eq!(point.fields[1].name, "y");
        assert_eq!(point.fields[1].index, 2);
    }

    #[test]
    fn test_complex_type_is_unresolved() {
        let raw = parse("package a.b; message M { repeated Other.Thing t = 3; }").unwrap();
        let field = &raw.declared_messages()[0].fields[0];
        assert!(field.type_info.repeated);
        assert_eq!(field.type_info.type_name(), "Other.Thing");
        assert_eq!(field.type_info.qualified_name(), "a.b.Other.Thing");
        assert_eq!(field.type_info.resolution(), None);
    }

    #[test]
    fn test_package_applies_to_later_declarations_only() {
        let raw = parse("package o; message A {} package p; message B {} enum E {} service S {}").unwrap();
        assert_eq!(raw.declared_messages()[0].qualified_name, "o.A");
        assert_eq!(raw.declared_messages()[1].qualified_name, "p.B");
        assert_eq!(raw.enums[0].qualified_name, "p.E");
        assert_eq!(raw.services[0].qualified_name, "p.S");
        assert_eq!(raw.package, "p");
    }

    #[test]
    fn test_package_after_unpackaged_declaration() {
        let err = parse("enum E { X = 0; }\npackage p;\nmessage B {}").unwrap_err();
        assert_eq!(
            err,
            ParseError::PackageAfterUnpackaged {
                package: "p".into(),
                declaration: "E".into(),
                pos: Position::new(2, 9),
            }
        );
        assert_eq!(err.kind(), ErrorKind::Semantic);

        // options and syntax may still precede the package
        let raw = parse("syntax = \"proto3\"; option a = 1; package p; message B {}").unwrap();
        assert_eq!(raw.declared_messages()[0].qualified_name, "p.B");
    }

    #[test]
    fn test_unsupported_syntax() {
        let err = parse(r#"syntax = "proto2";"#).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedSyntax { ref version, .. } if version == "proto2"));
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_options() {
        let raw = parse(
            r#"
            option java_package = "com.example";
            option optimize_for = SPEED;
            message M {
                option deprecated = true;
                int32 a = 1 [packed = false, json_name = "aa", (x) = 1];
            }
            "#,
        );
        // parenthesized option names are not part of the grammar
        assert!(raw.is_err());

        let raw = parse(
            r#"
            option java_package = "com.example";
            option optimize_for = google.SPEED;
            message M {
                option deprecated = true;
                int32 a = 1 [packed = false, json_name = "aa", max = 10];
                int32 b = 2 [];
            }
            enum E { option allow_alias = true; X = 0; }
            "#,
        )
        .unwrap();
        let java = &raw.options["java_package"];
        assert_eq!(java.kind, OptionKind::String);
        assert_eq!(java.value, "com.example");
        assert_eq!(java.line, 2);
        assert_eq!(raw.options["optimize_for"].kind, OptionKind::Identifier);

        let m = &raw.declared_messages()[0];
        assert_eq!(m.options["deprecated"].kind, OptionKind::Boolean);
        let a = &m.fields[0];
        assert_eq!(a.options.len(), 3);
        assert_eq!(a.options["packed"].value, "false");
        assert_eq!(a.options["json_name"].kind, OptionKind::String);
        assert_eq!(a.options["max"].kind, OptionKind::Integer);
        assert!(m.fields[1].options.is_empty());
        assert_eq!(raw.enums[0].options["allow_alias"].value, "true");
    }

    #[test]
    fn test_invalid_option_value() {
        let err = parse("option x = {;").unwrap_err();
        assert!(matches!(err, ParseError::InvalidOptionValue { ref name, .. } if name == "x"));
        assert_eq!(err.kind(), ErrorKind::Semantic);
    }

    #[test]
    fn test_duplicate_field_index_names_both_fields() {
        let err = parse("message A { int32 x = 1; int32 y = 1; }").unwrap_err();
        match err {
            ParseError::DuplicateFieldIndex {
                field,
                previous,
                index,
                ..
            } => {
                assert_eq!(field, "y");
                assert_eq!(previous, "x");
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_index_same_name() {
        let err = parse("message A { int32 x = 1; int32 x = 2; int32 z = 2; }").unwrap_err();
        assert!(matches!(err, ParseError::DuplicateMemberName { .. }));

        let lenient = Config::lenient();
        let err = parse_proto("t", "message A { int32 x = 1; int32 x = 2; int32 z = 2; }", &lenient)
            .unwrap_err();
        assert!(matches!(err, ParseError::DuplicateFieldIndex { .. }));
    }

    #[test]
    fn test_field_index_range() {
        assert!(matches!(
            parse("message A { int32 x = 0; }"),
            Err(ParseError::InvalidInteger { .. })
        ));
        assert!(matches!(
            parse("message A { int32 x = 536870912; }"),
            Err(ParseError::InvalidInteger { .. })
        ));
        assert!(matches!(
            parse("message A { int32 x = 99999999999999999999; }"),
            Err(ParseError::InvalidInteger { .. })
        ));
        assert!(parse("message A { int32 x = 536870911; }").is_ok());
    }

    #[test]
    fn test_qualified_declaration_names_rejected() {
        for input in [
            "message a.B {}",
            "enum a.B {}",
            "service a.B {}",
            "message A { int32 a.b = 1; }",
            "enum E { a.B = 1; }",
            "service S { rpc a.B (A) returns (A); }",
        ] {
            let err = parse(input).unwrap_err();
            assert!(
                matches!(err, ParseError::QualifiedName { .. }),
                "{}: {:?}",
                input,
                err
            );
        }
    }

    #[test]
    fn test_reserved_word_as_declaration_name_rejected() {
        for input in [
            "message message {}",
            "message A { int32 string = 1; }",
            "enum returns {}",
            "enum E { option = 1; }",
            "service rpc {}",
        ] {
            let err = parse(input).unwrap_err();
            assert!(
                matches!(err, ParseError::UnexpectedToken { .. }),
                "{}: {:?}",
                input,
                err
            );
        }
    }

    #[test]
    fn test_enum_constants() {
        let raw = parse("enum Color { RED = 0; GREEN = 1; NEG = -2; ALIAS = 1; }").unwrap();
        let values: Vec<(&str, i32)> = raw.enums[0]
            .constants
            .iter()
            .map(|c| (c.name.as_str(), c.value))
            .collect();
        assert_eq!(values, vec![("RED", 0), ("GREEN", 1), ("NEG", -2), ("ALIAS", 1)]);

        assert!(matches!(
            parse("enum E { BIG = 2147483648; }"),
            Err(ParseError::InvalidInteger { .. })
        ));
        assert!(parse("enum E { SMALL = -2147483648; }").is_ok());
        assert!(matches!(
            parse("enum E { A = 1; A = 2; }"),
            Err(ParseError::DuplicateMemberName { .. })
        ));
    }

    #[test]
    fn test_service() {
        let raw = parse(
            "service Greeter { rpc Hello (Req) returns (Resp); rpc Bye (a.Req) returns (Resp) {} }",
        )
        .unwrap();
        let svc = &raw.services[0];
        assert_eq!(svc.procedures.len(), 2);
        assert_eq!(svc.procedures[0].name, "Hello");
        assert_eq!(svc.procedures[0].request.type_name(), "Req");
        assert_eq!(svc.procedures[1].request.type_name(), "a.Req");
        assert_eq!(svc.procedures[1].response.type_name(), "Resp");
    }

    #[test]
    fn test_non_empty_rpc_body() {
        let err = parse("service S { rpc Get (A) returns (B) { option deprecated = true; } }")
            .unwrap_err();
        assert!(matches!(err, ParseError::NonEmptyRpcBody { ref name, .. } if name == "Get"));
    }

    #[test]
    fn test_map_fields_unsupported() {
        let err = parse("message M { map<string, int32> m = 1; }").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_duplicate_declarations() {
        let err = parse("message A {} enum A { X = 0; }").unwrap_err();
        assert!(matches!(err, ParseError::DuplicateDeclaration { ref name, .. } if name == "A"));

        let raw = parse_proto("t", "message A {} message A {}", &Config::lenient()).unwrap();
        assert_eq!(raw.declared_messages().len(), 2);
    }

    #[test]
    fn test_unexpected_top_level_token() {
        let err = parse("message A {} 42").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: "a top-level declaration".into(),
                found: "integer '42'".into(),
                pos: Position::new(1, 14),
            }
        );
    }

    #[test]
    fn test_missing_closing_brace() {
        let err = parse("message A { int32 x = 1;").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { ref found, .. } if found == "end of file"));
    }

    #[test]
    fn test_missing_semicolon_reports_position() {
        let err = parse("message A {\n  int32 x = 1\n}").unwrap_err();
        assert_eq!(err.position(), Position::new(3, 1));
    }

    #[test]
    fn test_field_position() {
        let raw = parse("message A {\n    int32 count = 1;\n}").unwrap();
        let field = &raw.declared_messages()[0].fields[0];
        assert_eq!(field.pos, Position::new(2, 11));
        assert_eq!(field.type_info.pos, Position::new(2, 5));
    }
}
