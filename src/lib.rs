//! Protop: a front end for a small proto3-like interface definition language.
//!
//! Schema text goes through three explicitly sequenced stages:
//!
//! 1. [`parser::grammar::parse_proto`] tokenizes and parses the text into a
//!    [`RawProto`], recording complex type references by name.
//! 2. [`parser::resolver::resolve`] links every reference to the message or
//!    enum it names, producing a [`ResolvedProto`].
//! 3. [`parser::sorter::sort`] orders messages so no message precedes one of
//!    its dependencies, producing the final [`Proto`].
//!
//! Each stage stops at the first fault and returns a [`ParseError`] carrying
//! the source position.
//!
//! # Quick Start
//!
//! ```rust
//! use protop::parser;
//!
//! let proto = parser::parse(r#"
//!     syntax = "proto3";
//!     package demo;
//!     message Line { Point from = 1; Point to = 2; }
//!     message Point { double x = 1; double y = 2; }
//! "#).unwrap();
//!
//! let order: Vec<_> = proto.messages().map(|m| m.qualified_name.as_str()).collect();
//! assert_eq!(order, ["demo.Point", "demo.Line"]);
//!
//! let line = proto.get_message("demo.Line").unwrap();
//! let target = proto.resolve(&line.fields[0].type_info).unwrap();
//! assert_eq!(target.qualified_name(), "demo.Point");
//! ```

pub mod config;
pub mod error;
pub mod parser;
pub mod printer;
pub mod types;

pub use config::Config;
pub use error::{ErrorKind, ParseError, Position};
pub use parser::{parse, parse_with};
pub use types::{
    Constant, Enum, EnumId, Field, Message, MessageId, OptionEntry, OptionKind, OptionMap,
    Procedure, Proto, RawProto, Resolved, ResolvedProto, ScalarType, Service, TypeInfo, TypeKind,
    TypeRef,
};
