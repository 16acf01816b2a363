pub mod source;
pub mod lexer;
pub mod grammar;
pub mod resolver;
pub mod sorter;

use crate::config::Config;
use crate::error::ParseError;
use crate::types::Proto;

/// Parse schema text into a resolved, dependency-ordered `Proto` using the
/// default [`Config`].
///
/// This is the main entry point for the parser module.
pub fn parse(schema_text: &str) -> Result<Proto, ParseError> {
    parse_with("", schema_text, &Config::default())
}

/// Run the full pipeline: parse, resolve type references, then sort
/// messages. Stops at the first fault of any stage.
pub fn parse_with(file_name: &str, schema_text: &str, config: &Config) -> Result<Proto, ParseError> {
    let raw = grammar::parse_proto(file_name, schema_text, config)?;
    let resolved = resolver::resolve(raw, config)?;
    sorter::sort(resolved)
}
