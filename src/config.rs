/// Strictness switches for the schema pipeline.
///
/// The defaults reject schemas that downstream code generators cannot
/// handle. [`Config::lenient`] accepts everything the bare grammar accepts
/// and resolves duplicate names to the first declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Reject a second top-level message, enum or service with an
    /// already-declared qualified name.
    pub reject_duplicate_declarations: bool,
    /// Reject a repeated field name within a message or a repeated constant
    /// name within an enum.
    pub reject_duplicate_member_names: bool,
    /// Require every rpc request and response type to resolve to a message.
    pub require_message_rpc_types: bool,
}

impl Config {
    pub fn lenient() -> Self {
        Config {
            reject_duplicate_declarations: false,
            reject_duplicate_member_names: false,
            require_message_rpc_types: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            reject_duplicate_declarations: true,
            reject_duplicate_member_names: true,
            require_message_rpc_types: true,
        }
    }
}
