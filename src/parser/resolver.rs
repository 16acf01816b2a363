use std::collections::HashMap;

use tracing::debug;

use crate::config::Config;
use crate::error::ParseError;
use crate::types::*;

/// Link every complex type reference in `raw` to the message or enum it
/// names.
///
/// Lookup is by exact qualified name in a single flat namespace. Messages
/// are searched before enums and the first declaration with a matching name
/// wins.
pub fn resolve(raw: RawProto, config: &Config) -> Result<ResolvedProto, ParseError> {
    let mut proto = raw.0;
    let symbols = SymbolTable::new(&proto);

    let mut resolved = 0usize;
    for message in &mut proto.messages {
        for field in &mut message.fields {
            if symbols.resolve(&mut field.type_info)? {
                resolved += 1;
            }
        }
    }

    for service in &mut proto.services {
        for procedure in &mut service.procedures {
            for (role, type_info) in [
                ("request", &mut procedure.request),
                ("response", &mut procedure.response),
            ] {
                if symbols.resolve(type_info)? {
                    resolved += 1;
                }
                if config.require_message_rpc_types && type_info.message_ref().is_none() {
                    return Err(ParseError::RpcTypeNotMessage {
                        procedure: procedure.name.clone(),
                        role,
                        type_name: type_info.qualified_name(),
                        pos: type_info.pos,
                    });
                }
            }
        }
    }

    debug!(file = %proto.file_name, references = resolved, "resolved type references");
    Ok(ResolvedProto(proto))
}

/// Qualified name to declaration, keeping the first declaration of each
/// name.
struct SymbolTable {
    symbols: HashMap<String, TypeRef>,
}

impl SymbolTable {
    fn new(proto: &Proto) -> Self {
        let mut symbols = HashMap::new();
        for (idx, message) in proto.messages.iter().enumerate() {
            symbols
                .entry(message.qualified_name.clone())
                .or_insert(TypeRef::Message(MessageId(idx)));
        }
        for (idx, entity) in proto.enums.iter().enumerate() {
            symbols
                .entry(entity.qualified_name.clone())
                .or_insert(TypeRef::Enum(EnumId(idx)));
        }
        SymbolTable { symbols }
    }

    /// Fill the resolution slot of a complex type. Returns `false` for
    /// scalars.
    fn resolve(&self, type_info: &mut TypeInfo) -> Result<bool, ParseError> {
        let pos = type_info.pos;
        let TypeKind::Complex {
            name,
            package,
            resolved,
        } = &mut type_info.kind
        else {
            return Ok(false);
        };

        let qualified_name = qualify(package, name);
        match self.symbols.get(&qualified_name) {
            Some(&target) => {
                *resolved = Some(target);
                Ok(true)
            }
            None => Err(ParseError::UnresolvedType {
                type_name: qualified_name,
                pos,
            }),
        }
    }
}
