use tracing::{debug, trace};

use crate::error::ParseError;
use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Reorder messages so that every message comes after the messages its
/// fields refer to.
///
/// Self-reference is allowed. Any other cycle is a
/// [`ParseError::CircularReference`].
pub fn sort(resolved: ResolvedProto) -> Result<Proto, ParseError> {
    let mut proto = resolved.0;
    proto.order = dependency_order(&proto)?;
    debug!(file = %proto.file_name, messages = proto.order.len(), "sorted messages");
    Ok(proto)
}

/// Depth-first post-order over message-typed fields, starting from each
/// message in the current order.
fn dependency_order(proto: &Proto) -> Result<Vec<MessageId>, ParseError> {
    let mut marks = vec![Mark::Unvisited; proto.messages.len()];
    let mut output = Vec::with_capacity(proto.messages.len());
    // (message, index of the next field to inspect)
    let mut stack: Vec<(MessageId, usize)> = Vec::new();

    for &root in &proto.order {
        if marks[root.0] != Mark::Unvisited {
            continue;
        }
        marks[root.0] = Mark::InProgress;
        stack.push((root, 0));

        while let Some(&(id, next)) = stack.last() {
            let fields = &proto.messages[id.0].fields;

            let Some(field) = fields.get(next) else {
                marks[id.0] = Mark::Done;
                output.push(id);
                stack.pop();
                trace!(name = %proto.messages[id.0].qualified_name, position = output.len() - 1, "placed");
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }

            let Some(dep) = field.type_info.message_ref() else {
                continue;
            };
            if dep == id {
                continue;
            }
            match marks[dep.0] {
                Mark::Done => {}
                Mark::Unvisited => {
                    marks[dep.0] = Mark::InProgress;
                    stack.push((dep, 0));
                }
                Mark::InProgress => return Err(cycle_error(proto, &stack, dep, field)),
            }
        }
    }

    Ok(output)
}

fn cycle_error(proto: &Proto, stack: &[(MessageId, usize)], target: MessageId, field: &Field) -> ParseError {
    let start = stack
        .iter()
        .position(|&(id, _)| id == target)
        .unwrap_or(0);
    let mut path: Vec<&str> = stack[start..]
        .iter()
        .map(|&(id, _)| proto.messages[id.0].qualified_name.as_str())
        .collect();
    path.push(&proto.messages[target.0].qualified_name);

    ParseError::CircularReference {
        message: proto.messages[target.0].qualified_name.clone(),
        cycle: path.join(" -> "),
        pos: field.pos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::parser::{grammar, resolver};

    fn sort_str(input: &str) -> Result<Proto, ParseError> {
        let config = Config::default();
        let raw = grammar::parse_proto("test.proto", input, &config)?;
        sort(resolver::resolve(raw, &config)?)
    }

    fn names(proto: &Proto) -> Vec<&str> {
        proto.messages().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_already_ordered() {
        let proto = sort_str("message B {} message A { B b = 1; }").unwrap();
        assert_eq!(names(&proto), ["B", "A"]);
    }

    #[test]
    fn test_reorders_forward_reference() {
        let proto = sort_str("message A { B b = 1; } message B {}").unwrap();
        assert_eq!(names(&proto), ["B", "A"]);
        // arena keeps declaration order
        assert_eq!(proto.declared_messages()[0].name, "A");
    }

    #[test]
    fn test_self_reference_is_not_a_cycle() {
        let proto = sort_str("message A { A self = 1; repeated A children = 2; }").unwrap();
        assert_eq!(names(&proto), ["A"]);
    }

    #[test]
    fn test_two_message_cycle() {
        let err = sort_str("message A { B b = 1; } message B { A a = 1; }").unwrap_err();
        match err {
            ParseError::CircularReference { message, cycle, .. } => {
                assert_eq!(message, "A");
                assert_eq!(cycle, "A -> B -> A");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_longer_cycle_reports_path() {
        let err = sort_str(
            "package p; message Root { A a = 1; } message A { B b = 1; } message B { C c = 1; } message C { A a = 1; }",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ParseError::CircularReference { ref message, ref cycle, .. }
                if message == "p.A" && cycle == "p.A -> p.B -> p.C -> p.A"
        ));
    }

    #[test]
    fn test_enum_fields_are_not_dependencies() {
        let proto = sort_str("message A { E e = 1; } enum E { X = 0; } message B { A a = 1; }").unwrap();
        assert_eq!(names(&proto), ["A", "B"]);
    }

    #[test]
    fn test_diamond() {
        let proto = sort_str(
            "message Top { Left l = 1; Right r = 2; } message Left { Base b = 1; } message Right { Base b = 1; } message Base {}",
        )
        .unwrap();
        assert_eq!(names(&proto), ["Base", "Left", "Right", "Top"]);
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let mut input = String::new();
        for i in 0..2000 {
            input.push_str(&format!("message M{} {{ M{} next = 1; }}\n", i, i + 1));
        }
        input.push_str("message M2000 {}\n");
        let proto = sort_str(&input).unwrap();
        let order = names(&proto);
        assert_eq!(order.first(), Some(&"M2000"));
        assert_eq!(order.last(), Some(&"M0"));
    }
}
