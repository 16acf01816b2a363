//! Render a [`Proto`] back to schema text.

use std::fmt::{self, Write};

use crate::types::*;

const INDENT: &str = "    ";

/// Format `proto` as schema source. Messages are written in output order,
/// followed by enums and services in declaration order. A `package`
/// statement precedes every run of declarations from the same package.
pub fn print(proto: &Proto) -> String {
    let mut out = String::new();
    let _ = write_proto(&mut out, proto);
    out
}

impl fmt::Display for Proto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_proto(f, self)
    }
}

fn write_proto(out: &mut impl Write, proto: &Proto) -> fmt::Result {
    writeln!(out, "syntax = \"{}\";", proto.syntax.as_deref().unwrap_or("proto3"))?;

    let mut package = first_package(proto);
    if !package.is_empty() {
        writeln!(out, "\npackage {};", package)?;
    }
    if !proto.options.is_empty() {
        writeln!(out)?;
        for entry in proto.options.values() {
            writeln!(out, "option {};", option_text(entry))?;
        }
    }
    for message in proto.messages() {
        switch_package(out, &mut package, package_of(&message.qualified_name, &message.name))?;
        writeln!(out)?;
        write_message(out, message)?;
    }
    for entity in &proto.enums {
        switch_package(out, &mut package, package_of(&entity.qualified_name, &entity.name))?;
        writeln!(out)?;
        write_enum(out, entity)?;
    }
    for service in &proto.services {
        switch_package(out, &mut package, package_of(&service.qualified_name, &service.name))?;
        writeln!(out)?;
        write_service(out, service)?;
    }
    switch_package(out, &mut package, proto.package.as_str())
}

/// The package of the first declaration written, or the file's package when
/// there are no declarations.
fn first_package(proto: &Proto) -> &str {
    proto
        .messages()
        .map(|m| package_of(&m.qualified_name, &m.name))
        .chain(proto.enums.iter().map(|e| package_of(&e.qualified_name, &e.name)))
        .chain(proto.services.iter().map(|s| package_of(&s.qualified_name, &s.name)))
        .next()
        .unwrap_or(proto.package.as_str())
}

fn package_of<'a>(qualified_name: &'a str, name: &str) -> &'a str {
    qualified_name
        .strip_suffix(name)
        .and_then(|prefix| prefix.strip_suffix('.'))
        .unwrap_or("")
}

/// Write a `package` statement when `next` differs from the active package.
/// Parsed schemas never return to the empty package, so there is nothing to
/// write for it.
fn switch_package<'a>(out: &mut impl Write, current: &mut &'a str, next: &'a str) -> fmt::Result {
    if *current == next || next.is_empty() {
        return Ok(());
    }
    *current = next;
    writeln!(out, "\npackage {};", next)
}

fn write_message(out: &mut impl Write, message: &Message) -> fmt::Result {
    writeln!(out, "message {} {{", message.name)?;
    for entry in message.options.values() {
        writeln!(out, "{}option {};", INDENT, option_text(entry))?;
    }
    for field in &message.fields {
        write!(out, "{}", INDENT)?;
        if field.type_info.repeated {
            write!(out, "repeated ")?;
        }
        write!(out, "{} {} = {}", field.type_info.type_name(), field.name, field.index)?;
        if !field.options.is_empty() {
            let options: Vec<String> = field.options.values().map(option_text).collect();
            write!(out, " [{}]", options.join(", "))?;
        }
        writeln!(out, ";")?;
    }
    writeln!(out, "}}")
}

fn write_enum(out: &mut impl Write, entity: &Enum) -> fmt::Result {
    writeln!(out, "enum {} {{", entity.name)?;
    for entry in entity.options.values() {
        writeln!(out, "{}option {};", INDENT, option_text(entry))?;
    }
    for constant in &entity.constants {
        writeln!(out, "{}{} = {};", INDENT, constant.name, constant.value)?;
    }
    writeln!(out, "}}")
}

fn write_service(out: &mut impl Write, service: &Service) -> fmt::Result {
    writeln!(out, "service {} {{", service.name)?;
    for procedure in &service.procedures {
        writeln!(
            out,
            "{}rpc {} ({}) returns ({});",
            INDENT,
            procedure.name,
            procedure.request.type_name(),
            procedure.response.type_name()
        )?;
    }
    writeln!(out, "}}")
}

fn option_text(entry: &OptionEntry) -> String {
    match entry.kind {
        OptionKind::String => format!("{} = \"{}\"", entry.name, entry.value),
        OptionKind::Identifier | OptionKind::Integer | OptionKind::Boolean => {
            format!("{} = {}", entry.name, entry.value)
        }
    }
}
