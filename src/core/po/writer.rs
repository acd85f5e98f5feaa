use std::fmt::Write as _;

use super::{ISOLATE_END, ISOLATE_START, escape};
use crate::core::catalog::{Catalog, Comment, Entry, Flag, Location};

const OBSOLETE_PREFIX: &str = "#~ ";

/// Serialize a catalog: the header block, then one block per entry in
/// catalog order, separated by blank lines.
pub fn to_text(catalog: &Catalog) -> String {
    let mut out = String::new();

    out.push_str("msgid \"\"\nmsgstr \"\"\n");
    for (name, value) in catalog.header.iter() {
        let _ = writeln!(out, "\"{}\"", escape(&format!("{}: {}\n", name, value)));
    }

    for entry in catalog.iter() {
        out.push('\n');
        write_entry(&mut out, entry, catalog.locale.as_deref());
    }
    out
}

fn write_entry(out: &mut String, entry: &Entry, locale: Option<&str>) {
    for comment in &entry.comments {
        let (marker, text) = match comment {
            Comment::Translator(text) => ("#", text),
            Comment::Extracted(text) => ("#.", text),
        };
        // A comment line cannot hold a newline; each line gets its own marker.
        for line in text.split('\n') {
            if line.is_empty() && marker == "#" {
                out.push_str("#\n");
            } else {
                let _ = writeln!(out, "{} {}", marker, line);
            }
        }
    }
    for location in &entry.locations {
        let _ = writeln!(out, "#: {}", reference(location));
    }

    let flags: Vec<String> = entry
        .flags
        .iter()
        .filter(|f| **f != Flag::Obsolete)
        .map(Flag::to_string)
        .collect();
    if !flags.is_empty() {
        let _ = writeln!(out, "#, {}", flags.join(", "));
    }

    let prefix = if entry.is_obsolete() {
        OBSOLETE_PREFIX
    } else {
        ""
    };
    write_string(out, prefix, "msgid", &entry.key);

    let forms = locale.and_then(|l| entry.translation(l)).unwrap_or_default();
    match &entry.plural_key {
        Some(plural) => {
            write_string(out, prefix, "msgid_plural", plural);
            for i in 0..forms.len().max(2) {
                let form = forms.get(i).map(String::as_str).unwrap_or_default();
                write_string(out, prefix, &format!("msgstr[{}]", i), form);
            }
        }
        None => {
            let form = forms.first().map(String::as_str).unwrap_or_default();
            write_string(out, prefix, "msgstr", form);
        }
    }
}

/// A location as written on a `#:` line. Paths containing whitespace are
/// wrapped in isolates so the line still splits into one token per reference.
fn reference(location: &Location) -> String {
    if !location.path.contains(char::is_whitespace) {
        return location.to_string();
    }
    let path = format!("{}{}{}", ISOLATE_START, location.path, ISOLATE_END);
    Location::new(path, location.line).to_string()
}

/// Write `directive "value"`, switching to one continuation line per
/// newline-terminated segment when the value spans several lines.
fn write_string(out: &mut String, prefix: &str, directive: &str, value: &str) {
    let segments: Vec<&str> = value.split_inclusive('\n').collect();
    if segments.len() <= 1 {
        let _ = writeln!(out, "{}{} \"{}\"", prefix, directive, escape(value));
        return;
    }
    let _ = writeln!(out, "{}{} \"\"", prefix, directive);
    for segment in segments {
        let _ = writeln!(out, "{}\"{}\"", prefix, escape(segment));
    }
}
