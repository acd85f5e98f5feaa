use std::collections::BTreeSet;

use thiserror::Error;

use super::{ISOLATE_END, ISOLATE_START};
use crate::core::catalog::{Catalog, Comment, Entry, Flag, Header, LANGUAGE, Location};

/// Malformed catalog text, with the 1-based line where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unterminated string")]
    UnterminatedString,
    #[error("invalid escape sequence `\\{0}`")]
    InvalidEscape(char),
    #[error("message block has no msgid")]
    MissingMsgid,
    #[error("msgid has no msgstr")]
    MissingMsgstr,
    #[error("duplicate msgid \"{0}\"")]
    DuplicateKey(String),
    #[error("unexpected line `{0}`")]
    UnexpectedLine(String),
    #[error("invalid plural index")]
    InvalidPluralIndex,
    #[error("translation in a catalog without a Language header")]
    TranslationInTemplate,
}

fn fail<T>(line: usize, kind: ParseErrorKind) -> Result<T, ParseError> {
    Err(ParseError { line, kind })
}

/// Parse catalog text. The first block is the header when its msgid is empty;
/// the catalog locale comes from its `Language` field.
pub fn from_text(text: &str) -> Result<Catalog, ParseError> {
    parse(text, None)
}

/// Parse catalog text known to hold `locale`, whatever its header says.
pub fn from_text_for_locale(text: &str, locale: &str) -> Result<Catalog, ParseError> {
    let mut catalog = parse(text, Some(locale))?;
    catalog.set_locale(Some(locale.to_string()));
    Ok(catalog)
}

fn parse(text: &str, locale: Option<&str>) -> Result<Catalog, ParseError> {
    let mut parser = Parser {
        locale_override: locale.map(str::to_string),
        ..Default::default()
    };
    parser.catalog.locale = parser.locale_override.clone();
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    for (index, raw) in text.lines().enumerate() {
        parser.line(raw, index + 1)?;
    }
    parser.finish_block()?;
    Ok(parser.catalog)
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Msgid,
    MsgidPlural,
    Msgstr(usize),
}

#[derive(Debug, Default)]
struct Block {
    /// 0 until the block has seen a line.
    start_line: usize,
    comments: Vec<Comment>,
    locations: Vec<Location>,
    flags: BTreeSet<Flag>,
    obsolete: bool,
    msgid: Option<String>,
    msgid_line: usize,
    msgid_plural: Option<String>,
    /// (plural index, value, line)
    msgstr: Vec<(Option<usize>, String, usize)>,
    last: Option<Field>,
}

impl Block {
    fn touch(&mut self, line: usize) {
        if self.start_line == 0 {
            self.start_line = line;
        }
    }
}

#[derive(Default)]
struct Parser {
    catalog: Catalog,
    block: Block,
    blocks_seen: usize,
    locale_override: Option<String>,
}

impl Parser {
    fn line(&mut self, raw: &str, n: usize) -> Result<(), ParseError> {
        // Comment text keeps its trailing whitespace; only the line ending goes.
        let line = raw.trim_start().trim_end_matches('\r');
        if line.trim_end().is_empty() {
            return self.finish_block();
        }

        let (line, obsolete) = match line.strip_prefix("#~") {
            Some(rest) => (rest.trim_start(), true),
            None => (line, false),
        };
        if line.trim_end().is_empty() {
            return Ok(());
        }

        if line.starts_with('#') {
            if !self.block.msgstr.is_empty() {
                self.finish_block()?;
            }
            self.block.touch(n);
            self.comment(line);
            return Ok(());
        }

        self.directive(line.trim_end(), n, obsolete)
    }

    fn comment(&mut self, line: &str) {
        let block = &mut self.block;
        if let Some(rest) = line.strip_prefix("#:") {
            block.locations.extend(split_references(rest));
        } else if let Some(rest) = line.strip_prefix("#,") {
            block.flags.extend(
                rest.split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(Flag::from),
            );
        } else if let Some(rest) = line.strip_prefix("#.") {
            let text = rest.strip_prefix(' ').unwrap_or(rest);
            block.comments.push(Comment::Extracted(text.to_string()));
        } else if line.starts_with("#|") {
            // Previous msgid of a fuzzy match; not modelled.
        } else {
            let rest = &line[1..];
            let text = rest.strip_prefix(' ').unwrap_or(rest);
            block.comments.push(Comment::Translator(text.to_string()));
        }
    }

    fn directive(&mut self, line: &str, n: usize, obsolete: bool) -> Result<(), ParseError> {
        if let Some(rest) = line.strip_prefix("msgid_plural") {
            if self.block.msgid.is_none() {
                return fail(n, ParseErrorKind::MissingMsgid);
            }
            self.block.msgid_plural = Some(parse_quoted(rest, n)?);
            self.block.last = Some(Field::MsgidPlural);
        } else if let Some(rest) = line.strip_prefix("msgid") {
            if self.block.msgid.is_some() {
                if self.block.msgstr.is_empty() {
                    return fail(self.block.msgid_line, ParseErrorKind::MissingMsgstr);
                }
                self.finish_block()?;
            }
            self.block.touch(n);
            self.block.msgid = Some(parse_quoted(rest, n)?);
            self.block.msgid_line = n;
            self.block.last = Some(Field::Msgid);
        } else if let Some(rest) = line.strip_prefix("msgstr") {
            if self.block.msgid.is_none() {
                return fail(n, ParseErrorKind::MissingMsgid);
            }
            let (index, rest) = match rest.strip_prefix('[') {
                Some(indexed) => {
                    let (number, rest) = indexed
                        .split_once(']')
                        .ok_or(ParseError {
                            line: n,
                            kind: ParseErrorKind::InvalidPluralIndex,
                        })?;
                    let index = number.trim().parse::<usize>().map_err(|_| ParseError {
                        line: n,
                        kind: ParseErrorKind::InvalidPluralIndex,
                    })?;
                    (Some(index), rest)
                }
                None => (None, rest),
            };
            let value = parse_quoted(rest, n)?;
            self.block.msgstr.push((index, value, n));
            self.block.last = Some(Field::Msgstr(self.block.msgstr.len() - 1));
        } else if line.starts_with('"') {
            let value = parse_quoted(line, n)?;
            let block = &mut self.block;
            match block.last {
                Some(Field::Msgid) => block.msgid.get_or_insert_default().push_str(&value),
                Some(Field::MsgidPlural) => {
                    block.msgid_plural.get_or_insert_default().push_str(&value)
                }
                Some(Field::Msgstr(i)) => block.msgstr[i].1.push_str(&value),
                None => return fail(n, ParseErrorKind::UnexpectedLine(line.to_string())),
            }
        } else {
            return fail(n, ParseErrorKind::UnexpectedLine(line.to_string()));
        }

        if obsolete {
            self.block.obsolete = true;
        }
        Ok(())
    }

    fn finish_block(&mut self) -> Result<(), ParseError> {
        let block = std::mem::take(&mut self.block);
        if block.start_line == 0 {
            return Ok(());
        }
        let Some(key) = block.msgid else {
            return fail(block.start_line, ParseErrorKind::MissingMsgid);
        };
        if block.msgstr.is_empty() {
            return fail(block.msgid_line, ParseErrorKind::MissingMsgstr);
        }

        self.blocks_seen += 1;
        if self.blocks_seen == 1 && key.is_empty() && !block.obsolete {
            self.read_header(&block.msgstr[0].1);
            return Ok(());
        }

        if self.catalog.contains(&key) {
            return fail(block.msgid_line, ParseErrorKind::DuplicateKey(key));
        }

        let mut msgstr = block.msgstr;
        let indexed = msgstr.iter().any(|(index, ..)| index.is_some());
        if indexed != block.msgid_plural.is_some() {
            return fail(msgstr[0].2, ParseErrorKind::InvalidPluralIndex);
        }
        msgstr.sort_by_key(|(index, ..)| index.unwrap_or(0));
        for (position, (index, _, line)) in msgstr.iter().enumerate() {
            if index.unwrap_or(0) != position {
                return fail(*line, ParseErrorKind::InvalidPluralIndex);
            }
        }

        let mut entry = Entry::new(key);
        entry.plural_key = block.msgid_plural;
        entry.locations = Vec::with_capacity(block.locations.len());
        for location in block.locations {
            entry.add_location(location);
        }
        entry.comments = block.comments;
        entry.flags = block.flags;
        if block.obsolete {
            entry.flags.insert(Flag::Obsolete);
        }

        if msgstr.iter().any(|(_, value, _)| !value.is_empty()) {
            let Some(locale) = self.catalog.locale.clone() else {
                return fail(msgstr[0].2, ParseErrorKind::TranslationInTemplate);
            };
            let forms = msgstr.into_iter().map(|(_, value, _)| value).collect();
            entry.translations.insert(locale, forms);
        }

        // Key uniqueness was checked above.
        let _ = self.catalog.insert(entry);
        Ok(())
    }

    fn read_header(&mut self, text: &str) {
        let mut header = Header::new();
        for line in text.lines() {
            if let Some((name, value)) = line.split_once(':') {
                header.set(name.trim(), value.trim());
            }
        }
        let locale = self.locale_override.clone().or_else(|| {
            header
                .get(LANGUAGE)
                .filter(|code| !code.is_empty())
                .map(str::to_string)
        });
        self.catalog.header = header;
        self.catalog.locale = locale;
    }
}

/// Split a `#:` line into references. Whitespace separates references except
/// inside an isolate-wrapped path.
fn split_references(text: &str) -> Vec<Location> {
    let mut locations = Vec::new();
    let mut token = String::new();
    let mut isolated = false;
    for c in text.chars() {
        match c {
            ISOLATE_START => isolated = true,
            ISOLATE_END => isolated = false,
            c if c.is_whitespace() && !isolated => {
                if !token.is_empty() {
                    locations.push(Location::parse(&token));
                    token.clear();
                }
            }
            c => token.push(c),
        }
    }
    if !token.is_empty() {
        locations.push(Location::parse(&token));
    }
    locations
}

/// Parse `"…"` (surrounding whitespace allowed) into its unescaped value.
fn parse_quoted(text: &str, line: usize) -> Result<String, ParseError> {
    let text = text.trim();
    let Some(body) = text.strip_prefix('"') else {
        return fail(line, ParseErrorKind::UnexpectedLine(text.to_string()));
    };

    let mut value = String::with_capacity(body.len());
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                let trailing = body[i + 1..].trim();
                if !trailing.is_empty() {
                    return fail(line, ParseErrorKind::UnexpectedLine(text.to_string()));
                }
                return Ok(value);
            }
            '\\' => {
                let Some((_, escaped)) = chars.next() else {
                    break;
                };
                value.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    'a' => '\u{7}',
                    'b' => '\u{8}',
                    'v' => '\u{b}',
                    'f' => '\u{c}',
                    '\\' => '\\',
                    '"' => '"',
                    other => return fail(line, ParseErrorKind::InvalidEscape(other)),
                });
            }
            c => value.push(c),
        }
    }
    fail(line, ParseErrorKind::UnterminatedString)
}
