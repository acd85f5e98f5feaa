//! Call-site extraction of translatable literals from JavaScript sources.
//!
//! Which calls are translatable is data, not code: each [`ExtractionRule`]
//! names a function and the argument positions holding the message and,
//! optionally, its plural form. The scanner finds every call of a configured
//! function outside comments and string literals, splits the argument list and
//! captures the literal at each configured position.
//!
//! ```ignore
//! _("Add files")                       // message = "Add files"
//! plupload.translate('Stop upload')    // message = "Stop upload"
//! _n("%d file", "%d files", count)     // message + plural
//! _("Uploaded " + n)                   // unresolved: kept, flagged needs-review
//! ```

use std::{fs, path::PathBuf};

use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{catalog::Location, line_index::LineIndex};
use crate::error::{Error, Result};

// ============================================================
// Rules
// ============================================================

/// One row of the extraction table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRule {
    /// Callee as written at the call site, e.g. `_` or `plupload.translate`.
    pub function: String,
    /// 0-based position of the message argument.
    #[serde(default)]
    pub message_arg: usize,
    /// 0-based position of the plural form argument.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural_arg: Option<usize>,
}

impl ExtractionRule {
    pub fn new(function: impl Into<String>, message_arg: usize) -> Self {
        Self {
            function: function.into(),
            message_arg,
            plural_arg: None,
        }
    }

    pub fn with_plural(mut self, plural_arg: usize) -> Self {
        self.plural_arg = Some(plural_arg);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let valid_segment = |s: &str| {
            let mut chars = s.chars();
            chars
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
                && chars.all(is_identifier_char)
        };
        if !self.function.split('.').all(valid_segment) {
            return Err(Error::InvalidParameter {
                name: "rules",
                reason: format!("\"{}\" is not a function name", self.function),
            });
        }
        if self.plural_arg == Some(self.message_arg) {
            return Err(Error::InvalidParameter {
                name: "rules",
                reason: format!(
                    "\"{}\" uses argument {} for both message and plural",
                    self.function, self.message_arg
                ),
            });
        }
        Ok(())
    }
}

/// Call conventions used by the plupload sources.
pub fn default_rules() -> Vec<ExtractionRule> {
    vec![
        ExtractionRule::new("_", 0),
        ExtractionRule::new("plupload.translate", 0),
        ExtractionRule::new("_n", 0).with_plural(1),
    ]
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

// ============================================================
// Extractions
// ============================================================

/// A message candidate found at one call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExtraction {
    pub key: String,
    pub plural_key: Option<String>,
    pub location: Location,
    /// Set when an argument was not a single string literal; the key then holds
    /// the argument's source text verbatim.
    pub needs_review: bool,
}

/// A call argument, either a decoded literal or the raw expression text.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Argument {
    Literal(String),
    Unresolved(String),
}

impl Argument {
    fn into_parts(self) -> (String, bool) {
        match self {
            Argument::Literal(value) => (value, false),
            Argument::Unresolved(source) => (source, true),
        }
    }
}

// ============================================================
// Scanner
// ============================================================

struct CallMatcher {
    rule: ExtractionRule,
    pattern: Regex,
}

/// Scanner for one extraction run.
pub struct SourceScanner {
    matchers: Vec<CallMatcher>,
}

impl SourceScanner {
    pub fn new(rules: &[ExtractionRule]) -> Result<Self> {
        if rules.is_empty() {
            return Err(Error::MissingParameter("rules"));
        }
        let matchers = rules
            .iter()
            .map(|rule| {
                rule.validate()?;
                let pattern = Regex::new(&format!(r"{}\s*\(", regex::escape(&rule.function)))
                    .map_err(|e| Error::InvalidParameter {
                        name: "rules",
                        reason: e.to_string(),
                    })?;
                Ok(CallMatcher {
                    rule: rule.clone(),
                    pattern,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { matchers })
    }

    /// Read and scan every file, keeping input order.
    ///
    /// Files are read in parallel; the first unreadable file fails the whole
    /// run so no partial result ever reaches a catalog.
    pub fn scan_files(self, paths: &[PathBuf]) -> Result<Vec<RawExtraction>> {
        let sources = paths
            .par_iter()
            .map(|path| {
                fs::read_to_string(path)
                    .map(|content| (path, content))
                    .map_err(|e| Error::read(path, e))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(sources
            .iter()
            .flat_map(|(path, content)| self.scan_source(&path.to_string_lossy(), content))
            .collect())
    }

    /// Scan one source text. `label` becomes the path of every location.
    pub fn scan_source(&self, label: &str, content: &str) -> Vec<RawExtraction> {
        let code = CodeMask::new(content);
        let lines = LineIndex::new(content);

        // (open paren offset, callee start, matcher)
        let mut calls: Vec<(usize, usize, &CallMatcher)> = Vec::new();
        for matcher in &self.matchers {
            for m in matcher.pattern.find_iter(content) {
                let preceded_by_identifier = content[..m.start()]
                    .chars()
                    .next_back()
                    .is_some_and(|c| is_identifier_char(c) || c == '.');
                if preceded_by_identifier || !code.is_code(m.start()) {
                    continue;
                }
                calls.push((m.end(), m.start(), matcher));
            }
        }
        // Same call matched by two rules: the longer callee wins.
        calls.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then(b.2.rule.function.len().cmp(&a.2.rule.function.len()))
        });
        calls.dedup_by_key(|call| call.0);

        let mut extractions = Vec::new();
        for (args_start, callee_start, matcher) in calls {
            let rule = &matcher.rule;
            let line = lines.line_of(callee_start);
            let Some(args) = split_arguments(content, args_start) else {
                debug!(file = label, line, function = %rule.function, "unterminated call");
                continue;
            };
            let Some(message) = args.get(rule.message_arg) else {
                debug!(file = label, line, function = %rule.function, "call has no message argument");
                continue;
            };

            let (key, mut needs_review) = classify_argument(message).into_parts();
            let plural_key = rule
                .plural_arg
                .and_then(|i| args.get(i))
                .map(|plural| {
                    let (plural, unresolved) = classify_argument(plural).into_parts();
                    needs_review |= unresolved;
                    plural
                });

            debug!(file = label, line, key = %key, needs_review, "extracted");
            extractions.push(RawExtraction {
                key,
                plural_key,
                location: Location::new(label, line),
                needs_review,
            });
        }
        extractions
    }
}

// ============================================================
// Lexing helpers
// ============================================================

/// Marks which bytes of a source are code, as opposed to comments and
/// string literals, so call patterns inside them are ignored.
struct CodeMask {
    code: Vec<bool>,
}

impl CodeMask {
    fn new(content: &str) -> Self {
        let bytes = content.as_bytes();
        let mut code = vec![true; bytes.len()];
        let mut i = 0;
        while i < bytes.len() {
            let start = i;
            let end = match bytes[i] {
                b'/' if bytes.get(i + 1) == Some(&b'/') => {
                    find_byte(bytes, i + 2, b'\n').unwrap_or(bytes.len())
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => find_block_end(bytes, i + 2),
                q @ (b'\'' | b'"' | b'`') => skip_string(bytes, i, q),
                _ => {
                    i += 1;
                    continue;
                }
            };
            code[start..end].iter_mut().for_each(|c| *c = false);
            i = end.max(start + 1);
        }
        Self { code }
    }

    fn is_code(&self, offset: usize) -> bool {
        self.code.get(offset).copied().unwrap_or(false)
    }
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes[from.min(bytes.len())..]
        .iter()
        .position(|&b| b == needle)
        .map(|p| from + p)
}

fn find_block_end(bytes: &[u8], from: usize) -> usize {
    let mut i = from;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return i + 2;
        }
        i += 1;
    }
    bytes.len()
}

/// Offset just past the string literal opening at `start`.
///
/// Quote and double-quote strings also stop at an unescaped newline, which
/// limits the damage when a regex literal contains a stray quote.
fn skip_string(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' if quote != b'`' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Split the argument list starting right after `(` into trimmed top-level
/// arguments. Returns `None` if the closing parenthesis is never found.
fn split_arguments(content: &str, start: usize) -> Option<Vec<&str>> {
    let bytes = content.as_bytes();
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut arg_start = start;
    let mut i = start;

    while i < bytes.len() {
        match bytes[i] {
            q @ (b'\'' | b'"' | b'`') => {
                i = skip_string(bytes, i, q);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = find_byte(bytes, i, b'\n').unwrap_or(bytes.len());
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = find_block_end(bytes, i + 2);
                continue;
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' if depth > 0 => depth -= 1,
            b')' => {
                let last = content[arg_start..i].trim();
                if !last.is_empty() {
                    args.push(last);
                }
                return Some(args);
            }
            b',' if depth == 0 => {
                args.push(content[arg_start..i].trim());
                arg_start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// A single string literal decodes to its value; anything else is unresolved.
fn classify_argument(arg: &str) -> Argument {
    let unresolved = || Argument::Unresolved(arg.to_string());
    let Some(quote) = arg.bytes().next().filter(|&b| matches!(b, b'\'' | b'"' | b'`')) else {
        return unresolved();
    };
    if skip_string(arg.as_bytes(), 0, quote) != arg.len() || arg.len() < 2 {
        return unresolved();
    }
    let body = &arg[1..arg.len() - 1];
    if quote == b'`' && body.contains("${") {
        return unresolved();
    }
    Argument::Literal(decode_escapes(body))
}

/// Decode JavaScript string escapes.
fn decode_escapes(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            out.push('\\');
            break;
        };
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            '\n' | '\u{2028}' | '\u{2029}' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, u32::from_str_radix(&hex, 16).ok());
            }
            'u' => {
                let unit = read_unicode_escape(&mut chars);
                match unit {
                    Some(high @ 0xD800..=0xDBFF) => {
                        let mut lookahead = chars.clone();
                        let low = match (lookahead.next(), lookahead.next()) {
                            (Some('\\'), Some('u')) => read_unicode_escape(&mut lookahead),
                            _ => None,
                        };
                        match low {
                            Some(low @ 0xDC00..=0xDFFF) => {
                                chars = lookahead;
                                let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                                push_code_point(&mut out, Some(combined));
                            }
                            _ => push_code_point(&mut out, None),
                        }
                    }
                    other => push_code_point(&mut out, other),
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn read_unicode_escape(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<u32> {
    if chars.peek() == Some(&'{') {
        chars.next();
        let hex: String = chars.by_ref().take_while(|&c| c != '}').collect();
        u32::from_str_radix(&hex, 16).ok()
    } else {
        let hex: String = chars.by_ref().take(4).collect();
        u32::from_str_radix(&hex, 16).ok()
    }
}

fn push_code_point(out: &mut String, code: Option<u32>) {
    out.push(
        code.and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER),
    );
}
