//! In-memory message catalog.
//!
//! A `Catalog` with `locale == None` is a template: every entry carries an
//! empty translation map. Entry order is insertion order, which for extracted
//! catalogs is first-occurrence order in the scanned sources.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

// ============================================================
// Header
// ============================================================

pub const PROJECT_ID_VERSION: &str = "Project-Id-Version";
pub const POT_CREATION_DATE: &str = "POT-Creation-Date";
pub const MIME_VERSION: &str = "MIME-Version";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TRANSFER_ENCODING: &str = "Content-Transfer-Encoding";
pub const LANGUAGE: &str = "Language";

/// Timestamp layout used by gettext tools for `POT-Creation-Date`.
pub const CREATION_DATE_FORMAT: &str = "%Y-%m-%d %H:%M%z";

/// Ordered `key: value` metadata carried by the header block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    fields: IndexMap<String, String>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header stamped for a freshly extracted template.
    pub fn template(project: &str, version: &str, created: DateTime<Utc>) -> Self {
        let mut header = Self::new();
        header.set(
            PROJECT_ID_VERSION,
            format!("{} {}", project, version).trim().to_string(),
        );
        header.set(
            POT_CREATION_DATE,
            created.format(CREATION_DATE_FORMAT).to_string(),
        );
        header.set(MIME_VERSION, "1.0");
        header.set(CONTENT_TYPE, "text/plain; charset=UTF-8");
        header.set(CONTENT_TRANSFER_ENCODING, "8bit");
        header
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Set a field, keeping its position when it already exists.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.shift_remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ============================================================
// Entry parts
// ============================================================

/// A `file:line` source reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    pub path: String,
    /// 1-based; 0 when the reference carries no line number.
    pub line: usize,
}

impl Location {
    pub fn new(path: impl Into<String>, line: usize) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }

    /// Parse one whitespace-free reference token (`src/app.js:12`).
    pub fn parse(token: &str) -> Self {
        match token.rsplit_once(':') {
            Some((path, line)) if !path.is_empty() => match line.parse() {
                Ok(line) => Self::new(path, line),
                Err(_) => Self::new(token, 0),
            },
            _ => Self::new(token, 0),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}:{}", self.path, self.line)
        }
    }
}

/// Entry marker written on the `#,` line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flag {
    Fuzzy,
    Obsolete,
    NeedsReview,
    /// Any other gettext flag, e.g. `javascript-format`.
    Other(String),
}

impl From<&str> for Flag {
    fn from(value: &str) -> Self {
        match value {
            "fuzzy" => Flag::Fuzzy,
            "obsolete" => Flag::Obsolete,
            "needs-review" => Flag::NeedsReview,
            other => Flag::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flag::Fuzzy => write!(f, "fuzzy"),
            Flag::Obsolete => write!(f, "obsolete"),
            Flag::NeedsReview => write!(f, "needs-review"),
            Flag::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Note attached to an entry, kept in the order it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comment {
    /// `# ` comment written by a translator.
    Translator(String),
    /// `#. ` comment produced by extraction.
    Extracted(String),
}

// ============================================================
// Entry
// ============================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    /// Source message; unique within a catalog.
    pub key: String,
    pub plural_key: Option<String>,
    /// Locale code to singular/plural forms. Absent means untranslated.
    pub translations: BTreeMap<String, Vec<String>>,
    /// Source references in first-seen order, without duplicates.
    pub locations: Vec<Location>,
    pub comments: Vec<Comment>,
    pub flags: BTreeSet<Flag>,
}

impl Entry {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn is_plural(&self) -> bool {
        self.plural_key.is_some()
    }

    pub fn is_obsolete(&self) -> bool {
        self.flags.contains(&Flag::Obsolete)
    }

    pub fn has_flag(&self, flag: &Flag) -> bool {
        self.flags.contains(flag)
    }

    /// Record a reference unless it is already present.
    pub fn add_location(&mut self, location: Location) {
        if !self.locations.contains(&location) {
            self.locations.push(location);
        }
    }

    /// Append a comment unless it is already attached. Multi-line text is
    /// split into one comment per line, the form it has once written out.
    pub fn add_comment(&mut self, comment: Comment) {
        let (text, rebuild): (&str, fn(String) -> Comment) = match &comment {
            Comment::Translator(text) => (text, Comment::Translator),
            Comment::Extracted(text) => (text, Comment::Extracted),
        };
        if text.contains('\n') {
            let lines: Vec<Comment> = text.split('\n').map(|l| rebuild(l.to_string())).collect();
            self.comments.extend(lines);
        } else if !self.comments.contains(&comment) {
            self.comments.push(comment);
        }
    }

    pub fn translation(&self, locale: &str) -> Option<&[String]> {
        self.translations.get(locale).map(Vec::as_slice)
    }

    pub fn is_translated(&self, locale: &str) -> bool {
        self.translation(locale)
            .is_some_and(|forms| forms.iter().any(|f| !f.is_empty()))
    }
}

// ============================================================
// Catalog
// ============================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub header: Header,
    pub entries: IndexMap<String, Entry>,
    /// `None` for a template.
    pub locale: Option<String>,
}

impl Catalog {
    pub fn template(header: Header) -> Self {
        Self {
            header,
            entries: IndexMap::new(),
            locale: None,
        }
    }

    pub fn for_locale(locale: impl Into<String>, header: Header) -> Self {
        let mut catalog = Self::template(header);
        catalog.set_locale(Some(locale.into()));
        catalog
    }

    pub fn is_template(&self) -> bool {
        self.locale.is_none()
    }

    /// Change the catalog locale, keeping the `Language` header in step.
    pub fn set_locale(&mut self, locale: Option<String>) {
        match &locale {
            Some(code) => self.header.set(LANGUAGE, code.clone()),
            None => {
                self.header.remove(LANGUAGE);
            }
        }
        self.locale = locale;
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Append an entry. Returns the entry back if its key is already taken.
    pub fn insert(&mut self, entry: Entry) -> Result<(), Entry> {
        if self.entries.contains_key(&entry.key) {
            return Err(entry);
        }
        self.entries.insert(entry.key.clone(), entry);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
