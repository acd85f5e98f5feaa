//! Assembles scanner output into a template catalog.

use chrono::{DateTime, Utc};

use crate::core::{
    catalog::{Catalog, Comment, Entry, Flag, Header},
    scanner::RawExtraction,
};

/// Extracted comment attached to entries whose key is an unresolved expression.
pub const UNRESOLVED_COMMENT: &str = "unresolved argument";

/// Builds a template catalog from raw extractions.
///
/// Entries appear in first-occurrence order. Repeated keys merge into one entry:
/// locations accumulate in order, and the entry becomes plural-capable if any
/// occurrence supplied a plural form.
pub struct CatalogBuilder {
    header: Header,
}

impl CatalogBuilder {
    pub fn new(project: &str, version: &str, created: DateTime<Utc>) -> Self {
        Self {
            header: Header::template(project, version, created),
        }
    }

    pub fn build(self, extractions: impl IntoIterator<Item = RawExtraction>) -> Catalog {
        let mut catalog = Catalog::template(self.header);

        for extraction in extractions {
            let entry = catalog
                .entries
                .entry(extraction.key.clone())
                .or_insert_with(|| Entry::new(extraction.key));

            if entry.plural_key.is_none() {
                entry.plural_key = extraction.plural_key;
            }
            entry.add_location(extraction.location);
            if extraction.needs_review {
                entry.flags.insert(Flag::NeedsReview);
                entry.add_comment(Comment::Extracted(UNRESOLVED_COMMENT.to_string()));
            }
        }

        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Location;
    use pretty_assertions::assert_eq;

    fn raw(key: &str, plural: Option<&str>, path: &str, line: usize) -> RawExtraction {
        RawExtraction {
            key: key.to_string(),
            plural_key: plural.map(str::to_string),
            location: Location::new(path, line),
            needs_review: false,
        }
    }

    fn builder() -> CatalogBuilder {
        CatalogBuilder::new("plupload", "2.1.9", Utc::now())
    }

    #[test]
    fn test_repeated_key_merges_locations() {
        let catalog = builder().build(vec![
            raw("Save", None, "ui.js", 10),
            raw("Cancel", None, "ui.js", 20),
            raw("Save", None, "ui.js", 42),
        ]);

        assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["Save", "Cancel"]);
        let save = catalog.get("Save").unwrap();
        assert_eq!(
            save.locations,
            vec![Location::new("ui.js", 10), Location::new("ui.js", 42)]
        );
        assert!(save.translations.is_empty());
        assert!(catalog.is_template());
    }

    #[test]
    fn test_plural_form_from_any_occurrence() {
        let catalog = builder().build(vec![
            raw("%d file", None, "a.js", 1),
            raw("%d file", Some("%d files"), "b.js", 2),
            raw("%d file", Some("%d other"), "c.js", 3),
        ]);
        let entry = catalog.get("%d file").unwrap();
        assert_eq!(entry.plural_key.as_deref(), Some("%d files"));
        assert_eq!(entry.locations.len(), 3);
    }

    #[test]
    fn test_needs_review_flag_and_comment_added_once() {
        let mut unresolved = raw("label + suffix", None, "a.js", 5);
        unresolved.needs_review = true;
        let catalog = builder().build(vec![unresolved.clone(), unresolved]);

        let entry = catalog.get("label + suffix").unwrap();
        assert!(entry.has_flag(&Flag::NeedsReview));
        assert_eq!(
            entry.comments,
            vec![Comment::Extracted(UNRESOLVED_COMMENT.to_string())]
        );
        assert_eq!(entry.locations.len(), 1);
    }

    #[test]
    fn test_keys_unique() {
        let extractions = (0..50).map(|i| raw(&format!("k{}", i % 7), None, "a.js", i + 1));
        let catalog = builder().build(extractions);
        assert_eq!(catalog.len(), 7);
    }

    #[test]
    fn test_header_stamped() {
        let catalog = CatalogBuilder::new("plupload", "2.1.9", Utc::now()).build(Vec::new());
        assert_eq!(
            catalog.header.get(crate::core::catalog::PROJECT_ID_VERSION),
            Some("plupload 2.1.9")
        );
        assert!(catalog.is_empty());
    }
}
