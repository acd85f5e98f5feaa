//! Reconciliation of the local template with a fetched locale catalog.
//!
//! Remote translations win for keys on both sides. Keys only in the template
//! stay untranslated. Keys only on the remote side are kept and flagged
//! obsolete, so a translation survives the message being re-introduced.
//!
//! The remote side is treated as authoritative: a local edit made to a locale
//! file since the previous pull is overwritten, as nothing records when or
//! whether such an edit happened.

use crate::core::catalog::{Catalog, Comment, Flag, POT_CREATION_DATE};

/// Entry counts of a merged locale catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub translated: usize,
    pub untranslated: usize,
    pub obsolete: usize,
}

impl MergeStats {
    pub fn of(catalog: &Catalog, locale: &str) -> Self {
        let mut stats = Self::default();
        for entry in catalog.iter() {
            if entry.is_obsolete() {
                stats.obsolete += 1;
            } else if entry.is_translated(locale) {
                stats.translated += 1;
            } else {
                stats.untranslated += 1;
            }
        }
        stats
    }
}

/// Merge `remote` (a catalog for `locale`) onto `template`.
///
/// The header starts from the template's and takes every remote field except
/// `POT-Creation-Date`; `Language` is set to `locale`.
///
/// Template entries come first, in template order, followed by remote-only
/// entries in remote order. Source-side data (locations, plural form, extracted
/// comments) comes from the template; translations, translator comments and
/// translator flags such as `fuzzy` come from the remote entry.
pub fn merge_locale(template: &Catalog, mut remote: Catalog, locale: &str) -> Catalog {
    let mut header = template.header.clone();
    for (name, value) in remote.header.iter() {
        if name != POT_CREATION_DATE {
            header.set(name, value);
        }
    }
    let mut merged = Catalog::for_locale(locale, header);

    for source in template.iter() {
        let mut entry = source.clone();
        entry.translations.clear();
        entry.flags.remove(&Flag::Obsolete);

        if let Some(mut theirs) = remote.entries.shift_remove(&entry.key) {
            if let Some(forms) = theirs.translations.remove(locale) {
                entry.translations.insert(locale.to_string(), forms);
            }
            entry
                .flags
                .extend(theirs.flags.into_iter().filter(|f| *f != Flag::Obsolete));
            for comment in theirs.comments {
                if matches!(comment, Comment::Translator(_)) {
                    entry.add_comment(comment);
                }
            }
        }

        let _ = merged.insert(entry);
    }

    for (_, mut entry) in remote.entries {
        entry.translations.retain(|code, _| code == locale);
        entry.flags.insert(Flag::Obsolete);
        let _ = merged.insert(entry);
    }

    merged
}
