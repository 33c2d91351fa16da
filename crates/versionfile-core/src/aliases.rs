//! Accepted key spellings for each field
//!
//! Spellings are listed in preference order: the snake-case key, the
//! hyphenated key, then the PyInstaller name used by YAML input files. When a
//! document holds several spellings of one field, the first one listed wins.

use tracing::warn;

use crate::types::{Field, PartialMetadata, RawValue};

pub const KEY_ALIASES: [(Field, &[&str]); 8] = [
    (Field::Version, &["version", "Version"]),
    (
        Field::CompanyName,
        &["company_name", "company-name", "CompanyName"],
    ),
    (
        Field::FileDescription,
        &["file_description", "file-description", "FileDescription"],
    ),
    (
        Field::InternalName,
        &["internal_name", "internal-name", "InternalName"],
    ),
    (
        Field::LegalCopyright,
        &["legal_copyright", "legal-copyright", "LegalCopyright"],
    ),
    (
        Field::OriginalFilename,
        &["original_filename", "original-filename", "OriginalFilename"],
    ),
    (
        Field::ProductName,
        &["product_name", "product-name", "ProductName"],
    ),
    (Field::Translations, &["translations", "Translation"]),
];

/// True when `key` is a spelling of any field
pub fn is_known_key(key: &str) -> bool {
    KEY_ALIASES
        .iter()
        .any(|(_, spellings)| spellings.contains(&key))
}

/// Collect every field found through `lookup`
///
/// `origin` names the document in the duplicate-spelling warning.
pub fn extract_fields<F>(origin: &str, lookup: F) -> PartialMetadata
where
    F: Fn(&str) -> Option<RawValue>,
{
    let mut metadata = PartialMetadata::new();

    for (field, spellings) in KEY_ALIASES {
        let mut found = spellings
            .iter()
            .filter_map(|key| lookup(key).map(|value| (*key, value)));

        let Some((key, value)) = found.next() else {
            continue;
        };

        let ignored: Vec<&str> = found.map(|(k, _)| k).collect();
        if !ignored.is_empty() {
            warn!(
                "{}: '{}' is set more than once; using '{}' and ignoring {:?}",
                origin, field, key, ignored
            );
        }

        metadata.set(field, value);
    }

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Option<RawValue> + 'a {
        move |key| map.get(key).map(|v| RawValue::from(*v))
    }

    #[test]
    fn test_snake_case_wins_over_hyphen() {
        let map = HashMap::from([("company-name", "Hyphen Inc"), ("company_name", "Snake Inc")]);
        let meta = extract_fields("test", lookup_in(&map));
        assert_eq!(
            meta.get(Field::CompanyName),
            Some(&RawValue::from("Snake Inc"))
        );
    }

    #[test]
    fn test_hyphen_wins_over_public_name() {
        let map = HashMap::from([("ProductName", "Public"), ("product-name", "Hyphen")]);
        let meta = extract_fields("test", lookup_in(&map));
        assert_eq!(meta.get(Field::ProductName), Some(&RawValue::from("Hyphen")));
    }

    #[test]
    fn test_public_names_are_accepted() {
        let map = HashMap::from([("Version", "1.2.3"), ("FileDescription", "A tool")]);
        let meta = extract_fields("test", lookup_in(&map));
        assert_eq!(meta.get(Field::Version), Some(&RawValue::from("1.2.3")));
        assert_eq!(
            meta.get(Field::FileDescription),
            Some(&RawValue::from("A tool"))
        );
        assert_eq!(meta.len(), 2);
    }

    #[test]
    fn test_every_field_has_its_canonical_key_first() {
        assert_eq!(KEY_ALIASES.len(), Field::ALL.len());
        for (field, spellings) in KEY_ALIASES {
            assert_eq!(spellings.first(), Some(&field.key()));
        }
    }

    #[test]
    fn test_is_known_key() {
        assert!(is_known_key("legal-copyright"));
        assert!(is_known_key("Translation"));
        assert!(!is_known_key("author"));
    }
}
