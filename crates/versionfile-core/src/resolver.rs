//! Metadata resolution
//!
//! Sources are layered lowest precedence first: distribution metadata, then
//! the configuration document, then explicit overrides. Each field takes the
//! value of the highest layer that provides it.

use tracing::debug;

use crate::errors::MetadataError;
use crate::types::{Field, MetadataRecord, PartialMetadata, RawValue};

/// Largest translation identifier (a 16-bit language or codepage id)
const MAX_TRANSLATION_ID: i64 = 0xFFFF;

/// Resolve the three standard sources into one record
pub fn resolve(
    distribution: &PartialMetadata,
    config: &PartialMetadata,
    explicit: &PartialMetadata,
) -> Result<MetadataRecord, MetadataError> {
    resolve_layers(&[distribution, config, explicit])
}

/// Fold any number of layers, lowest precedence first, then validate
pub fn resolve_layers(layers: &[&PartialMetadata]) -> Result<MetadataRecord, MetadataError> {
    let merged = layers
        .iter()
        .fold(PartialMetadata::new(), |mut acc, layer| {
            acc.overlay(layer);
            acc
        });

    debug!(
        "Merged {} layer(s) into {} field(s)",
        layers.len(),
        merged.len()
    );

    into_record(&merged)
}

fn into_record(merged: &PartialMetadata) -> Result<MetadataRecord, MetadataError> {
    let mut record = MetadataRecord::default();

    for (field, value) in merged.iter() {
        if field == Field::Translations {
            record.translations = Some(translations(value)?);
        } else if let Some(slot) = record.text_field_mut(field) {
            *slot = Some(text(field, value)?);
        }
    }

    Ok(record)
}

fn text(field: Field, value: &RawValue) -> Result<String, MetadataError> {
    match value {
        RawValue::String(s) => Ok(s.clone()),
        RawValue::Integer(i) => Ok(i.to_string()),
        RawValue::Float(f) => Ok(f.to_string()),
        other => Err(MetadataError::Validation(format!(
            "'{}' must be a string, found {}",
            field,
            other.type_name()
        ))),
    }
}

fn translations(value: &RawValue) -> Result<Vec<u32>, MetadataError> {
    let RawValue::Array(items) = value else {
        return Err(MetadataError::Validation(format!(
            "'translations' must be a list of integers, found {}",
            value.type_name()
        )));
    };

    items
        .iter()
        .map(|item| match item {
            RawValue::Integer(id) if (0..=MAX_TRANSLATION_ID).contains(id) => Ok(*id as u32),
            RawValue::Integer(id) => Err(MetadataError::Validation(format!(
                "translation id {} is outside 0..=65535",
                id
            ))),
            other => Err(MetadataError::Validation(format!(
                "'translations' must contain only integers, found {}",
                other.type_name()
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(field: Field, tag: &str) -> RawValue {
        if field == Field::Translations {
            match tag {
                "dist" => RawValue::from(&[1031_u32, 1200][..]),
                "config" => RawValue::from(&[1036_u32, 1200][..]),
                _ => RawValue::from(&[1033_u32, 1252][..]),
            }
        } else {
            RawValue::from(format!("{}-{}", field, tag))
        }
    }

    fn record_value(record: &MetadataRecord, field: Field) -> Option<RawValue> {
        let text = |v: &Option<String>| v.clone().map(RawValue::from);
        match field {
            Field::Version => text(&record.version),
            Field::CompanyName => text(&record.company_name),
            Field::FileDescription => text(&record.file_description),
            Field::InternalName => text(&record.internal_name),
            Field::LegalCopyright => text(&record.legal_copyright),
            Field::OriginalFilename => text(&record.original_filename),
            Field::ProductName => text(&record.product_name),
            Field::Translations => record.translations.as_deref().map(RawValue::from),
        }
    }

    #[test]
    fn test_precedence_for_every_field_and_presence_combination() {
        for field in Field::ALL {
            for mask in 0..8_u8 {
                let mut dist = PartialMetadata::new();
                let mut config = PartialMetadata::new();
                let mut explicit = PartialMetadata::new();
                if mask & 1 != 0 {
                    dist.set(field, sample(field, "dist"));
                }
                if mask & 2 != 0 {
                    config.set(field, sample(field, "config"));
                }
                if mask & 4 != 0 {
                    explicit.set(field, sample(field, "explicit"));
                }

                let expected = if mask & 4 != 0 {
                    Some(sample(field, "explicit"))
                } else if mask & 2 != 0 {
                    Some(sample(field, "config"))
                } else if mask & 1 != 0 {
                    Some(sample(field, "dist"))
                } else {
                    None
                };

                let record = resolve(&dist, &config, &explicit);
                assert!(
                    record
                        .as_ref()
                        .is_ok_and(|r| record_value(r, field) == expected),
                    "field {} mask {:03b}",
                    field,
                    mask
                );
            }
        }
    }

    #[test]
    fn test_fields_resolve_independently() {
        let dist = PartialMetadata::new()
            .with(Field::Version, "0.1.0")
            .with(Field::CompanyName, "Dist Author");
        let config = PartialMetadata::new().with(Field::ProductName, "Configured");
        let explicit = PartialMetadata::new().with(Field::Version, "2.0.0");

        let record = resolve(&dist, &config, &explicit);
        assert!(record.is_ok_and(|r| r
            == MetadataRecord {
                version: Some("2.0.0".to_string()),
                company_name: Some("Dist Author".to_string()),
                product_name: Some("Configured".to_string()),
                ..MetadataRecord::default()
            }));
    }

    #[test]
    fn test_all_absent_yields_empty_record() {
        let empty = PartialMetadata::new();
        assert!(resolve(&empty, &empty, &empty).is_ok_and(|r| r.is_empty()));
    }

    #[test]
    fn test_explicit_version_and_translations_only() {
        let explicit = PartialMetadata::new()
            .with(Field::Version, "1.2.3")
            .with(Field::Translations, &[1033_u32, 1200][..]);
        let empty = PartialMetadata::new();

        let record = resolve(&empty, &empty, &explicit);
        assert!(record.is_ok_and(|r| r
            == MetadataRecord {
                version: Some("1.2.3".to_string()),
                translations: Some(vec![1033, 1200]),
                ..MetadataRecord::default()
            }));
    }

    #[test]
    fn test_numeric_text_is_stringified() {
        let config = PartialMetadata::new().with(Field::Version, RawValue::Integer(3));
        let empty = PartialMetadata::new();
        assert!(resolve(&empty, &config, &empty)
            .is_ok_and(|r| r.version.as_deref() == Some("3")));
    }

    #[test]
    fn test_non_integer_translations_rejected() {
        let config = PartialMetadata::new().with(
            Field::Translations,
            RawValue::Array(vec![RawValue::Integer(1033), RawValue::from("1200")]),
        );
        let empty = PartialMetadata::new();
        assert!(matches!(
            resolve(&empty, &config, &empty),
            Err(MetadataError::Validation(_))
        ));
    }

    #[test]
    fn test_null_translation_entry_rejected() {
        let config = PartialMetadata::new().with(
            Field::Translations,
            RawValue::Array(vec![RawValue::Integer(1033), RawValue::Null, RawValue::Integer(1200)]),
        );
        let empty = PartialMetadata::new();
        assert!(matches!(
            resolve(&empty, &config, &empty),
            Err(MetadataError::Validation(_))
        ));
    }

    #[test]
    fn test_scalar_translations_rejected() {
        let config = PartialMetadata::new().with(Field::Translations, RawValue::Integer(1033));
        let empty = PartialMetadata::new();
        assert!(matches!(
            resolve(&empty, &config, &empty),
            Err(MetadataError::Validation(_))
        ));
    }

    #[test]
    fn test_out_of_range_translation_rejected() {
        let config = PartialMetadata::new().with(
            Field::Translations,
            RawValue::Array(vec![RawValue::Integer(70000)]),
        );
        let empty = PartialMetadata::new();
        assert!(matches!(
            resolve(&empty, &config, &empty),
            Err(MetadataError::Validation(_))
        ));
    }

    #[test]
    fn test_boolean_text_field_rejected() {
        let config = PartialMetadata::new().with(Field::CompanyName, RawValue::Boolean(true));
        let empty = PartialMetadata::new();
        assert!(matches!(
            resolve(&empty, &config, &empty),
            Err(MetadataError::Validation(_))
        ));
    }

    #[test]
    fn test_lower_layer_shape_errors_are_shadowed() {
        let dist = PartialMetadata::new().with(Field::Translations, RawValue::Table);
        let explicit = PartialMetadata::new().with(Field::Translations, &[1033_u32, 1200][..]);
        let empty = PartialMetadata::new();
        assert!(resolve(&dist, &empty, &explicit)
            .is_ok_and(|r| r.translations == Some(vec![1033, 1200])));
    }

    #[test]
    fn test_resolve_layers_matches_pairwise_merge() {
        let a = PartialMetadata::new().with(Field::Version, "1");
        let b = PartialMetadata::new().with(Field::Version, "2").with(Field::ProductName, "B");
        let c = PartialMetadata::new().with(Field::ProductName, "C");

        let mut ab = a.clone();
        ab.overlay(&b);
        let pairwise = resolve_layers(&[&ab, &c]);
        let folded = resolve_layers(&[&a, &b, &c]);
        assert!(pairwise.is_ok());
        assert_eq!(pairwise.ok(), folded.ok());
    }
}
