use serde::{Deserialize, Serialize};

use crate::chapter::TranslatedName;

/// One entry of the `/resources/translations` catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResource {
    /// Resource id used in the `translations` query parameter (e.g., 20 for Sahih International).
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub slug: Option<String>,
    /// Lower-case English language name (e.g., "english", "indonesian").
    pub language_name: String,
    #[serde(default)]
    pub translated_name: Option<TranslatedName>,
}

/// Keep catalog entries whose language name contains `needle`, case-insensitively.
///
/// An empty needle keeps everything. Order is preserved.
pub fn filter_by_language<'a>(
    catalog: &'a [TranslationResource],
    needle: &str,
) -> Vec<&'a TranslationResource> {
    let needle = needle.to_lowercase();
    catalog
        .iter()
        .filter(|t| t.language_name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(id: u32, language_name: &str) -> TranslationResource {
        TranslationResource {
            id,
            name: format!("Translation {id}"),
            author_name: String::new(),
            slug: None,
            language_name: language_name.to_string(),
            translated_name: None,
        }
    }

    #[test]
    fn test_filter_by_language() {
        let catalog = vec![
            resource(20, "english"),
            resource(33, "indonesian"),
            resource(85, "English"),
        ];
        let ids: Vec<u32> = filter_by_language(&catalog, "ENG").iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![20, 85]);
        assert_eq!(filter_by_language(&catalog, "").len(), 3);
        assert!(filter_by_language(&catalog, "urdu").is_empty());
    }

    #[test]
    fn test_parse_sparse_entry() {
        let json = r#"{"id": 33, "name": "Indonesian Islamic affairs ministry", "language_name": "indonesian"}"#;
        let t: TranslationResource = serde_json::from_str(json).unwrap();
        assert_eq!(t.id, 33);
        assert!(t.slug.is_none());
        assert_eq!(t.author_name, "");
    }
}
