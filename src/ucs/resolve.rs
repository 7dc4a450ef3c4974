// Classification hints embedded in file metadata
//
// Library tools write the UCS CatID or the category names into INFO or iXML.
// When present they decide the classification outright.

use std::borrow::Cow;

use tracing::debug;

use super::taxonomy::{Taxonomy, UcsCategory};
use super::{scoring::EXACT_MATCH_SCORE, UcsMatch};
use crate::field_mapping::FieldMappings;
use crate::metadata::MetadataMap;

/// Classification dictated by metadata, if any.
///
/// A CatID wins over category names. Known ids and names resolve to the
/// taxonomy entry; unknown ones produce an entry built from the metadata.
pub fn resolve_from_metadata<'a>(
    metadata: &MetadataMap,
    taxonomy: &'a Taxonomy,
) -> Option<UcsMatch<'a>> {
    let category = find_hint(metadata, &FieldMappings::UCS_CATEGORY_KEYS).unwrap_or("");
    let subcategory = find_hint(metadata, &FieldMappings::UCS_SUBCATEGORY_KEYS).unwrap_or("");

    if let Some(id) = find_hint(metadata, &FieldMappings::UCS_ID_KEYS) {
        let entry = match taxonomy.get(id) {
            Some(entry) => Cow::Borrowed(entry),
            None => {
                debug!(id, "metadata CatID not in taxonomy");
                Cow::Owned(UcsCategory::new(id, category, subcategory))
            }
        };
        return Some(UcsMatch::new(entry, EXACT_MATCH_SCORE));
    }

    if category.is_empty() {
        return None;
    }

    let entry = match taxonomy.find_by_names(category, subcategory) {
        Some(entry) => Cow::Borrowed(entry),
        None => Cow::Owned(UcsCategory::new("", category, subcategory)),
    };
    Some(UcsMatch::new(entry, EXACT_MATCH_SCORE))
}

/// First non-blank value whose key names one of `hints`, tried in order
fn find_hint<'m>(metadata: &'m MetadataMap, hints: &[&str]) -> Option<&'m str> {
    hints.iter().find_map(|hint| {
        metadata
            .iter()
            .find(|(key, value)| FieldMappings::key_matches(key, hint) && !value.trim().is_empty())
            .map(|(_, value)| value.trim())
    })
}
