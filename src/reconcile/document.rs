//! Configuration document conversions and fragment merging

use crate::error::Result;
use crate::remote::ConfigDocument;

/// Shallow key-wise merge: `desired` wins, keys it lacks are kept from `existing`
pub fn merge_fragment(existing: &ConfigDocument, desired: &ConfigDocument) -> ConfigDocument {
    let mut merged = existing.clone();
    for (key, value) in desired {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// The entries of `remote` whose keys `managed` names, in `managed` order
pub fn restrict_to(remote: &ConfigDocument, managed: &ConfigDocument) -> ConfigDocument {
    managed
        .keys()
        .filter_map(|key| remote.get(key).map(|value| (key.clone(), value.clone())))
        .collect()
}

/// Parse a raw JSON document
pub fn from_json(raw: &str) -> Result<ConfigDocument> {
    Ok(serde_json::from_str(raw)?)
}

/// Serialize a document to compact JSON
pub fn to_json(document: &ConfigDocument) -> Result<String> {
    Ok(serde_json::to_string(document)?)
}
