//! Remote organization integrations API
//!
//! The reconciler only ever talks to [`IntegrationClient`]. The concrete
//! Sentry implementation lives in [`http`]; tests substitute their own.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::RemoteError;

pub mod http;
pub mod link;

pub use http::HttpClient;

/// A configuration leaf: a plain string, a nested string map, or any other
/// JSON value the remote stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Text(String),
    Map(IndexMap<String, String>),
    Other(serde_json::Value),
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Text(value)
    }
}

/// Whole configuration document of one integration
pub type ConfigDocument = IndexMap<String, ConfigValue>;

/// An organization integration as the reconciler sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteIntegration {
    pub id: String,
    pub provider_key: String,
    pub name: String,
    #[serde(default)]
    pub config_data: ConfigDocument,
}

/// One page of a listing
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<RemoteIntegration>,
    pub next_cursor: Option<String>,
}

/// Operations the reconciler needs from the remote service
pub trait IntegrationClient: Send + Sync {
    /// List integrations of `organization` whose provider key matches `provider_key`
    fn list(&self, organization: &str, provider_key: &str, cursor: Option<&str>) -> Result<Page, RemoteError>;

    /// Replace the configuration document of one integration
    fn update_config(
        &self,
        organization: &str,
        integration_id: &str,
        document: &ConfigDocument,
    ) -> Result<RemoteIntegration, RemoteError>;
}

impl<C: IntegrationClient + ?Sized> IntegrationClient for &C {
    fn list(&self, organization: &str, provider_key: &str, cursor: Option<&str>) -> Result<Page, RemoteError> {
        (**self).list(organization, provider_key, cursor)
    }

    fn update_config(
        &self,
        organization: &str,
        integration_id: &str,
        document: &ConfigDocument,
    ) -> Result<RemoteIntegration, RemoteError> {
        (**self).update_config(organization, integration_id, document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_value_untagged_deserialize() {
        let doc: ConfigDocument = serde_json::from_str(
            r##"{"channel": "#alerts", "mapping": {"prod": "C123", "staging": "C456"}}"##,
        )
        .expect("valid document");

        assert_eq!(doc.get("channel"), Some(&ConfigValue::from("#alerts")));
        match doc.get("mapping") {
            Some(ConfigValue::Map(map)) => {
                assert_eq!(map.get("prod").map(String::as_str), Some("C123"));
                assert_eq!(map.len(), 2);
            }
            other => panic!("expected nested map, got {:?}", other),
        }
    }

    #[test]
    fn test_config_value_keeps_non_string_values() {
        let doc: ConfigDocument =
            serde_json::from_str(r#"{"retries": 3, "enabled": true, "routes": {"prod": 1}}"#).expect("valid document");

        assert_eq!(doc.get("retries"), Some(&ConfigValue::Other(serde_json::json!(3))));
        assert_eq!(doc.get("enabled"), Some(&ConfigValue::Other(serde_json::json!(true))));
        assert_eq!(doc.get("routes"), Some(&ConfigValue::Other(serde_json::json!({"prod": 1}))));
        assert_eq!(serde_json::to_string(&doc).expect("serializes"), r#"{"retries":3,"enabled":true,"routes":{"prod":1}}"#);
    }

    #[test]
    fn test_document_preserves_key_order() {
        let doc: ConfigDocument = serde_json::from_str(r#"{"z": "1", "a": "2", "m": "3"}"#).expect("valid document");
        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }
}
