use serde::{Deserialize, Serialize};

use super::{IntegrationIdentity, StateAdapter, Target};
use crate::error::{ReconcileError, Result};
use crate::ident::CompositeId;
use crate::remote::ConfigDocument;

/// Flat state with a composite id and a typed configuration mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CompositeId>,
    pub organization: String,
    pub provider_key: String,
    pub name: String,
    #[serde(default)]
    pub config: ConfigDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyAdapter;

impl StateAdapter for LegacyAdapter {
    type State = LegacyState;
    type Document = ConfigDocument;

    fn decode_identity(&self, state: &LegacyState) -> Result<Target> {
        let internal_id = match &state.id {
            Some(id) => {
                let (organization, provider_key, internal_id) = id.decode();
                if organization != state.organization || provider_key != state.provider_key {
                    return Err(ReconcileError::malformed_id(
                        id.as_str(),
                        format!(
                            "does not belong to {}/{}",
                            state.organization, state.provider_key
                        ),
                    ));
                }
                Some(internal_id.to_string())
            }
            None => None,
        };

        Ok(Target {
            identity: IntegrationIdentity::new(&state.organization, &state.provider_key, &state.name),
            internal_id,
            fragment: false,
        })
    }

    fn encode_identity(&self, identity: &IntegrationIdentity, internal_id: &str) -> Result<String> {
        Ok(CompositeId::encode(&identity.organization, &identity.provider_key, internal_id)?.to_string())
    }

    fn decode_document(&self, state: &LegacyState) -> Result<ConfigDocument> {
        Ok(state.config.clone())
    }

    fn encode_document(&self, document: &ConfigDocument) -> Result<ConfigDocument> {
        Ok(document.clone())
    }

    fn assemble(
        &self,
        _prior: &LegacyState,
        identity: &IntegrationIdentity,
        internal_id: &str,
        document: ConfigDocument,
    ) -> Result<LegacyState> {
        Ok(LegacyState {
            id: Some(CompositeId::encode(
                &identity.organization,
                &identity.provider_key,
                internal_id,
            )?),
            organization: identity.organization.clone(),
            provider_key: identity.provider_key.clone(),
            name: identity.name.clone(),
            config: document,
            internal_id: Some(internal_id.to_string()),
        })
    }

    fn refresh_after_write(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(id: Option<&str>) -> LegacyState {
        LegacyState {
            id: id.map(|s| s.parse().expect("valid composite id")),
            organization: "acme".to_string(),
            provider_key: "slack".to_string(),
            name: "Acme".to_string(),
            config: ConfigDocument::new(),
            internal_id: None,
        }
    }

    #[test]
    fn test_decode_identity_from_composite() {
        let target = LegacyAdapter
            .decode_identity(&state(Some("acme/slack/99")))
            .expect("decodes");
        assert_eq!(target.internal_id.as_deref(), Some("99"));
        assert!(!target.fragment);
    }

    #[test]
    fn test_decode_identity_without_id() {
        let target = LegacyAdapter.decode_identity(&state(None)).expect("decodes");
        assert!(target.internal_id.is_none());
    }

    #[test]
    fn test_decode_identity_rejects_foreign_id() {
        let err = LegacyAdapter
            .decode_identity(&state(Some("other/slack/99")))
            .unwrap_err();
        assert!(matches!(err, ReconcileError::MalformedId { .. }));
    }

    #[test]
    fn test_encode_identity_is_composite() {
        let identity = IntegrationIdentity::new("acme", "slack", "Acme");
        assert_eq!(
            LegacyAdapter.encode_identity(&identity, "42").expect("encodes"),
            "acme/slack/42"
        );
    }

    #[test]
    fn test_state_yaml_shape() {
        let yaml = r##"
id: acme/slack/42
organization: acme
provider_key: slack
name: Acme
config:
  channel: "#alerts"
  routes:
    prod: C1
"##;
        let parsed: LegacyState = serde_yaml::from_str(yaml).expect("parses");
        assert_eq!(parsed.id.as_ref().map(CompositeId::internal_id), Some("42"));
        assert_eq!(parsed.config.len(), 2);
    }
}
