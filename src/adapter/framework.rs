use serde::{Deserialize, Serialize};

use super::{IntegrationIdentity, StateAdapter, Target};
use crate::error::Result;
use crate::reconcile::document;
use crate::remote::ConfigDocument;

/// Structured state: identity fields side by side, document as a JSON string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub organization: String,
    pub provider_key: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_fragment: Option<bool>,
    #[serde(default)]
    pub config_data: String,
}

impl FrameworkState {
    pub fn new(identity: IntegrationIdentity) -> Self {
        Self {
            organization: identity.organization,
            provider_key: identity.provider_key,
            name: identity.name,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameworkAdapter;

impl StateAdapter for FrameworkAdapter {
    type State = FrameworkState;
    type Document = String;

    fn decode_identity(&self, state: &FrameworkState) -> Result<Target> {
        Ok(Target {
            identity: IntegrationIdentity::new(&state.organization, &state.provider_key, &state.name),
            internal_id: state.id.clone().filter(|id| !id.is_empty()),
            fragment: state.is_fragment.unwrap_or(false),
        })
    }

    fn encode_identity(&self, _identity: &IntegrationIdentity, internal_id: &str) -> Result<String> {
        Ok(internal_id.to_string())
    }

    fn decode_document(&self, state: &FrameworkState) -> Result<ConfigDocument> {
        document::from_json(&state.config_data)
    }

    fn encode_document(&self, document: &ConfigDocument) -> Result<String> {
        document::to_json(document)
    }

    fn assemble(
        &self,
        prior: &FrameworkState,
        identity: &IntegrationIdentity,
        internal_id: &str,
        document: String,
    ) -> Result<FrameworkState> {
        Ok(FrameworkState {
            id: Some(internal_id.to_string()),
            organization: identity.organization.clone(),
            provider_key: identity.provider_key.clone(),
            name: identity.name.clone(),
            is_fragment: prior.is_fragment,
            config_data: document,
        })
    }

    fn refresh_after_write(&self) -> bool {
        false
    }
}
