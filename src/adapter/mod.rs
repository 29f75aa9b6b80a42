//! Boundary adapters between caller state and the reconciliation core
//!
//! The same reconciliation runs for two state shapes:
//! - [`FrameworkAdapter`]: structured identity fields, raw JSON document
//! - [`LegacyAdapter`]: composite string id, typed document mapping

use crate::error::Result;
use crate::remote::{ConfigDocument, RemoteIntegration};

pub mod framework;
pub mod legacy;

pub use framework::{FrameworkAdapter, FrameworkState};
pub use legacy::{LegacyAdapter, LegacyState};

/// The (organization, provider key, name) triple that selects one integration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationIdentity {
    pub organization: String,
    pub provider_key: String,
    pub name: String,
}

impl IntegrationIdentity {
    pub fn new(organization: impl Into<String>, provider_key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            provider_key: provider_key.into(),
            name: name.into(),
        }
    }

    /// Identity as the remote reports it for a matched integration
    pub fn resolved(organization: &str, matched: &RemoteIntegration) -> Self {
        Self::new(organization, &matched.provider_key, &matched.name)
    }
}

impl std::fmt::Display for IntegrationIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} {:?}", self.organization, self.provider_key, self.name)
    }
}

/// What a caller's state says about the integration it wants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub identity: IntegrationIdentity,
    /// Remote integration id the caller already holds, if any
    pub internal_id: Option<String>,
    /// Merge the desired document into the remote one instead of replacing it
    pub fragment: bool,
}

/// Translates one caller state shape to and from the core's types
pub trait StateAdapter {
    type State;
    type Document;

    fn decode_identity(&self, state: &Self::State) -> Result<Target>;

    /// Identifier handed back to the caller after a write
    fn encode_identity(&self, identity: &IntegrationIdentity, internal_id: &str) -> Result<String>;

    fn decode_document(&self, state: &Self::State) -> Result<ConfigDocument>;

    fn encode_document(&self, document: &ConfigDocument) -> Result<Self::Document>;

    /// Build the output state for a resolved integration
    fn assemble(
        &self,
        prior: &Self::State,
        identity: &IntegrationIdentity,
        internal_id: &str,
        document: Self::Document,
    ) -> Result<Self::State>;

    /// Whether a successful write is followed by a fresh read of the remote
    fn refresh_after_write(&self) -> bool;
}
