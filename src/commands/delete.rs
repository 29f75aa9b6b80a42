use colored::*;
use eyre::{Context, Result};

use crate::adapter::{FrameworkAdapter, FrameworkState, IntegrationIdentity, LegacyAdapter, LegacyState};
use crate::config::Config;
use crate::ident::CompositeId;
use crate::reconcile::Reconciler;

/// What the user pointed `delete` at
pub enum DeleteTarget {
    Composite(String),
    Identity {
        org: Option<String>,
        provider_key: String,
        name: String,
    },
}

pub fn run(target: DeleteTarget, quiet: bool, config: &Config) -> Result<()> {
    let client = super::connect(config)?;

    let described = match target {
        DeleteTarget::Composite(raw) => {
            let id: CompositeId = raw.parse()?;
            let (organization, provider_key, _) = id.decode();
            let state = LegacyState {
                organization: organization.to_string(),
                provider_key: provider_key.to_string(),
                id: Some(id.clone()),
                ..LegacyState::default()
            };
            Reconciler::new(client, LegacyAdapter)
                .delete(&state)
                .context("Failed to delete organization integration configuration")?;
            id.to_string()
        }
        DeleteTarget::Identity {
            org,
            provider_key,
            name,
        } => {
            let identity = IntegrationIdentity::new(config.organization(org.as_deref())?, provider_key, name);
            let described = identity.to_string();
            Reconciler::new(client, FrameworkAdapter)
                .delete(&FrameworkState::new(identity))
                .context("Failed to delete organization integration configuration")?;
            described
        }
    };

    if !quiet {
        println!("{} Cleared configuration of {}", "✓".green(), described.cyan());
    }

    Ok(())
}
