use eyre::{Context, Result};

use crate::adapter::{FrameworkAdapter, FrameworkState, IntegrationIdentity};
use crate::cli::{IdentityArgs, OutputFormat};
use crate::config::Config;
use crate::reconcile::Reconciler;

pub fn run(identity: IdentityArgs, format: OutputFormat, config: &Config) -> Result<()> {
    let organization = config.organization(identity.org.as_deref())?;
    let state = FrameworkState::new(IntegrationIdentity::new(
        organization,
        identity.provider_key,
        identity.name,
    ));

    let reconciler = Reconciler::new(super::connect(config)?, FrameworkAdapter);
    let projected = reconciler
        .read(&state)
        .context("Failed to read organization integration configuration")?;

    super::print_state(&projected, format)
}
