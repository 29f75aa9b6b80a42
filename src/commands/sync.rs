//! Sync command
//!
//! Drives a YAML state file through the legacy-shaped reconciler: the file
//! holds the identity and a typed config mapping, and gets the composite id
//! and the remote's refreshed view written back after each run.

use colored::*;
use eyre::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::adapter::{LegacyAdapter, LegacyState};
use crate::config::Config;
use crate::reconcile::Reconciler;
use crate::remote::IntegrationClient;

pub fn run(state_path: PathBuf, delete: bool, quiet: bool, config: &Config) -> Result<()> {
    let path = Config::expand_path(&state_path);
    let state = load_state(&path)?;
    let client = super::connect(config)?;

    let written = sync_state(client, state, delete)?;
    save_state(&path, &written)?;

    if !quiet {
        match &written.id {
            Some(id) => println!("{} Synced {} → {}", "✓".green(), path.display(), id.to_string().cyan()),
            None => println!("{} Cleared {} and dropped its id", "✓".green(), path.display()),
        }
    }

    Ok(())
}

/// Apply (or clear) one state and return what should be persisted
pub fn sync_state<C: IntegrationClient>(client: C, state: LegacyState, delete: bool) -> Result<LegacyState> {
    let reconciler = Reconciler::new(client, LegacyAdapter);

    if delete {
        reconciler
            .delete(&state)
            .context("Failed to delete organization integration configuration")?;
        return Ok(LegacyState {
            id: None,
            internal_id: None,
            ..state
        });
    }

    let applied = reconciler
        .apply(&state)
        .context("Failed to update organization integration configuration")?;
    log::info!("Synced state for {}", applied.id);
    Ok(applied.state)
}

fn load_state(path: &Path) -> Result<LegacyState> {
    let content = fs::read_to_string(path).context(format!("Failed to read state file {}", path.display()))?;
    serde_yaml::from_str(&content).context(format!("Failed to parse state file {}", path.display()))
}

fn save_state(path: &Path, state: &LegacyState) -> Result<()> {
    let yaml_str = serde_yaml::to_string(state).context("Failed to serialize state")?;
    fs::write(path, yaml_str).context(format!("Failed to write state file {}", path.display()))
}
