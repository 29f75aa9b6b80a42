use crate::error::{ReconcileError, Result};
use crate::remote::RemoteIntegration;

/// Pick the single integration named exactly `name`.
///
/// Items are expected to be pre-filtered by provider key; `provider_key` is
/// only used to describe failures.
pub fn match_by_name(items: Vec<RemoteIntegration>, provider_key: &str, name: &str) -> Result<RemoteIntegration> {
    let mut matched: Vec<RemoteIntegration> = items.into_iter().filter(|i| i.name == name).collect();

    match matched.len() {
        0 => Err(ReconcileError::NotFound {
            provider_key: provider_key.to_string(),
            name: name.to_string(),
        }),
        1 => Ok(matched.remove(0)),
        count => Err(ReconcileError::NotUnique {
            provider_key: provider_key.to_string(),
            name: name.to_string(),
            count,
        }),
    }
}
