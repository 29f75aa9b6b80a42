//! Cursor pagination over the integrations listing

use std::collections::HashSet;

use crate::error::{ReconcileError, Result};
use crate::remote::{IntegrationClient, RemoteIntegration};

/// Fetch every integration of `organization` matching `provider_key`.
///
/// Items come back in page order. A failed page discards everything fetched
/// so far. A cursor handed out twice in one traversal is treated as a
/// protocol error rather than followed forever.
pub fn fetch_all<C: IntegrationClient + ?Sized>(
    client: &C,
    organization: &str,
    provider_key: &str,
) -> Result<Vec<RemoteIntegration>> {
    let mut items = Vec::new();
    let mut seen = HashSet::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = client.list(organization, provider_key, cursor.as_deref())?;
        pages += 1;
        log::debug!(
            "Page {} for {}/{}: {} items, next cursor {:?}",
            pages,
            organization,
            provider_key,
            page.items.len(),
            page.next_cursor
        );
        items.extend(page.items);

        match page.next_cursor.filter(|c| !c.is_empty()) {
            None => break,
            Some(next) => {
                if !seen.insert(next.clone()) {
                    return Err(ReconcileError::PaginationLoop { cursor: next });
                }
                cursor = Some(next);
            }
        }
    }

    Ok(items)
}
