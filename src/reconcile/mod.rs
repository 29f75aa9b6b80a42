//! Reconciliation of one organization integration configuration
//!
//! A run moves through `Idle -> Listing -> Matched -> Projecting|Updating -> Done`.
//! Lookups page through every integration of the provider and insist on
//! exactly one name match. Writes replace the remote document, or merge into
//! it when the caller marked its document as a fragment. Deleting is an
//! update with an empty document; the remote has no delete endpoint.

use crate::adapter::{IntegrationIdentity, StateAdapter, Target};
use crate::error::{Phase, PhaseError, ReconcileError};
use crate::remote::{ConfigDocument, IntegrationClient, RemoteIntegration};

pub mod document;
pub mod matcher;
pub mod paginate;

#[cfg(test)]
pub mod testing;

pub use matcher::match_by_name;
pub use paginate::fetch_all;

/// Outcome of a create/update
#[derive(Debug, Clone, PartialEq)]
pub struct Applied<S> {
    /// Identifier in the caller's format (plain or composite)
    pub id: String,
    pub state: S,
}

/// Tracks the phase of one run for logging and error tagging
struct Run<'a> {
    op: &'static str,
    identity: &'a IntegrationIdentity,
    phase: Phase,
}

impl<'a> Run<'a> {
    fn new(op: &'static str, identity: &'a IntegrationIdentity) -> Self {
        Self {
            op,
            identity,
            phase: Phase::Idle,
        }
    }

    fn enter(&mut self, next: Phase) {
        log::debug!("{} {}: {} -> {}", self.op, self.identity, self.phase, next);
        self.phase = next;
    }

    fn check<T, E: Into<ReconcileError>>(&self, result: Result<T, E>) -> Result<T, PhaseError> {
        result.map_err(|e| {
            let err = PhaseError::new(self.phase, e.into());
            log::debug!("{} {} failed: {}", self.op, self.identity, err);
            err
        })
    }
}

pub struct Reconciler<C, A> {
    client: C,
    adapter: A,
}

impl<C: IntegrationClient, A: StateAdapter> Reconciler<C, A> {
    pub fn new(client: C, adapter: A) -> Self {
        Self { client, adapter }
    }

    /// Resolve the caller's identity against the remote and project the match
    pub fn read(&self, state: &A::State) -> Result<A::State, PhaseError> {
        let target = self.adapter.decode_identity(state).map_err(|e| PhaseError::new(Phase::Idle, e))?;
        let mut run = Run::new("read", &target.identity);

        let matched = self.lookup(&mut run)?;
        let projected = self.project(&mut run, &target, state, &matched)?;

        run.enter(Phase::Done);
        Ok(projected)
    }

    /// Write the caller's desired document, replacing or merging
    pub fn apply(&self, state: &A::State) -> Result<Applied<A::State>, PhaseError> {
        let target = self.adapter.decode_identity(state).map_err(|e| PhaseError::new(Phase::Idle, e))?;
        let mut run = Run::new("apply", &target.identity);

        let desired = run.check(self.adapter.decode_document(state))?;

        let (internal_id, submitted) = if target.fragment {
            // The merge base and the write target must be the same integration
            let current = self.lookup(&mut run)?;
            if let Some(held) = &target.internal_id {
                run.check(same_integration(held, &current))?;
            }
            (current.id.clone(), document::merge_fragment(&current.config_data, &desired))
        } else {
            let internal_id = match target.internal_id.clone() {
                Some(held) => held,
                None => self.lookup(&mut run)?.id,
            };
            (internal_id, desired.clone())
        };

        run.enter(Phase::Updating);
        log::info!(
            "Updating integration {} ({}) with {} keys{}",
            internal_id,
            target.identity,
            submitted.len(),
            if target.fragment { " (fragment merge)" } else { "" }
        );
        run.check(
            self.client
                .update_config(&target.identity.organization, &internal_id, &submitted),
        )?;

        let id = run.check(self.adapter.encode_identity(&target.identity, &internal_id))?;

        let state = if self.adapter.refresh_after_write() {
            let current = self.lookup(&mut run)?;
            run.check(same_integration(&internal_id, &current))?;
            self.project(&mut run, &target, state, &current)?
        } else {
            let document = run.check(self.adapter.encode_document(&desired))?;
            run.check(self.adapter.assemble(state, &target.identity, &internal_id, document))?
        };

        run.enter(Phase::Done);
        Ok(Applied { id, state })
    }

    /// Empty the remote configuration document
    pub fn delete(&self, state: &A::State) -> Result<(), PhaseError> {
        let target = self.adapter.decode_identity(state).map_err(|e| PhaseError::new(Phase::Idle, e))?;
        let mut run = Run::new("delete", &target.identity);

        let internal_id = match target.internal_id {
            Some(held) => held,
            None => self.lookup(&mut run)?.id,
        };

        run.enter(Phase::Updating);
        log::info!("Clearing configuration of integration {} ({})", internal_id, target.identity);
        run.check(
            self.client
                .update_config(&target.identity.organization, &internal_id, &ConfigDocument::new()),
        )?;

        run.enter(Phase::Done);
        Ok(())
    }

    /// Output state for `matched`; fragment states only see the keys they manage
    fn project(
        &self,
        run: &mut Run<'_>,
        target: &Target,
        state: &A::State,
        matched: &RemoteIntegration,
    ) -> Result<A::State, PhaseError> {
        run.enter(Phase::Projecting);
        let remote = if target.fragment {
            let managed = run.check(self.adapter.decode_document(state))?;
            document::restrict_to(&matched.config_data, &managed)
        } else {
            matched.config_data.clone()
        };

        let identity = IntegrationIdentity::resolved(&target.identity.organization, matched);
        let document = run.check(self.adapter.encode_document(&remote))?;
        run.check(self.adapter.assemble(state, &identity, &matched.id, document))
    }

    fn lookup(&self, run: &mut Run<'_>) -> Result<RemoteIntegration, PhaseError> {
        let identity = run.identity;

        run.enter(Phase::Listing);
        let items = run.check(fetch_all(&self.client, &identity.organization, &identity.provider_key))?;

        run.enter(Phase::Matched);
        run.check(match_by_name(items, &identity.provider_key, &identity.name))
    }
}

fn same_integration(held: &str, matched: &RemoteIntegration) -> Result<(), ReconcileError> {
    if held == matched.id {
        return Ok(());
    }
    Err(ReconcileError::IdMismatch {
        held: held.to_string(),
        matched: matched.id.clone(),
        name: matched.name.clone(),
    })
}
