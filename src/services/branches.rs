//! Branch records.

use std::sync::Arc;
use tracing::info;

use crate::error::{OpsError, OpsResult};
use crate::models::{Branch, BranchStatus};
use crate::store::{EntityClient, RowStore, SortSpec, Stored};

use super::events::{CommitHooks, MutationEvent};

/// Lists and edits branches.
///
/// Updates publish [`MutationEvent::BranchUpdated`] once the store has
/// accepted them.
#[derive(Clone)]
pub struct BranchService {
    branches: EntityClient<Branch>,
    hooks: CommitHooks,
}

impl BranchService {
    /// Creates a service over the given store.
    pub fn new(store: Arc<dyn RowStore>, hooks: CommitHooks) -> Self {
        Self {
            branches: EntityClient::new(store),
            hooks,
        }
    }

    /// Lists every branch, newest first.
    pub async fn list(&self) -> OpsResult<Vec<Stored<Branch>>> {
        self.branches.list(Some(SortSpec::newest_first()), None).await
    }

    /// Fetches one branch.
    pub async fn get(&self, id: &str) -> OpsResult<Stored<Branch>> {
        self.branches.get(id).await
    }

    /// Creates a branch.
    pub async fn create(&self, branch: &Branch) -> OpsResult<Stored<Branch>> {
        validate(branch)?;
        let stored = self.branches.create(branch).await?;
        info!(id = %stored.id, branch = %stored.record.branch_name, "Branch created");
        Ok(stored)
    }

    /// Saves a branch and publishes the change.
    pub async fn update(&self, id: &str, branch: &Branch) -> OpsResult<Stored<Branch>> {
        validate(branch)?;
        let stored = self.branches.update(id, branch).await?;
        info!(
            id = %stored.id,
            branch = %stored.record.branch_name,
            status = %stored.record.status,
            "Branch updated"
        );
        self.hooks
            .publish(MutationEvent::BranchUpdated {
                id: stored.id.clone(),
                branch: stored.record.clone(),
            })
            .await;
        Ok(stored)
    }

    /// Deletes a branch.
    pub async fn delete(&self, id: &str) -> OpsResult<bool> {
        let deleted = self.branches.delete(id).await?;
        info!(id = %id, deleted, "Branch deleted");
        Ok(deleted)
    }

    /// Number of branches currently [`BranchStatus::Active`].
    pub fn active_count(branches: &[Stored<Branch>]) -> usize {
        branches
            .iter()
            .filter(|b| b.record.status == BranchStatus::Active)
            .count()
    }
}

fn validate(branch: &Branch) -> OpsResult<()> {
    if branch.branch_name.trim().is_empty() {
        return Err(OpsError::validation("branch_name", "Branch name is required"));
    }
    Ok(())
}
