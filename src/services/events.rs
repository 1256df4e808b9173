//! Post-commit mutation events.
//!
//! Mutation handlers publish an event only after the store has accepted
//! the write. Hooks run afterwards and cannot fail the mutation.

use async_trait::async_trait;
use std::sync::Arc;

use crate::models::{Branch, Complaint};

/// A committed change that downstream hooks may react to.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationEvent {
    /// A branch was updated.
    BranchUpdated {
        /// Store id of the branch.
        id: String,
        /// The branch as saved.
        branch: Branch,
    },
    /// A complaint was logged.
    ComplaintCreated {
        /// Store id of the complaint.
        id: String,
        /// The complaint as saved.
        complaint: Complaint,
    },
    /// A complaint was edited.
    ComplaintUpdated {
        /// Store id of the complaint.
        id: String,
        /// The complaint as saved.
        complaint: Complaint,
    },
}

impl MutationEvent {
    /// Store id of the changed record.
    pub fn record_id(&self) -> &str {
        match self {
            Self::BranchUpdated { id, .. }
            | Self::ComplaintCreated { id, .. }
            | Self::ComplaintUpdated { id, .. } => id,
        }
    }

    /// Short name of the event, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BranchUpdated { .. } => "branch_updated",
            Self::ComplaintCreated { .. } => "complaint_created",
            Self::ComplaintUpdated { .. } => "complaint_updated",
        }
    }
}

/// Reacts to committed mutations.
///
/// Implementations handle their own failures; nothing is returned to the
/// mutation handler.
#[async_trait]
pub trait CommitHook: Send + Sync + 'static {
    /// Called once per committed mutation.
    async fn after_commit(&self, event: &MutationEvent);
}

/// Runs every hook in registration order.
#[derive(Clone, Default)]
pub struct CommitHooks {
    hooks: Vec<Arc<dyn CommitHook>>,
}

impl CommitHooks {
    /// No hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a hook.
    pub fn with(mut self, hook: Arc<dyn CommitHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Publishes one event to every hook.
    pub async fn publish(&self, event: MutationEvent) {
        for hook in &self.hooks {
            hook.after_commit(&event).await;
        }
    }
}
