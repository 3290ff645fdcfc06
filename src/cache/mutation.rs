//! Write coordination.
//!
//! Every mutation the dashboard can perform is a variant of
//! [`AdminMutation`], and each variant declares exactly which cache
//! entries its success makes stale. That mapping is the authoritative
//! invalidation contract: leaving a dependent key out of it is a
//! correctness bug (stale UI), not a performance nuance.

use std::future::Future;

use tracing::debug;

use crate::api::ApiError;

use super::key::{InvalidationTarget, ResourceFamily};
use super::store::QueryCache;

/// Every write operation the admin API exposes, carrying the identifying
/// parameters its invalidation depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminMutation {
    ApproveCoach { id: i64 },
    RejectCoach { id: i64 },
    ResetCoachVerification { id: i64 },
    UpdateVenue { id: i64 },
    ApproveVenue { id: i64 },
    RejectVenue { id: i64 },
    UpdateEvent { id: i64 },
    CreateUser,
    UpdateUser { id: i64 },
    DeleteUser { id: i64 },
    BanUser { id: i64 },
    UnbanUser { id: i64 },
    CreateTicket,
    UpdateTicket { id: i64 },
    CloseTicket { id: i64 },
}

impl AdminMutation {
    /// The dependency table: which entries this mutation invalidates.
    ///
    /// Create operations (users, tickets) declare only the list target:
    /// a server-assigned id cannot have a cached detail entry yet, so a
    /// detail predicate for it could never match. Deletes likewise omit
    /// the detail entry; a deleted id's entry is reclaimed by gc.
    pub fn invalidation_targets(&self) -> Vec<InvalidationTarget> {
        use AdminMutation::*;
        use InvalidationTarget::{List, Single, Statistics};
        use ResourceFamily::*;

        match *self {
            ApproveCoach { id } | RejectCoach { id } | ResetCoachVerification { id } => {
                vec![List(Coaches), Single(Coaches, id), Statistics(Coaches, id)]
            }
            UpdateVenue { id } | ApproveVenue { id } | RejectVenue { id } => {
                vec![List(Venues), Single(Venues, id)]
            }
            UpdateEvent { id } => vec![List(Events), Single(Events, id)],
            CreateUser | DeleteUser { .. } => vec![List(Users)],
            UpdateUser { id } | BanUser { id } | UnbanUser { id } => {
                vec![List(Users), Single(Users, id)]
            }
            CreateTicket => vec![List(Tickets)],
            UpdateTicket { id } | CloseTicket { id } => {
                vec![List(Tickets), Single(Tickets, id)]
            }
        }
    }
}

/// Runs writes and applies their declared invalidations afterwards.
#[derive(Clone)]
pub struct MutationCoordinator {
    cache: QueryCache,
}

impl MutationCoordinator {
    pub fn new(cache: QueryCache) -> Self {
        Self { cache }
    }

    /// Execute a write and, only once it has succeeded, invalidate the
    /// entries its dependency table names. A failed write invalidates
    /// nothing and surfaces its typed failure unchanged.
    pub async fn run<T, F>(&self, mutation: AdminMutation, op: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let result = op.await?;
        let targets = mutation.invalidation_targets();
        debug!(?mutation, targets = targets.len(), "mutation succeeded, invalidating");
        self.cache.invalidate_targets(&targets);
        Ok(result)
    }

    /// Escape hatch for callers composing their own target list.
    pub async fn mutate<T, F>(
        &self,
        op: F,
        targets: &[InvalidationTarget],
    ) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let result = op.await?;
        self.cache.invalidate_targets(targets);
        Ok(result)
    }
}
