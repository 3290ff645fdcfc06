//! Query cache and mutation coordination.
//!
//! This module owns all cached server state:
//!
//! - `QueryKey`/`ResourceKind`: structural identity of cached queries
//! - `QueryCache`: keyed entries with subscriptions, fetch de-duplication,
//!   selective invalidation, and idle-time garbage collection
//! - `MutationCoordinator` + `AdminMutation`: writes and the dependency
//!   table mapping each write to the entries it makes stale

pub mod key;
pub mod mutation;
pub mod store;

pub use key::{InvalidationTarget, QueryKey, ResourceFamily, ResourceKind};
pub use mutation::{AdminMutation, MutationCoordinator};
pub use store::{
    CacheConfig, FetchResult, Fetcher, QueryCache, QuerySnapshot, QueryStatus, QuerySubscription,
};
