//! Core data layer for the Courtside admin dashboard.
//!
//! Everything the dashboard knows about the server goes through this
//! crate: the HTTP transport, the typed per-resource clients, the keyed
//! query cache with subscriptions and selective invalidation, and the
//! mutation coordinator that keeps cached state consistent after writes.
//!
//! The rendering layer is a collaborator, not a resident: it holds a
//! [`Store`], reads through it, subscribes to entries it displays, and
//! performs writes through the mutation helpers. Authentication storage is
//! likewise external, consumed through [`auth::CredentialProvider`].

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod store;

pub use api::{ApiError, Params, Transport};
pub use auth::{CredentialProvider, SharedSession};
pub use cache::{
    AdminMutation, CacheConfig, InvalidationTarget, MutationCoordinator, QueryCache, QueryKey,
    QuerySnapshot, QueryStatus, QuerySubscription, ResourceFamily, ResourceKind,
};
pub use config::Config;
pub use store::{AdminApi, Store};
