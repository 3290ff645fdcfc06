//! Cache key identity.
//!
//! Keys are (resource kind, parameter set) tuples. Resource kinds are a
//! closed enumeration rather than free-form strings, so a typo'd resource
//! tag cannot silently miss the cache or an invalidation.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::api::Params;

/// The resource families the admin API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceFamily {
    Users,
    Venues,
    Events,
    Coaches,
    Tickets,
    Ratings,
}

impl ResourceFamily {
    /// Path template root for the family's endpoints.
    pub fn base_path(&self) -> &'static str {
        match self {
            ResourceFamily::Users => "/admin/users",
            ResourceFamily::Venues => "/admin/venues",
            ResourceFamily::Events => "/admin/events",
            ResourceFamily::Coaches => "/admin/coaches",
            ResourceFamily::Tickets => "/admin/tickets",
            ResourceFamily::Ratings => "/admin/ratings",
        }
    }

    /// Tag for list-style keys, e.g. "admin-users".
    pub fn list_tag(&self) -> &'static str {
        match self {
            ResourceFamily::Users => "admin-users",
            ResourceFamily::Venues => "admin-venues",
            ResourceFamily::Events => "admin-events",
            ResourceFamily::Coaches => "admin-coaches",
            ResourceFamily::Tickets => "admin-tickets",
            ResourceFamily::Ratings => "admin-ratings",
        }
    }

    /// Tag for single-entity keys, e.g. "admin-user".
    pub fn detail_tag(&self) -> &'static str {
        match self {
            ResourceFamily::Users => "admin-user",
            ResourceFamily::Venues => "admin-venue",
            ResourceFamily::Events => "admin-event",
            ResourceFamily::Coaches => "admin-coach",
            ResourceFamily::Tickets => "admin-ticket",
            ResourceFamily::Ratings => "admin-rating",
        }
    }

    /// Tag for statistics keys, e.g. "admin-coach-statistics".
    pub fn statistics_tag(&self) -> &'static str {
        match self {
            ResourceFamily::Users => "admin-user-statistics",
            ResourceFamily::Venues => "admin-venue-statistics",
            ResourceFamily::Events => "admin-event-statistics",
            ResourceFamily::Coaches => "admin-coach-statistics",
            ResourceFamily::Tickets => "admin-ticket-statistics",
            ResourceFamily::Ratings => "admin-rating-statistics",
        }
    }
}

/// What a key addresses within a family: the filtered list, one entity, or
/// one entity's statistics sub-resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    List(ResourceFamily),
    Detail(ResourceFamily),
    Statistics(ResourceFamily),
}

impl ResourceKind {
    pub fn family(&self) -> ResourceFamily {
        match self {
            ResourceKind::List(f) | ResourceKind::Detail(f) | ResourceKind::Statistics(f) => *f,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ResourceKind::List(f) => f.list_tag(),
            ResourceKind::Detail(f) => f.detail_tag(),
            ResourceKind::Statistics(f) => f.statistics_tag(),
        }
    }
}

/// Identity of a cached query: resource kind plus structural parameters.
///
/// Two keys are equal iff the kinds match and the parameter sets are
/// structurally equal; object key order never matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryKey {
    kind: ResourceKind,
    params: Params,
}

impl QueryKey {
    pub fn list(family: ResourceFamily, params: Params) -> Self {
        Self {
            kind: ResourceKind::List(family),
            params,
        }
    }

    pub fn detail(family: ResourceFamily, id: i64) -> Self {
        Self {
            kind: ResourceKind::Detail(family),
            params: Params::new().with("id", id),
        }
    }

    pub fn statistics(family: ResourceFamily, id: i64) -> Self {
        Self {
            kind: ResourceKind::Statistics(family),
            params: Params::new().with("id", id),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The entity id for detail/statistics keys.
    pub fn id(&self) -> Option<i64> {
        self.params.get("id").and_then(serde_json::Value::as_i64)
    }
}

impl Hash for QueryKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.params.hash(state);
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.tag())
    }
}

/// A set of cache entries a mutation makes stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationTarget {
    /// Every list entry for the family, across all filter parameters.
    List(ResourceFamily),
    /// One entity's detail entry.
    Single(ResourceFamily, i64),
    /// One entity's statistics entry.
    Statistics(ResourceFamily, i64),
}

impl InvalidationTarget {
    pub fn matches(&self, key: &QueryKey) -> bool {
        match (*self, key.kind()) {
            (InvalidationTarget::List(family), ResourceKind::List(k)) => family == k,
            (InvalidationTarget::Single(family, id), ResourceKind::Detail(k)) => {
                family == k && key.id() == Some(id)
            }
            (InvalidationTarget::Statistics(family, id), ResourceKind::Statistics(k)) => {
                family == k && key.id() == Some(id)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(key: &QueryKey) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_structurally_equal_keys_collide() {
        let a = QueryKey::list(
            ResourceFamily::Users,
            Params::new().with("page", 1).with("status", "active"),
        );
        let b = QueryKey::list(
            ResourceFamily::Users,
            Params::new().with("status", "active").with("page", 1),
        );
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_distinct_params_are_distinct_keys() {
        let a = QueryKey::list(ResourceFamily::Users, Params::new().with("page", 1));
        let b = QueryKey::list(ResourceFamily::Users, Params::new().with("page", 2));
        assert_ne!(a, b);
    }

    #[test]
    fn test_list_target_matches_any_filter() {
        let target = InvalidationTarget::List(ResourceFamily::Users);
        assert!(target.matches(&QueryKey::list(ResourceFamily::Users, Params::new())));
        assert!(target.matches(&QueryKey::list(
            ResourceFamily::Users,
            Params::new().with("page", 3)
        )));
        assert!(!target.matches(&QueryKey::list(ResourceFamily::Venues, Params::new())));
        assert!(!target.matches(&QueryKey::detail(ResourceFamily::Users, 7)));
    }

    #[test]
    fn test_single_target_matches_exact_id() {
        let target = InvalidationTarget::Single(ResourceFamily::Users, 7);
        assert!(target.matches(&QueryKey::detail(ResourceFamily::Users, 7)));
        assert!(!target.matches(&QueryKey::detail(ResourceFamily::Users, 8)));
        assert!(!target.matches(&QueryKey::detail(ResourceFamily::Venues, 7)));
    }

    #[test]
    fn test_statistics_target_only_matches_statistics_keys() {
        let target = InvalidationTarget::Statistics(ResourceFamily::Coaches, 5);
        assert!(target.matches(&QueryKey::statistics(ResourceFamily::Coaches, 5)));
        assert!(!target.matches(&QueryKey::detail(ResourceFamily::Coaches, 5)));
    }

    #[test]
    fn test_tags() {
        assert_eq!(
            ResourceKind::List(ResourceFamily::Coaches).tag(),
            "admin-coaches"
        );
        assert_eq!(
            ResourceKind::Detail(ResourceFamily::Coaches).tag(),
            "admin-coach"
        );
        assert_eq!(
            ResourceKind::Statistics(ResourceFamily::Coaches).tag(),
            "admin-coach-statistics"
        );
    }
}
