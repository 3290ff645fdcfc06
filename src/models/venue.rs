use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for VenueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VenueStatus::Pending => write!(f, "Pending"),
            VenueStatus::Approved => write!(f, "Approved"),
            VenueStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub capacity: Option<u32>,
    pub status: VenueStatus,
    #[serde(rename = "ownerId")]
    pub owner_id: Option<i64>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VenueFilter {
    pub search: Option<String>,
    pub city: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    #[serde(rename = "perPage")]
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VenueUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub capacity: Option<u32>,
}

/// Reviewer notes accompanying an approve/reject decision.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewRequest {
    pub notes: Option<String>,
}
