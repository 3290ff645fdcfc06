use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationStatus::Pending => write!(f, "Pending"),
            VerificationStatus::Approved => write!(f, "Approved"),
            VerificationStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coach {
    pub id: i64,
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(rename = "verificationStatus")]
    pub verification_status: VerificationStatus,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Aggregates served by `/admin/coaches/{id}/statistics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachStatistics {
    #[serde(rename = "coachId")]
    pub coach_id: i64,
    #[serde(rename = "sessionsTotal")]
    pub sessions_total: i64,
    #[serde(rename = "studentsTotal")]
    pub students_total: i64,
    #[serde(rename = "ratingAverage")]
    pub rating_average: Option<f64>,
    #[serde(rename = "ratingsCount")]
    pub ratings_count: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CoachFilter {
    pub search: Option<String>,
    #[serde(rename = "verificationStatus")]
    pub verification_status: Option<String>,
    pub specialty: Option<String>,
    pub page: Option<u32>,
    #[serde(rename = "perPage")]
    pub per_page: Option<u32>,
}

/// Reviewer notes accompanying a verification decision.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerificationRequest {
    pub notes: Option<String>,
}
