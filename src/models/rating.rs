use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub id: i64,
    #[serde(rename = "coachId")]
    pub coach_id: i64,
    #[serde(rename = "userId")]
    pub user_id: i64,
    /// 1..=5 stars
    pub score: u8,
    pub comment: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RatingFilter {
    #[serde(rename = "coachId")]
    pub coach_id: Option<i64>,
    #[serde(rename = "minScore")]
    pub min_score: Option<u8>,
    pub page: Option<u32>,
    #[serde(rename = "perPage")]
    pub per_page: Option<u32>,
}
