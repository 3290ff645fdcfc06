use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Closed,
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketStatus::Open => write!(f, "Open"),
            TicketStatus::InProgress => write!(f, "In progress"),
            TicketStatus::Closed => write!(f, "Closed"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub subject: String,
    pub body: Option<String>,
    pub status: TicketStatus,
    #[serde(rename = "reporterId")]
    pub reporter_id: i64,
    #[serde(rename = "assigneeId")]
    pub assignee_id: Option<i64>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TicketFilter {
    pub search: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "assigneeId")]
    pub assignee_id: Option<i64>,
    pub page: Option<u32>,
    #[serde(rename = "perPage")]
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTicket {
    pub subject: String,
    pub body: Option<String>,
    #[serde(rename = "reporterId")]
    pub reporter_id: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TicketUpdate {
    pub subject: Option<String>,
    pub body: Option<String>,
    pub status: Option<TicketStatus>,
    #[serde(rename = "assigneeId")]
    pub assignee_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CloseRequest {
    pub resolution: Option<String>,
}
