use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Scheduled,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    #[serde(rename = "venueId")]
    pub venue_id: i64,
    #[serde(rename = "coachId")]
    pub coach_id: Option<i64>,
    #[serde(rename = "startsAt")]
    pub starts_at: DateTime<Utc>,
    #[serde(rename = "endsAt")]
    pub ends_at: Option<DateTime<Utc>>,
    pub capacity: Option<u32>,
    pub status: EventStatus,
}

impl Event {
    pub fn is_upcoming(&self) -> bool {
        self.status == EventStatus::Scheduled && self.starts_at > Utc::now()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EventFilter {
    pub search: Option<String>,
    #[serde(rename = "venueId")]
    pub venue_id: Option<i64>,
    pub status: Option<String>,
    /// Inclusive ISO date bounds.
    pub from: Option<String>,
    pub to: Option<String>,
    pub page: Option<u32>,
    #[serde(rename = "perPage")]
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EventUpdate {
    pub title: Option<String>,
    #[serde(rename = "venueId")]
    pub venue_id: Option<i64>,
    #[serde(rename = "startsAt")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(rename = "endsAt")]
    pub ends_at: Option<DateTime<Utc>>,
    pub capacity: Option<u32>,
    pub status: Option<EventStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_upcoming_requires_scheduled_future() {
        let mut event = Event {
            id: 1,
            title: "Morning drills".to_string(),
            venue_id: 3,
            coach_id: Some(9),
            starts_at: Utc::now() + Duration::hours(2),
            ends_at: None,
            capacity: Some(20),
            status: EventStatus::Scheduled,
        };
        assert!(event.is_upcoming());

        event.status = EventStatus::Cancelled;
        assert!(!event.is_upcoming());

        event.status = EventStatus::Scheduled;
        event.starts_at = Utc::now() - Duration::hours(2);
        assert!(!event.is_upcoming());
    }
}
