//! Typed resource clients, one per family.
//!
//! Each client is a stateless wrapper over [`Transport`] with a fixed path
//! template. Clients never cache anything; caching and invalidation belong
//! to the query cache layer.

use serde_json::json;

use crate::cache::ResourceFamily;
use crate::models::{
    BanRequest, CloseRequest, Coach, CoachFilter, CoachStatistics, Event, EventFilter,
    EventUpdate, NewTicket, NewUser, Page, Rating, RatingFilter, ReviewRequest, Ticket,
    TicketFilter, TicketUpdate, User, UserFilter, UserUpdate, VerificationRequest, Venue,
    VenueFilter, VenueUpdate,
};

use super::{ApiError, Params, Transport};

#[derive(Clone)]
pub struct UsersClient {
    transport: Transport,
}

impl UsersClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    fn path(suffix: &str) -> String {
        format!("{}{}", ResourceFamily::Users.base_path(), suffix)
    }

    pub async fn list(&self, filter: &UserFilter) -> Result<Page<User>, ApiError> {
        self.transport
            .get(ResourceFamily::Users.base_path(), &Params::from_query(filter)?)
            .await
    }

    pub async fn get(&self, id: i64) -> Result<User, ApiError> {
        self.transport.get(&Self::path(&format!("/{id}")), &Params::new()).await
    }

    pub async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        self.transport.post(ResourceFamily::Users.base_path(), user).await
    }

    pub async fn update(&self, id: i64, update: &UserUpdate) -> Result<User, ApiError> {
        self.transport.put(&Self::path(&format!("/{id}")), update).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.transport.delete(&Self::path(&format!("/{id}"))).await
    }

    pub async fn ban(&self, id: i64, request: &BanRequest) -> Result<User, ApiError> {
        self.transport.post(&Self::path(&format!("/{id}/ban")), request).await
    }

    pub async fn unban(&self, id: i64) -> Result<User, ApiError> {
        self.transport.post(&Self::path(&format!("/{id}/unban")), &json!({})).await
    }
}

#[derive(Clone)]
pub struct VenuesClient {
    transport: Transport,
}

impl VenuesClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    fn path(suffix: &str) -> String {
        format!("{}{}", ResourceFamily::Venues.base_path(), suffix)
    }

    pub async fn list(&self, filter: &VenueFilter) -> Result<Page<Venue>, ApiError> {
        self.transport
            .get(ResourceFamily::Venues.base_path(), &Params::from_query(filter)?)
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Venue, ApiError> {
        self.transport.get(&Self::path(&format!("/{id}")), &Params::new()).await
    }

    pub async fn update(&self, id: i64, update: &VenueUpdate) -> Result<Venue, ApiError> {
        self.transport.put(&Self::path(&format!("/{id}")), update).await
    }

    pub async fn approve(&self, id: i64, review: &ReviewRequest) -> Result<Venue, ApiError> {
        self.transport.post(&Self::path(&format!("/{id}/approve")), review).await
    }

    pub async fn reject(&self, id: i64, review: &ReviewRequest) -> Result<Venue, ApiError> {
        self.transport.post(&Self::path(&format!("/{id}/reject")), review).await
    }
}

#[derive(Clone)]
pub struct EventsClient {
    transport: Transport,
}

impl EventsClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    fn path(suffix: &str) -> String {
        format!("{}{}", ResourceFamily::Events.base_path(), suffix)
    }

    pub async fn list(&self, filter: &EventFilter) -> Result<Page<Event>, ApiError> {
        self.transport
            .get(ResourceFamily::Events.base_path(), &Params::from_query(filter)?)
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Event, ApiError> {
        self.transport.get(&Self::path(&format!("/{id}")), &Params::new()).await
    }

    pub async fn update(&self, id: i64, update: &EventUpdate) -> Result<Event, ApiError> {
        self.transport.put(&Self::path(&format!("/{id}")), update).await
    }
}

#[derive(Clone)]
pub struct CoachesClient {
    transport: Transport,
}

impl CoachesClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    fn path(suffix: &str) -> String {
        format!("{}{}", ResourceFamily::Coaches.base_path(), suffix)
    }

    pub async fn list(&self, filter: &CoachFilter) -> Result<Page<Coach>, ApiError> {
        self.transport
            .get(ResourceFamily::Coaches.base_path(), &Params::from_query(filter)?)
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Coach, ApiError> {
        self.transport.get(&Self::path(&format!("/{id}")), &Params::new()).await
    }

    pub async fn statistics(&self, id: i64) -> Result<CoachStatistics, ApiError> {
        self.transport
            .get(&Self::path(&format!("/{id}/statistics")), &Params::new())
            .await
    }

    pub async fn approve(&self, id: i64, request: &VerificationRequest) -> Result<Coach, ApiError> {
        self.transport.post(&Self::path(&format!("/{id}/approve")), request).await
    }

    pub async fn reject(&self, id: i64, request: &VerificationRequest) -> Result<Coach, ApiError> {
        self.transport.post(&Self::path(&format!("/{id}/reject")), request).await
    }

    pub async fn reset_verification(&self, id: i64) -> Result<Coach, ApiError> {
        self.transport
            .post(&Self::path(&format!("/{id}/reset-verification")), &json!({}))
            .await
    }
}

#[derive(Clone)]
pub struct TicketsClient {
    transport: Transport,
}

impl TicketsClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    fn path(suffix: &str) -> String {
        format!("{}{}", ResourceFamily::Tickets.base_path(), suffix)
    }

    pub async fn list(&self, filter: &TicketFilter) -> Result<Page<Ticket>, ApiError> {
        self.transport
            .get(ResourceFamily::Tickets.base_path(), &Params::from_query(filter)?)
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Ticket, ApiError> {
        self.transport.get(&Self::path(&format!("/{id}")), &Params::new()).await
    }

    pub async fn create(&self, ticket: &NewTicket) -> Result<Ticket, ApiError> {
        self.transport.post(ResourceFamily::Tickets.base_path(), ticket).await
    }

    pub async fn update(&self, id: i64, update: &TicketUpdate) -> Result<Ticket, ApiError> {
        self.transport.put(&Self::path(&format!("/{id}")), update).await
    }

    pub async fn close(&self, id: i64, request: &CloseRequest) -> Result<Ticket, ApiError> {
        self.transport.post(&Self::path(&format!("/{id}/close")), request).await
    }
}

#[derive(Clone)]
pub struct RatingsClient {
    transport: Transport,
}

impl RatingsClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub async fn list(&self, filter: &RatingFilter) -> Result<Page<Rating>, ApiError> {
        self.transport
            .get(ResourceFamily::Ratings.base_path(), &Params::from_query(filter)?)
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Rating, ApiError> {
        self.transport
            .get(&format!("{}/{id}", ResourceFamily::Ratings.base_path()), &Params::new())
            .await
    }
}
