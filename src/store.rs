//! The application-facing store.
//!
//! `Store` wires the transport, the resource clients, the query cache, and
//! the mutation coordinator into one constructible object. Build it once
//! at application start and pass it down explicitly; nothing in this crate
//! keeps ambient global state.
//!
//! Reads go through the cache (`store.users(&filter)` builds the query key
//! and fetcher and shares cached state with every other reader of the same
//! key); writes go through the coordinator, which applies the mutation's
//! dependency row after the write is confirmed.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::{
    ApiError, CoachesClient, EventsClient, Params, RatingsClient, TicketsClient, Transport,
    UsersClient, VenuesClient,
};
use crate::cache::{
    AdminMutation, CacheConfig, Fetcher, MutationCoordinator, QueryCache, QueryKey,
    QuerySubscription, ResourceFamily,
};
use crate::models::{
    BanRequest, CloseRequest, Coach, CoachFilter, CoachStatistics, Event, EventFilter,
    EventUpdate, NewTicket, NewUser, Page, Rating, RatingFilter, ReviewRequest, Ticket,
    TicketFilter, TicketUpdate, User, UserFilter, UserUpdate, VerificationRequest, Venue,
    VenueFilter, VenueUpdate,
};

/// The per-family resource clients, sharing one transport.
#[derive(Clone)]
pub struct AdminApi {
    pub users: UsersClient,
    pub venues: VenuesClient,
    pub events: EventsClient,
    pub coaches: CoachesClient,
    pub tickets: TicketsClient,
    pub ratings: RatingsClient,
}

impl AdminApi {
    pub fn new(transport: &Transport) -> Self {
        Self {
            users: UsersClient::new(transport.clone()),
            venues: VenuesClient::new(transport.clone()),
            events: EventsClient::new(transport.clone()),
            coaches: CoachesClient::new(transport.clone()),
            tickets: TicketsClient::new(transport.clone()),
            ratings: RatingsClient::new(transport.clone()),
        }
    }
}

/// Data-access context for the dashboard.
#[derive(Clone)]
pub struct Store {
    cache: QueryCache,
    coordinator: MutationCoordinator,
    api: AdminApi,
}

/// Build a cache fetcher from a typed client call.
fn json_fetcher<T, F, Fut>(call: F) -> Fetcher
where
    T: Serialize,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    Arc::new(move || {
        let fut = call();
        async move {
            let value = fut.await?;
            serde_json::to_value(value).map_err(ApiError::from)
        }
        .boxed()
    })
}

impl Store {
    pub fn new(transport: Transport, cache_config: CacheConfig) -> Self {
        let cache = QueryCache::new(cache_config);
        Self {
            coordinator: MutationCoordinator::new(cache.clone()),
            api: AdminApi::new(&transport),
            cache,
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn api(&self) -> &AdminApi {
        &self.api
    }

    async fn read_as<T: DeserializeOwned>(
        &self,
        key: QueryKey,
        fetcher: Fetcher,
    ) -> Result<T, ApiError> {
        let value = self.cache.read(key, fetcher).await?;
        serde_json::from_value(value.as_ref().clone()).map_err(ApiError::from)
    }

    // ===== Users =====

    pub async fn users(&self, filter: &UserFilter) -> Result<Page<User>, ApiError> {
        let key = QueryKey::list(ResourceFamily::Users, Params::from_query(filter)?);
        let client = self.api.users.clone();
        let filter = filter.clone();
        self.read_as(key, json_fetcher(move || {
            let client = client.clone();
            let filter = filter.clone();
            async move { client.list(&filter).await }
        }))
        .await
    }

    pub async fn user(&self, id: i64) -> Result<User, ApiError> {
        let key = QueryKey::detail(ResourceFamily::Users, id);
        let client = self.api.users.clone();
        self.read_as(key, json_fetcher(move || {
            let client = client.clone();
            async move { client.get(id).await }
        }))
        .await
    }

    /// Long-lived subscription to a filtered users list, for views that
    /// want to observe refetches instead of awaiting one value. Every
    /// family exposes the same `watch_*` helper for its list.
    pub fn watch_users(&self, filter: &UserFilter) -> Result<QuerySubscription, ApiError> {
        let key = QueryKey::list(ResourceFamily::Users, Params::from_query(filter)?);
        let client = self.api.users.clone();
        let filter = filter.clone();
        Ok(self.cache.subscribe(key, json_fetcher(move || {
            let client = client.clone();
            let filter = filter.clone();
            async move { client.list(&filter).await }
        })))
    }

    pub async fn create_user(&self, user: NewUser) -> Result<User, ApiError> {
        let client = self.api.users.clone();
        self.coordinator
            .run(AdminMutation::CreateUser, async move { client.create(&user).await })
            .await
    }

    pub async fn update_user(&self, id: i64, update: UserUpdate) -> Result<User, ApiError> {
        let client = self.api.users.clone();
        self.coordinator
            .run(AdminMutation::UpdateUser { id }, async move {
                client.update(id, &update).await
            })
            .await
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        let client = self.api.users.clone();
        self.coordinator
            .run(AdminMutation::DeleteUser { id }, async move { client.delete(id).await })
            .await
    }

    pub async fn ban_user(&self, id: i64, request: BanRequest) -> Result<User, ApiError> {
        let client = self.api.users.clone();
        self.coordinator
            .run(AdminMutation::BanUser { id }, async move { client.ban(id, &request).await })
            .await
    }

    pub async fn unban_user(&self, id: i64) -> Result<User, ApiError> {
        let client = self.api.users.clone();
        self.coordinator
            .run(AdminMutation::UnbanUser { id }, async move { client.unban(id).await })
            .await
    }

    // ===== Venues =====

    pub async fn venues(&self, filter: &VenueFilter) -> Result<Page<Venue>, ApiError> {
        let key = QueryKey::list(ResourceFamily::Venues, Params::from_query(filter)?);
        let client = self.api.venues.clone();
        let filter = filter.clone();
        self.read_as(key, json_fetcher(move || {
            let client = client.clone();
            let filter = filter.clone();
            async move { client.list(&filter).await }
        }))
        .await
    }

    pub async fn venue(&self, id: i64) -> Result<Venue, ApiError> {
        let key = QueryKey::detail(ResourceFamily::Venues, id);
        let client = self.api.venues.clone();
        self.read_as(key, json_fetcher(move || {
            let client = client.clone();
            async move { client.get(id).await }
        }))
        .await
    }

    pub fn watch_venues(&self, filter: &VenueFilter) -> Result<QuerySubscription, ApiError> {
        let key = QueryKey::list(ResourceFamily::Venues, Params::from_query(filter)?);
        let client = self.api.venues.clone();
        let filter = filter.clone();
        Ok(self.cache.subscribe(key, json_fetcher(move || {
            let client = client.clone();
            let filter = filter.clone();
            async move { client.list(&filter).await }
        })))
    }

    pub async fn update_venue(&self, id: i64, update: VenueUpdate) -> Result<Venue, ApiError> {
        let client = self.api.venues.clone();
        self.coordinator
            .run(AdminMutation::UpdateVenue { id }, async move {
                client.update(id, &update).await
            })
            .await
    }

    pub async fn approve_venue(&self, id: i64, review: ReviewRequest) -> Result<Venue, ApiError> {
        let client = self.api.venues.clone();
        self.coordinator
            .run(AdminMutation::ApproveVenue { id }, async move {
                client.approve(id, &review).await
            })
            .await
    }

    pub async fn reject_venue(&self, id: i64, review: ReviewRequest) -> Result<Venue, ApiError> {
        let client = self.api.venues.clone();
        self.coordinator
            .run(AdminMutation::RejectVenue { id }, async move {
                client.reject(id, &review).await
            })
            .await
    }

    // ===== Events =====

    pub async fn events(&self, filter: &EventFilter) -> Result<Page<Event>, ApiError> {
        let key = QueryKey::list(ResourceFamily::Events, Params::from_query(filter)?);
        let client = self.api.events.clone();
        let filter = filter.clone();
        self.read_as(key, json_fetcher(move || {
            let client = client.clone();
            let filter = filter.clone();
            async move { client.list(&filter).await }
        }))
        .await
    }

    pub async fn event(&self, id: i64) -> Result<Event, ApiError> {
        let key = QueryKey::detail(ResourceFamily::Events, id);
        let client = self.api.events.clone();
        self.read_as(key, json_fetcher(move || {
            let client = client.clone();
            async move { client.get(id).await }
        }))
        .await
    }

    pub fn watch_events(&self, filter: &EventFilter) -> Result<QuerySubscription, ApiError> {
        let key = QueryKey::list(ResourceFamily::Events, Params::from_query(filter)?);
        let client = self.api.events.clone();
        let filter = filter.clone();
        Ok(self.cache.subscribe(key, json_fetcher(move || {
            let client = client.clone();
            let filter = filter.clone();
            async move { client.list(&filter).await }
        })))
    }

    pub async fn update_event(&self, id: i64, update: EventUpdate) -> Result<Event, ApiError> {
        let client = self.api.events.clone();
        self.coordinator
            .run(AdminMutation::UpdateEvent { id }, async move {
                client.update(id, &update).await
            })
            .await
    }

    // ===== Coaches =====

    pub async fn coaches(&self, filter: &CoachFilter) -> Result<Page<Coach>, ApiError> {
        let key = QueryKey::list(ResourceFamily::Coaches, Params::from_query(filter)?);
        let client = self.api.coaches.clone();
        let filter = filter.clone();
        self.read_as(key, json_fetcher(move || {
            let client = client.clone();
            let filter = filter.clone();
            async move { client.list(&filter).await }
        }))
        .await
    }

    pub async fn coach(&self, id: i64) -> Result<Coach, ApiError> {
        let key = QueryKey::detail(ResourceFamily::Coaches, id);
        let client = self.api.coaches.clone();
        self.read_as(key, json_fetcher(move || {
            let client = client.clone();
            async move { client.get(id).await }
        }))
        .await
    }

    pub async fn coach_statistics(&self, id: i64) -> Result<CoachStatistics, ApiError> {
        let key = QueryKey::statistics(ResourceFamily::Coaches, id);
        let client = self.api.coaches.clone();
        self.read_as(key, json_fetcher(move || {
            let client = client.clone();
            async move { client.statistics(id).await }
        }))
        .await
    }

    pub fn watch_coaches(&self, filter: &CoachFilter) -> Result<QuerySubscription, ApiError> {
        let key = QueryKey::list(ResourceFamily::Coaches, Params::from_query(filter)?);
        let client = self.api.coaches.clone();
        let filter = filter.clone();
        Ok(self.cache.subscribe(key, json_fetcher(move || {
            let client = client.clone();
            let filter = filter.clone();
            async move { client.list(&filter).await }
        })))
    }

    pub async fn approve_coach(
        &self,
        id: i64,
        request: VerificationRequest,
    ) -> Result<Coach, ApiError> {
        let client = self.api.coaches.clone();
        self.coordinator
            .run(AdminMutation::ApproveCoach { id }, async move {
                client.approve(id, &request).await
            })
            .await
    }

    pub async fn reject_coach(
        &self,
        id: i64,
        request: VerificationRequest,
    ) -> Result<Coach, ApiError> {
        let client = self.api.coaches.clone();
        self.coordinator
            .run(AdminMutation::RejectCoach { id }, async move {
                client.reject(id, &request).await
            })
            .await
    }

    pub async fn reset_coach_verification(&self, id: i64) -> Result<Coach, ApiError> {
        let client = self.api.coaches.clone();
        self.coordinator
            .run(AdminMutation::ResetCoachVerification { id }, async move {
                client.reset_verification(id).await
            })
            .await
    }

    // ===== Tickets =====

    pub async fn tickets(&self, filter: &TicketFilter) -> Result<Page<Ticket>, ApiError> {
        let key = QueryKey::list(ResourceFamily::Tickets, Params::from_query(filter)?);
        let client = self.api.tickets.clone();
        let filter = filter.clone();
        self.read_as(key, json_fetcher(move || {
            let client = client.clone();
            let filter = filter.clone();
            async move { client.list(&filter).await }
        }))
        .await
    }

    pub async fn ticket(&self, id: i64) -> Result<Ticket, ApiError> {
        let key = QueryKey::detail(ResourceFamily::Tickets, id);
        let client = self.api.tickets.clone();
        self.read_as(key, json_fetcher(move || {
            let client = client.clone();
            async move { client.get(id).await }
        }))
        .await
    }

    pub fn watch_tickets(&self, filter: &TicketFilter) -> Result<QuerySubscription, ApiError> {
        let key = QueryKey::list(ResourceFamily::Tickets, Params::from_query(filter)?);
        let client = self.api.tickets.clone();
        let filter = filter.clone();
        Ok(self.cache.subscribe(key, json_fetcher(move || {
            let client = client.clone();
            let filter = filter.clone();
            async move { client.list(&filter).await }
        })))
    }

    pub async fn create_ticket(&self, ticket: NewTicket) -> Result<Ticket, ApiError> {
        let client = self.api.tickets.clone();
        self.coordinator
            .run(AdminMutation::CreateTicket, async move { client.create(&ticket).await })
            .await
    }

    pub async fn update_ticket(&self, id: i64, update: TicketUpdate) -> Result<Ticket, ApiError> {
        let client = self.api.tickets.clone();
        self.coordinator
            .run(AdminMutation::UpdateTicket { id }, async move {
                client.update(id, &update).await
            })
            .await
    }

    pub async fn close_ticket(&self, id: i64, request: CloseRequest) -> Result<Ticket, ApiError> {
        let client = self.api.tickets.clone();
        self.coordinator
            .run(AdminMutation::CloseTicket { id }, async move {
                client.close(id, &request).await
            })
            .await
    }

    // ===== Ratings =====

    pub async fn ratings(&self, filter: &RatingFilter) -> Result<Page<Rating>, ApiError> {
        let key = QueryKey::list(ResourceFamily::Ratings, Params::from_query(filter)?);
        let client = self.api.ratings.clone();
        let filter = filter.clone();
        self.read_as(key, json_fetcher(move || {
            let client = client.clone();
            let filter = filter.clone();
            async move { client.list(&filter).await }
        }))
        .await
    }

    pub async fn rating(&self, id: i64) -> Result<Rating, ApiError> {
        let key = QueryKey::detail(ResourceFamily::Ratings, id);
        let client = self.api.ratings.clone();
        self.read_as(key, json_fetcher(move || {
            let client = client.clone();
            async move { client.get(id).await }
        }))
        .await
    }

    pub fn watch_ratings(&self, filter: &RatingFilter) -> Result<QuerySubscription, ApiError> {
        let key = QueryKey::list(ResourceFamily::Ratings, Params::from_query(filter)?);
        let client = self.api.ratings.clone();
        let filter = filter.clone();
        Ok(self.cache.subscribe(key, json_fetcher(move || {
            let client = client.clone();
            let filter = filter.clone();
            async move { client.list(&filter).await }
        })))
    }
}
