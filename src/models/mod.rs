//! Data models for Courtside admin entities.
//!
//! This module contains the data structures exchanged with the admin API:
//!
//! - `User`: accounts with role/status and ban bookkeeping
//! - `Venue`: bookable locations with an approval workflow
//! - `Event`: scheduled sessions at a venue
//! - `Coach`, `CoachStatistics`: coach profiles and their aggregates
//! - `Ticket`: support tickets
//! - `Rating`: member ratings of coaches
//! - `Page`: the shared list envelope
//!
//! Each family also carries its sparse filter struct; the transport drops
//! absent filter fields when building query strings.

pub mod coach;
pub mod common;
pub mod event;
pub mod rating;
pub mod ticket;
pub mod user;
pub mod venue;

pub use coach::{Coach, CoachFilter, CoachStatistics, VerificationRequest, VerificationStatus};
pub use common::Page;
pub use event::{Event, EventFilter, EventStatus, EventUpdate};
pub use rating::{Rating, RatingFilter};
pub use ticket::{CloseRequest, NewTicket, Ticket, TicketFilter, TicketStatus, TicketUpdate};
pub use user::{BanRequest, NewUser, User, UserFilter, UserRole, UserStatus, UserUpdate};
pub use venue::{ReviewRequest, Venue, VenueFilter, VenueStatus, VenueUpdate};
