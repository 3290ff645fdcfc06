//! REST API layer for the Courtside admin backend.
//!
//! One shared [`Transport`] performs every HTTP call: it builds query
//! strings from sparse parameter sets, injects the bearer credential, and
//! normalizes failures into [`ApiError`]. The per-family clients are thin
//! typed wrappers with fixed path templates and no state of their own.

pub mod clients;
pub mod error;
pub mod params;
pub mod transport;

pub use clients::{
    CoachesClient, EventsClient, RatingsClient, TicketsClient, UsersClient, VenuesClient,
};
pub use error::ApiError;
pub use params::Params;
pub use transport::Transport;
