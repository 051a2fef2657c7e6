pub mod allocation;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod venue;

pub use allocation::AvailabilityIndex;
pub use error::{NoSeatsAvailable, TicketError};
pub use models::{HoldState, Reservation, Seat, SeatHold};
pub use services::TicketService;
pub use venue::Venue;
