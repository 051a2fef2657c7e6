pub mod hold;
pub mod reservation;
pub mod seat;

pub use hold::{is_valid_email, HoldState, SeatHold};
pub use reservation::Reservation;
pub use seat::Seat;
