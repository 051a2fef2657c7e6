pub mod ticket;

pub use ticket::TicketService;
