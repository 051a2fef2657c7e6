pub mod engine;
pub mod index;

pub use index::AvailabilityIndex;
