//! Seat reservations and attendee sync

pub mod ports;
pub mod service;

pub use service::ReservationService;
