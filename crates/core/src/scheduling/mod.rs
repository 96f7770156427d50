//! Class lifecycle and calendar mirroring

pub mod ports;
pub mod service;

pub use service::SchedulingService;
