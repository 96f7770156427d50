//! Google Calendar integration
//!
//! Implements the core `CalendarGateway` and `CalendarSessions` ports
//! against the Calendar v3 REST API.

pub mod gateway;
pub mod payload;
pub mod session;

pub use gateway::GoogleCalendarGateway;
pub use session::TokenSessions;
