//! Request handlers
//!
//! HTTP handlers for all API endpoints. Handlers are thin: they parse the
//! request, call into the service layer, and shape the response.

pub mod forums;
pub mod health;
pub mod messages;
pub mod topics;
