//! Request extractors
//!
//! Custom Axum extractors for authentication, viewer resolution, client
//! addresses, and validated JSON bodies.

pub mod auth;
pub mod client_ip;
pub mod validated;

pub use auth::{AuthUser, CurrentViewer};
pub use client_ip::ClientIp;
pub use validated::ValidatedJson;
