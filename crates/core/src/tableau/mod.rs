//! Tableau REST API: sign-in, exhaustive pagination, and typed operations.

pub mod client;
pub mod models;
pub mod pagination;
pub mod session;

pub use client::TableauClient;
pub use models::{Group, Pagination, Site, User};
pub use session::Session;
