//! tabsync core library.
//!
//! Signs in to the Tableau REST API, pages through users, groups and group
//! memberships, and projects them into an identity graph of resources,
//! entitlements and grants. Group membership can also be granted and revoked.

pub mod config;
pub mod connector;
pub mod errors;
pub mod models;
pub mod projection;
pub mod roles;
pub mod sync_engine;
pub mod tableau;

// Re-exports for convenience.
pub use config::AppConfig;
pub use connector::TableauConnector;
pub use sync_engine::SyncEngine;
pub use tableau::TableauClient;
