//! HTTP API handlers for tableo-gi

pub mod events;
pub mod guests;
pub mod health;
pub mod import;

pub use events::event_routes;
pub use guests::guest_routes;
pub use health::health_routes;
pub use import::import_routes;
