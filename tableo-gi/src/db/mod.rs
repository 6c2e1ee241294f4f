//! Database access for tableo-gi

pub mod events;
pub mod guests;
