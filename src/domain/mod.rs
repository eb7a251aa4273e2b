//! Storefront domain: value objects, the favorites aggregate and its events
pub mod aggregates;
pub mod events;
pub mod value_objects;
