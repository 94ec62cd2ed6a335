//! HTTP handlers, one module per resource.

pub mod facility;
pub mod slot;
pub mod slot_request;
pub mod vehicle_entry;
