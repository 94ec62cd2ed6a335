//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches, where
//!   the entity supports patching

pub mod facility;
pub mod slot;
pub mod slot_request;
pub mod user;
pub mod vehicle;
pub mod vehicle_entry;
