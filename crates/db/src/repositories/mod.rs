//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Multi-step invariant-bearing
//! operations open their own transaction and lock the rows they touch.

pub mod facility_repo;
pub mod slot_repo;
pub mod slot_request_repo;
pub mod user_repo;
pub mod vehicle_entry_repo;
pub mod vehicle_repo;

pub use facility_repo::FacilityRepo;
pub use slot_repo::SlotRepo;
pub use slot_request_repo::SlotRequestRepo;
pub use user_repo::UserRepo;
pub use vehicle_entry_repo::VehicleEntryRepo;
pub use vehicle_repo::VehicleRepo;
