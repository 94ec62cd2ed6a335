//! Domain logic for the ParkFleet backend.
//!
//! Pure types and computations shared by the persistence and API crates:
//! the error taxonomy, billing arithmetic, identifier normalization, ticket
//! number generation, and role capability checks. This crate performs no I/O.
#![feature(int_roundings)]

pub mod billing;
pub mod error;
pub mod facility_code;
pub mod plates;
pub mod roles;
pub mod tickets;
pub mod types;
