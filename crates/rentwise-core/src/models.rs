//! Domain models for Rentwise.
//!
//! Every owner-scoped record carries the `owner_id` of the landlord it
//! belongs to. Status fields are closed enums with explicit transition
//! tables.

pub mod application;
pub mod kind;
pub mod maintenance;
pub mod owner;
pub mod payment;
pub mod profile;
pub mod property;
pub mod snapshot;
pub mod status;
pub mod tenancy;
