//! Rentwise Core — domain types shared by every Rentwise crate.
//!
//! This crate provides:
//! - Owner-scoped domain models and their status state machines
//!   ([`models`])
//! - Whitelisted partial-update payloads ([`patch`])
//! - Repository traits implemented by storage backends ([`repository`])
//! - Lenient timestamp coercion for stored documents ([`timestamp`])
//! - The error taxonomy ([`error::RentalError`])

pub mod error;
pub mod models;
pub mod patch;
pub mod repository;
pub mod timestamp;
