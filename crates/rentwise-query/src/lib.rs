//! Rentwise Query — the owner-scoped data access and analytics layer.
//!
//! This crate provides:
//! - [`OwnerQueryService`], which resolves landlord profiles, reads
//!   owner-scoped collections, computes the dashboard snapshot and
//!   applies whitelisted updates
//! - An explicit TTL query cache ([`cache::QueryCache`])
//! - Layered configuration ([`RentwiseConfig`], [`QueryConfig`])

mod aggregator;
pub mod cache;
pub mod config;
mod mutator;
mod reader;
mod resolver;
mod service;

pub use config::{QueryConfig, RentwiseConfig};
pub use service::OwnerQueryService;
