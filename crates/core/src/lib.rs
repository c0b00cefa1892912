//! Invoice Desk Core - Shared domain types.
//!
//! This crate provides the types used across all Invoice Desk components:
//! - `admin` - Server-rendered invoicing panel
//! - `cli` - Command-line tools for migrations, seeding and management
//!
//! # Architecture
//!
//! The core crate contains only types and parsing rules - no I/O, no database
//! access, no HTTP. Parsing failures are returned as values so callers can
//! turn them into field-level form errors.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, money in cents, invoice status and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
