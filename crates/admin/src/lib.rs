//! Invoice Desk admin library.
//!
//! A server-rendered invoicing panel: list, create, edit and delete invoices
//! stored in `PostgreSQL`, behind an email/password sign-in.
//!
//! Exposed as a library so the binary, the CLI and the tests share the same
//! repositories, validation and services.
//!
//! # Layers
//!
//! - [`forms`] - Pure validation of submitted fields
//! - [`services`] - Invoice actions and sign-in
//! - [`db`] - sqlx repositories
//! - [`routes`] - Axum handlers and Askama templates
//! - [`cache`] - Rendered page cache with path revalidation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
