//! eduhub backend — CRUD API for the education platform web client.
//!
//! Exposes course / event / blog / announcement / application resources
//! plus user administration, authenticated via a signed token carried in
//! an HTTP-only cookie. Admin-gated routes re-read the caller's role from
//! the user collection on every request.

pub mod api;
pub mod auth_middleware;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod login;
pub mod routes;
pub mod token;
