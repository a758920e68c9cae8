//! careerd - career path progress daemon.
//!
//! Serves the career/step CRUD and progress API over HTTP, backed by the
//! shared store and engine in `career_common`. Authentication is terminated
//! upstream; the daemon verifies a shared secret and trusts the forwarded
//! identity headers.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod server;
