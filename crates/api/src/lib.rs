//! Atelier API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! payment gateway and blob store clients) so integration tests and the
//! binary entrypoint can both access them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod payments;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod storage;
