//! Domain logic for the Atelier agency-client portal.
//!
//! Pure types and functions only -- no I/O. Persistence lives in
//! `atelier-db`, the HTTP surface in `atelier-api`.

pub mod document;
pub mod error;
pub mod invoice;
pub mod progress;
pub mod roles;
pub mod signature;
pub mod types;
