//! HTTP surface for the LingoPress content service.
//!
//! Thin axum layer over `lingopress-shared`: routing, query/body
//! extraction, and mapping of pipeline errors onto HTTP statuses.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
