//! HTTP surface.
//!
//! The identity provider sits in front of this service and forwards the
//! authenticated principal as request headers; see [`auth`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;

pub use routes::{create_router, AppState};
