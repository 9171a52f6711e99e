//! # Route Modules
//!
//! Each module defines an Axum Router for one surface of the demo server.
//! Routers are assembled by [`crate::app`].

pub mod echo;
pub mod health;
