//! usuarios-api Library
//!
//! Exposes the router, state and domain modules for use by the binary and tests.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod users;

pub use app::{build_app, init_states};
pub use config::Config;
