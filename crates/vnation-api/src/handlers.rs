//! Request handlers.

pub mod auth;
pub mod generation;
pub mod health;
pub mod pages;

pub use auth::*;
pub use generation::*;
pub use health::*;
