//! HTTP request handlers.

pub mod files;
pub mod health;
pub mod tasks;
pub mod text;

pub use health::{health, ready};
