//! # Domain Layer
//!
//! Webs, sources and connections, plus the rules that hold no matter which
//! store they end up in. Independent of database clients and transports.

mod error;
pub mod models;
pub mod services;

pub use error::*;
pub use models::*;
pub use services::*;
